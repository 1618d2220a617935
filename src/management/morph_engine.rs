use bevy::prelude::*;
use std::collections::HashMap;
use crate::animation::docking::{CameraFrame, DockState, PresentationDocker};
use crate::animation::state_blend::{FoliageBlender, RigidBlender, RigidPose, RotationMode};
use crate::animation::twinkle::TwinkleScheduler;
use crate::core::class_kind::ClassKind;
use crate::core::instance_buffer::{InstanceBuffer, InstanceSink};
use crate::core::instance_record::InstanceRecord;
use crate::core::morph_config::MorphConfig;
use crate::core::morph_error::MorphError;
use crate::core::scene_state::SceneState;
use crate::management::photo_collection::{PhotoCollection, PhotoId};
use crate::spawning::helpers::GenRng;
use crate::spawning::layout_generation::generate;
use crate::spawning::photo_layout::{layout_photos, needs_fresh_chaos, PhotoSeed};

/// Values the host supplies for one frame. Docking is skipped when either is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInputs {
    pub camera: Option<CameraFrame>,
    /// World transform of the space instance poses are expressed in.
    pub parent: Option<Transform>,
}

/// Owns every animated instance of the tree and produces the instance buffer each frame.
#[derive(Resource)]
pub struct MorphEngine {
    config: MorphConfig,
    state: SceneState,
    frame_state: SceneState,
    gen_rng: GenRng,

    foliage: Vec<InstanceRecord>,
    ornaments: Vec<InstanceRecord>,
    photos: Vec<InstanceRecord>,
    photo_ids: Vec<PhotoId>,
    // chaos pose and attributes each frame was last laid out with
    photo_seeds: HashMap<PhotoId, PhotoSeed>,

    foliage_blender: FoliageBlender,
    foliage_stale: bool,
    ornament_blender: RigidBlender,
    photo_blender: RigidBlender,
    twinkle: TwinkleScheduler,
    docker: PresentationDocker,
    buffer: InstanceBuffer,
}

impl Default for MorphEngine {
    fn default() -> Self {
        MorphEngine::new(MorphConfig::default())
    }
}

impl MorphEngine {
    pub fn new(config: MorphConfig) -> Self {
        let config = config.sanitized();
        let gen_rng = GenRng::new(config.seed.resolve());
        let mut engine = MorphEngine {
            state: SceneState::default(),
            frame_state: SceneState::default(),
            gen_rng,
            foliage: Vec::new(),
            ornaments: Vec::new(),
            photos: Vec::new(),
            photo_ids: Vec::new(),
            photo_seeds: HashMap::new(),
            foliage_blender: FoliageBlender::default(),
            foliage_stale: true,
            ornament_blender: RigidBlender::new(RotationMode::FreeSpin, &[]),
            photo_blender: RigidBlender::new(RotationMode::FaceOutward, &[]),
            twinkle: TwinkleScheduler::new(config.twinkle.max_active),
            docker: PresentationDocker::default(),
            buffer: InstanceBuffer::default(),
            config,
        };
        engine.regenerate_foliage();
        engine.regenerate_ornaments();
        engine
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    pub fn scene_state(&self) -> SceneState {
        self.state
    }

    pub fn set_scene_state(&mut self, state: SceneState) {
        if self.state != state {
            info!("scene state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    pub fn toggle_scene_state(&mut self) -> SceneState {
        self.set_scene_state(self.state.toggle());
        self.state
    }

    /// Applies a new config. Layouts whose inputs changed are regenerated;
    /// everything else takes effect on the next frame.
    pub fn set_config(&mut self, config: MorphConfig) {
        let config = config.sanitized();
        let old = std::mem::replace(&mut self.config, config);
        let shape_changed = old.tree != self.config.tree || old.chaos != self.config.chaos;

        if shape_changed || old.foliage != self.config.foliage {
            self.regenerate_foliage();
        }
        if shape_changed || old.ornaments != self.config.ornaments {
            self.regenerate_ornaments();
        }
        if shape_changed || old.photos != self.config.photos {
            let attrs_changed = old.photos.weight != self.config.photos.weight
                || old.photos.spin != self.config.photos.spin;
            for seed in self.photo_seeds.values_mut() {
                // chaos poses from the old shell would sit outside the new one
                if shape_changed {
                    seed.chaos_pose = None;
                }
                if attrs_changed {
                    seed.attrs = None;
                }
            }
            let seeds = self.current_seeds();
            self.relayout_photos(&seeds);
        }
        self.foliage_stale = true;
    }

    /// Changes the instance count of a generated class and regenerates its layout.
    /// Photo frame counts follow the photo collection instead.
    pub fn set_instance_count(&mut self, class: ClassKind, count: usize) -> Result<(), MorphError> {
        match class {
            ClassKind::Foliage => {
                if self.config.foliage.count != count {
                    self.config.foliage.count = count;
                    self.config = self.config.sanitized();
                    self.regenerate_foliage();
                }
            }
            ClassKind::Ornament => {
                if self.config.ornaments.count != count {
                    self.config.ornaments.count = count;
                    self.config = self.config.sanitized();
                    self.regenerate_ornaments();
                }
            }
            ClassKind::PhotoFrame => return Err(MorphError::UnsupportedClass(class)),
        }
        Ok(())
    }

    /// Re-lays out every photo frame for the collection's current contents.
    pub fn set_photos(&mut self, collection: &PhotoCollection) {
        let threshold = self.config.photos.reseed_threshold;
        let seeds: Vec<(PhotoId, PhotoSeed)> = collection
            .iter()
            .map(|entry| {
                let cached = self.photo_seeds.get(&entry.id).copied().unwrap_or_default();
                let chaos_pose = entry
                    .pose_hint
                    .filter(|pose| !needs_fresh_chaos(Some(*pose), threshold))
                    .or(cached.chaos_pose);
                (entry.id, PhotoSeed { chaos_pose, ..cached })
            })
            .collect();
        self.relayout_photos(&seeds);
    }

    pub fn set_dock(&mut self, id: PhotoId, docked: bool) -> Result<(), MorphError> {
        if self.docker.set_dock(id, docked) {
            info!("photo {:?} dock -> {}", id, docked);
            Ok(())
        } else {
            Err(MorphError::UnknownPhoto(id))
        }
    }

    pub fn toggle_dock(&mut self, id: PhotoId) -> Result<bool, MorphError> {
        let docked = self.docker.toggle_dock(id).ok_or(MorphError::UnknownPhoto(id))?;
        info!("photo {:?} dock -> {}", id, docked);
        Ok(docked)
    }

    pub fn dock_state(&self, id: PhotoId) -> Option<DockState> {
        self.docker.state(id).copied()
    }

    /// Hosts suppress the tree's own spin and tilt while this holds.
    pub fn any_docked(&self) -> bool {
        self.docker.any_docked()
    }

    pub fn records(&self, class: ClassKind) -> &[InstanceRecord] {
        match class {
            ClassKind::Foliage => &self.foliage,
            ClassKind::Ornament => &self.ornaments,
            ClassKind::PhotoFrame => &self.photos,
        }
    }

    pub fn photo_ids(&self) -> &[PhotoId] {
        &self.photo_ids
    }

    pub fn foliage_progress(&self) -> f32 {
        self.foliage_blender.progress()
    }

    pub fn twinkle(&self) -> &TwinkleScheduler {
        &self.twinkle
    }

    pub fn buffer(&self) -> &InstanceBuffer {
        &self.buffer
    }

    /// Runs one whole frame in order.
    pub fn update(&mut self, dt: f32, inputs: &FrameInputs) {
        self.begin_frame();
        self.step_blend(dt);
        self.step_twinkle(dt);
        self.step_dock(dt, inputs);
    }

    /// Latches the scene state so every stage of this frame sees the same value.
    pub fn begin_frame(&mut self) -> SceneState {
        self.frame_state = self.state;
        self.frame_state
    }

    pub fn step_blend(&mut self, dt: f32) {
        let state = self.frame_state;
        let visual = &self.config.visual;

        let moved = self.foliage_blender.update(state, self.config.foliage.rate, dt);
        if moved || self.foliage_stale {
            self.foliage_blender.write(
                &self.foliage,
                visual.particle_size,
                self.buffer.class_mut(ClassKind::Foliage),
            );
            self.foliage_stale = false;
        }

        self.ornament_blender.update(&self.ornaments, state, visual.rotation_speed, dt);
        self.ornament_blender.write(
            &self.ornaments,
            visual.ornament_scale,
            self.buffer.class_mut(ClassKind::Ornament),
        );

        self.photo_blender.update(&self.photos, state, visual.rotation_speed, dt);
    }

    pub fn step_twinkle(&mut self, dt: f32) {
        self.twinkle.update(
            dt,
            self.buffer.class_mut(ClassKind::Ornament),
            &self.config.twinkle,
            self.gen_rng.rng_mut(),
        );
    }

    /// Must run after the parent and camera transforms for this frame are final.
    pub fn step_dock(&mut self, dt: f32, inputs: &FrameInputs) {
        self.docker.update(
            dt,
            &self.photos,
            &self.photo_blender,
            self.config.visual.photo_scale,
            inputs.camera.as_ref(),
            inputs.parent.as_ref(),
            &self.config.dock,
            self.buffer.class_mut(ClassKind::PhotoFrame),
        );
    }

    pub fn flush(&mut self, sink: &mut impl InstanceSink) {
        self.buffer.flush(sink);
    }

    fn regenerate_foliage(&mut self) {
        self.foliage = generate(self.config.foliage.count, ClassKind::Foliage, &self.config, &mut self.gen_rng);
        self.buffer.class_mut(ClassKind::Foliage).resize(self.foliage.len());
        self.foliage_stale = true;
        info!("generated {} foliage instances", self.foliage.len());
    }

    fn regenerate_ornaments(&mut self) {
        self.ornaments = generate(self.config.ornaments.count, ClassKind::Ornament, &self.config, &mut self.gen_rng);
        self.ornament_blender = RigidBlender::new(RotationMode::FreeSpin, &self.ornaments);
        self.twinkle.reset();

        let colors = self
            .ornaments
            .iter()
            .map(|r| r.attrs.base_color.unwrap_or(LinearRgba::WHITE))
            .collect();
        let buffer = self.buffer.class_mut(ClassKind::Ornament);
        buffer.resize(self.ornaments.len());
        buffer.set_colors(colors);
        info!("generated {} ornaments", self.ornaments.len());
    }

    fn current_seeds(&self) -> Vec<(PhotoId, PhotoSeed)> {
        self.photo_ids
            .iter()
            .map(|id| (*id, self.photo_seeds.get(id).copied().unwrap_or_default()))
            .collect()
    }

    fn relayout_photos(&mut self, seeds: &[(PhotoId, PhotoSeed)]) {
        let frame_seeds: Vec<PhotoSeed> = seeds.iter().map(|(_, seed)| *seed).collect();
        let records = layout_photos(&frame_seeds, &self.config, &mut self.gen_rng);

        let previous: HashMap<PhotoId, RigidPose> = self
            .photo_ids
            .iter()
            .copied()
            .zip(self.photo_blender.poses().iter().copied())
            .collect();

        let ids: Vec<PhotoId> = seeds.iter().map(|(id, _)| *id).collect();
        let poses = ids
            .iter()
            .zip(&records)
            .map(|(id, record)| previous.get(id).copied().unwrap_or(RigidPose::at(record.chaos_pose)))
            .collect();

        self.photo_seeds = ids
            .iter()
            .copied()
            .zip(records.iter().map(|r| PhotoSeed {
                chaos_pose: Some(r.chaos_pose),
                attrs: Some(r.attrs),
            }))
            .collect();
        self.photo_blender = RigidBlender::from_poses(RotationMode::FaceOutward, poses);
        self.docker.sync_ids(&ids);
        self.buffer.class_mut(ClassKind::PhotoFrame).resize(records.len());
        self.photos = records;
        self.photo_ids = ids;
        info!("laid out {} photo frames", self.photos.len());
    }
}
