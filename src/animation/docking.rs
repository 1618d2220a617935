use bevy::prelude::*;
use indexmap::IndexMap;
use std::f32::consts::PI;
use crate::animation::easing::{approach_unit, frame_factor};
use crate::animation::state_blend::RigidBlender;
use crate::core::instance_buffer::ClassBuffer;
use crate::core::instance_record::InstanceRecord;
use crate::core::morph_config::DockConfig;
use crate::management::photo_collection::PhotoId;

/// Camera world transform plus the projection values docking depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub transform: Transform,
    // vertical, radians
    pub fov_y: f32,
    pub aspect: f32,
}

impl CameraFrame {
    fn is_usable(&self) -> bool {
        self.fov_y.is_finite()
            && self.fov_y > 0.0
            && self.fov_y < PI
            && self.aspect.is_finite()
            && self.aspect > 0.0
            && self.transform.translation.is_finite()
            && self.transform.rotation.is_finite()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DockState {
    pub is_docked: bool,
    pub dock_progress: f32,
}

impl DockState {
    /// Exponential approach toward 0 or 1, snapping onto the endpoint once within `epsilon`.
    pub fn step(&mut self, factor: f32, epsilon: f32) {
        let target = if self.is_docked { 1.0 } else { 0.0 };
        let mut next = approach_unit(self.dock_progress, target, factor);
        if (next - target).abs() < epsilon {
            next = target;
        }
        self.dock_progress = next;
    }

    pub fn is_resting(&self) -> bool {
        self.dock_progress == 0.0 || self.dock_progress == 1.0
    }
}

/// World pose a docked frame takes: `distance` ahead of the camera, with the
/// camera's orientation, scaled so its footprint fills `viewport_fill` of the view.
/// Returns `None` for a degenerate projection.
pub fn docked_world_pose(camera: &CameraFrame, dock: &DockConfig) -> Option<Transform> {
    if !camera.is_usable() {
        return None;
    }
    let forward = *camera.transform.forward();
    let translation = camera.transform.translation + forward * dock.distance;

    let visible_height = 2.0 * dock.distance * (camera.fov_y * 0.5).tan();
    let visible_width = visible_height * camera.aspect;
    let scale = (visible_width * dock.viewport_fill / dock.frame_size.x)
        .min(visible_height * dock.viewport_fill / dock.frame_size.y);
    if !scale.is_finite() {
        return None;
    }

    Some(Transform {
        translation,
        rotation: camera.transform.rotation,
        scale: Vec3::splat(scale),
    })
}

/// Re-expresses a world pose in the space of `parent_world`.
pub fn to_parent_space(world: &Transform, parent_world: &Transform) -> Option<Transform> {
    let parent_scale = parent_world.scale;
    if !parent_scale.is_finite() || parent_scale.abs().min_element() <= f32::EPSILON {
        return None;
    }
    let local = GlobalTransform::from(*world).reparented_to(&GlobalTransform::from(*parent_world));
    if local.translation.is_finite() && local.rotation.is_finite() && local.scale.is_finite() {
        Some(local)
    } else {
        None
    }
}

/// Blend between the tree pose and the docked pose. The endpoints are returned as-is.
pub fn blend_pose(tree: &Transform, docked: &Transform, t: f32) -> Transform {
    if !t.is_finite() || t <= 0.0 {
        return *tree;
    }
    if t >= 1.0 {
        return *docked;
    }
    Transform {
        translation: tree.translation.lerp(docked.translation, t),
        rotation: tree.rotation.slerp(docked.rotation, t).normalize(),
        scale: tree.scale.lerp(docked.scale, t),
    }
}

/// Vertical bob added to a frame's tree pose.
pub fn float_offset(phase: f32, clock: f64, dock: &DockConfig) -> Vec3 {
    let angle = (clock * dock.float_speed as f64 + phase as f64) as f32;
    Vec3::Y * angle.sin() * dock.float_amplitude
}

/// Per-frame dock progress for every photo frame, in photo order.
#[derive(Debug, Clone, Default)]
pub struct PresentationDocker {
    states: IndexMap<PhotoId, DockState>,
    clock: f64,
}

impl PresentationDocker {
    /// Aligns states with the given id order. Known ids keep their progress.
    pub fn sync_ids(&mut self, ids: &[PhotoId]) {
        let mut next = IndexMap::with_capacity(ids.len());
        for id in ids {
            let state = self.states.get(id).copied().unwrap_or_default();
            next.insert(*id, state);
        }
        self.states = next;
    }

    pub fn state(&self, id: PhotoId) -> Option<&DockState> {
        self.states.get(&id)
    }

    /// Returns false when the id is not a known frame.
    pub fn set_dock(&mut self, id: PhotoId, docked: bool) -> bool {
        match self.states.get_mut(&id) {
            Some(state) => {
                state.is_docked = docked;
                true
            }
            None => false,
        }
    }

    pub fn toggle_dock(&mut self, id: PhotoId) -> Option<bool> {
        let state = self.states.get_mut(&id)?;
        state.is_docked = !state.is_docked;
        Some(state.is_docked)
    }

    /// True while any frame is docked or still travelling to or from the dock.
    pub fn any_docked(&self) -> bool {
        self.states.values().any(|s| s.is_docked || s.dock_progress > 0.0)
    }

    /// Advances dock progress and writes every frame's final transform.
    /// Without a usable camera and parent the frame is skipped: progress holds
    /// and frames fall back to their tree pose.
    pub fn update(
        &mut self,
        dt: f32,
        records: &[InstanceRecord],
        rigid: &RigidBlender,
        scale_mult: f32,
        camera: Option<&CameraFrame>,
        parent_world: Option<&Transform>,
        dock: &DockConfig,
        buffer: &mut ClassBuffer,
    ) {
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt as f64;
        }

        let docked_local = match (camera, parent_world) {
            (Some(camera), Some(parent)) => {
                docked_world_pose(camera, dock).and_then(|world| to_parent_space(&world, parent))
            }
            _ => None,
        };

        if docked_local.is_some() {
            let factor = frame_factor(dock.rate, dt);
            for state in self.states.values_mut() {
                state.step(factor, dock.snap_epsilon);
            }
        } else if self.any_docked() {
            debug!("dock update skipped: camera or parent transform unavailable");
        }

        for (i, (record, state)) in records.iter().zip(self.states.values()).enumerate() {
            let Some(mut tree) = rigid.transform(i, record.attrs.scale * scale_mult) else {
                continue;
            };
            tree.translation += float_offset(record.attrs.float_phase, self.clock, dock);

            let pose = match docked_local {
                Some(local) => blend_pose(&tree, &local, state.dock_progress),
                None => tree,
            };
            buffer.write_transform(i, pose);
        }
    }
}
