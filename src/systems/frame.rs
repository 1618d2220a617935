use bevy::prelude::*;
use crate::animation::docking::CameraFrame;
use crate::core::class_kind::ClassKind;
use crate::core::components::{CameraLens, InstanceSlot, MainCamera, SlotColor, TreeRoot};
use crate::core::instance_buffer::{ClassBuffer, InstanceSink};
use crate::management::morph_engine::{FrameInputs, MorphEngine};

pub(crate) fn blend_system(time: Res<Time>, mut engine: ResMut<MorphEngine>) {
    engine.step_blend(time.delta_secs());
}

pub(crate) fn twinkle_system(time: Res<Time>, mut engine: ResMut<MorphEngine>) {
    engine.step_twinkle(time.delta_secs());
}

/// Reads the camera and tree root as they stand after this frame's motion.
/// Both are expected to be top-level entities so their `Transform` is their world pose.
pub(crate) fn dock_system(
    time: Res<Time>,
    mut engine: ResMut<MorphEngine>,
    cameras: Query<(&Transform, &CameraLens), With<MainCamera>>,
    roots: Query<&Transform, (With<TreeRoot>, Without<MainCamera>)>,
) {
    let camera = cameras.get_single().ok().map(|(transform, lens)| CameraFrame {
        transform: *transform,
        fov_y: lens.fov_y,
        aspect: lens.aspect,
    });
    let inputs = FrameInputs {
        camera,
        parent: roots.get_single().ok().copied(),
    };
    engine.step_dock(time.delta_secs(), &inputs);
}

/// Writes dirty buffer transforms and colors onto the entities carrying a matching `InstanceSlot`.
/// Colors only land on slots that also carry a `SlotColor`.
struct SlotSink<'a, 'w, 's> {
    slots: &'a mut Query<'w, 's, (&'static InstanceSlot, &'static mut Transform, Option<&'static mut SlotColor>)>,
}

impl InstanceSink for SlotSink<'_, '_, '_> {
    fn upload(&mut self, class: ClassKind, buffer: &ClassBuffer) {
        let transforms_dirty = buffer.transforms_dirty();
        let colors_dirty = buffer.colors_dirty();
        for (slot, mut transform, color) in self.slots.iter_mut() {
            if slot.class != class {
                continue;
            }
            if transforms_dirty {
                if let Some(source) = buffer.transforms().get(slot.index) {
                    if *transform != *source {
                        *transform = *source;
                    }
                }
            }
            if let (true, Some(mut color), Some(source)) = (colors_dirty, color, buffer.color(slot.index)) {
                if color.0 != source {
                    color.0 = source;
                }
            }
        }
    }
}

pub(crate) fn flush_system(
    mut engine: ResMut<MorphEngine>,
    mut slots: Query<(&'static InstanceSlot, &'static mut Transform, Option<&'static mut SlotColor>)>,
) {
    engine.flush(&mut SlotSink { slots: &mut slots });
}
