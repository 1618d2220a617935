use bevy::prelude::*;
use crate::core::class_kind::ClassKind;

#[derive(Component)]
pub struct MainCamera;

/// Projection parameters the docking math needs, mirrored from whatever
/// projection the host renderer uses.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct CameraLens {
    // vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
}

impl Default for CameraLens {
    fn default() -> Self {
        CameraLens {
            fov_y: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
        }
    }
}

// Parent of every instance entity. Its transform is the space instance poses are expressed in.
#[derive(Component, Default)]
pub struct TreeRoot;

/// Marks an entity that mirrors one slot of the instance buffer.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct InstanceSlot {
    pub class: ClassKind,
    pub index: usize,
}

/// Instance color mirrored from the buffer on flush. Add it to slots whose
/// material should follow the buffer colors.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct SlotColor(pub LinearRgba);

impl Default for SlotColor {
    fn default() -> Self {
        SlotColor(LinearRgba::WHITE)
    }
}
