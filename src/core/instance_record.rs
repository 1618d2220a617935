use bevy::prelude::*;
use crate::core::class_kind::OrnamentShape;

/// Per-instance attributes fixed at generation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualAttrs {
    /// Authored palette color; only ornaments carry one.
    pub base_color: Option<LinearRgba>,
    pub shape: Option<OrnamentShape>,
    pub scale: f32,
    // blend rate per nominal tick; larger converges faster
    pub weight: f32,
    // radians per second
    pub spin_rate: f32,
    pub float_phase: f32,
}

impl Default for VisualAttrs {
    fn default() -> Self {
        VisualAttrs {
            base_color: None,
            shape: None,
            scale: 1.0,
            weight: 0.0,
            spin_rate: 0.0,
            float_phase: 0.0,
        }
    }
}

/// One generated instance. The two poses never change after generation.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceRecord {
    pub chaos_pose: Vec3,
    pub target_pose: Vec3,
    pub attrs: VisualAttrs,
}

impl InstanceRecord {
    pub fn pose_for(&self, formed: bool) -> Vec3 {
        if formed { self.target_pose } else { self.chaos_pose }
    }
}
