use bevy::prelude::*;
use std::f32::consts::TAU;
use crate::animation::easing::{approach_unit, frame_factor};
use crate::core::components::TreeRoot;
use crate::core::morph_config::TreeMotionConfig;
use crate::management::morph_engine::MorphEngine;

/// Idle spin and sway of the whole tree. Both ease out while any photo is
/// docked or travelling, so the docked pose stays put in world space.
#[derive(Resource, Debug, Clone, Default)]
pub struct TreeMotion {
    angle: f32,
    clock: f64,
    // 0 = held still, 1 = full idle motion
    weight: f32,
}

impl TreeMotion {
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn rotation(&self, config: &TreeMotionConfig) -> Quat {
        let sway = (self.clock * config.tilt_speed as f64).sin() as f32;
        Quat::from_rotation_y(self.angle) * Quat::from_rotation_z(sway * config.tilt_amplitude * self.weight)
    }

    pub fn update(&mut self, dt: f32, hold: bool, config: &TreeMotionConfig) -> Quat {
        if dt.is_finite() && dt > 0.0 {
            let target = if hold { 0.0 } else { 1.0 };
            self.weight = approach_unit(self.weight, target, frame_factor(config.ease_rate, dt));
            if hold && self.weight < 1e-4 {
                self.weight = 0.0;
            }
            self.angle = (self.angle + config.spin_speed * self.weight * dt).rem_euclid(TAU);
            // the sway clock only runs while motion is allowed
            self.clock += (dt * self.weight) as f64;
        }
        self.rotation(config)
    }
}

pub(crate) fn tree_motion_system(
    time: Res<Time>,
    engine: Res<MorphEngine>,
    mut motion: ResMut<TreeMotion>,
    mut roots: Query<&mut Transform, With<TreeRoot>>,
) {
    let rotation = motion.update(time.delta_secs(), engine.any_docked(), &engine.config().motion);
    for mut transform in &mut roots {
        if transform.rotation != rotation {
            transform.rotation = rotation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::morph_config::MorphConfig;

    const TICK: f32 = 1.0 / 60.0;

    #[test]
    fn motion_eases_in_from_rest() {
        let config = MorphConfig::default().motion;
        let mut motion = TreeMotion::default();
        motion.update(TICK, false, &config);
        assert!(motion.weight() > 0.0 && motion.weight() < 0.1);
        for _ in 0..600 {
            motion.update(TICK, false, &config);
        }
        assert!(motion.weight() > 0.99);
    }

    #[test]
    fn holding_freezes_the_rotation() {
        let config = MorphConfig::default().motion;
        let mut motion = TreeMotion::default();
        for _ in 0..600 {
            motion.update(TICK, false, &config);
        }
        for _ in 0..1200 {
            motion.update(TICK, true, &config);
        }
        assert_eq!(motion.weight(), 0.0);
        let frozen = motion.update(TICK, true, &config);
        assert_eq!(motion.update(TICK, true, &config), frozen);
        // no sway left once fully held
        let tilt_axis = frozen * Vec3::Y;
        assert!((tilt_axis - Vec3::Y).length() < 1e-5);
    }
}
