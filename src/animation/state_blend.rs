use bevy::prelude::*;
use std::f32::consts::TAU;
use crate::animation::easing::{approach_unit, ease_out_cubic, frame_factor};
use crate::core::instance_buffer::ClassBuffer;
use crate::core::instance_record::InstanceRecord;
use crate::core::scene_state::SceneState;

// Angular rates as multiples of an instance's spin rate.
const FORMED_SPIN_X: f32 = 0.2;
const FORMED_SPIN_Y: f32 = 0.5;
const CHAOS_TUMBLE_X: f32 = 1.4;
const CHAOS_TUMBLE_Z: f32 = 1.1;

const PROGRESS_SNAP: f32 = 1e-5;

/// Shared progress for the foliage cloud. Positions are recomputed from the
/// two fixed endpoints every frame, so nothing drifts.
#[derive(Debug, Clone, Default)]
pub struct FoliageBlender {
    progress: f32,
}

impl FoliageBlender {
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn eased(&self) -> f32 {
        ease_out_cubic(self.progress)
    }

    /// Advances progress toward the state's endpoint. Returns whether it moved.
    pub fn update(&mut self, state: SceneState, rate: f32, dt: f32) -> bool {
        let target = state.target_progress();
        let before = self.progress;
        let mut next = approach_unit(self.progress, target, frame_factor(rate, dt));
        if (next - target).abs() < PROGRESS_SNAP {
            next = target;
        }
        self.progress = next;
        next != before
    }

    pub fn position(&self, record: &InstanceRecord) -> Vec3 {
        record.chaos_pose.lerp(record.target_pose, self.eased())
    }

    pub fn write(&self, records: &[InstanceRecord], particle_size: f32, buffer: &mut ClassBuffer) {
        for (i, record) in records.iter().enumerate() {
            let transform = Transform::from_translation(self.position(record))
                .with_scale(Vec3::splat(record.attrs.scale * particle_size));
            buffer.write_transform(i, transform);
        }
    }
}

/// How a rigid instance orients itself while blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    /// Slow two-axis spin when formed, faster tumble on another axis pair in chaos.
    FreeSpin,
    /// Local +Z faces away from the trunk when formed; tumbles in chaos.
    FaceOutward,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidPose {
    pub position: Vec3,
    // wrapped to [0, TAU)
    pub euler: Vec3,
    pub rotation: Quat,
}

impl RigidPose {
    pub fn at(position: Vec3) -> Self {
        RigidPose {
            position,
            euler: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Per-instance exponential approach in position space, integrated frame over frame.
#[derive(Debug, Clone)]
pub struct RigidBlender {
    mode: RotationMode,
    poses: Vec<RigidPose>,
}

impl RigidBlender {
    /// Starts every instance at its chaos pose.
    pub fn new(mode: RotationMode, records: &[InstanceRecord]) -> Self {
        RigidBlender {
            mode,
            poses: records.iter().map(|r| RigidPose::at(r.chaos_pose)).collect(),
        }
    }

    pub fn from_poses(mode: RotationMode, poses: Vec<RigidPose>) -> Self {
        RigidBlender { mode, poses }
    }

    pub fn poses(&self) -> &[RigidPose] {
        &self.poses
    }

    pub fn update(&mut self, records: &[InstanceRecord], state: SceneState, rotation_speed: f32, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        let formed = state.is_formed();

        for (pose, record) in self.poses.iter_mut().zip(records) {
            let factor = frame_factor(record.attrs.weight, dt);
            pose.position = pose.position.lerp(record.pose_for(formed), factor);

            let spin = record.attrs.spin_rate * rotation_speed * dt;
            match self.mode {
                RotationMode::FreeSpin => {
                    if formed {
                        pose.euler.x += spin * FORMED_SPIN_X;
                        pose.euler.y += spin * FORMED_SPIN_Y;
                    } else {
                        pose.euler.x += spin * CHAOS_TUMBLE_X;
                        pose.euler.z += spin * CHAOS_TUMBLE_Z;
                    }
                    pose.euler = wrap_angles(pose.euler);
                    pose.rotation = euler_quat(pose.euler);
                }
                RotationMode::FaceOutward => {
                    let desired = if formed {
                        outward_facing(pose.position)
                    } else {
                        pose.euler.x += spin * CHAOS_TUMBLE_X;
                        pose.euler.z += spin * CHAOS_TUMBLE_Z;
                        pose.euler = wrap_angles(pose.euler);
                        euler_quat(pose.euler)
                    };
                    pose.rotation = pose.rotation.slerp(desired, factor).normalize();
                }
            }
        }
    }

    pub fn transform(&self, index: usize, scale: f32) -> Option<Transform> {
        self.poses.get(index).map(|pose| Transform {
            translation: pose.position,
            rotation: pose.rotation,
            scale: Vec3::splat(scale),
        })
    }

    pub fn write(&self, records: &[InstanceRecord], scale_mult: f32, buffer: &mut ClassBuffer) {
        for (i, record) in records.iter().enumerate() {
            if let Some(transform) = self.transform(i, record.attrs.scale * scale_mult) {
                buffer.write_transform(i, transform);
            }
        }
    }
}

fn wrap_angles(euler: Vec3) -> Vec3 {
    Vec3::new(euler.x.rem_euclid(TAU), euler.y.rem_euclid(TAU), euler.z.rem_euclid(TAU))
}

fn euler_quat(euler: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
}

/// Rotation about Y that points local +Z along the horizontal direction away from the trunk.
pub fn outward_facing(position: Vec3) -> Quat {
    if position.x == 0.0 && position.z == 0.0 {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_y(position.x.atan2(position.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instance_record::VisualAttrs;

    const TICK: f32 = 1.0 / 60.0;

    fn record(chaos: Vec3, target: Vec3, weight: f32) -> InstanceRecord {
        InstanceRecord {
            chaos_pose: chaos,
            target_pose: target,
            attrs: VisualAttrs {
                weight,
                spin_rate: 1.0,
                ..default()
            },
        }
    }

    #[test]
    fn foliage_progress_converges_monotonically_without_overshoot() {
        let mut blender = FoliageBlender::default();
        let mut last = blender.progress();
        for _ in 0..2000 {
            blender.update(SceneState::Formed, 0.02, TICK);
            assert!(blender.progress() >= last);
            assert!(blender.progress() <= 1.0);
            last = blender.progress();
        }
        assert_eq!(blender.progress(), 1.0);
        assert!(!blender.update(SceneState::Formed, 0.02, TICK));
    }

    #[test]
    fn foliage_toggle_reverses_without_a_jump() {
        let r = record(Vec3::new(0.0, 20.0, 0.0), Vec3::new(1.0, 0.0, 1.0), 0.02);
        let mut blender = FoliageBlender::default();
        for _ in 0..60 {
            blender.update(SceneState::Formed, 0.02, TICK);
        }
        let at_toggle = blender.position(&r);
        let progress_at_toggle = blender.progress();

        blender.update(SceneState::Chaos, 0.02, TICK);
        assert!(blender.progress() < progress_at_toggle);
        assert!(blender.position(&r).distance(at_toggle) < 0.5);

        for _ in 0..2000 {
            blender.update(SceneState::Chaos, 0.02, TICK);
        }
        assert_eq!(blender.progress(), 0.0);
        assert_eq!(blender.position(&r), r.chaos_pose);
    }

    #[test]
    fn foliage_write_scales_by_particle_size() {
        let mut r = record(Vec3::ZERO, Vec3::X, 0.02);
        r.attrs.scale = 0.5;
        let mut buffer = ClassBuffer::default();
        buffer.resize(1);
        FoliageBlender::default().write(&[r], 2.0, &mut buffer);
        assert_eq!(buffer.transforms()[0].scale, Vec3::ONE);
        assert_eq!(buffer.transforms()[0].translation, Vec3::ZERO);
    }

    #[test]
    fn rigid_convergence_is_geometric() {
        let target = Vec3::new(2.0, -1.0, 3.0);
        for w in [0.01, 0.025, 0.04, 0.3] {
            let records = [record(Vec3::new(15.0, 10.0, -8.0), target, w)];
            let mut blender = RigidBlender::new(RotationMode::FreeSpin, &records);
            let start = blender.poses()[0].position.distance(target);
            for n in 1..=300 {
                blender.update(&records, SceneState::Formed, 1.0, TICK);
                let bound = start * (1.0 - w).powi(n);
                let now = blender.poses()[0].position.distance(target);
                assert!(now <= bound * 1.0001 + 1e-5, "w={} n={} now={} bound={}", w, n, now, bound);
            }
        }
    }

    #[test]
    fn heavier_weight_arrives_first() {
        let target = Vec3::ZERO;
        let records = [
            record(Vec3::splat(10.0), target, 0.01),
            record(Vec3::splat(10.0), target, 0.04),
        ];
        let mut blender = RigidBlender::new(RotationMode::FreeSpin, &records);
        for _ in 0..60 {
            blender.update(&records, SceneState::Formed, 1.0, TICK);
        }
        let light = blender.poses()[0].position.length();
        let heavy = blender.poses()[1].position.length();
        assert!(heavy < light);
    }

    #[test]
    fn rotation_keeps_running_across_state_changes() {
        let records = [record(Vec3::X * 10.0, Vec3::X, 0.05)];
        let mut blender = RigidBlender::new(RotationMode::FreeSpin, &records);
        for _ in 0..30 {
            blender.update(&records, SceneState::Formed, 1.0, TICK);
        }
        let before = blender.poses()[0];
        blender.update(&records, SceneState::Chaos, 1.0, TICK);
        let after = blender.poses()[0];
        // chaos tumble adds on x and z; y is left where formed spin put it
        assert!(after.euler.x > before.euler.x);
        assert!(after.euler.z > before.euler.z);
        assert_eq!(after.euler.y, before.euler.y);
        assert!(after.euler.max_element() < TAU);
    }

    #[test]
    fn toggle_mid_flight_keeps_position() {
        let records = [record(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, 0.05)];
        let mut blender = RigidBlender::new(RotationMode::FreeSpin, &records);
        for _ in 0..20 {
            blender.update(&records, SceneState::Formed, 1.0, TICK);
        }
        let mid = blender.poses()[0].position;
        blender.update(&records, SceneState::Chaos, 1.0, TICK);
        let next = blender.poses()[0].position;
        assert!(next.y > mid.y);
        assert!(next.distance(mid) < 0.6);
    }

    #[test]
    fn photo_frames_turn_to_face_outward() {
        let target = Vec3::new(3.0, 0.0, 0.0);
        let records = [record(Vec3::new(0.0, 15.0, 0.0), target, 0.2)];
        let mut blender = RigidBlender::new(RotationMode::FaceOutward, &records);
        for _ in 0..400 {
            blender.update(&records, SceneState::Formed, 1.0, TICK);
        }
        let facing = blender.poses()[0].rotation * Vec3::Z;
        assert!(facing.distance(Vec3::X) < 1e-3, "facing = {:?}", facing);
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let records = [record(Vec3::splat(3.0), Vec3::ZERO, 0.5)];
        let mut blender = RigidBlender::new(RotationMode::FreeSpin, &records);
        blender.update(&records, SceneState::Formed, 1.0, 0.0);
        assert_eq!(blender.poses()[0], RigidPose::at(Vec3::splat(3.0)));
    }
}
