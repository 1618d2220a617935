use bevy::app::{App, Plugin};
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use tree_morph::prelude::*;
use crate::input_manager::{InputStates, MouseButtonState};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(ZoomParameters::default())
            .insert_resource(CameraFocus(Vec3::ZERO))
            .add_systems(Startup, initialize_camera_system)
            // docking reads the camera, so it must be final before the dock stage
            .add_systems(Update, (camera_controller_system, sync_camera_lens)
                .chain()
                .in_set(MorphSet::Parent));
    }
}

/// Point the camera orbits and looks at.
#[derive(Resource)]
pub(crate) struct CameraFocus(Vec3);

#[derive(Resource)]
pub(crate) struct ZoomParameters {
    curve: CubicCurve<Vec2>,
    position: f32,
}

impl Default for ZoomParameters {
    fn default() -> Self {
        // x: horizontal distance from the focus, y: height above it
        let points = vec![
            Vec2::new(4.0, 0.0),
            Vec2::new(8.0, 1.0),
            Vec2::new(18.0, 4.0),
            Vec2::new(34.0, 12.0),
            Vec2::new(50.0, 30.0),
        ];
        ZoomParameters {
            curve: CubicCardinalSpline::new(0.5, points)
                .to_curve()
                .expect("zoom spline has enough points"),
            position: 1.5,
        }
    }
}

impl ZoomParameters {
    fn place(&self, focus: Vec3, camera: &mut Transform) {
        let sample = self.curve.position(self.position);
        let forward = camera.rotation * Vec3::Z;
        let forward_xz = Vec3::new(forward.x, 0.0, forward.z).normalize_or(Vec3::Z);
        camera.translation = focus + Vec3::Y * sample.y + forward_xz * sample.x;
        camera.look_at(focus, Vec3::Y);
    }
}

fn initialize_camera_system(
    mut commands: Commands,
    zoom: Res<ZoomParameters>,
    focus: Res<CameraFocus>,
) {
    let mut transform = Transform::from_xyz(0.0, 2.0, 20.0).looking_at(focus.0, Vec3::Y);
    zoom.place(focus.0, &mut transform);

    // top-level so its Transform is its world pose
    commands.spawn((
        Camera3d::default(),
        Camera { hdr: true, ..default() },
        transform,
        MainCamera,
        CameraLens::default(),
        Name::new("MainCamera"),
    ));
}

fn camera_controller_system(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut cursor_moved_events: EventReader<CursorMoved>,
    mut mouse_wheel_events: EventReader<MouseWheel>,
    input: Res<InputStates>,
    mut zoom: ResMut<ZoomParameters>,
    mut focus: ResMut<CameraFocus>,
) {
    let Ok(mut camera) = camera_query.get_single_mut() else {
        return;
    };

    for event in mouse_wheel_events.read() {
        let segments = zoom.curve.segments().len() as f32;
        zoom.position = (zoom.position - event.y * 0.1).clamp(0.1, segments);
        zoom.place(focus.0, &mut camera);
    }

    for event in cursor_moved_events.read() {
        let Some(delta) = event.delta else { continue };

        if let MouseButtonState::Held(_) = input.right {
            let offset = camera.translation - focus.0;
            let orbit = Quat::from_rotation_y(-delta.x * 0.01);
            camera.translation = focus.0 + orbit * offset;
            camera.look_at(focus.0, Vec3::Y);
        } else if let MouseButtonState::Held(_) = input.middle {
            let right = camera.rotation * Vec3::X;
            let forward = camera.rotation * Vec3::Z;
            let right_xz = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();
            let forward_xz = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
            let pan = (right_xz * -delta.x + forward_xz * -delta.y) * 0.01;
            focus.0 += pan;
            camera.translation += pan;
        }
    }
}

fn sync_camera_lens(mut cameras: Query<(&Projection, &mut CameraLens), With<MainCamera>>) {
    for (projection, mut lens) in &mut cameras {
        let Projection::Perspective(perspective) = projection else {
            continue;
        };
        let next = CameraLens {
            fov_y: perspective.fov,
            aspect: perspective.aspect_ratio,
        };
        if *lens != next {
            *lens = next;
        }
    }
}
