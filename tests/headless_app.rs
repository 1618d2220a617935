use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use std::time::Duration;
use tree_morph::prelude::*;

fn app_with(config: MorphConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MorphPlugin::new(config));
    app.init_resource::<Time>();
    app
}

fn small_config() -> MorphConfig {
    let mut config = MorphConfig::default();
    config.foliage.count = 64;
    config.ornaments.count = 16;
    config
}

fn step(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(1.0 / 60.0));
        app.update();
    }
}

#[test]
fn plugin_drives_slots_and_docks_a_photo() {
    let mut app = app_with(small_config());
    app.world_mut().spawn((Transform::IDENTITY, MainCamera, CameraLens::default()));
    app.world_mut().spawn((Transform::IDENTITY, TreeRoot));
    let slot = app
        .world_mut()
        .spawn((Transform::default(), InstanceSlot { class: ClassKind::PhotoFrame, index: 0 }))
        .id();
    let ornament = app
        .world_mut()
        .spawn((Transform::default(), InstanceSlot { class: ClassKind::Ornament, index: 3 }))
        .id();

    app.world_mut()
        .resource_mut::<PhotoCollection>()
        .insert(PhotoEntry::new(PhotoId(7), "photos/seven.jpg"))
        .unwrap();
    app.world_mut().send_event(SetDock { id: PhotoId(7), docked: true });

    step(&mut app, 300);

    let engine = app.world().resource::<MorphEngine>();
    assert_eq!(engine.photo_ids(), &[PhotoId(7)]);
    assert_eq!(engine.dock_state(PhotoId(7)).unwrap().dock_progress, 1.0);

    let expected_ornament = engine.buffer().class(ClassKind::Ornament).transforms()[3];
    assert_eq!(*app.world().get::<Transform>(ornament).unwrap(), expected_ornament);

    let frame = app.world().get::<Transform>(slot).unwrap();
    assert!(frame.translation.distance(Vec3::new(0.0, 0.0, -6.0)) < 1e-3, "{:?}", frame.translation);
}

#[test]
fn macro_queued_toggle_reaches_the_engine() {
    let mut app = app_with(small_config());
    app.world_mut()
        .run_system_once(|mut commands: Commands| {
            morph!(commands, ToggleSceneState);
        })
        .unwrap();
    step(&mut app, 1);

    assert_eq!(*app.world().resource::<SceneState>(), SceneState::Formed);
    assert_eq!(app.world().resource::<MorphEngine>().scene_state(), SceneState::Formed);
}

#[test]
fn config_and_count_edits_relayout_the_engine() {
    let mut app = app_with(small_config());
    step(&mut app, 1);

    app.world_mut().resource_mut::<MorphConfig>().ornaments.count = 40;
    step(&mut app, 1);
    assert_eq!(app.world().resource::<MorphEngine>().records(ClassKind::Ornament).len(), 40);

    app.world_mut().send_event(SetInstanceCount { class: ClassKind::Foliage, count: 10 });
    app.world_mut().send_event(SetInstanceCount { class: ClassKind::PhotoFrame, count: 10 });
    step(&mut app, 1);
    let engine = app.world().resource::<MorphEngine>();
    assert_eq!(engine.records(ClassKind::Foliage).len(), 10);
    assert!(engine.records(ClassKind::PhotoFrame).is_empty());
}

#[test]
fn tree_root_holds_still_while_a_photo_is_docked() {
    let mut app = app_with(small_config());
    app.world_mut().spawn((Transform::IDENTITY, MainCamera, CameraLens::default()));
    let root = app.world_mut().spawn((Transform::IDENTITY, TreeRoot)).id();

    step(&mut app, 120);
    let spinning = app.world().get::<Transform>(root).unwrap().rotation;
    assert_ne!(spinning, Quat::IDENTITY);

    app.world_mut()
        .resource_mut::<PhotoCollection>()
        .insert(PhotoEntry::new(PhotoId(1), "photos/one.jpg"))
        .unwrap();
    app.world_mut().send_event(ToggleDock { id: PhotoId(1) });
    step(&mut app, 1200);

    let settled = app.world().get::<Transform>(root).unwrap().rotation;
    step(&mut app, 10);
    assert_eq!(app.world().get::<Transform>(root).unwrap().rotation, settled);
    assert_eq!(app.world().resource::<TreeMotion>().weight(), 0.0);
}

#[test]
fn slot_colors_follow_the_ornament_buffer() {
    let mut config = small_config();
    config.twinkle.max_active = 8;
    config.twinkle.cadence = tree_morph::core::morph_config::FloatRange::new(0.0, 0.0);
    let mut app = app_with(config);
    let slots: Vec<Entity> = (0..16)
        .map(|index| {
            app.world_mut()
                .spawn((Transform::default(), InstanceSlot { class: ClassKind::Ornament, index }, SlotColor::default()))
                .id()
        })
        .collect();

    step(&mut app, 1);
    assert_ne!(app.world().get::<SlotColor>(slots[0]).unwrap().0, LinearRgba::WHITE);

    let mut flashed = 0;
    for _ in 0..30 {
        step(&mut app, 1);
        let engine = app.world().resource::<MorphEngine>();
        let colors = engine.buffer().class(ClassKind::Ornament).colors();
        for (index, slot) in slots.iter().enumerate() {
            let shown = app.world().get::<SlotColor>(*slot).unwrap().0;
            assert_eq!(shown, colors[index]);
        }
        flashed = flashed.max(engine.twinkle().active_count());
    }
    assert!(flashed > 0);
}
