use bevy::prelude::*;
use crate::core::morph_config::MorphConfig;
use crate::core::scene_state::SceneState;
use crate::event_system::morph_events::*;
use crate::management::morph_engine::MorphEngine;
use crate::management::photo_collection::PhotoCollection;

pub(crate) fn scene_state_listener(
    mut set_events: EventReader<SetSceneState>,
    mut toggle_events: EventReader<ToggleSceneState>,
    mut engine: ResMut<MorphEngine>,
) {
    for SetSceneState(state) in set_events.read() {
        engine.set_scene_state(*state);
    }
    for _ in toggle_events.read() {
        engine.toggle_scene_state();
    }
}

pub(crate) fn dock_listener(
    mut set_events: EventReader<SetDock>,
    mut toggle_events: EventReader<ToggleDock>,
    mut engine: ResMut<MorphEngine>,
) {
    for event in set_events.read() {
        if let Err(error) = engine.set_dock(event.id, event.docked) {
            warn!("ignoring SetDock: {}", error);
        }
    }
    for event in toggle_events.read() {
        if let Err(error) = engine.toggle_dock(event.id) {
            warn!("ignoring ToggleDock: {}", error);
        }
    }
}

/// Count changes are written back to the config resource so later edits keep them.
pub(crate) fn instance_count_listener(
    mut events: EventReader<SetInstanceCount>,
    mut engine: ResMut<MorphEngine>,
    mut config: ResMut<MorphConfig>,
) {
    let mut applied = false;
    for event in events.read() {
        match engine.set_instance_count(event.class, event.count) {
            Ok(()) => applied = true,
            Err(error) => warn!("ignoring SetInstanceCount: {}", error),
        }
    }
    if applied {
        let synced = engine.config();
        if config.foliage.count != synced.foliage.count || config.ornaments.count != synced.ornaments.count {
            config.foliage.count = synced.foliage.count;
            config.ornaments.count = synced.ornaments.count;
        }
    }
}

pub(crate) fn photo_collection_listener(
    photos: Res<PhotoCollection>,
    mut engine: ResMut<MorphEngine>,
) {
    if photos.is_changed() {
        engine.set_photos(&photos);
    }
}

pub(crate) fn config_listener(
    config: Res<MorphConfig>,
    mut engine: ResMut<MorphEngine>,
) {
    if config.is_changed() && *config != *engine.config() {
        engine.set_config(config.clone());
    }
}

/// Freezes the scene state for the rest of the frame and mirrors it into the resource.
pub(crate) fn latch_scene_state(
    mut engine: ResMut<MorphEngine>,
    mut scene_state: ResMut<SceneState>,
) {
    let state = engine.begin_frame();
    if *scene_state != state {
        *scene_state = state;
    }
}
