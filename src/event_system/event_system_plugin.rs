use bevy::prelude::*;
use crate::core::morph_plugin::MorphSet;
use crate::event_system::event_listeners::*;
use crate::event_system::morph_events::*;

pub struct EventSystemPlugin;

impl Plugin for EventSystemPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SetSceneState>()
            .add_event::<ToggleSceneState>()
            .add_event::<SetDock>()
            .add_event::<ToggleDock>()
            .add_event::<SetInstanceCount>();

        // Layout changes land before the dock requests that may name new photos,
        // and the state latch comes last so the whole frame sees one value.
        app.add_systems(Update, (
            config_listener,
            instance_count_listener,
            photo_collection_listener,
            dock_listener,
            scene_state_listener,
            latch_scene_state,
        ).chain().in_set(MorphSet::Input));
    }
}
