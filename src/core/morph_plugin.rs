use bevy::prelude::*;
use crate::core::components::{CameraLens, InstanceSlot, SlotColor};
use crate::core::morph_config::MorphConfig;
use crate::core::scene_state::SceneState;
use crate::event_system::event_system_plugin::EventSystemPlugin;
use crate::management::morph_engine::MorphEngine;
use crate::management::photo_collection::PhotoCollection;
use crate::systems::frame::{blend_system, dock_system, flush_system, twinkle_system};
use crate::systems::tree_motion::{tree_motion_system, TreeMotion};

/// Frame stages, run in this order every `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorphSet {
    /// Events and resource edits are applied and the scene state is latched.
    Input,
    /// Tree root motion. Host camera controllers belong here too.
    Parent,
    Blend,
    Twinkle,
    Dock,
    /// Instance buffer is pushed onto slot entities.
    Flush,
}

#[derive(Default)]
pub struct MorphPlugin {
    pub config: MorphConfig,
}

impl MorphPlugin {
    pub fn new(config: MorphConfig) -> Self {
        MorphPlugin { config }
    }
}

impl Plugin for MorphPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config.sanitized();
        app
            .insert_resource(MorphEngine::new(config.clone()))
            .insert_resource(config)
            .init_resource::<SceneState>()
            .init_resource::<PhotoCollection>()
            .init_resource::<TreeMotion>()
            .register_type::<MorphConfig>()
            .register_type::<SceneState>()
            .register_type::<CameraLens>()
            .register_type::<InstanceSlot>()
            .register_type::<SlotColor>()
            .configure_sets(Update, (
                MorphSet::Input,
                MorphSet::Parent,
                MorphSet::Blend,
                MorphSet::Twinkle,
                MorphSet::Dock,
                MorphSet::Flush,
            ).chain())
            .add_plugins(EventSystemPlugin)
            .add_systems(Update, (
                tree_motion_system.in_set(MorphSet::Parent),
                blend_system.in_set(MorphSet::Blend),
                twinkle_system.in_set(MorphSet::Twinkle),
                dock_system.in_set(MorphSet::Dock),
                flush_system.in_set(MorphSet::Flush),
            ));
    }
}
