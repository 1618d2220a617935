use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// The two global poses the whole tree morphs between.
#[derive(Resource, Reflect, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[reflect(Resource)]
pub enum SceneState {
    #[default]
    Chaos,
    Formed,
}

impl SceneState {
    pub fn toggle(self) -> Self {
        match self {
            SceneState::Chaos => SceneState::Formed,
            SceneState::Formed => SceneState::Chaos,
        }
    }

    /// Progress value the blenders approach while this state is held.
    pub fn target_progress(self) -> f32 {
        match self {
            SceneState::Chaos => 0.0,
            SceneState::Formed => 1.0,
        }
    }

    pub fn is_formed(self) -> bool {
        self == SceneState::Formed
    }
}
