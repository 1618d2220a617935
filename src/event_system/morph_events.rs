use bevy::prelude::*;
use crate::core::class_kind::ClassKind;
use crate::core::scene_state::SceneState;
use crate::management::photo_collection::PhotoId;

#[derive(Debug, Clone, Copy, Event)]
pub struct SetSceneState(pub SceneState);

#[derive(Debug, Clone, Copy, Default, Event)]
pub struct ToggleSceneState;

#[derive(Debug, Clone, Copy, Event)]
pub struct SetDock {
    pub id: PhotoId,
    pub docked: bool,
}

#[derive(Debug, Clone, Copy, Event)]
pub struct ToggleDock {
    pub id: PhotoId,
}

#[derive(Debug, Clone, Copy, Event)]
pub struct SetInstanceCount {
    pub class: ClassKind,
    pub count: usize,
}
