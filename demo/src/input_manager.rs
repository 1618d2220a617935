use bevy::app::Plugin;
use bevy::input::ButtonState;
use bevy::input::mouse::MouseButtonInput;
use bevy::prelude::*;
use tree_morph::prelude::*;
use crate::CONFIG_PATH;

pub(crate) struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<InputStates>()
            .init_resource::<SelectedPhoto>()
            .add_systems(Update, (
                mouse_management_system,
                keyboard_command_system,
            ).before(MorphSet::Input));
    }
}

#[derive(Debug, Default)]
pub enum MouseButtonState {
    #[default]
    Unheld,
    Held(Vec2),
}

#[derive(Default, Resource)]
pub(crate) struct InputStates {
    pub right: MouseButtonState,
    pub middle: MouseButtonState,
    pub cursor_position: Vec2,
}

/// Photo the dock key acts on, as a position in the collection.
#[derive(Default, Resource)]
pub(crate) struct SelectedPhoto(usize);

fn mouse_management_system(
    mut cursor_moved_events: EventReader<CursorMoved>,
    mut mouse_button_input_events: EventReader<MouseButtonInput>,
    mut input: ResMut<InputStates>,
) {
    for event in cursor_moved_events.read() {
        input.cursor_position = event.position;
    }

    for event in mouse_button_input_events.read() {
        let state = match event.state {
            ButtonState::Pressed => MouseButtonState::Held(input.cursor_position),
            ButtonState::Released => MouseButtonState::Unheld,
        };
        match event.button {
            MouseButton::Right => input.right = state,
            MouseButton::Middle => input.middle = state,
            _ => {}
        }
    }
}

// Space: chaos/formed. Tab: next photo. D: dock the selected photo.
// P / Backspace: add or remove a photo. F5: save the current config.
fn keyboard_command_system(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    mut photos: ResMut<PhotoCollection>,
    mut selected: ResMut<SelectedPhoto>,
    config: Res<MorphConfig>,
) {
    if keys.just_pressed(KeyCode::Space) {
        morph!(commands, ToggleSceneState);
    }

    if keys.just_pressed(KeyCode::Tab) && !photos.is_empty() {
        selected.0 = (selected.0 + 1) % photos.len();
        info!("selected photo {}", selected.0);
    }

    if keys.just_pressed(KeyCode::KeyD) {
        if let Some(entry) = photos.iter().nth(selected.0) {
            let id = entry.id;
            morph!(commands, ToggleDock { id });
        }
    }

    if keys.just_pressed(KeyCode::KeyP) {
        let id = photos.next_id();
        let entry = PhotoEntry::new(id, format!("photos/{}.png", id.0));
        if let Err(error) = photos.insert(entry) {
            warn!("could not add photo: {}", error);
        }
    }

    if keys.just_pressed(KeyCode::Backspace) {
        if let Some(id) = photos.ids().last().copied() {
            if let Err(error) = photos.remove(id) {
                warn!("could not remove photo: {}", error);
            }
            selected.0 = selected.0.min(photos.len().saturating_sub(1));
        }
    }

    if keys.just_pressed(KeyCode::F5) {
        match save_config(CONFIG_PATH, &config) {
            Ok(()) => info!("saved config to {}", CONFIG_PATH),
            Err(error) => warn!("could not save config: {}", error),
        }
    }
}
