use bevy::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;
use tree_morph::prelude::*;

mod camera;
mod input_manager;
mod scene;

const CONFIG_PATH: &str = "assets/tree.ron";

fn main() {
    let config = match load_config(CONFIG_PATH) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("using default config: {}", error);
            MorphConfig::default()
        }
    };

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(bevy::log::LogPlugin {
                filter: "warn,tree_morph=info,tree_demo=info".to_string(),
                level: bevy::log::Level::INFO,
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Tree Morph".into(),
                    resolution: (1280.0, 800.0).into(),
                    ..default()
                }),
                ..default()
            }),
    );

    app.insert_resource(ClearColor(Color::srgb(0.01, 0.015, 0.03)))
        .insert_resource(AmbientLight {
            color: Color::srgb(0.6, 0.65, 1.0),
            brightness: 120.0,
        });

    app.add_plugins(MorphPlugin::new(config));

    // Escape shows the live config editor
    app.add_plugins(
        ResourceInspectorPlugin::<MorphConfig>::default()
            .run_if(bevy::input::common_conditions::input_toggle_active(false, KeyCode::Escape)),
    );

    app.add_plugins(crate::input_manager::InputPlugin);
    app.add_plugins(crate::camera::CameraPlugin);
    app.add_plugins(crate::scene::ScenePlugin);

    app.run();
}
