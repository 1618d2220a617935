pub mod class_kind;
pub mod components;
pub mod instance_buffer;
pub mod instance_record;
pub mod morph_config;
pub mod morph_error;
pub mod morph_plugin;
pub mod scene_state;
pub mod seeded_or_not;
