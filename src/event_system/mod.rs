pub mod event_listeners;
pub mod event_system_plugin;
pub mod morph_events;
pub mod spawn_macro;
