/// Queues a morph event from `Commands`, e.g. `morph!(commands, ToggleSceneState)`.
#[macro_export]
macro_rules! morph {
    ($commands:expr, $event:expr) => {
        $commands.queue(move |w: &mut bevy::prelude::World| {
            w.send_event($event);
        });
    };
}
