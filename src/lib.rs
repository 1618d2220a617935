pub mod core;
pub mod spawning;
pub mod animation;
pub mod management;
pub mod event_system;
pub mod systems;

pub mod prelude {
    pub use crate::core::class_kind::{ClassKind, OrnamentShape};
    pub use crate::core::components::{CameraLens, InstanceSlot, MainCamera, SlotColor, TreeRoot};
    pub use crate::core::instance_buffer::{ClassBuffer, InstanceBuffer, InstanceSink};
    pub use crate::core::morph_config::MorphConfig;
    pub use crate::core::morph_error::MorphError;
    pub use crate::core::morph_plugin::{MorphPlugin, MorphSet};
    pub use crate::core::scene_state::SceneState;
    pub use crate::animation::docking::CameraFrame;
    pub use crate::event_system::morph_events::*;
    pub use crate::management::config_io::{load_config, parse_config, save_config};
    pub use crate::management::morph_engine::{FrameInputs, MorphEngine};
    pub use crate::management::photo_collection::{PhotoCollection, PhotoEntry, PhotoId};
    pub use crate::systems::tree_motion::TreeMotion;
    pub use crate::morph;
}
