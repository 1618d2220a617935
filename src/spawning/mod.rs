pub mod helpers;
pub mod layout_generation;
pub mod photo_layout;
