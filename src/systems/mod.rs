pub mod frame;
pub mod tree_motion;
