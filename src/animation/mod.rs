pub mod easing;
pub mod state_blend;
pub mod twinkle;
pub mod docking;
