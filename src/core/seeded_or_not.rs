use serde::{Serialize, Deserialize};
use bevy::prelude::Reflect;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seed choice for layout generation.
#[derive(Serialize, Deserialize, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeededOrNot {
    Seeded(u64),
    Unseeded,
}

impl Default for SeededOrNot {
    fn default() -> Self {
        SeededOrNot::Seeded(132)
    }
}

impl SeededOrNot {
    pub fn resolve(self) -> u64 {
        match self {
            SeededOrNot::Seeded(seed) => seed,
            SeededOrNot::Unseeded => {
                let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
                now.as_nanos() as u64
            }
        }
    }
}
