use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Foliage,
    Ornament,
    PhotoFrame,
}

impl ClassKind {
    pub const ALL: [ClassKind; 3] = [ClassKind::Foliage, ClassKind::Ornament, ClassKind::PhotoFrame];

    pub fn index(self) -> usize {
        match self {
            ClassKind::Foliage => 0,
            ClassKind::Ornament => 1,
            ClassKind::PhotoFrame => 2,
        }
    }
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentShape {
    Sphere,
    Box,
}
