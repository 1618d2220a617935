use std::fmt;
use crate::core::class_kind::ClassKind;
use crate::management::photo_collection::PhotoId;

#[derive(Debug)]
pub enum MorphError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
    DuplicatePhoto(PhotoId),
    UnknownPhoto(PhotoId),
    UnsupportedClass(ClassKind),
}

impl fmt::Display for MorphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MorphError::Io(e) => write!(f, "config io failed: {}", e),
            MorphError::Parse(e) => write!(f, "config parse failed: {}", e),
            MorphError::Serialize(e) => write!(f, "config serialize failed: {}", e),
            MorphError::DuplicatePhoto(id) => write!(f, "photo {:?} already exists", id),
            MorphError::UnknownPhoto(id) => write!(f, "photo {:?} does not exist", id),
            MorphError::UnsupportedClass(class) => {
                write!(f, "instance count for {:?} is driven by the photo collection", class)
            }
        }
    }
}

impl std::error::Error for MorphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MorphError::Io(e) => Some(e),
            MorphError::Parse(e) => Some(e),
            MorphError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MorphError {
    fn from(error: std::io::Error) -> Self {
        MorphError::Io(error)
    }
}

impl From<ron::error::SpannedError> for MorphError {
    fn from(error: ron::error::SpannedError) -> Self {
        MorphError::Parse(error)
    }
}

impl From<ron::Error> for MorphError {
    fn from(error: ron::Error) -> Self {
        MorphError::Serialize(error)
    }
}
