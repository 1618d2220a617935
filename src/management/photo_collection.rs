use bevy::prelude::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use crate::core::morph_error::MorphError;

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(pub u64);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PhotoEntry {
    pub id: PhotoId,
    pub image_ref: String,
    /// Chaos position carried over from an earlier layout, if any.
    pub pose_hint: Option<Vec3>,
    // seconds since the unix epoch
    pub created_at: f64,
}

impl PhotoEntry {
    pub fn new(id: PhotoId, image_ref: impl Into<String>) -> Self {
        PhotoEntry {
            id,
            image_ref: image_ref.into(),
            pose_hint: None,
            created_at: 0.0,
        }
    }
}

/// Host-owned, insertion-ordered photo list. The engine reads it and never writes back.
#[derive(Resource, Debug, Clone, Default)]
pub struct PhotoCollection {
    entries: IndexMap<PhotoId, PhotoEntry>,
}

impl PhotoCollection {
    pub fn insert(&mut self, entry: PhotoEntry) -> Result<(), MorphError> {
        if self.entries.contains_key(&entry.id) {
            return Err(MorphError::DuplicatePhoto(entry.id));
        }
        self.entries.insert(entry.id, entry);
        Ok(())
    }

    /// Removes an entry, keeping the order of the rest.
    pub fn remove(&mut self, id: PhotoId) -> Result<PhotoEntry, MorphError> {
        self.entries.shift_remove(&id).ok_or(MorphError::UnknownPhoto(id))
    }

    pub fn get(&self, id: PhotoId) -> Option<&PhotoEntry> {
        self.entries.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhotoEntry> {
        self.entries.values()
    }

    pub fn ids(&self) -> Vec<PhotoId> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Next id above every id in the collection.
    pub fn next_id(&self) -> PhotoId {
        PhotoId(self.entries.keys().map(|id| id.0 + 1).max().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_duplicates_and_keeps_order() {
        let mut photos = PhotoCollection::default();
        photos.insert(PhotoEntry::new(PhotoId(4), "a.jpg")).unwrap();
        photos.insert(PhotoEntry::new(PhotoId(1), "b.jpg")).unwrap();
        photos.insert(PhotoEntry::new(PhotoId(7), "c.jpg")).unwrap();
        assert!(matches!(
            photos.insert(PhotoEntry::new(PhotoId(1), "again.jpg")),
            Err(MorphError::DuplicatePhoto(PhotoId(1)))
        ));
        assert_eq!(photos.ids(), vec![PhotoId(4), PhotoId(1), PhotoId(7)]);
        assert_eq!(photos.next_id(), PhotoId(8));
    }

    #[test]
    fn remove_shifts_later_entries_down() {
        let mut photos = PhotoCollection::default();
        for i in 0..4 {
            photos.insert(PhotoEntry::new(PhotoId(i), format!("{}.jpg", i))).unwrap();
        }
        let removed = photos.remove(PhotoId(1)).unwrap();
        assert_eq!(removed.image_ref, "1.jpg");
        assert_eq!(photos.ids(), vec![PhotoId(0), PhotoId(2), PhotoId(3)]);
        assert!(matches!(photos.remove(PhotoId(1)), Err(MorphError::UnknownPhoto(_))));
    }
}
