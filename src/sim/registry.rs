//! Live falling objects
//!
//! Objects are addressed by `ObjectId`. Iteration during a tick goes over a
//! snapshot of ids, so removing the current object (or any other) mid-pass
//! never skips or revisits an entry.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{FallingObject, Kind};

/// Unique id of a falling object within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Owner of all live falling objects (kept sorted by id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    objects: Vec<FallingObject>,
    next_id: u32,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate an id and insert a new object
    pub fn add(&mut self, kind: Kind, rect: Rect) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(FallingObject { id, kind, rect });
        id
    }

    /// Remove an object. Removing an id that is already gone returns `None`.
    pub fn remove(&mut self, id: ObjectId) -> Option<FallingObject> {
        let index = self.index_of(id)?;
        Some(self.objects.remove(index))
    }

    pub fn get(&self, id: ObjectId) -> Option<&FallingObject> {
        self.index_of(id).map(|i| &self.objects[i])
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut FallingObject> {
        let index = self.index_of(id)?;
        Some(&mut self.objects[index])
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Snapshot of live ids in iteration order
    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FallingObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        // Ids are allocated increasingly and removal preserves order
        self.objects.binary_search_by_key(&id, |o| o.id).ok()
    }
}
