use std::collections::HashMap;

use tagsmith_types::ObjectId;

use crate::error::{StoreError, StoreResult};

/// Longest replacement chain that [`ReplaceMap::resolve`] will follow.
pub const MAX_REPLACE_DEPTH: usize = 5;

/// Lookup table substituting one object ID for another.
///
/// Replacements are consulted when verifying an object's content: the bytes
/// stored under the original ID are checked against the replacement ID. The
/// table never owns or rewrites objects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplaceMap {
    entries: HashMap<ObjectId, ObjectId>,
}

impl ReplaceMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `replacement` for `original`, returning any previous entry.
    pub fn insert(&mut self, original: ObjectId, replacement: ObjectId) -> Option<ObjectId> {
        self.entries.insert(original, replacement)
    }

    /// Remove the entry for `original`.
    pub fn remove(&mut self, original: &ObjectId) -> Option<ObjectId> {
        self.entries.remove(original)
    }

    /// The direct replacement for `original`, without following chains.
    pub fn get(&self, original: &ObjectId) -> Option<ObjectId> {
        self.entries.get(original).copied()
    }

    /// Number of registered replacements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no replacements are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Follow the replacement chain starting at `id`.
    ///
    /// Returns `id` unchanged if it has no replacement. Chains longer than
    /// [`MAX_REPLACE_DEPTH`] (which includes every cycle) are an error.
    pub fn resolve(&self, id: &ObjectId) -> StoreResult<ObjectId> {
        let mut current = *id;
        for _ in 0..MAX_REPLACE_DEPTH {
            match self.entries.get(&current) {
                Some(next) => current = *next,
                None => return Ok(current),
            }
        }
        if self.entries.contains_key(&current) {
            return Err(StoreError::ReplaceDepthExceeded {
                id: *id,
                limit: MAX_REPLACE_DEPTH,
            });
        }
        Ok(current)
    }
}

impl FromIterator<(ObjectId, ObjectId)> for ReplaceMap {
    fn from_iter<I: IntoIterator<Item = (ObjectId, ObjectId)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
