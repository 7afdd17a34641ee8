use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use tagsmith_types::ObjectId;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::replace::ReplaceMap;
use crate::traits::ObjectStore;

#[derive(Default)]
struct Contents {
    objects: HashMap<ObjectId, StoredObject>,
    replacements: ReplaceMap,
}

/// Object store held entirely in memory. Objects and the replacement table
/// sit behind one lock.
#[derive(Default)]
pub struct InMemoryObjectStore {
    contents: RwLock<Contents>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contents.read().expect("lock poisoned").objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register `replacement` to stand in for `original` during verification.
    pub fn add_replacement(&self, original: ObjectId, replacement: ObjectId) {
        let mut contents = self.contents.write().expect("lock poisoned");
        contents.replacements.insert(original, replacement);
        debug!(%original, %replacement, "registered replacement");
    }

    /// Store `object` under `id` as given, without hashing it and replacing
    /// any existing entry. Models damaged storage.
    pub fn insert_raw(&self, id: ObjectId, object: StoredObject) {
        let mut contents = self.contents.write().expect("lock poisoned");
        contents.objects.insert(id, object);
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let contents = self.contents.read().expect("lock poisoned");
        Ok(contents.objects.get(id).cloned())
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }
        let mut contents = self.contents.write().expect("lock poisoned");
        match contents.objects.entry(id) {
            Entry::Occupied(_) => {
                debug!(%id, "object already present, skipping write");
            }
            Entry::Vacant(slot) => {
                slot.insert(object.clone());
            }
        }
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self
            .contents
            .read()
            .expect("lock poisoned")
            .objects
            .contains_key(id))
    }

    fn replacement(&self, id: &ObjectId) -> StoreResult<ObjectId> {
        self.contents
            .read()
            .expect("lock poisoned")
            .replacements
            .resolve(id)
    }
}

impl fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let contents = self.contents.read().expect("lock poisoned");
        f.debug_struct("InMemoryObjectStore")
            .field("objects", &contents.objects.len())
            .field("replacements", &contents.replacements.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagsmith_types::ObjectType;

    fn commit(body: &str) -> StoredObject {
        StoredObject::new(ObjectType::Commit, body.as_bytes().to_vec())
    }

    #[test]
    fn stored_object_reads_back() {
        let store = InMemoryObjectStore::new();
        let object = commit("tree 0\n\nfirst\n");
        let id = store.write(&object).unwrap();
        assert_eq!(id, object.compute_id());
        assert_eq!(store.read(&id).unwrap(), Some(object));
        assert!(store.exists(&id).unwrap());
    }

    #[test]
    fn unknown_id_is_absent() {
        let store = InMemoryObjectStore::new();
        let id = commit("never written").compute_id();
        assert_eq!(store.read(&id).unwrap(), None);
        assert!(!store.exists(&id).unwrap());
    }

    #[test]
    fn rewrite_keeps_one_copy() {
        let store = InMemoryObjectStore::new();
        let first = store.write(&commit("same")).unwrap();
        let second = store.write(&commit("same")).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn type_is_part_of_identity() {
        let store = InMemoryObjectStore::new();
        let as_commit = store.write(&commit("body")).unwrap();
        let as_blob = store
            .write(&StoredObject::new(ObjectType::Blob, b"body".to_vec()))
            .unwrap();
        assert_ne!(as_commit, as_blob);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn write_leaves_damaged_entry_alone() {
        let store = InMemoryObjectStore::new();
        let genuine = commit("genuine");
        let id = genuine.compute_id();
        let damaged = commit("damaged");
        store.insert_raw(id, damaged.clone());

        assert_eq!(store.write(&genuine).unwrap(), id);
        assert_eq!(store.read(&id).unwrap(), Some(damaged));
    }

    #[test]
    fn replacement_lookup() {
        let store = InMemoryObjectStore::new();
        let original = store.write(&commit("v1")).unwrap();
        assert_eq!(store.replacement(&original).unwrap(), original);

        let replacement = store.write(&commit("v2")).unwrap();
        store.add_replacement(original, replacement);
        assert_eq!(store.replacement(&original).unwrap(), replacement);
        assert_eq!(store.replacement(&replacement).unwrap(), replacement);
    }

    #[test]
    fn racing_writers_store_one_object() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryObjectStore::new());
        let ids: Vec<ObjectId> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.write(&commit("contended")).unwrap())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn debug_shows_counts() {
        let store = InMemoryObjectStore::new();
        let id = store.write(&commit("x")).unwrap();
        store.add_replacement(id, id);
        assert_eq!(
            format!("{store:?}"),
            "InMemoryObjectStore { objects: 1, replacements: 1 }"
        );
    }
}
