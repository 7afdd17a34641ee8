use tagsmith_crypto::ContentHasher;
use tagsmith_store::{ObjectStore, StoredObject};
use tagsmith_types::{ObjectId, ObjectType};
use tracing::{debug, info};

use crate::error::GateResult;

/// Stores validated tag bytes under their content-derived ID.
pub struct TagWriter<'s> {
    store: &'s dyn ObjectStore,
}

impl<'s> TagWriter<'s> {
    pub fn new(store: &'s dyn ObjectStore) -> Self {
        Self { store }
    }

    /// The ID `bytes` would be stored under as a tag object.
    pub fn id_for(bytes: &[u8]) -> ObjectId {
        ContentHasher::TAG.hash(bytes)
    }

    /// Writes `bytes` as a tag object. Writing bytes that are already stored
    /// returns the same ID and leaves the store unchanged.
    pub fn write(&self, bytes: &[u8]) -> GateResult<ObjectId> {
        let id = Self::id_for(bytes);
        if self.store.exists(&id)? {
            debug!(%id, "tag object already stored");
            return Ok(id);
        }

        let written = self
            .store
            .write(&StoredObject::new(ObjectType::Tag, bytes.to_vec()))?;
        debug_assert_eq!(written, id);
        info!(%id, size = bytes.len(), "wrote tag object");
        Ok(written)
    }
}
