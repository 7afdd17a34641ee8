use tagsmith_types::ObjectId;

use crate::error::StoreResult;
use crate::object::StoredObject;

/// A content-addressed object store.
///
/// An ID names exactly one (type, data) pair. Writing an ID that is already
/// present changes nothing, including when several writers race on it.
pub trait ObjectStore: Send + Sync {
    /// Fetch the object stored under `id`, or `None` if there is none.
    ///
    /// The bytes are returned as stored; callers that need to trust them
    /// must re-hash.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Store `object` under its computed ID and return that ID.
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// The ID that stands in for `id` during verification, following
    /// replacement entries. Stores without replacements return `id`.
    fn replacement(&self, id: &ObjectId) -> StoreResult<ObjectId> {
        Ok(*id)
    }
}
