use tagsmith_types::ObjectId;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// I/O error from the underlying storage backend.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// The object data is malformed or cannot be decoded.
    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: ObjectId, reason: String },

    /// Compressing an object for storage failed.
    #[error("compression failed: {0}")]
    Compression(String),

    /// Attempted to write a null object ID.
    #[error("cannot store object with null ID")]
    NullObjectId,

    /// A replacement entry could not be parsed.
    #[error("invalid replacement for {id}: {reason}")]
    InvalidReplacement { id: ObjectId, reason: String },

    /// Replacement chain is longer than allowed (or cyclic).
    #[error("replace depth too high for object {id} (limit {limit})")]
    ReplaceDepthExceeded { id: ObjectId, limit: usize },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
