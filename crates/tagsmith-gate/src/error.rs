use tagsmith_fsck::FsckError;
use tagsmith_store::StoreError;
use tagsmith_types::{ObjectId, ObjectType};

/// Why a tag's target failed verification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReferenceError {
    /// Nothing is stored at the target (or its replacement).
    #[error("could not read tagged object '{id}'")]
    NotFound { id: ObjectId },

    /// The stored object's type differs from the declared type.
    #[error("object '{id}' tagged as '{declared}', but is a '{actual}' type")]
    TypeMismatch {
        id: ObjectId,
        declared: ObjectType,
        actual: ObjectType,
    },

    /// The stored bytes do not hash to the expected ID.
    #[error("object '{id}' failed content verification: expected {expected}, computed {computed}")]
    ContentCorruption {
        id: ObjectId,
        expected: ObjectId,
        computed: ObjectId,
    },

    /// The stored bytes could not be decoded at all.
    #[error("object '{id}' is unreadable: {reason}")]
    Unreadable { id: ObjectId, reason: String },
}

/// Errors that abort tag admission. None of them is retried.
///
/// Each variant carries its cause as the error source.
#[derive(Debug, thiserror::Error)]
pub enum AdmitError {
    /// The tag input could not be read.
    #[error("could not read tag input")]
    Input(#[source] std::io::Error),

    /// The tag input failed structural validation.
    #[error("tag input failed structural validation")]
    Structural(#[from] FsckError),

    /// The tagged object is missing, mistyped or corrupt.
    #[error("tag input did not refer to a valid object")]
    Reference(#[from] ReferenceError),

    /// The store failed while reading the target or writing the tag.
    #[error("object store failed")]
    Storage(#[from] StoreError),
}

/// Result alias for admission operations.
pub type GateResult<T> = Result<T, AdmitError>;
