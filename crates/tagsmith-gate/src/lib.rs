//! Tag admission for Tagsmith.
//!
//! A tag record enters the store only after three steps succeed in order:
//! structural validation ([`tagsmith_fsck`]), verification of the tagged
//! object ([`ReferenceVerifier`]), and a content-addressed write
//! ([`TagWriter`]). A failure at any step leaves the store untouched.
//!
//! # Quick Start
//!
//! ```rust
//! use tagsmith_fsck::SeverityPolicy;
//! use tagsmith_gate::TagAdmission;
//! use tagsmith_store::{InMemoryObjectStore, ObjectStore, StoredObject};
//! use tagsmith_types::ObjectType;
//!
//! let store = InMemoryObjectStore::new();
//! let target = store
//!     .write(&StoredObject::new(ObjectType::Blob, b"hello\n".to_vec()))
//!     .unwrap();
//! let input = format!(
//!     "object {target}\ntype blob\ntag v1\ntagger Ann <ann@example.com> 1700000000 +0000\n\nfirst\n"
//! );
//!
//! let admitted = TagAdmission::new(&store, SeverityPolicy::new(), true)
//!     .admit(input.as_bytes())
//!     .unwrap();
//! assert!(store.exists(&admitted.id).unwrap());
//! ```

pub mod admission;
pub mod error;
pub mod verifier;
pub mod writer;

// Re-exports for convenience.
pub use admission::{Admitted, TagAdmission};
pub use error::{AdmitError, GateResult, ReferenceError};
pub use verifier::ReferenceVerifier;
pub use writer::TagWriter;
