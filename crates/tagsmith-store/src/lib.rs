//! Object storage for Tagsmith.
//!
//! Objects are keyed by the digest of their type, size and content, so an ID
//! can only ever name one byte sequence. Two backends implement
//! [`ObjectStore`]:
//!
//! - [`InMemoryObjectStore`] keeps everything in a locked `HashMap`.
//! - [`LooseObjectStore`] keeps one zstd-compressed file per object under
//!   `objects/<2 hex>/<62 hex>`, and replacement entries under `replace/`.
//!
//! Writes of an existing ID are no-ops, and a loose object becomes visible
//! only once fully written. Stores never parse object contents and never
//! re-hash on read; [`ReplaceMap`] entries redirect lookups during
//! verification without touching stored bytes.

pub mod error;
pub mod loose;
pub mod memory;
pub mod object;
pub mod replace;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use loose::LooseObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::StoredObject;
pub use replace::{ReplaceMap, MAX_REPLACE_DEPTH};
pub use traits::ObjectStore;
