//! Foundation types for Tagsmith.
//!
//! Every other Tagsmith crate depends on `tagsmith-types` for the two values
//! that appear on every object: its content-addressed identifier and its type.
//!
//! # Key Types
//!
//! - [`ObjectId`]: BLAKE3 digest of an object's type, size and content
//! - [`ObjectType`]: blob, tree, commit or tag

pub mod error;
pub mod kind;
pub mod object;

pub use error::TypeError;
pub use kind::ObjectType;
pub use object::ObjectId;
