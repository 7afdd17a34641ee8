//! Content hashing for Tagsmith.
//!
//! Object identifiers are domain-separated BLAKE3 digests bound to the object
//! type and payload size.

pub mod hasher;

pub use hasher::ContentHasher;
