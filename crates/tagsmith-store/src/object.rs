use tagsmith_crypto::ContentHasher;
use tagsmith_types::{ObjectId, ObjectType};

use crate::error::{StoreError, StoreResult};

/// A stored object: type tag + raw data + cached size.
///
/// `StoredObject` is the unit of storage. The store never interprets the
/// contents of the data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectType,
    /// The raw bytes of the object.
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl StoredObject {
    /// Create a new stored object from type and data.
    pub fn new(kind: ObjectType, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// Compute the content-addressed ID for this object.
    pub fn compute_id(&self) -> ObjectId {
        ContentHasher::for_type(self.kind).hash(&self.data)
    }

    /// Serialize as `"<type> <size>\0<data>"`, the uncompressed loose format.
    pub fn to_loose_bytes(&self) -> Vec<u8> {
        let header = format!("{} {}\0", self.kind, self.size);
        let mut out = Vec::with_capacity(header.len() + self.data.len());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&self.data);
        out
    }

    /// Parse the uncompressed loose format.
    ///
    /// `id` is only used to label errors; the content is not re-hashed.
    pub fn from_loose_bytes(id: &ObjectId, bytes: &[u8]) -> StoreResult<Self> {
        let corrupt = |reason: &str| StoreError::CorruptObject {
            id: *id,
            reason: reason.to_string(),
        };

        let nul = bytes
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| corrupt("missing header terminator"))?;
        let header =
            std::str::from_utf8(&bytes[..nul]).map_err(|_| corrupt("header is not UTF-8"))?;
        let (kind, size) = header
            .split_once(' ')
            .ok_or_else(|| corrupt("malformed header"))?;
        let kind: ObjectType = kind
            .parse()
            .map_err(|_| corrupt(&format!("unknown object type {kind:?}")))?;
        let size: u64 = size
            .parse()
            .map_err(|_| corrupt(&format!("bad size {size:?}")))?;

        let data = bytes[nul + 1..].to_vec();
        if data.len() as u64 != size {
            return Err(corrupt(&format!(
                "size mismatch: header says {size}, found {}",
                data.len()
            )));
        }
        Ok(Self { kind, data, size })
    }
}
