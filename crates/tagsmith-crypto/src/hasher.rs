use tagsmith_types::{ObjectId, ObjectType};

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g., `"tagsmith-blob-v1"`,
/// `"tagsmith-tag-v1"`) that is prepended to every hash computation, followed
/// by the payload length. A blob and a tag with identical bytes therefore
/// produce different identifiers, and so do two payloads whose bytes agree
/// but whose declared sizes do not.
///
/// Preimage layout: `<domain> <size>\0<data>`.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for blob objects.
    pub const BLOB: Self = Self {
        domain: "tagsmith-blob-v1",
    };
    /// Hasher for tree objects.
    pub const TREE: Self = Self {
        domain: "tagsmith-tree-v1",
    };
    /// Hasher for commit objects.
    pub const COMMIT: Self = Self {
        domain: "tagsmith-commit-v1",
    };
    /// Hasher for tag objects.
    pub const TAG: Self = Self {
        domain: "tagsmith-tag-v1",
    };

    /// The hasher that produces identifiers for objects of `kind`.
    pub const fn for_type(kind: ObjectType) -> &'static Self {
        match kind {
            ObjectType::Blob => &Self::BLOB,
            ObjectType::Tree => &Self::TREE,
            ObjectType::Commit => &Self::COMMIT,
            ObjectType::Tag => &Self::TAG,
        }
    }

    /// Hash raw bytes with domain and size separation.
    pub fn hash(&self, data: &[u8]) -> ObjectId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b" ");
        hasher.update(data.len().to_string().as_bytes());
        hasher.update(b"\0");
        hasher.update(data);
        ObjectId::from_hash(*hasher.finalize().as_bytes())
    }

    /// Verify that data produces the expected object ID.
    pub fn verify(&self, data: &[u8], expected: &ObjectId) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"hello world";
        let id1 = ContentHasher::BLOB.hash(data);
        let id2 = ContentHasher::BLOB.hash(data);
        assert_eq!(id1, id2);
    }

    #[test]
    fn different_types_produce_different_hashes() {
        let data = b"same content";
        let ids: Vec<ObjectId> = ObjectType::ALL
            .into_iter()
            .map(|kind| ContentHasher::for_type(kind).hash(data))
            .collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn for_type_selects_matching_domain() {
        assert_eq!(ContentHasher::for_type(ObjectType::Tag).domain(), "tagsmith-tag-v1");
        assert_eq!(ContentHasher::for_type(ObjectType::Blob).domain(), "tagsmith-blob-v1");
    }

    #[test]
    fn size_is_part_of_the_preimage() {
        let plain = blake3::hash(b"tagsmith-blob-v1 5\0hello");
        assert_eq!(
            ContentHasher::BLOB.hash(b"hello"),
            ObjectId::from_hash(*plain.as_bytes())
        );
    }

    #[test]
    fn verify_correct_data() {
        let data = b"test data";
        let id = ContentHasher::BLOB.hash(data);
        assert!(ContentHasher::BLOB.verify(data, &id));
    }

    #[test]
    fn verify_incorrect_data() {
        let id = ContentHasher::BLOB.hash(b"original");
        assert!(!ContentHasher::BLOB.verify(b"tampered", &id));
        assert!(!ContentHasher::TREE.verify(b"original", &id));
    }

    #[test]
    fn empty_payload_is_not_null() {
        assert!(!ContentHasher::TAG.hash(b"").is_null());
    }
}
