use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier of a stored object: the digest of its type, size and content
/// (see `tagsmith_crypto::ContentHasher`).
///
/// Text form, `Display` and serde all use exactly [`ObjectId::HEX_LEN`]
/// lowercase hex characters. Parsing accepts nothing else.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId([u8; 32]);

impl ObjectId {
    pub const RAW_LEN: usize = 32;
    pub const HEX_LEN: usize = Self::RAW_LEN * 2;

    pub const fn from_hash(digest: [u8; Self::RAW_LEN]) -> Self {
        Self(digest)
    }

    /// The all-zero ID. No content hashes to it, so stores refuse it.
    pub const fn null() -> Self {
        Self([0; Self::RAW_LEN])
    }

    pub fn is_null(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First four bytes in hex, for log lines.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse the canonical form: [`Self::HEX_LEN`] characters from `[0-9a-f]`.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidLength {
                expected: Self::HEX_LEN,
                actual: s.len(),
            });
        }
        if let Some(c) = s.chars().find(|c| !matches!(c, '0'..='9' | 'a'..='f')) {
            return Err(TypeError::InvalidHex(format!(
                "non-canonical character {c:?}"
            )));
        }
        let mut digest = [0; Self::RAW_LEN];
        hex::decode_to_slice(s, &mut digest).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Ok(Self(digest))
    }

    /// Loose-object path components: the first two hex characters and the rest.
    pub fn fanout(&self) -> (String, String) {
        let mut dir = self.to_hex();
        let file = dir.split_off(2);
        (dir, file)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.short_hex()).finish()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn null_id_prints_as_zeros() {
        assert!(ObjectId::null().is_null());
        assert!(!ObjectId::from_hash([1; 32]).is_null());
        assert_eq!(ObjectId::null().to_string(), "0".repeat(ObjectId::HEX_LEN));
    }

    #[test]
    fn debug_is_abbreviated() {
        let id = ObjectId::from_hash([0xab; 32]);
        assert_eq!(format!("{id:?}"), "ObjectId(\"abababab\")");
    }

    #[test]
    fn rejects_uppercase_hex() {
        let upper = "AB".repeat(32);
        let err = ObjectId::from_hex(&upper).unwrap_err();
        assert!(matches!(err, TypeError::InvalidHex(_)));
    }

    #[test]
    fn rejects_wrong_width() {
        let err = ObjectId::from_hex(&"a".repeat(40)).unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 64,
                actual: 40
            }
        );
        assert!(ObjectId::from_hex("").is_err());
    }

    #[test]
    fn rejects_non_hex_characters() {
        let mut s = "0".repeat(63);
        s.push('g');
        assert!(matches!(
            ObjectId::from_hex(&s),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn fanout_splits_after_two_chars() {
        let id = ObjectId::from_hash([0x1f; 32]);
        let (dir, file) = id.fanout();
        assert_eq!(dir, "1f");
        assert_eq!(file.len(), 62);
        assert_eq!(format!("{dir}{file}"), id.to_hex());
    }

    #[test]
    fn serde_uses_hex_string() {
        let id = ObjectId::from_hash([0x42; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_hex()));
        let parsed: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    proptest! {
        #[test]
        fn canonical_hex_parses_back(bytes in proptest::array::uniform32(any::<u8>())) {
            let id = ObjectId::from_hash(bytes);
            prop_assert_eq!(id.to_hex().parse::<ObjectId>().unwrap(), id);
        }

        #[test]
        fn arbitrary_strings_never_panic(s in "\\PC{0,80}") {
            let _ = ObjectId::from_hex(&s);
        }
    }
}
