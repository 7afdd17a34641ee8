use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The type of a stored object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    /// Raw content.
    Blob,
    /// Directory listing.
    Tree,
    /// Snapshot with parents and metadata.
    Commit,
    /// Named, annotated pointer at another object.
    Tag,
}

impl ObjectType {
    /// Every object type, in canonical order.
    pub const ALL: [ObjectType; 4] = [Self::Blob, Self::Tree, Self::Commit, Self::Tag];

    /// The canonical lowercase name used in headers and on disk.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = TypeError;

    /// Parse a canonical type name. Matching is exact: `"Blob"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TypeError::UnknownObjectType(s.to_string()))
    }
}
