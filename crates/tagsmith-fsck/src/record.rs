use tagsmith_types::{ObjectId, ObjectType};

/// Parsed view of a tag record that passed structural validation.
///
/// Only [`crate::TagValidation::into_record`] constructs one. The record
/// always names the target exactly as written, even when the store maps
/// that ID to a replacement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRecord {
    target: ObjectId,
    target_type: ObjectType,
    name: String,
    tagger: Option<String>,
    extra_headers: Vec<(String, String)>,
    message: Vec<u8>,
}

impl TagRecord {
    pub(crate) fn new(
        target: ObjectId,
        target_type: ObjectType,
        name: String,
        tagger: Option<String>,
        extra_headers: Vec<(String, String)>,
        message: Vec<u8>,
    ) -> Self {
        Self {
            target,
            target_type,
            name,
            tagger,
            extra_headers,
            message,
        }
    }

    /// ID of the tagged object.
    pub fn target(&self) -> ObjectId {
        self.target
    }

    /// Declared type of the tagged object.
    pub fn target_type(&self) -> ObjectType {
        self.target_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tagger(&self) -> Option<&str> {
        self.tagger.as_deref()
    }

    /// Unrecognized headers in input order.
    pub fn extra_headers(&self) -> &[(String, String)] {
        &self.extra_headers
    }

    /// First value of the extra header `key`.
    pub fn extra_header(&self, key: &str) -> Option<&str> {
        self.extra_headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Message bytes after the blank line, including any signature block.
    pub fn message(&self) -> &[u8] {
        &self.message
    }
}
