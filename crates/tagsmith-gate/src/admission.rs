use std::io::Read;

use tagsmith_fsck::{Diagnostic, SeverityPolicy, TagRecord, TagValidation, TagValidator};
use tagsmith_store::ObjectStore;
use tagsmith_types::ObjectId;
use tracing::debug;

use crate::error::{AdmitError, GateResult};
use crate::verifier::ReferenceVerifier;
use crate::writer::TagWriter;

/// A tag that passed every check and is now stored.
#[derive(Debug, Clone)]
pub struct Admitted {
    /// ID of the stored tag object.
    pub id: ObjectId,
    /// The parsed record. Its target is the ID named in the input, even
    /// when verification went through a replacement.
    pub record: TagRecord,
    /// Non-fatal diagnostics raised during validation.
    pub warnings: Vec<Diagnostic>,
}

/// Runs validation, reference verification and storage, in that order.
///
/// Nothing is written unless both checks succeed.
pub struct TagAdmission<'s> {
    store: &'s dyn ObjectStore,
    validator: TagValidator,
}

impl<'s> TagAdmission<'s> {
    pub fn new(store: &'s dyn ObjectStore, policy: SeverityPolicy, strict: bool) -> Self {
        Self::with_validator(store, TagValidator::new(policy, strict))
    }

    pub fn with_validator(store: &'s dyn ObjectStore, validator: TagValidator) -> Self {
        Self { store, validator }
    }

    pub fn validator(&self) -> &TagValidator {
        &self.validator
    }

    /// Admits the tag record in `input`.
    pub fn admit(&self, input: &[u8]) -> GateResult<Admitted> {
        self.admit_validated(self.validator.validate(input), input)
    }

    /// Finishes admission of `input` from its validation result.
    ///
    /// Lets callers report the validation diagnostics before the tagged
    /// object is verified. `validation` must come from validating `input`.
    pub fn admit_validated(&self, validation: TagValidation, input: &[u8]) -> GateResult<Admitted> {
        let warnings: Vec<Diagnostic> = validation.warnings().cloned().collect();
        for diagnostic in &warnings {
            debug!(code = %diagnostic.code, "fsck warning: {}", diagnostic.message);
        }

        let record = validation.into_record()?;
        debug!(
            object = %record.target(),
            kind = %record.target_type(),
            name = record.name(),
            "tag input is well formed"
        );

        ReferenceVerifier::new(self.store).verify(&record.target(), record.target_type())?;

        let id = TagWriter::new(self.store).write(input)?;
        Ok(Admitted {
            id,
            record,
            warnings,
        })
    }

    /// Reads `reader` to the end, then admits what was read.
    pub fn admit_reader<R: Read>(&self, mut reader: R) -> GateResult<Admitted> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input).map_err(AdmitError::Input)?;
        self.admit(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tagsmith_store::{InMemoryObjectStore, StoredObject};
    use tagsmith_types::ObjectType;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    fn tag_for(id: &ObjectId, kind: ObjectType) -> Vec<u8> {
        format!(
            "object {id}\ntype {kind}\ntag v1.0\ntagger Ann <ann@example.com> 1700000000 +0000\n\nrelease\n"
        )
        .into_bytes()
    }

    #[test]
    fn admits_and_stores() {
        let store = InMemoryObjectStore::new();
        let target = store
            .write(&StoredObject::new(ObjectType::Blob, b"content".to_vec()))
            .unwrap();
        let input = tag_for(&target, ObjectType::Blob);

        let admitted = TagAdmission::new(&store, SeverityPolicy::new(), true)
            .admit(&input)
            .unwrap();

        assert_eq!(admitted.id, TagWriter::id_for(&input));
        assert_eq!(admitted.record.target(), target);
        assert_eq!(admitted.record.name(), "v1.0");
        assert!(admitted.warnings.is_empty());
        assert_eq!(store.read(&admitted.id).unwrap().unwrap().data, input);
    }

    #[test]
    fn reader_errors_surface_as_input_errors() {
        let store = InMemoryObjectStore::new();
        let err = TagAdmission::new(&store, SeverityPolicy::new(), true)
            .admit_reader(FailingReader)
            .unwrap_err();
        assert!(matches!(err, AdmitError::Input(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn warnings_are_known_before_verification_fails() {
        let store = InMemoryObjectStore::new();
        let target = store
            .write(&StoredObject::new(ObjectType::Blob, b"content".to_vec()))
            .unwrap();
        let input = String::from_utf8(tag_for(&target, ObjectType::Commit))
            .unwrap()
            .replacen("\n\n", "\nfoo bar\n\n", 1)
            .into_bytes();
        let gate = TagAdmission::new(&store, SeverityPolicy::new(), false);

        let validation = gate.validator().validate(&input);
        let warnings: Vec<_> = validation.warnings().map(|d| d.code).collect();
        assert_eq!(warnings, vec![tagsmith_fsck::RuleCode::ExtraHeaderEntry]);

        let err = gate.admit_validated(validation, &input).unwrap_err();
        assert!(matches!(
            err,
            AdmitError::Reference(crate::ReferenceError::TypeMismatch { .. })
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reader_input_is_admitted() {
        let store = InMemoryObjectStore::new();
        let target = store
            .write(&StoredObject::new(ObjectType::Tree, b"entries".to_vec()))
            .unwrap();
        let input = tag_for(&target, ObjectType::Tree);
        let admitted = TagAdmission::new(&store, SeverityPolicy::new(), true)
            .admit_reader(input.as_slice())
            .unwrap();
        assert_eq!(admitted.id, TagWriter::id_for(&input));
    }
}
