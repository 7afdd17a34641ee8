use std::fs;

use tagsmith_fsck::{FsckError, RuleCode, Severity, SeverityPolicy};
use tagsmith_gate::{AdmitError, ReferenceError, TagAdmission, TagWriter};
use tagsmith_store::{InMemoryObjectStore, LooseObjectStore, ObjectStore, StoredObject};
use tagsmith_types::{ObjectId, ObjectType};

const TAGGER: &str = "tagger A U Thor <author@example.com> 1700000000 +0000";

fn tag_text(target: &ObjectId, kind: &str, extra: &str) -> Vec<u8> {
    format!("object {target}\ntype {kind}\ntag v1.0\n{TAGGER}\n{extra}\nRelease notes\n")
        .into_bytes()
}

fn loose_store() -> (tempfile::TempDir, LooseObjectStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = LooseObjectStore::open(dir.path()).unwrap();
    (dir, store)
}

fn stored_count(store: &LooseObjectStore) -> usize {
    let objects = store.root().join("objects");
    fs::read_dir(objects)
        .unwrap()
        .map(|fanout| fs::read_dir(fanout.unwrap().path()).unwrap().count())
        .sum()
}

fn add(store: &dyn ObjectStore, kind: ObjectType, data: &[u8]) -> ObjectId {
    store.write(&StoredObject::new(kind, data.to_vec())).unwrap()
}

fn structural_codes(err: AdmitError) -> Vec<RuleCode> {
    match err {
        AdmitError::Structural(FsckError::Rejected { diagnostics }) => {
            diagnostics.into_iter().map(|d| d.code).collect()
        }
        other => panic!("expected structural rejection, got {other:?}"),
    }
}

#[test]
fn admission_is_deterministic_and_idempotent() {
    let (_dir, store) = loose_store();
    let target = add(&store, ObjectType::Commit, b"tree 0\n\ninitial\n");
    let input = tag_text(&target, "commit", "");
    let gate = TagAdmission::new(&store, SeverityPolicy::new(), true);

    let first = gate.admit(&input).unwrap();
    let after_first = stored_count(&store);
    let second = gate.admit(&input).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.id, TagWriter::id_for(&input));
    assert_eq!(stored_count(&store), after_first);
    assert_eq!(after_first, 2);
}

#[test]
fn stored_tag_reads_back_byte_for_byte() {
    let (_dir, store) = loose_store();
    let target = add(&store, ObjectType::Blob, b"payload");
    let input = tag_text(&target, "blob", "");

    let admitted = TagAdmission::new(&store, SeverityPolicy::new(), true)
        .admit(&input)
        .unwrap();
    let stored = store.read(&admitted.id).unwrap().unwrap();
    assert_eq!(stored.kind, ObjectType::Tag);
    assert_eq!(stored.data, input);
}

#[test]
fn missing_type_line_is_rejected_before_any_lookup() {
    let (_dir, store) = loose_store();
    let target = add(&store, ObjectType::Commit, b"commit");
    let input = format!("object {target}\ntag v1.0\n{TAGGER}\n\nmsg\n");

    let err = TagAdmission::new(&store, SeverityPolicy::new(), true)
        .admit(input.as_bytes())
        .unwrap_err();
    assert_eq!(structural_codes(err), vec![RuleCode::MissingTypeEntry]);
    assert_eq!(stored_count(&store), 1);
}

#[test]
fn extra_header_fails_strict_and_warns_otherwise() {
    let (_dir, store) = loose_store();
    let target = add(&store, ObjectType::Commit, b"commit");
    let input = tag_text(&target, "commit", "gpgsig abc\n");

    let err = TagAdmission::new(&store, SeverityPolicy::new(), true)
        .admit(&input)
        .unwrap_err();
    assert_eq!(structural_codes(err), vec![RuleCode::ExtraHeaderEntry]);
    assert_eq!(stored_count(&store), 1);

    let admitted = TagAdmission::new(&store, SeverityPolicy::new(), false)
        .admit(&input)
        .unwrap();
    assert_eq!(admitted.warnings.len(), 1);
    assert_eq!(admitted.warnings[0].code, RuleCode::ExtraHeaderEntry);
    assert_eq!(admitted.warnings[0].severity, Severity::Warn);
    assert_eq!(admitted.record.extra_header("gpgsig"), Some("abc"));
    assert_eq!(stored_count(&store), 2);
}

#[test]
fn ignored_rule_admits_silently_even_when_strict() {
    let (_dir, store) = loose_store();
    let target = add(&store, ObjectType::Commit, b"commit");
    let input = tag_text(&target, "commit", "gpgsig abc\n");
    let mut policy = SeverityPolicy::new();
    policy.set_override(RuleCode::ExtraHeaderEntry, Severity::Ignore);

    let admitted = TagAdmission::new(&store, policy, true).admit(&input).unwrap();
    assert!(admitted.warnings.is_empty());
}

#[test]
fn declared_type_must_match_stored_type() {
    let (_dir, store) = loose_store();
    let target = add(&store, ObjectType::Blob, b"not a commit");
    let input = tag_text(&target, "commit", "");

    let err = TagAdmission::new(&store, SeverityPolicy::new(), true)
        .admit(&input)
        .unwrap_err();
    assert!(matches!(
        err,
        AdmitError::Reference(ReferenceError::TypeMismatch {
            declared: ObjectType::Commit,
            actual: ObjectType::Blob,
            ..
        })
    ));
    assert_eq!(stored_count(&store), 1);
}

#[test]
fn missing_target_is_not_found() {
    let (_dir, store) = loose_store();
    let target = StoredObject::new(ObjectType::Commit, b"never stored".to_vec()).compute_id();
    let input = tag_text(&target, "commit", "");

    let err = TagAdmission::new(&store, SeverityPolicy::new(), true)
        .admit(&input)
        .unwrap_err();
    assert!(matches!(
        err,
        AdmitError::Reference(ReferenceError::NotFound { id }) if id == target
    ));
    assert_eq!(stored_count(&store), 0);
}

#[test]
fn corrupted_target_file_is_caught() {
    let (_dir, store) = loose_store();
    let target = add(&store, ObjectType::Blob, b"original bytes");
    let forged = StoredObject::new(ObjectType::Blob, b"forged bytes".to_vec());
    let path = store.object_path(&target);
    fs::write(&path, zstd::encode_all(forged.to_loose_bytes().as_slice(), 3).unwrap()).unwrap();

    let err = TagAdmission::new(&store, SeverityPolicy::new(), true)
        .admit(&tag_text(&target, "blob", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        AdmitError::Reference(ReferenceError::ContentCorruption { expected, .. }) if expected == target
    ));
    assert_eq!(stored_count(&store), 1);
}

#[test]
fn undecodable_target_file_is_caught() {
    let (_dir, store) = loose_store();
    let target = add(&store, ObjectType::Blob, b"original bytes");
    fs::write(store.object_path(&target), b"not zstd at all").unwrap();

    let err = TagAdmission::new(&store, SeverityPolicy::new(), true)
        .admit(&tag_text(&target, "blob", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        AdmitError::Reference(ReferenceError::Unreadable { .. })
    ));
}

#[test]
fn replacement_is_verified_but_record_keeps_original() {
    let (_dir, store) = loose_store();
    let original = add(&store, ObjectType::Commit, b"first draft");
    let replacement = add(&store, ObjectType::Commit, b"second draft");
    store.add_replacement(&original, &replacement).unwrap();

    let admitted = TagAdmission::new(&store, SeverityPolicy::new(), true)
        .admit(&tag_text(&original, "commit", ""))
        .unwrap();
    assert_eq!(admitted.record.target(), original);
}

#[test]
fn failed_admission_never_writes() {
    let store = InMemoryObjectStore::new();
    let target = add(&store, ObjectType::Tree, b"tree");
    let cases: Vec<Vec<u8>> = vec![
        Vec::new(),
        b"object nope\n\n".to_vec(),
        tag_text(&target, "blob", ""),
        tag_text(&target, "tree", "extra line\n"),
        format!("object {target}\ntype tree\ntag bad..name\n{TAGGER}\n\n").into_bytes(),
    ];
    let gate = TagAdmission::new(&store, SeverityPolicy::new(), true);
    for input in cases {
        assert!(gate.admit(&input).is_err(), "{:?}", String::from_utf8_lossy(&input));
        assert_eq!(store.len(), 1);
    }
}
