use serde_yml::{Mapping, Value};
use setforge_compile::prototype::{merge_with_prototype, resolve_prototype};
use setforge_model::Severity;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn mapping(yaml: &str) -> Mapping {
    match serde_yml::from_str::<Value>(yaml).unwrap() {
        Value::Mapping(m) => m,
        other => panic!("fixture is not a mapping: {other:?}"),
    }
}

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn record_keys_override_prototype_keys() {
    let prototype = mapping("a: 2\nb: 3\n");
    let record = mapping("a: 1\n");

    let merged = merge_with_prototype(Some(&prototype), &record);

    assert_eq!(merged.get("a"), Some(&Value::from(1)));
    assert_eq!(merged.get("b"), Some(&Value::from(3)));
    assert_eq!(merged.len(), 2);
}

#[test]
fn merge_is_shallow_not_recursive() {
    let prototype = mapping("nested: {x: 1, y: 2}\n");
    let record = mapping("nested: {x: 9}\n");

    let merged = merge_with_prototype(Some(&prototype), &record);

    // The record's nested mapping replaces the prototype's entirely.
    let nested = match merged.get("nested") {
        Some(Value::Mapping(m)) => m,
        other => panic!("unexpected: {other:?}"),
    };
    assert_eq!(nested.get("x"), Some(&Value::from(9)));
    assert_eq!(nested.get("y"), None);
}

#[test]
fn no_prototype_returns_record_unchanged() {
    let record = mapping("a: 1\n");
    let merged = merge_with_prototype(None, &record);
    assert_eq!(merged, record);
}

#[test]
fn prototype_in_directory_is_found() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "_prototype.yaml", "item: Leftovers\n");

    let (diags, proto) = resolve_prototype(tmp.path(), tmp.path());

    assert!(diags.is_empty());
    let proto = proto.unwrap();
    assert_eq!(proto.get("item"), Some(&Value::from("Leftovers")));
}

#[test]
fn prototype_filename_is_case_insensitive_and_accepts_yml() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "_PROTOTYPE.YML", "item: Oran Berry\n");

    let (diags, proto) = resolve_prototype(tmp.path(), tmp.path());

    assert!(diags.is_empty());
    assert!(proto.is_some());
}

#[test]
fn nearest_prototype_wins() {
    let tmp = TempDir::new().unwrap();
    let sub = tmp.path().join("johto");
    let deeper = tmp.path().join("johto").join("gyms");
    fs::create_dir_all(&deeper).unwrap();
    write_file(tmp.path(), "_prototype.yaml", "item: Root Item\n");
    write_file(&sub, "_prototype.yaml", "item: Johto Item\n");

    let (_, at_root) = resolve_prototype(tmp.path(), tmp.path());
    let (_, at_sub) = resolve_prototype(tmp.path(), &sub);
    let (_, at_deeper) = resolve_prototype(tmp.path(), &deeper);

    assert_eq!(at_root.unwrap().get("item"), Some(&Value::from("Root Item")));
    assert_eq!(at_sub.unwrap().get("item"), Some(&Value::from("Johto Item")));
    // No template of its own: the nearest ancestor's applies.
    assert_eq!(
        at_deeper.unwrap().get("item"),
        Some(&Value::from("Johto Item"))
    );
}

#[test]
fn directory_without_any_prototype_yields_none() {
    let tmp = TempDir::new().unwrap();
    let sub = tmp.path().join("empty");
    fs::create_dir(&sub).unwrap();

    let (diags, proto) = resolve_prototype(tmp.path(), &sub);

    assert!(diags.is_empty());
    assert!(proto.is_none());
}

#[test]
fn corrupt_prototype_is_an_error_and_does_not_fall_back() {
    let tmp = TempDir::new().unwrap();
    let sub = tmp.path().join("kanto");
    fs::create_dir(&sub).unwrap();
    write_file(tmp.path(), "_prototype.yaml", "item: Good Item\n");
    write_file(&sub, "_prototype.yaml", "item: [unclosed\n");

    let (diags, proto) = resolve_prototype(tmp.path(), &sub);

    assert!(proto.is_none());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity, Severity::Error);
    assert_eq!(diags[0].path.as_deref(), Some(Path::new("kanto/_prototype.yaml")));
}

#[test]
fn non_mapping_prototype_is_an_error() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "_prototype.yaml", "- just\n- a list\n");

    let (diags, proto) = resolve_prototype(tmp.path(), tmp.path());

    assert!(proto.is_none());
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("not a mapping"));
}

#[test]
fn empty_prototype_is_no_template() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "_prototype.yaml", "");

    let (diags, proto) = resolve_prototype(tmp.path(), tmp.path());

    assert!(diags.is_empty());
    assert!(proto.is_none());
}
