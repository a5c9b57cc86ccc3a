use std::fs;

use roster_engine::{ensure_store_dir, AtomicFileWriter, LocalSource, PersistError, STORE_FILENAME};
use tempfile::TempDir;

#[test]
fn creates_missing_store_dir() {
    let temp = TempDir::new().unwrap();
    let store = temp.path().join("store");
    assert!(!store.exists());
    ensure_store_dir(&store).unwrap();
    assert!(store.is_dir());
}

#[test]
fn rewrite_replaces_previous_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write(STORE_FILENAME, "(users: [])").unwrap();
    assert_eq!(first.file_name().unwrap(), STORE_FILENAME);
    assert_eq!(fs::read_to_string(&first).unwrap(), "(users: [])");

    let second = writer.write(STORE_FILENAME, b"(users: [1])").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "(users: [1])");
}

#[test]
fn remove_tolerates_missing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    let path = writer.write("1.jpg", b"\xFF\xD8").unwrap();

    writer.remove("1.jpg").unwrap();
    assert!(!path.exists());
    writer.remove("1.jpg").unwrap();
}

#[test]
fn file_in_place_of_dir_is_refused() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write(STORE_FILENAME, "data");
    assert!(matches!(result, Err(PersistError::StoreDir(_))));
    assert!(!file_path.with_file_name(STORE_FILENAME).exists());
}

#[test]
fn corrupt_store_is_reported_not_replaced() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(STORE_FILENAME);
    fs::write(&path, "this is not ron {").unwrap();

    let err = LocalSource::open(temp.path()).err().expect("corrupt store");
    assert!(matches!(err, PersistError::Corrupt { .. }), "{err:?}");
    assert_eq!(fs::read_to_string(&path).unwrap(), "this is not ron {");
}
