mod common;

use common::{sample_frame, TestDir};
use face_login::storage::FaceDatabase;
use face_login::FaceLoginError;

#[test]
fn register_writes_exactly_one_image() {
    let dir = TestDir::new("register-one");
    let db = FaceDatabase::open(dir.join("db"), 90).unwrap();

    let path = db.register("  Grace Hopper ", &sample_frame(80)).unwrap();

    assert_eq!(path, dir.join("db").join("Grace Hopper.jpg"));
    let files: Vec<_> = std::fs::read_dir(dir.join("db")).unwrap().collect();
    assert_eq!(files.len(), 1);

    let stored = image::open(&path).unwrap();
    assert_eq!((stored.width(), stored.height()), (64, 48));
    assert_eq!(db.identities().unwrap(), vec!["Grace Hopper".to_string()]);
}

#[test]
fn unsafe_names_stay_inside_the_database() {
    let dir = TestDir::new("register-sanitize");
    let db = FaceDatabase::open(dir.join("db"), 90).unwrap();

    let path = db.register("../escape", &sample_frame(1)).unwrap();

    assert_eq!(path, dir.join("db").join(".._escape.jpg"));
    assert!(!dir.join("escape.jpg").exists());
    assert_eq!(db.identities().unwrap(), vec![".._escape".to_string()]);
}

#[test]
fn reregistering_replaces_the_image() {
    let dir = TestDir::new("register-replace");
    let db = FaceDatabase::open(dir.join("db"), 90).unwrap();

    db.register("linus", &sample_frame(10)).unwrap();
    db.register("linus", &sample_frame(240)).unwrap();

    assert_eq!(db.identities().unwrap(), vec!["linus".to_string()]);
}

#[test]
fn empty_name_is_rejected_without_writing() {
    let dir = TestDir::new("register-empty");
    let db = FaceDatabase::open(dir.join("db"), 90).unwrap();

    let result = db.register("   ", &sample_frame(10));

    assert!(matches!(result, Err(FaceLoginError::InvalidName(_))));
    assert!(db.identities().unwrap().is_empty());
}

#[test]
fn identities_are_sorted_and_ignore_other_files() {
    let dir = TestDir::new("register-list");
    let db = FaceDatabase::open(dir.join("db"), 90).unwrap();

    db.register("zoe", &sample_frame(1)).unwrap();
    db.register("adam", &sample_frame(2)).unwrap();
    std::fs::write(dir.join("db").join("notes.txt"), "not a face").unwrap();

    assert_eq!(db.identities().unwrap(), vec!["adam".to_string(), "zoe".to_string()]);
}
