#![cfg(unix)]

mod common;

use common::{sample_frame, script_recognizer, TestDir};
use face_login::common::RecognizerConfig;
use face_login::core::{failure_message, LoginOutcome, LoginService, Recognizer};
use face_login::storage::{AccessLog, FaceDatabase};
use face_login::FaceLoginError;

fn service(dir: &TestDir, script: &str) -> LoginService {
    LoginService::new(
        FaceDatabase::open(dir.join("db"), 90).unwrap(),
        Recognizer::new(script_recognizer(dir, script)),
        AccessLog::new(dir.join("log.txt")),
        dir.join(".tmp.jpg"),
        90,
    )
}

#[test]
fn matching_frame_appends_log_line() {
    let dir = TestDir::new("login-match");
    let service = service(&dir, "echo \"$2,alice\"\n");
    service.database().register("alice", &sample_frame(120)).unwrap();

    let outcome = service.login(&sample_frame(121)).unwrap();

    assert_eq!(outcome, LoginOutcome::Welcome("alice".into()));
    assert_eq!(outcome.message(), "welcome, alice");

    let entries = service.access_log().entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "alice");

    let raw = std::fs::read_to_string(dir.join("log.txt")).unwrap();
    assert!(raw.starts_with("alice,"));
    assert!(raw.ends_with('\n'));
}

#[test]
fn recognizer_receives_database_dir_and_probe() {
    let dir = TestDir::new("login-args");
    // Fails unless the probe exists and the first argument is a directory.
    let service = service(&dir, "[ -d \"$1\" ] || exit 3\n[ -s \"$2\" ] || exit 4\necho \"$2,bob,0.31\"\n");

    let outcome = service.login(&sample_frame(10)).unwrap();

    assert_eq!(outcome, LoginOutcome::Welcome("bob".into()));
    let probe = image::open(dir.join(".tmp.jpg")).unwrap();
    assert_eq!((probe.width(), probe.height()), (64, 48));
}

#[test]
fn unknown_person_leaves_log_untouched() {
    let dir = TestDir::new("login-unknown");
    let service = service(&dir, "echo \"$2,unknown_person\"\n");

    let outcome = service.login(&sample_frame(200)).unwrap();

    assert_eq!(outcome, LoginOutcome::Unknown);
    assert_eq!(outcome.message(), "Unknown user, register user or try again");
    assert!(!dir.join("log.txt").exists());
}

#[test]
fn no_faces_found_is_unknown() {
    let dir = TestDir::new("login-noface");
    let service = service(&dir, "echo \"$2,no_persons_found\"\n");

    assert_eq!(service.login(&sample_frame(0)).unwrap(), LoginOutcome::Unknown);
    assert!(service.access_log().entries().unwrap().is_empty());
}

#[test]
fn failing_recognizer_reports_its_output() {
    let dir = TestDir::new("login-fail");
    let service = service(&dir, "echo 'model missing' >&2\nexit 1\n");

    let err = service.login(&sample_frame(50)).unwrap_err();

    match &err {
        FaceLoginError::Recognizer { output, .. } => assert!(output.contains("model missing")),
        other => panic!("expected recognizer error, got {:?}", other),
    }
    assert_eq!(failure_message(&err), "Face recognition failed.");
    assert!(!dir.join("log.txt").exists());
}

#[test]
fn missing_recognizer_program_is_an_io_error() {
    let dir = TestDir::new("login-missing-program");
    let service = LoginService::new(
        FaceDatabase::open(dir.join("db"), 90).unwrap(),
        Recognizer::new(RecognizerConfig {
            program: "no-such-binary".to_string(),
            ..RecognizerConfig::default()
        }),
        AccessLog::new(dir.join("log.txt")),
        dir.join(".tmp.jpg"),
        90,
    );

    let err = service.login(&sample_frame(50)).unwrap_err();

    assert!(matches!(err, FaceLoginError::Io(_)));
    assert!(failure_message(&err).starts_with("An error occurred: "));
    assert!(!dir.join("log.txt").exists());
}

#[test]
fn garbage_output_is_an_error() {
    let dir = TestDir::new("login-garbage");
    let service = service(&dir, "echo 'no separator'\n");

    let err = service.login(&sample_frame(50)).unwrap_err();
    assert!(matches!(err, FaceLoginError::RecognizerOutput(_)));
}

#[test]
fn repeated_logins_append() {
    let dir = TestDir::new("login-repeat");
    let service = service(&dir, "echo \"$2,carol\"\n");

    service.login(&sample_frame(1)).unwrap();
    service.login(&sample_frame(2)).unwrap();

    let names: Vec<_> = service.access_log().entries().unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["carol", "carol"]);
}
