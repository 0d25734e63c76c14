//! Integration tests for the services: uniqueness, persistence and failure handling

use course_manager::core::models::{Admin, Course, Identity, Instructor, Role, Student, User};
use course_manager::core::services::{GradeOutcome, Registrar, UserService};
use course_manager::core::store::{DataFile, FileStore};
use course_manager::core::ServiceError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn open(dir: &Path) -> Registrar {
    let root = Admin::new("admin", "123", "Admin Name").unwrap();
    Registrar::open(FileStore::new(dir.join("data")), Some(root)).expect("Failed to open registrar")
}

fn seeded() -> (TempDir, Registrar) {
    let dir = TempDir::new().unwrap();
    let mut registrar = open(dir.path());
    registrar
        .courses_mut()
        .add_course(Course::new("Algebra", 100.0).unwrap())
        .unwrap();
    registrar
        .users_mut()
        .add_user(Instructor::new("jane", "pw", "Jane").unwrap().into())
        .unwrap();
    registrar
        .users_mut()
        .add_user(Student::new("alice", "pw", "Alice").unwrap().into())
        .unwrap();
    (dir, registrar)
}

/// Replace a data file with a directory so writing it fails, even as root
fn block(registrar: &Registrar, file: DataFile) {
    let path = registrar.store().path_for(file);
    if path.exists() {
        fs::remove_file(&path).unwrap();
    }
    fs::create_dir(&path).unwrap();
}

#[test]
fn test_duplicate_username_changes_nothing() {
    let (_dir, mut registrar) = seeded();
    let users_file = registrar.store().path_for(DataFile::Users);
    let before = fs::read_to_string(&users_file).unwrap();

    let duplicate: User = Student::new("alice", "other", "Another Alice").unwrap().into();
    let result = registrar.users_mut().add_user(duplicate);

    assert!(matches!(result, Err(ServiceError::DuplicateUsername(_))));
    assert_eq!(registrar.users().users().len(), 2);
    assert_eq!(fs::read_to_string(&users_file).unwrap(), before);
}

#[test]
fn test_changes_survive_reopen() {
    let (dir, mut registrar) = seeded();
    registrar.assign_course("jane", "Algebra").unwrap();
    registrar.enroll("alice", "Algebra").unwrap();
    drop(registrar);

    let reopened = open(dir.path());
    assert_eq!(
        reopened.courses().find("Algebra").unwrap().instructor_display(),
        "Jane"
    );
    assert_eq!(
        reopened.users().instructor("jane").unwrap().assigned_courses(),
        ["Algebra"]
    );
    assert_eq!(reopened.users().student("alice").unwrap().courses(), ["Algebra"]);
}

#[test]
fn test_root_admin_is_never_persisted() {
    let (_dir, registrar) = seeded();
    let text = fs::read_to_string(registrar.store().path_for(DataFile::Users)).unwrap();
    assert!(!text.contains("ADMIN|admin|"));
    assert!(registrar.users().login(Role::Admin, "admin", "123").is_some());
}

#[test]
fn test_failed_save_leaves_memory_unchanged() {
    let (_dir, mut registrar) = seeded();
    block(&registrar, DataFile::Users);

    let bob: User = Student::new("bob", "pw", "Bob").unwrap().into();
    assert!(matches!(
        registrar.users_mut().add_user(bob),
        Err(ServiceError::Store(_))
    ));
    assert!(registrar.users().find("bob").is_none());

    assert!(registrar.users_mut().delete_user("alice").is_err());
    assert!(registrar.users().find("alice").is_some());

    assert!(registrar.enroll("alice", "Algebra").is_err());
    assert!(registrar.users().student("alice").unwrap().courses().is_empty());
}

#[test]
fn test_failed_course_save_rolls_back_assignment() {
    let (_dir, mut registrar) = seeded();
    block(&registrar, DataFile::Courses);

    assert!(matches!(
        registrar.assign_course("jane", "Algebra"),
        Err(ServiceError::Store(_))
    ));
    assert!(registrar
        .users()
        .instructor("jane")
        .unwrap()
        .assigned_courses()
        .is_empty());
    assert_eq!(
        registrar.courses().find("Algebra").unwrap().instructor_display(),
        "None"
    );

    // The user file was restored as well
    let on_disk = UserService::load(registrar.store().clone()).unwrap();
    assert!(on_disk.instructor("jane").unwrap().assigned_courses().is_empty());
}

#[test]
fn test_grade_saved_even_when_log_fails() {
    let (_dir, mut registrar) = seeded();
    registrar.enroll("alice", "Algebra").unwrap();
    block(&registrar, DataFile::Grades);

    let outcome = registrar
        .record_grade("alice", "Algebra", 75.0, Some("C+"), None)
        .unwrap();
    assert!(matches!(outcome, GradeOutcome::LogFailed(_)));
    assert_eq!(
        registrar.users().student("alice").unwrap().letter_grades(),
        ["C+"]
    );
}

#[test]
fn test_update_and_login_after_rename() {
    let (_dir, mut registrar) = seeded();
    let update = course_manager::core::services::UserUpdate {
        username: Some("alice2".to_string()),
        ..Default::default()
    };
    registrar.users_mut().update_user("alice", update).unwrap();

    let user = registrar
        .users()
        .login(Role::Student, "alice2", "pw")
        .expect("renamed student should log in");
    assert_eq!(user.display_name(), "Alice");
    assert!(registrar.users().login(Role::Student, "alice", "pw").is_none());
}

#[test]
fn test_parallel_sequences_stay_aligned() {
    let (_dir, mut registrar) = seeded();
    registrar
        .courses_mut()
        .add_course(Course::new("Physics", 50.0).unwrap())
        .unwrap();

    registrar.enroll("alice", "Algebra").unwrap();
    registrar.enroll("alice", "Physics").unwrap();
    let _ = registrar.enroll("alice", "Physics");
    registrar
        .record_grade("alice", "Physics", 88.0, None, None)
        .unwrap();
    registrar
        .users_mut()
        .update_enrollment("alice", 0, "Algebra", 64.0, "D")
        .unwrap();
    let _ = registrar
        .users_mut()
        .update_enrollment("alice", 5, "Algebra", 64.0, "D");

    let alice = registrar.users().student("alice").unwrap();
    let n = alice.courses().len();
    assert_eq!(n, 2);
    assert_eq!(alice.numeric_grades().len(), n);
    assert_eq!(alice.letter_grades().len(), n);
    assert_eq!(alice.letter_grades(), ["D", "B"]);
}
