//! End-to-end scenarios through the registrar and back from disk

use course_manager::core::models::records::latest_grades;
use course_manager::core::models::{Course, Instructor, Student};
use course_manager::core::services::{GradeOutcome, Registrar, UserService};
use course_manager::core::store::FileStore;
use tempfile::TempDir;

fn registrar(dir: &TempDir) -> Registrar {
    Registrar::open(FileStore::new(dir.path().join("data")), None).unwrap()
}

#[test]
fn assign_instructor_once() {
    let dir = TempDir::new().unwrap();
    let mut reg = registrar(&dir);
    let algebra = Course::new("Algebra", 100.0)
        .unwrap()
        .with_instructor("None")
        .with_room("101")
        .with_branch("Main")
        .with_dates("2025-01-01", "2025-06-01")
        .with_description("desc");
    reg.courses_mut().add_course(algebra).unwrap();
    reg.users_mut()
        .add_user(Instructor::new("jane", "pw", "Jane").unwrap().into())
        .unwrap();

    assert!(reg.assign_course("jane", "Algebra").unwrap());
    assert_eq!(reg.courses().find("Algebra").unwrap().instructor_display(), "Jane");

    assert!(!reg.assign_course("jane", "Algebra").unwrap());
    assert_eq!(reg.courses().find("Algebra").unwrap().instructor_display(), "Jane");

    let line = std::fs::read_to_string(reg.store().data_dir().join("courses.txt")).unwrap();
    assert!(line.contains("Algebra|Jane|101|Main|100.0|2025-01-01|2025-06-01|desc"));
}

#[test]
fn enroll_and_grade_alice() {
    let dir = TempDir::new().unwrap();
    let mut reg = registrar(&dir);
    reg.courses_mut()
        .add_course(Course::new("Algebra", 100.0).unwrap())
        .unwrap();
    reg.users_mut()
        .add_user(Student::new("alice", "pw", "Alice").unwrap().into())
        .unwrap();

    reg.enroll("alice", "Algebra").unwrap();
    let alice = reg.users().student("alice").unwrap();
    assert_eq!(alice.numeric_grades(), [0.0]);
    assert_eq!(alice.letter_grades(), ["N/A"]);

    let outcome = reg
        .record_grade("alice", "Algebra", 92.5, Some("A"), None)
        .unwrap();
    assert!(matches!(outcome, GradeOutcome::Recorded(_)));

    let grades = reg.users().student("alice").unwrap().course_grades();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].course_name, "Algebra");
    assert!((grades[0].grade - 92.5).abs() < f32::EPSILON);

    // Same answer after reloading from disk
    let reloaded = UserService::load(reg.store().clone()).unwrap();
    let grades = reloaded.student("alice").unwrap().course_grades();
    assert!((grades[0].grade - 92.5).abs() < f32::EPSILON);
}

#[test]
fn grade_log_keeps_history() {
    let dir = TempDir::new().unwrap();
    let mut reg = registrar(&dir);
    reg.courses_mut()
        .add_course(Course::new("Algebra", 100.0).unwrap())
        .unwrap();
    reg.users_mut()
        .add_user(Student::new("alice", "pw", "Alice").unwrap().into())
        .unwrap();
    reg.enroll("alice", "Algebra").unwrap();

    reg.record_grade("alice", "Algebra", 55.0, None, None).unwrap();
    reg.record_grade("alice", "Algebra", 91.0, None, None).unwrap();

    let log = reg.load_grades().unwrap().records;
    assert_eq!(log.len(), 2);
    let latest = latest_grades(&log);
    assert_eq!(latest[&("alice", "Algebra")].letter_grade, "A");
    assert_eq!(reg.users().student("alice").unwrap().letter_grades(), ["A"]);
}

#[test]
fn feedback_names_course_instructors() {
    let dir = TempDir::new().unwrap();
    let mut reg = registrar(&dir);
    reg.courses_mut()
        .add_course(Course::new("Algebra", 100.0).unwrap())
        .unwrap();
    reg.users_mut()
        .add_user(Instructor::new("jane", "pw", "Jane").unwrap().into())
        .unwrap();
    reg.users_mut()
        .add_user(Instructor::new("omar", "pw", "Omar").unwrap().into())
        .unwrap();
    reg.users_mut()
        .add_user(Student::new("alice", "pw", "Alice").unwrap().into())
        .unwrap();
    reg.assign_course("jane", "Algebra").unwrap();
    reg.assign_course("omar", "Algebra").unwrap();
    reg.enroll("alice", "Algebra").unwrap();

    reg.submit_feedback("alice", "Algebra", "Loved it").unwrap();

    let feedback = reg.load_feedback().unwrap().records;
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].instructor_name, "Jane, Omar");
    assert_eq!(reg.course_roster("Algebra").unwrap()[0].name(), "Alice");
}
