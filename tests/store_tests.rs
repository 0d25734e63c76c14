//! Integration tests for the file store: round trips, resets and salvage

use course_manager::core::codec;
use course_manager::core::models::{Admin, Course, FeedbackRecord, Instructor, Student, User};
use course_manager::core::store::{DataFile, FileStore, TextEncoding};
use course_manager::core::StoreError;
use std::fs;
use tempfile::TempDir;

fn store() -> (TempDir, FileStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path().join("data"));
    store
        .ensure_data_directory_exists()
        .expect("Failed to create data dir");
    (dir, store)
}

fn sample_courses() -> Vec<Course> {
    vec![
        Course::new("Algebra", 100.0)
            .unwrap()
            .with_instructor("Jane")
            .with_instructor("Omar")
            .with_room("101")
            .with_branch("Main")
            .with_dates("2025-01-01", "2025-06-01")
            .with_description("Linear equations"),
        Course::new("Physics", 249.99)
            .unwrap()
            .with_room("Lab 2")
            .with_branch("North")
            .with_dates("2025-02-01", "2025-07-01"),
    ]
}

fn sample_users() -> Vec<User> {
    let mut jane = Instructor::new("jane", "pw1", "Jane Doe").unwrap();
    jane.assign_course("Algebra");
    let mut alice = Student::new("alice", "pw2", "Alice").unwrap();
    alice.add_course("Algebra", 92.5, "A").unwrap();
    alice.add_course("Physics", 0.0, "N/A").unwrap();
    vec![
        Admin::new("clerk", "pw0", "Front Desk").unwrap().into(),
        jane.into(),
        alice.into(),
    ]
}

#[test]
fn test_courses_round_trip() {
    let (_dir, store) = store();
    let courses = sample_courses();

    store.save_courses(&courses).unwrap();
    let loaded = store.load_courses().unwrap();

    assert_eq!(loaded.records, courses);
    assert_eq!(loaded.report.loaded, 2);
    assert!(loaded.report.is_clean());
}

#[test]
fn test_users_round_trip() {
    let (_dir, store) = store();
    let users = sample_users();

    store.save_users(&users).unwrap();
    assert_eq!(store.load_users().unwrap().records, users);
}

#[test]
fn test_save_rewrites_whole_file() {
    let (_dir, store) = store();
    store.save_courses(&sample_courses()).unwrap();
    store.save_courses(&sample_courses()[..1]).unwrap();

    let text = fs::read_to_string(store.path_for(DataFile::Courses)).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert_eq!(store.load_courses().unwrap().records.len(), 1);
}

#[test]
fn test_empty_users_save_and_reload() {
    let (_dir, store) = store();
    store.save_users(&[]).unwrap();

    let loaded = store.load_users().unwrap();
    assert!(loaded.records.is_empty());
    assert!(loaded.report.is_clean());
}

#[test]
fn test_hand_written_file_with_bad_lines() {
    let (_dir, store) = store();
    fs::write(
        store.path_for(DataFile::Courses),
        "# Courses Data - name|instructorName|room|branch|price|startDate|endDate|description\n\
         Algebra|Jane|101|Main|100|2025-01-01|2025-06-01|desc\n\
         Broken|line\n\
         Chemistry|None|5|Main|free|2025-01-01|2025-06-01\n",
    )
    .unwrap();

    let loaded = store.load_courses().unwrap();
    assert_eq!(loaded.records.len(), 2);
    assert_eq!(loaded.report.skipped.len(), 1);
    assert_eq!(loaded.report.skipped[0].line_number, 3);

    let chemistry = &loaded.records[1];
    assert!(chemistry.price().abs() < f64::EPSILON);
    assert_eq!(chemistry.description, "");
}

#[test]
fn test_reset_feedback_yields_header_only() {
    let (_dir, store) = store();
    store
        .save_feedback(&FeedbackRecord::now("Alice", "alice", "Algebra", "Jane", "Nice"))
        .unwrap();

    store.reset_feedback_file().unwrap();
    assert!(store.load_feedback().unwrap().records.is_empty());

    store.reset_feedback_file().unwrap();
    let text = fs::read_to_string(store.path_for(DataFile::Feedback)).unwrap();
    assert_eq!(text.trim_end(), codec::FEEDBACK_HEADER);
}

#[test]
fn test_convert_feedback_keeps_only_well_formed_lines() {
    let (_dir, store) = store();
    let good = [
        "2025-03-01T10:00:00.000|Alice|alice|Algebra|Jane|Clear lectures",
        "2025-03-02T11:00:00.000|Bob|bob|Algebra|Jane|Too fast | please slow down",
        "2025-03-03T12:00:00.000|Chloé|chloe|Physics|None|Bien",
    ];
    let bad = ["garbage", "a|b|c|d|e"];
    let mut content = String::from("# Feedback Data\n");
    for line in good.iter().chain(bad.iter()) {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(store.path_for(DataFile::Feedback), content).unwrap();

    let report = store.convert_feedback_file_to_utf8().unwrap();
    assert_eq!(report.encoding, TextEncoding::Utf8);
    assert_eq!(report.kept, good.len());
    assert_eq!(report.discarded, bad.len());

    let loaded = store.load_feedback().unwrap();
    assert_eq!(loaded.records.len(), good.len());
    assert_eq!(loaded.records[1].message, "Too fast | please slow down");
}

#[test]
fn test_convert_feedback_from_windows_1252() {
    let (_dir, store) = store();
    // 0x93 / 0x94 are curly quotes in Windows-1252, invalid UTF-8 on their own
    fs::write(
        store.path_for(DataFile::Feedback),
        b"t|Alice|alice|Algebra|Jane|\x93great\x94\n",
    )
    .unwrap();

    let report = store.convert_feedback_file_to_utf8().unwrap();
    // Latin-1 accepts every byte, so it wins over Windows-1252
    assert_eq!(report.encoding, TextEncoding::Iso8859_1);
    assert_eq!(report.kept, 1);

    let text = fs::read_to_string(store.path_for(DataFile::Feedback)).unwrap();
    assert!(text.starts_with(codec::FEEDBACK_HEADER));
}

#[cfg(unix)]
#[test]
fn test_failed_conversion_leaves_original_untouched() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, store) = store();
    let original = "# old\nt|Alice|alice|Algebra|Jane|kept\nbad line\n";
    let path = store.path_for(DataFile::Feedback);
    fs::write(&path, original).unwrap();

    // A read-only directory refuses the temporary file
    let data_dir = store.data_dir().to_path_buf();
    fs::set_permissions(&data_dir, fs::Permissions::from_mode(0o555)).unwrap();
    let probe = data_dir.join("probe");
    let writable = fs::write(&probe, "x").is_ok();
    let result = store.convert_feedback_file_to_utf8();
    fs::set_permissions(&data_dir, fs::Permissions::from_mode(0o755)).unwrap();

    if writable {
        // Running as root: permissions are not enforced, nothing to check
        return;
    }
    assert!(matches!(result, Err(StoreError::Io { .. })));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}
