//! Append-only log records: student feedback and grade audit entries

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timestamp format written to the feedback and grade logs
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Current local time in log format
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// One feedback message from a student about a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// When the feedback was written, kept verbatim from the file
    pub timestamp: String,
    /// Student display name
    pub student_name: String,
    /// Student username
    pub student_username: String,
    /// Course the feedback is about
    pub course_name: String,
    /// Instructor display string of the course at submission time
    pub instructor_name: String,
    /// Feedback text
    pub message: String,
}

impl FeedbackRecord {
    /// Create a record stamped with the current time
    #[must_use]
    pub fn now(
        student_name: &str,
        student_username: &str,
        course_name: &str,
        instructor_name: &str,
        message: &str,
    ) -> Self {
        Self {
            timestamp: now_timestamp(),
            student_name: student_name.to_string(),
            student_username: student_username.to_string(),
            course_name: course_name.to_string(),
            instructor_name: instructor_name.to_string(),
            message: message.to_string(),
        }
    }
}

/// Audit entry for a grade that was recorded.
///
/// The live grade lives on the student; these entries are history only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeLogEntry {
    /// When the grade was recorded, kept verbatim from the file
    pub timestamp: String,
    /// Student display name
    pub student_name: String,
    /// Student username
    pub student_username: String,
    /// Course name
    pub course_name: String,
    /// Who recorded the grade (`N/A` when recorded by an admin)
    pub instructor_name: String,
    /// Numeric grade
    pub numeric_grade: f32,
    /// Letter grade
    pub letter_grade: String,
}

impl GradeLogEntry {
    /// Create an entry stamped with the current time
    #[must_use]
    pub fn now(
        student_name: &str,
        student_username: &str,
        course_name: &str,
        instructor_name: &str,
        numeric_grade: f32,
        letter_grade: &str,
    ) -> Self {
        Self {
            timestamp: now_timestamp(),
            student_name: student_name.to_string(),
            student_username: student_username.to_string(),
            course_name: course_name.to_string(),
            instructor_name: instructor_name.to_string(),
            numeric_grade,
            letter_grade: letter_grade.to_string(),
        }
    }
}

/// Latest log entry per `(student username, course name)`, by file order
#[must_use]
pub fn latest_grades(entries: &[GradeLogEntry]) -> BTreeMap<(&str, &str), &GradeLogEntry> {
    let mut latest = BTreeMap::new();
    for entry in entries {
        latest.insert(
            (entry.student_username.as_str(), entry.course_name.as_str()),
            entry,
        );
    }
    latest
}
