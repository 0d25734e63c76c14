//! Data models for courses, users and log records

pub mod course;
pub(crate) mod fields;
pub mod records;
pub mod student;
pub mod user;

pub use course::Course;
pub use records::{FeedbackRecord, GradeLogEntry};
pub use student::{CourseGrade, Enrollment, Student};
pub use user::{Account, Admin, Identity, Instructor, Role, User};
