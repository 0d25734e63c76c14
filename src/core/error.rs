//! Error types for entities, the record codec, the file store and services.
//!
//! Validation problems are raised at the point of violation. I/O and format
//! problems never escape as panics: the store reports them as values.

use std::path::PathBuf;
use thiserror::Error;

/// A field or value that breaks an entity invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required text field is empty or whitespace
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// Numeric grade outside `0..=100`
    #[error("numeric grade must be between 0 and 100, got {0}")]
    GradeOutOfRange(f32),

    /// Course price below zero
    #[error("price cannot be negative, got {0}")]
    NegativePrice(f64),

    /// Letter grade not in `A`..`D` (with optional `+`/`-`) or `F`
    #[error("invalid letter grade '{0}' (expected A+..D-, or F)")]
    InvalidLetterGrade(String),

    /// Date not in `yyyy-MM-dd` form
    #[error("{field} '{value}' is not a yyyy-MM-dd date")]
    InvalidDate {
        /// Which date field
        field: &'static str,
        /// Offending value
        value: String,
    },

    /// Enrollment index past the end of a student's enrollments
    #[error("enrollment index {index} out of range (student has {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of enrollments
        len: usize,
    },

    /// Student is not enrolled in the named course
    #[error("course '{0}' not found in enrollments")]
    NotEnrolled(String),

    /// Text holds a character the data files use as a separator or line end
    #[error("{field} cannot contain {found:?}")]
    ForbiddenCharacter {
        /// Which field
        field: &'static str,
        /// First offending character
        found: char,
    },

    /// Name equal to the `None` placeholder that marks an empty list
    #[error("{field} '{value}' is reserved for an empty list")]
    ReservedName {
        /// Which field
        field: &'static str,
        /// Offending value
        value: String,
    },
}

/// A data line that could not be decoded into an entity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Fewer `|`-separated fields than the record needs
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields {
        /// Minimum field count
        expected: usize,
        /// Fields present
        found: usize,
    },

    /// User record type is not ADMIN, INSTRUCTOR or STUDENT
    #[error("unknown user type '{0}'")]
    UnknownUserType(String),

    /// Decoded values violate an entity invariant
    #[error("invalid record: {0}")]
    Invalid(#[from] ValidationError),
}

/// File store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing, creating or renaming a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// No candidate text encoding could decode the file
    #[error("no supported encoding could decode {}", path.display())]
    Encoding {
        /// File that could not be decoded
        path: PathBuf,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Service-level failure returned to clients.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Entity invariant violated
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Username already taken
    #[error("username '{0}' already exists")]
    DuplicateUsername(String),

    /// No user with that username
    #[error("user '{0}' not found")]
    UserNotFound(String),

    /// No course with that name
    #[error("course '{0}' not found")]
    CourseNotFound(String),

    /// User exists but is not an instructor
    #[error("user '{0}' is not an instructor")]
    NotAnInstructor(String),

    /// User exists but is not a student
    #[error("user '{0}' is not a student")]
    NotAStudent(String),

    /// Student already enrolled in the course
    #[error("'{username}' is already enrolled in '{course}'")]
    AlreadyEnrolled {
        /// Student username
        username: String,
        /// Course name
        course: String,
    },

    /// Persisting the change failed; in-memory state was left unchanged
    #[error("could not persist change: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for service operations
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
