//! Course model

use super::fields::{entry_part, free_text, is_placeholder, list_item, single_field};
use crate::core::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder written for an empty name list (no instructor, no assigned course)
pub const NONE_PLACEHOLDER: &str = "None";

/// Date format used for course start and end dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Represents a course offered by the institution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course name, the lookup key (not guaranteed unique)
    pub name: String,

    /// Instructor display names, in assignment order, no duplicates
    instructors: Vec<String>,

    /// Room (e.g., "101")
    pub room: String,

    /// Branch or campus (e.g., "Main")
    pub branch: String,

    /// Price, never negative
    price: f64,

    /// Start date, `yyyy-MM-dd` by convention; only checked at input boundaries
    pub start_date: String,

    /// End date, `yyyy-MM-dd` by convention
    pub end_date: String,

    /// Free-text description (may be empty)
    pub description: String,
}

impl Course {
    /// Create a new course with no instructor and empty room, branch, dates and description
    ///
    /// # Errors
    /// Returns an error if `name` is blank or holds `|`, `,`, `:` or a line
    /// break, or if `price` is negative or not a number.
    pub fn new(name: impl Into<String>, price: f64) -> Result<Self, ValidationError> {
        let name = entry_part("course name", name.into())?;
        Ok(Self {
            name,
            instructors: Vec::new(),
            room: String::new(),
            branch: String::new(),
            price: checked_price(price)?,
            start_date: String::new(),
            end_date: String::new(),
            description: String::new(),
        })
    }

    /// Add an instructor and return the course
    #[must_use]
    pub fn with_instructor(mut self, name: &str) -> Self {
        self.add_instructor(name);
        self
    }

    /// Set the room and return the course
    #[must_use]
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    /// Set the branch and return the course
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Set start and end dates and return the course
    #[must_use]
    pub fn with_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = start.into();
        self.end_date = end.into();
        self
    }

    /// Set the description and return the course
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Price of the course
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// Change the price
    ///
    /// # Errors
    /// Returns an error if `price` is negative or not a number.
    pub fn set_price(&mut self, price: f64) -> Result<(), ValidationError> {
        self.price = checked_price(price)?;
        Ok(())
    }

    /// Instructor names assigned to this course
    #[must_use]
    pub fn instructors(&self) -> &[String] {
        &self.instructors
    }

    /// Instructors as shown to users and stored on disk: `"A, B"`, or `"None"`
    #[must_use]
    pub fn instructor_display(&self) -> String {
        if self.instructors.is_empty() {
            NONE_PLACEHOLDER.to_string()
        } else {
            self.instructors.join(", ")
        }
    }

    /// Add an instructor by name
    ///
    /// Blank names and the `"None"` placeholder (any casing) are ignored.
    ///
    /// # Returns
    /// `true` if the instructor was added, `false` if ignored or already assigned
    pub fn add_instructor(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || is_placeholder(name) {
            return false;
        }
        if self.instructors.iter().any(|existing| existing == name) {
            return false;
        }
        self.instructors.push(name.to_string());
        true
    }

    /// Replace the whole instructor list, dropping blanks, placeholders and duplicates
    pub fn set_instructors<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.instructors.clear();
        for name in names {
            self.add_instructor(name.as_ref());
        }
    }

    /// Check every text field against the data file rules
    ///
    /// The builder methods and public fields are not checked on their own;
    /// the course manager calls this before anything is saved.
    ///
    /// # Errors
    /// Returns an error if the name is blank or holds a separator, an instructor
    /// name holds `,`, `|` or a line break, room, branch or a date holds `|` or a
    /// line break, or the description holds a line break.
    pub fn validate(&self) -> Result<(), ValidationError> {
        entry_part("course name", self.name.clone())?;
        for instructor in &self.instructors {
            list_item("instructor name", instructor)?;
        }
        single_field("room", &self.room)?;
        single_field("branch", &self.branch)?;
        single_field("start date", &self.start_date)?;
        single_field("end date", &self.end_date)?;
        free_text("description", &self.description)
    }

    /// Parse the start date
    ///
    /// # Errors
    /// Returns an error if the start date is not `yyyy-MM-dd`.
    pub fn start(&self) -> Result<NaiveDate, ValidationError> {
        parse_date("start date", &self.start_date)
    }

    /// Parse the end date
    ///
    /// # Errors
    /// Returns an error if the end date is not `yyyy-MM-dd`.
    pub fn end(&self) -> Result<NaiveDate, ValidationError> {
        parse_date("end date", &self.end_date)
    }
}

/// Parse a `yyyy-MM-dd` date, naming `field` in the error
///
/// # Errors
/// Returns [`ValidationError::InvalidDate`] when `value` is not a valid date.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn checked_price(price: f64) -> Result<f64, ValidationError> {
    if price.is_nan() || price < 0.0 {
        Err(ValidationError::NegativePrice(price))
    } else {
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn algebra() -> Course {
        Course::new("Algebra", 100.0)
            .unwrap()
            .with_instructor("None")
            .with_room("101")
            .with_branch("Main")
            .with_dates("2025-01-01", "2025-06-01")
            .with_description("desc")
    }

    #[test]
    fn test_course_creation() {
        let course = algebra();

        assert_eq!(course.name, "Algebra");
        assert_eq!(course.room, "101");
        assert_eq!(course.branch, "Main");
        assert!((course.price() - 100.0).abs() < f64::EPSILON);
        assert!(course.instructors().is_empty());
        assert_eq!(course.instructor_display(), "None");
    }

    #[test]
    fn test_blank_name_rejected() {
        assert_eq!(
            Course::new("   ", 10.0),
            Err(ValidationError::EmptyField("course name"))
        );
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(Course::new("Algebra", -1.0).is_err());
        assert!(Course::new("Algebra", f64::NAN).is_err());

        let mut course = algebra();
        assert!(course.set_price(-5.0).is_err());
        assert!((course.price() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_instructor_replaces_placeholder_and_skips_duplicates() {
        let mut course = algebra();

        assert!(course.add_instructor("Jane"));
        assert_eq!(course.instructor_display(), "Jane");

        assert!(!course.add_instructor("Jane"));
        assert!(!course.add_instructor("  Jane "));
        assert_eq!(course.instructor_display(), "Jane");

        assert!(course.add_instructor("Omar"));
        assert_eq!(course.instructor_display(), "Jane, Omar");
    }

    #[test]
    fn test_set_instructors_dedupes() {
        let mut course = algebra();
        course.set_instructors(["Jane", "", "None", "Jane", "Omar"]);
        assert_eq!(course.instructors(), ["Jane", "Omar"]);
    }

    #[test]
    fn test_placeholder_instructor_ignored_in_any_casing() {
        let mut course = algebra();
        assert!(!course.add_instructor("none"));
        assert!(!course.add_instructor("NONE"));
        assert!(course.instructors().is_empty());
    }

    #[test]
    fn test_separators_rejected() {
        assert!(matches!(
            Course::new("Intro|Lab", 1.0),
            Err(ValidationError::ForbiddenCharacter { field: "course name", found: '|' })
        ));
        assert!(Course::new("Intro, Lab", 1.0).is_err());
        assert!(Course::new("Intro: Lab", 1.0).is_err());
        assert!(Course::new("Intro\nLab", 1.0).is_err());

        assert!(algebra().validate().is_ok());
        assert!(algebra().with_description("x | y").validate().is_ok());
        assert!(algebra().with_room("1|2").validate().is_err());
        assert!(algebra().with_branch("Main\r").validate().is_err());
        assert!(algebra().with_dates("2025-01-01|x", "").validate().is_err());
        assert!(algebra().with_description("two\nlines").validate().is_err());
        assert!(algebra().with_instructor("Jane, Omar").validate().is_err());

        let mut renamed = algebra();
        renamed.name = "Algebra\nPhysics".to_string();
        assert!(renamed.validate().is_err());
    }

    #[test]
    fn test_dates_parse() {
        let course = algebra();
        assert_eq!(
            course.start().unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );

        let bad = algebra().with_dates("01/01/2025", "2025-13-01");
        assert!(matches!(
            bad.start(),
            Err(ValidationError::InvalidDate { field: "start date", .. })
        ));
        assert!(bad.end().is_err());
    }
}
