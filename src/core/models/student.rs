//! Student model and grading helpers

use super::fields::{entry_part, required_field};
use super::user::{Account, Identity};
use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Letter grade given to a fresh enrollment
pub const NO_GRADE: &str = "N/A";

/// One course a student is enrolled in, with its current grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    course: String,
    numeric_grade: f32,
    letter_grade: String,
}

impl Enrollment {
    /// Create an enrollment
    ///
    /// # Errors
    /// Returns an error if the course or letter grade is blank or holds `|`, `,`,
    /// `:` or a line break, or if the numeric grade lies outside `0..=100`.
    pub fn new(
        course: impl Into<String>,
        numeric_grade: f32,
        letter_grade: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            course: entry_part("course name", course.into())?,
            numeric_grade: checked_grade(numeric_grade)?,
            letter_grade: entry_part("letter grade", letter_grade.into())?,
        })
    }

    /// Course name
    #[must_use]
    pub fn course(&self) -> &str {
        &self.course
    }

    /// Numeric grade in `0..=100`
    #[must_use]
    pub const fn numeric_grade(&self) -> f32 {
        self.numeric_grade
    }

    /// Letter grade
    #[must_use]
    pub fn letter_grade(&self) -> &str {
        &self.letter_grade
    }
}

/// Read-only view of a student's grade in one course
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseGrade {
    /// Course name
    pub course_name: String,
    /// Numeric grade
    pub grade: f32,
    /// Instructor shown alongside the grade
    pub instructor: String,
}

/// Student account with ordered enrollments.
///
/// Each enrollment carries its course, numeric grade and letter grade together, so
/// the course, numeric and letter sequences always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    account: Account,
    name: String,
    enrollments: Vec<Enrollment>,
}

impl Student {
    /// Create a student with no enrollments
    ///
    /// # Errors
    /// Returns an error if the username, password or name is blank or holds `|`
    /// or a line break.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            account: Account::new(username, password)?,
            name: required_field("student name", name.into())?,
            enrollments: Vec::new(),
        })
    }

    /// Student name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Change the student name
    ///
    /// # Errors
    /// Returns an error if `name` is blank or holds `|` or a line break.
    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = required_field("student name", name.to_string())?;
        Ok(())
    }

    /// Enrollments in registration order
    #[must_use]
    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    /// Enrolled course names
    #[must_use]
    pub fn courses(&self) -> Vec<&str> {
        self.enrollments.iter().map(Enrollment::course).collect()
    }

    /// Numeric grades, index-aligned with [`courses`](Self::courses)
    #[must_use]
    pub fn numeric_grades(&self) -> Vec<f32> {
        self.enrollments.iter().map(Enrollment::numeric_grade).collect()
    }

    /// Letter grades, index-aligned with [`courses`](Self::courses)
    #[must_use]
    pub fn letter_grades(&self) -> Vec<&str> {
        self.enrollments.iter().map(Enrollment::letter_grade).collect()
    }

    /// Whether the student is enrolled in `course`
    #[must_use]
    pub fn is_enrolled(&self, course: &str) -> bool {
        self.position(course).is_some()
    }

    fn position(&self, course: &str) -> Option<usize> {
        self.enrollments.iter().position(|e| e.course == course)
    }

    /// Append an enrollment with the given grades. Duplicates are allowed here; the
    /// registration path uses [`enroll`](Self::enroll) instead.
    ///
    /// # Errors
    /// Same rules as [`Enrollment::new`].
    pub fn add_course(
        &mut self,
        course: &str,
        numeric_grade: f32,
        letter_grade: &str,
    ) -> Result<(), ValidationError> {
        self.enrollments
            .push(Enrollment::new(course, numeric_grade, letter_grade)?);
        Ok(())
    }

    /// Register for a course with grade `0.0` / `N/A`
    ///
    /// # Returns
    /// `false` if already enrolled
    ///
    /// # Errors
    /// Returns an error if `course` is blank.
    pub fn enroll(&mut self, course: &str) -> Result<bool, ValidationError> {
        if self.is_enrolled(course) {
            return Ok(false);
        }
        self.add_course(course, 0.0, NO_GRADE)?;
        Ok(true)
    }

    /// Replace the enrollment at `index`
    ///
    /// # Errors
    /// Returns an error if `index` is out of range or the new values are invalid.
    pub fn update_course(
        &mut self,
        index: usize,
        course: &str,
        numeric_grade: f32,
        letter_grade: &str,
    ) -> Result<(), ValidationError> {
        let len = self.enrollments.len();
        let slot = self
            .enrollments
            .get_mut(index)
            .ok_or(ValidationError::IndexOutOfRange { index, len })?;
        *slot = Enrollment::new(course, numeric_grade, letter_grade)?;
        Ok(())
    }

    /// Set the numeric grade of the first enrollment in `course`
    ///
    /// # Errors
    /// Returns an error if the grade is out of range or the student is not enrolled.
    pub fn set_numeric_grade(&mut self, course: &str, grade: f32) -> Result<(), ValidationError> {
        let grade = checked_grade(grade)?;
        let index = self.enrolled_index(course)?;
        self.enrollments[index].numeric_grade = grade;
        Ok(())
    }

    /// Set the letter grade of the first enrollment in `course`
    ///
    /// # Errors
    /// Returns an error if the grade is blank or holds a separator, or the
    /// student is not enrolled.
    pub fn set_letter_grade(&mut self, course: &str, grade: &str) -> Result<(), ValidationError> {
        let grade = entry_part("letter grade", grade.to_string())?;
        let index = self.enrolled_index(course)?;
        self.enrollments[index].letter_grade = grade;
        Ok(())
    }

    fn enrolled_index(&self, course: &str) -> Result<usize, ValidationError> {
        if course.trim().is_empty() {
            return Err(ValidationError::EmptyField("course name"));
        }
        self.position(course)
            .ok_or_else(|| ValidationError::NotEnrolled(course.to_string()))
    }

    /// Grade view per enrollment; the instructor column is always `N/A`
    #[must_use]
    pub fn course_grades(&self) -> Vec<CourseGrade> {
        self.enrollments
            .iter()
            .map(|e| CourseGrade {
                course_name: e.course.clone(),
                grade: e.numeric_grade,
                instructor: NO_GRADE.to_string(),
            })
            .collect()
    }
}

impl Identity for Student {
    fn account(&self) -> &Account {
        &self.account
    }

    fn account_mut(&mut self) -> &mut Account {
        &mut self.account
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

fn checked_grade(grade: f32) -> Result<f32, ValidationError> {
    if (0.0..=100.0).contains(&grade) {
        Ok(grade)
    } else {
        Err(ValidationError::GradeOutOfRange(grade))
    }
}

/// Whether `grade` is `A`-`D` with an optional `+` or `-`, or `F` (upper case)
#[must_use]
pub fn is_valid_letter_grade(grade: &str) -> bool {
    matches!(
        grade.as_bytes(),
        [b'F'] | [b'A'..=b'D'] | [b'A'..=b'D', b'+' | b'-']
    )
}

/// Trim and upper-case a letter grade, then validate it
///
/// # Errors
/// Returns [`ValidationError::InvalidLetterGrade`] for anything outside `A+`..`D-` and `F`.
pub fn normalize_letter_grade(grade: &str) -> Result<String, ValidationError> {
    let normalized = grade.trim().to_ascii_uppercase();
    if is_valid_letter_grade(&normalized) {
        Ok(normalized)
    } else {
        Err(ValidationError::InvalidLetterGrade(grade.to_string()))
    }
}

/// Letter grade suggested for a numeric score
#[must_use]
pub fn letter_for_score(score: f32) -> &'static str {
    if score >= 90.0 {
        "A"
    } else if score >= 80.0 {
        "B"
    } else if score >= 70.0 {
        "C"
    } else if score >= 60.0 {
        "D"
    } else if score > 0.0 {
        "F"
    } else {
        NO_GRADE
    }
}
