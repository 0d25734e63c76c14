//! Record codec: one entity per `|`-delimited line
//!
//! Pure functions only. Lists inside a field are joined with `", "` and split on
//! `,`; a student's enrollments use `course:grade:letter` entries. Delimiters are
//! never escaped: the entity constructors refuse values that contain them, so
//! every valid entity round-trips.

use crate::core::error::FormatError;
use crate::core::models::course::NONE_PLACEHOLDER;
use crate::core::models::fields::is_placeholder;
use crate::core::models::{
    Admin, Course, FeedbackRecord, GradeLogEntry, Identity, Instructor, Role, Student, User,
};

/// Field delimiter
pub const DELIMITER: char = '|';
/// Separator between list items inside one field
pub const LIST_SEPARATOR: char = ',';
/// Separator inside one `course:grade:letter` enrollment entry
pub const ENTRY_SEPARATOR: char = ':';

/// Header line of `courses.txt`
pub const COURSES_HEADER: &str =
    "# Courses Data - name|instructorName|room|branch|price|startDate|endDate|description";
/// Header line of `users.txt`
pub const USERS_HEADER: &str = "# Users Data - type|username|password|name|additionalData";
/// Header line of `feedbacks.txt`
pub const FEEDBACK_HEADER: &str =
    "# Feedback Data - timestamp|studentName|studentUsername|courseName|instructorName|feedbackMessage";
/// Header line of `grades.txt`
pub const GRADES_HEADER: &str =
    "# Grades Data - timestamp|studentName|studentUsername|courseName|instructorName|numericGrade|letterGrade";

const COURSE_FIELDS: usize = 8;
const COURSE_REQUIRED: usize = 7;
const USER_FIELDS: usize = 5;
const USER_REQUIRED: usize = 4;
const FEEDBACK_FIELDS: usize = 6;
const GRADE_FIELDS: usize = 7;

/// Fewest `|` a feedback line needs to survive salvage
pub const FEEDBACK_MIN_DELIMITERS: usize = FEEDBACK_FIELDS - 1;
/// Fewest `|` a grade log line needs to survive salvage
pub const GRADE_MIN_DELIMITERS: usize = GRADE_FIELDS - 1;

/// Whether a line carries data (not blank, not a `#` comment)
#[must_use]
pub fn is_data_line(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with('#')
}

/// Number of `|` delimiters in a line
#[must_use]
pub fn delimiter_count(line: &str) -> usize {
    line.matches(DELIMITER).count()
}

/// Format a number the way the data files have always stored it: integral values
/// keep a trailing `.0` (`100.0`, `0.0`), others use the shortest exact form.
#[must_use]
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn format_grade(value: f32) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Split a comma-joined name list, trimming items and dropping blanks and `None`
#[must_use]
pub fn split_list(field: &str) -> Vec<String> {
    field
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty() && !is_placeholder(item))
        .map(str::to_string)
        .collect()
}

/// Join a name list with `", "`; an empty list is written as `None`
#[must_use]
pub fn join_list(items: &[String]) -> String {
    if items.is_empty() {
        NONE_PLACEHOLDER.to_string()
    } else {
        items.join(", ")
    }
}

/// Split a data line into at most `limit` fields; the last field keeps any extra `|`
fn fields(line: &str, limit: usize, required: usize) -> Result<Vec<&str>, FormatError> {
    let parts: Vec<&str> = line.splitn(limit, DELIMITER).collect();
    if parts.len() < required {
        return Err(FormatError::MissingFields {
            expected: required,
            found: parts.len(),
        });
    }
    Ok(parts)
}

/// Encode a course as `name|instructors|room|branch|price|start|end|description`
#[must_use]
pub fn encode_course(course: &Course) -> String {
    [
        course.name.clone(),
        course.instructor_display(),
        course.room.clone(),
        course.branch.clone(),
        format_decimal(course.price()),
        course.start_date.clone(),
        course.end_date.clone(),
        course.description.clone(),
    ]
    .join("|")
}

/// Decode a course line
///
/// An unparsable price becomes `0.0` and a missing description becomes empty.
///
/// # Errors
/// Returns an error for fewer than seven fields, a blank name or a negative price.
pub fn decode_course(line: &str) -> Result<Course, FormatError> {
    let parts = fields(line, COURSE_FIELDS, COURSE_REQUIRED)?;
    let price = parts[4].trim().parse::<f64>().unwrap_or(0.0);

    let mut course = Course::new(parts[0], price)?
        .with_room(parts[2])
        .with_branch(parts[3])
        .with_dates(parts[5], parts[6])
        .with_description(parts.get(7).copied().unwrap_or_default());
    course.set_instructors(split_list(parts[1]));
    Ok(course)
}

fn encode_enrollments(student: &Student) -> String {
    student
        .enrollments()
        .iter()
        .map(|e| {
            format!(
                "{}{ENTRY_SEPARATOR}{}{ENTRY_SEPARATOR}{}",
                e.course(),
                format_grade(e.numeric_grade()),
                e.letter_grade()
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Encode a user as `TYPE|username|password|name|additionalData`
///
/// Admins leave `additionalData` empty; instructors store their assigned courses;
/// students store `course:grade:letter` entries separated by `,`.
#[must_use]
pub fn encode_user(user: &User) -> String {
    let extra = match user {
        User::Admin(_) => String::new(),
        User::Instructor(instructor) => join_list(instructor.assigned_courses()),
        User::Student(student) => encode_enrollments(student),
    };
    format!(
        "{}|{}|{}|{}|{}",
        user.role().tag(),
        user.username(),
        user.account().password(),
        user.display_name(),
        extra
    )
}

/// Decode a user line
///
/// Student entries with fewer than three `:` parts are dropped; an unparsable
/// numeric grade becomes `0.0`.
///
/// # Errors
/// Returns an error for fewer than four fields, an unknown type tag, blank
/// credentials, a blank student name or an out-of-range grade.
pub fn decode_user(line: &str) -> Result<User, FormatError> {
    let parts = fields(line, USER_FIELDS, USER_REQUIRED)?;
    let (tag, username, password, name) = (parts[0], parts[1], parts[2], parts[3]);
    let extra = parts.get(4).copied().unwrap_or_default();

    let role = Role::from_tag(tag).ok_or_else(|| FormatError::UnknownUserType(tag.to_string()))?;
    let user: User = match role {
        Role::Admin => Admin::new(username, password, name)?.into(),
        Role::Instructor => {
            let mut instructor = Instructor::new(username, password, name)?;
            instructor.set_assigned_courses(split_list(extra));
            instructor.into()
        }
        Role::Student => {
            let mut student = Student::new(username, password, name)?;
            for entry in extra.split(LIST_SEPARATOR).filter(|e| !e.is_empty()) {
                let info: Vec<&str> = entry.split(ENTRY_SEPARATOR).collect();
                if info.len() < 3 {
                    continue;
                }
                let grade = info[1].trim().parse::<f32>().unwrap_or(0.0);
                student.add_course(info[0], grade, info[2])?;
            }
            student.into()
        }
    };
    Ok(user)
}

/// Encode a feedback record
#[must_use]
pub fn encode_feedback(record: &FeedbackRecord) -> String {
    [
        record.timestamp.as_str(),
        record.student_name.as_str(),
        record.student_username.as_str(),
        record.course_name.as_str(),
        record.instructor_name.as_str(),
        record.message.as_str(),
    ]
    .join("|")
}

/// Decode a feedback line; the message keeps any `|` it contains
///
/// # Errors
/// Returns an error for fewer than six fields.
pub fn decode_feedback(line: &str) -> Result<FeedbackRecord, FormatError> {
    let parts = fields(line, FEEDBACK_FIELDS, FEEDBACK_FIELDS)?;
    Ok(FeedbackRecord {
        timestamp: parts[0].to_string(),
        student_name: parts[1].to_string(),
        student_username: parts[2].to_string(),
        course_name: parts[3].to_string(),
        instructor_name: parts[4].to_string(),
        message: parts[5].to_string(),
    })
}

/// Encode a grade log entry
#[must_use]
pub fn encode_grade_entry(entry: &GradeLogEntry) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}",
        entry.timestamp,
        entry.student_name,
        entry.student_username,
        entry.course_name,
        entry.instructor_name,
        format_grade(entry.numeric_grade),
        entry.letter_grade
    )
}

/// Decode a grade log line; an unparsable numeric grade becomes `0.0`
///
/// # Errors
/// Returns an error for fewer than seven fields.
pub fn decode_grade_entry(line: &str) -> Result<GradeLogEntry, FormatError> {
    let parts = fields(line, GRADE_FIELDS, GRADE_FIELDS)?;
    Ok(GradeLogEntry {
        timestamp: parts[0].to_string(),
        student_name: parts[1].to_string(),
        student_username: parts[2].to_string(),
        course_name: parts[3].to_string(),
        instructor_name: parts[4].to_string(),
        numeric_grade: parts[5].trim().parse::<f32>().unwrap_or(0.0),
        letter_grade: parts[6].to_string(),
    })
}
