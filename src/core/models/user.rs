//! User accounts: admins, instructors and students

use super::fields::{is_placeholder, list_item, required_field, single_field};
use super::student::Student;
use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three kinds of user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Manages users and courses
    Admin,
    /// Teaches courses and records grades
    Instructor,
    /// Enrolls in courses and submits feedback
    Student,
}

impl Role {
    /// Record type tag in `users.txt`
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Instructor => "INSTRUCTOR",
            Self::Student => "STUDENT",
        }
    }

    /// Parse a `users.txt` type tag (exact, upper case)
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ADMIN" => Some(Self::Admin),
            "INSTRUCTOR" => Some(Self::Instructor),
            "STUDENT" => Some(Self::Student),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Admin => "Admin",
            Self::Instructor => "Instructor",
            Self::Student => "Student",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "instructor" => Ok(Self::Instructor),
            "student" => Ok(Self::Student),
            _ => Err(format!("{s:?} is not a valid role")),
        }
    }
}

/// Username and password pair shared by every user kind.
///
/// Passwords are kept as plain text so existing `users.txt` files stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    username: String,
    password: String,
}

impl Account {
    /// Create an account
    ///
    /// # Errors
    /// Returns an error if the username or password is blank or holds `|` or a
    /// line break.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: required_field("username", username.into())?,
            password: required_field("password", password.into())?,
        })
    }

    /// Username
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Stored password
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Capabilities every user kind has: authenticate, rename, change password
pub trait Identity {
    /// Account credentials
    fn account(&self) -> &Account;

    /// Mutable account credentials
    fn account_mut(&mut self) -> &mut Account;

    /// Human-readable name
    fn display_name(&self) -> &str;

    /// Username
    fn username(&self) -> &str {
        self.account().username()
    }

    /// Exact, case-sensitive comparison of both username and password
    fn authenticate(&self, username: &str, password: &str) -> bool {
        let account = self.account();
        account.username == username && account.password == password
    }

    /// Change the username
    ///
    /// # Errors
    /// Returns an error if `username` is blank or holds `|` or a line break.
    fn rename(&mut self, username: &str) -> Result<(), ValidationError> {
        self.account_mut().username = required_field("username", username.to_string())?;
        Ok(())
    }

    /// Change the password
    ///
    /// # Errors
    /// Returns an error if `password` is blank or holds `|` or a line break.
    fn change_password(&mut self, password: &str) -> Result<(), ValidationError> {
        self.account_mut().password = required_field("password", password.to_string())?;
        Ok(())
    }
}

/// Administrator account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    account: Account,
    /// Display name
    pub name: String,
}

impl Admin {
    /// Create an admin
    ///
    /// # Errors
    /// Returns an error if the username or password is blank, or any field
    /// holds `|` or a line break.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        single_field("admin name", &name)?;
        Ok(Self {
            account: Account::new(username, password)?,
            name,
        })
    }
}

impl Identity for Admin {
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

/// Instructor account with the names of the courses assigned to them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    account: Account,
    /// Display name, also the name written on assigned courses
    pub name: String,
    assigned_courses: Vec<String>,
}

impl Instructor {
    /// Create an instructor with no assigned courses
    ///
    /// # Errors
    /// Returns an error if the username or password is blank, or any field
    /// holds `|` or a line break. The name is written into course instructor
    /// lists, so it cannot hold `,` either.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        list_item("instructor name", &name)?;
        Ok(Self {
            account: Account::new(username, password)?,
            name,
            assigned_courses: Vec::new(),
        })
    }

    /// Name written on assigned courses: the display name, or the username when
    /// the name is blank
    #[must_use]
    pub fn listed_name(&self) -> &str {
        match self.name.trim() {
            "" => self.account.username(),
            name => name,
        }
    }

    /// Assigned course names, in assignment order
    #[must_use]
    pub fn assigned_courses(&self) -> &[String] {
        &self.assigned_courses
    }

    /// Whether `course` is among the assigned courses
    #[must_use]
    pub fn teaches(&self, course: &str) -> bool {
        self.assigned_courses.iter().any(|c| c == course)
    }

    /// Assign a course by name
    ///
    /// Blank names and the `"None"` placeholder (any casing) are ignored.
    ///
    /// # Returns
    /// `true` if added, `false` if ignored or already assigned
    pub fn assign_course(&mut self, course: &str) -> bool {
        let course = course.trim();
        if course.is_empty() || is_placeholder(course) || self.teaches(course) {
            return false;
        }
        self.assigned_courses.push(course.to_string());
        true
    }

    /// Replace every assigned course, dropping blanks, placeholders and duplicates
    pub fn set_assigned_courses<I, S>(&mut self, courses: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.assigned_courses.clear();
        for course in courses {
            self.assign_course(course.as_ref());
        }
    }
}

impl Identity for Instructor {
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

/// Any user stored in `users.txt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum User {
    /// Administrator
    Admin(Admin),
    /// Instructor
    Instructor(Instructor),
    /// Student
    Student(Student),
}

impl User {
    /// Kind of user
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Admin(_) => Role::Admin,
            Self::Instructor(_) => Role::Instructor,
            Self::Student(_) => Role::Student,
        }
    }

    fn identity(&self) -> &dyn Identity {
        match self {
            Self::Admin(admin) => admin,
            Self::Instructor(instructor) => instructor,
            Self::Student(student) => student,
        }
    }

    fn identity_mut(&mut self) -> &mut dyn Identity {
        match self {
            Self::Admin(admin) => admin,
            Self::Instructor(instructor) => instructor,
            Self::Student(student) => student,
        }
    }

    /// Change the display name
    ///
    /// # Errors
    /// Students require a non-blank name; admins and instructors accept a blank
    /// one. No name may hold `|` or a line break, and instructor names may not
    /// hold `,`.
    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        match self {
            Self::Admin(admin) => {
                single_field("admin name", name)?;
                admin.name = name.to_string();
            }
            Self::Instructor(instructor) => {
                list_item("instructor name", name)?;
                instructor.name = name.to_string();
            }
            Self::Student(student) => student.set_name(name)?,
        }
        Ok(())
    }

    /// Check the publicly writable name fields against the data file rules
    ///
    /// # Errors
    /// Same rules as [`set_name`](Self::set_name).
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Admin(admin) => single_field("admin name", &admin.name),
            Self::Instructor(instructor) => list_item("instructor name", &instructor.name),
            Self::Student(_) => Ok(()),
        }
    }

    /// Borrow as an instructor
    #[must_use]
    pub const fn as_instructor(&self) -> Option<&Instructor> {
        match self {
            Self::Instructor(instructor) => Some(instructor),
            _ => None,
        }
    }

    /// Borrow as a student
    #[must_use]
    pub const fn as_student(&self) -> Option<&Student> {
        match self {
            Self::Student(student) => Some(student),
            _ => None,
        }
    }

    /// Mutably borrow as an instructor
    pub fn as_instructor_mut(&mut self) -> Option<&mut Instructor> {
        match self {
            Self::Instructor(instructor) => Some(instructor),
            _ => None,
        }
    }

    /// Mutably borrow as a student
    pub fn as_student_mut(&mut self) -> Option<&mut Student> {
        match self {
            Self::Student(student) => Some(student),
            _ => None,
        }
    }
}

impl Identity for User {
    fn account(&self) -> &Account {
        self.identity().account()
    }

    fn account_mut(&mut self) -> &mut Account {
        self.identity_mut().account_mut()
    }

    fn display_name(&self) -> &str {
        self.identity().display_name()
    }
}

impl From<Admin> for User {
    fn from(admin: Admin) -> Self {
        Self::Admin(admin)
    }
}

impl From<Instructor> for User {
    fn from(instructor: Instructor) -> Self {
        Self::Instructor(instructor)
    }
}

impl From<Student> for User {
    fn from(student: Student) -> Self {
        Self::Student(student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_rejects_blank_fields() {
        assert_eq!(
            Account::new("", "pw"),
            Err(ValidationError::EmptyField("username"))
        );
        assert_eq!(
            Account::new("bob", "  "),
            Err(ValidationError::EmptyField("password"))
        );
    }

    #[test]
    fn test_authenticate_is_exact() {
        let admin = Admin::new("admin", "123", "Admin Name").unwrap();
        assert!(admin.authenticate("admin", "123"));
        assert!(!admin.authenticate("Admin", "123"));
        assert!(!admin.authenticate("admin", "1234"));
    }

    #[test]
    fn test_rename_and_password_validation() {
        let mut user: User = Instructor::new("jane", "pw", "Jane").unwrap().into();
        assert!(user.rename("  ").is_err());
        assert_eq!(user.username(), "jane");

        user.rename("jdoe").unwrap();
        user.change_password("secret").unwrap();
        assert!(user.authenticate("jdoe", "secret"));
    }

    #[test]
    fn test_instructor_assignment_dedupes() {
        let mut jane = Instructor::new("jane", "pw", "Jane").unwrap();
        assert!(jane.assign_course("Algebra"));
        assert!(!jane.assign_course("Algebra"));
        assert!(!jane.assign_course("None"));
        assert!(jane.assign_course("Physics"));
        assert_eq!(jane.assigned_courses(), ["Algebra", "Physics"]);

        jane.set_assigned_courses(["Chem", "Chem", ""]);
        assert_eq!(jane.assigned_courses(), ["Chem"]);
    }

    #[test]
    fn test_role_tags_and_parsing() {
        for role in [Role::Admin, Role::Instructor, Role::Student] {
            assert_eq!(Role::from_tag(role.tag()), Some(role));
        }
        assert_eq!(Role::from_tag("admin"), None);
        assert_eq!("Student".parse::<Role>(), Ok(Role::Student));
        assert!("teacher".parse::<Role>().is_err());
    }

    #[test]
    fn test_separators_rejected_on_create_and_change() {
        assert!(matches!(
            Account::new("bob|x", "pw"),
            Err(ValidationError::ForbiddenCharacter { field: "username", found: '|' })
        ));
        assert!(Account::new("bob", "pw\nADMIN|evil|pw|Evil|").is_err());
        assert!(Admin::new("root", "pw", "Root\r\n").is_err());
        assert!(matches!(
            Instructor::new("jane", "pw", "Doe, Jane"),
            Err(ValidationError::ForbiddenCharacter { found: ',', .. })
        ));

        let mut user: User = Instructor::new("jane", "pw", "Jane").unwrap().into();
        assert!(user.rename("jane\nx").is_err());
        assert!(user.change_password("a|b").is_err());
        assert!(user.set_name("Jane, Omar").is_err());
        assert!(user.authenticate("jane", "pw"));
        assert_eq!(user.display_name(), "Jane");

        let mut admin: User = Admin::new("root", "pw", "Root").unwrap().into();
        assert!(admin.set_name("Root, Deputy").is_ok());
        assert!(admin.set_name("Root|Deputy").is_err());
    }

    #[test]
    fn test_validate_checks_public_names() {
        let mut jane = Instructor::new("jane", "pw", "Jane").unwrap();
        jane.name = "Jane\nADMIN|evil|pw|Evil|".to_string();
        assert!(User::from(jane).validate().is_err());

        let mut root = Admin::new("root", "pw", "Root").unwrap();
        assert!(User::from(root.clone()).validate().is_ok());
        root.name = "a|b".to_string();
        assert!(User::from(root).validate().is_err());
    }

    #[test]
    fn test_placeholder_course_ignored_in_any_casing() {
        let mut jane = Instructor::new("jane", "pw", "").unwrap();
        assert!(!jane.assign_course("none"));
        assert!(!jane.assign_course(" NONE "));
        assert!(jane.assigned_courses().is_empty());
        assert_eq!(jane.listed_name(), "jane");
    }

    #[test]
    fn test_set_name_only_validates_students() {
        let mut admin: User = Admin::new("root", "pw", "Root").unwrap().into();
        assert!(admin.set_name("").is_ok());

        let mut student: User = Student::new("alice", "pw", "Alice").unwrap().into();
        assert!(student.set_name(" ").is_err());
        assert_eq!(student.display_name(), "Alice");
    }
}
