//! User accounts: uniqueness, profile edits and authentication

use super::stage_and_persist;
use crate::core::error::{ServiceError, ServiceResult, StoreError};
use crate::core::models::fields::entry_part;
use crate::core::models::{Admin, Identity, Instructor, Role, Student, User};
use crate::core::store::{FileStore, LoadReport};

/// Profile changes; `None` leaves a field as it is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    /// New username
    pub username: Option<String>,
    /// New password
    pub password: Option<String>,
    /// New display name
    pub name: Option<String>,
}

/// Owns the user collection backed by `users.txt`
///
/// Usernames are unique across stored users and the root admin. The root admin
/// comes from configuration, authenticates like any other admin, and is never
/// written to the file.
#[derive(Debug)]
pub struct UserService {
    store: FileStore,
    users: Vec<User>,
    root: Option<Admin>,
    report: LoadReport,
}

impl UserService {
    /// Load users from the store
    ///
    /// # Errors
    /// Returns an error if `users.txt` exists but cannot be read.
    pub fn load(store: FileStore) -> Result<Self, StoreError> {
        let loaded = store.load_users()?;
        crate::debug!("Loaded {} users", loaded.records.len());
        Ok(Self {
            store,
            users: loaded.records,
            root: None,
            report: loaded.report,
        })
    }

    /// Install the root admin
    #[must_use]
    pub fn with_root_admin(mut self, admin: Admin) -> Self {
        self.root = Some(admin);
        self
    }

    /// Root admin, if configured
    #[must_use]
    pub const fn root_admin(&self) -> Option<&Admin> {
        self.root.as_ref()
    }

    /// Stored users in file order
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// What the initial load decoded and skipped
    #[must_use]
    pub const fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Store the users are persisted to
    #[must_use]
    pub const fn store(&self) -> &FileStore {
        &self.store
    }

    /// Find a stored user by exact username
    #[must_use]
    pub fn find(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username() == username)
    }

    /// Stored users of one role, in file order
    pub fn users_with_role(&self, role: Role) -> impl Iterator<Item = &User> {
        self.users.iter().filter(move |u| u.role() == role)
    }

    /// Whether `username` belongs to a stored user or the root admin
    #[must_use]
    pub fn username_taken(&self, username: &str) -> bool {
        self.root
            .as_ref()
            .is_some_and(|root| root.username() == username)
            || self.find(username).is_some()
    }

    /// Add a user and save
    ///
    /// # Errors
    /// Returns [`ServiceError::DuplicateUsername`] if the username is taken, or a
    /// store error if saving fails. Neither memory nor the file change on error.
    pub fn add_user(&mut self, user: User) -> ServiceResult<()> {
        user.validate()?;
        if self.username_taken(user.username()) {
            return Err(ServiceError::DuplicateUsername(user.username().to_string()));
        }
        let username = user.username().to_string();
        self.modify(|users| {
            users.push(user);
            Ok(())
        })?;
        crate::info!("Added user {}", username);
        Ok(())
    }

    /// Remove a user by username and save
    ///
    /// # Errors
    /// Returns [`ServiceError::UserNotFound`] if no stored user matches, or a store
    /// error if saving fails.
    pub fn delete_user(&mut self, username: &str) -> ServiceResult<User> {
        let removed = self.modify(|users| {
            let index = users
                .iter()
                .position(|u| u.username() == username)
                .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))?;
            Ok(users.remove(index))
        })?;
        crate::info!("Deleted user {}", username);
        Ok(removed)
    }

    /// Change a user's username, password and/or name, then save
    ///
    /// A new username must not collide with any other user or the root admin.
    ///
    /// # Errors
    /// Returns an error if the user is missing, the new username is taken, a new
    /// value is invalid, or saving fails.
    pub fn update_user(&mut self, username: &str, update: UserUpdate) -> ServiceResult<()> {
        if let Some(new_name) = update.username.as_deref() {
            if new_name != username && self.username_taken(new_name) {
                return Err(ServiceError::DuplicateUsername(new_name.to_string()));
            }
        }
        self.modify(|users| {
            let user = find_mut(users, username)?;
            if let Some(new_username) = &update.username {
                user.rename(new_username)?;
            }
            if let Some(password) = &update.password {
                user.change_password(password)?;
            }
            if let Some(name) = &update.name {
                user.set_name(name)?;
            }
            Ok(())
        })?;
        crate::info!("Updated user {}", username);
        Ok(())
    }

    /// Exact username and password check against stored users and the root admin
    #[must_use]
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.root
            .as_ref()
            .is_some_and(|root| root.authenticate(username, password))
            || self.users.iter().any(|u| u.authenticate(username, password))
    }

    /// Authenticate as a specific role
    ///
    /// # Returns
    /// The matching user, or `None` if the credentials or role do not match
    #[must_use]
    pub fn login(&self, role: Role, username: &str, password: &str) -> Option<User> {
        if role == Role::Admin {
            if let Some(root) = self.root.as_ref().filter(|r| r.authenticate(username, password)) {
                return Some(root.clone().into());
            }
        }
        let user = self
            .users
            .iter()
            .find(|u| u.role() == role && u.authenticate(username, password))
            .cloned();
        if user.is_none() {
            crate::warn!("Failed {} login for {}", role, username);
        }
        user
    }

    /// Look up an instructor by username
    ///
    /// # Errors
    /// Returns an error if the user is missing or not an instructor.
    pub fn instructor(&self, username: &str) -> ServiceResult<&Instructor> {
        self.find(username)
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))?
            .as_instructor()
            .ok_or_else(|| ServiceError::NotAnInstructor(username.to_string()))
    }

    /// Look up a student by username
    ///
    /// # Errors
    /// Returns an error if the user is missing or not a student.
    pub fn student(&self, username: &str) -> ServiceResult<&Student> {
        self.find(username)
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))?
            .as_student()
            .ok_or_else(|| ServiceError::NotAStudent(username.to_string()))
    }

    /// Replace an instructor's assigned courses and save
    ///
    /// This edits the instructor only; course records are not touched.
    ///
    /// # Errors
    /// Returns an error if the user is missing or not an instructor, or saving fails.
    pub fn set_assigned_courses(&mut self, username: &str, courses: &[String]) -> ServiceResult<()> {
        for course in courses.iter().filter(|course| !course.trim().is_empty()) {
            entry_part("course name", course.clone())?;
        }
        self.modify(|users| {
            instructor_mut(users, username)?.set_assigned_courses(courses);
            Ok(())
        })
    }

    /// Replace one of a student's enrollments by index and save
    ///
    /// # Errors
    /// Returns an error if the user is missing or not a student, the index or
    /// values are invalid, or saving fails.
    pub fn update_enrollment(
        &mut self,
        username: &str,
        index: usize,
        course: &str,
        numeric_grade: f32,
        letter_grade: &str,
    ) -> ServiceResult<()> {
        self.modify(|users| {
            student_mut(users, username)?.update_course(index, course, numeric_grade, letter_grade)?;
            Ok(())
        })
    }

    /// Stage a change to the user list, save it, and commit it on success
    pub(crate) fn modify<R>(
        &mut self,
        mutate: impl FnOnce(&mut Vec<User>) -> ServiceResult<R>,
    ) -> ServiceResult<R> {
        let store = &self.store;
        stage_and_persist(&mut self.users, mutate, |users| store.save_users(users))
    }
}

pub(crate) fn find_mut<'a>(users: &'a mut [User], username: &str) -> ServiceResult<&'a mut User> {
    users
        .iter_mut()
        .find(|u| u.username() == username)
        .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))
}

pub(crate) fn instructor_mut<'a>(
    users: &'a mut [User],
    username: &str,
) -> ServiceResult<&'a mut Instructor> {
    find_mut(users, username)?
        .as_instructor_mut()
        .ok_or_else(|| ServiceError::NotAnInstructor(username.to_string()))
}

pub(crate) fn student_mut<'a>(
    users: &'a mut [User],
    username: &str,
) -> ServiceResult<&'a mut Student> {
    find_mut(users, username)?
        .as_student_mut()
        .ok_or_else(|| ServiceError::NotAStudent(username.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service() -> (TempDir, UserService) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let service = UserService::load(store)
            .unwrap()
            .with_root_admin(Admin::new("admin", "123", "Admin Name").unwrap());
        (dir, service)
    }

    fn student(username: &str) -> User {
        Student::new(username, "pw", username.to_uppercase())
            .unwrap()
            .into()
    }

    #[test]
    fn test_add_user_persists() {
        let (_dir, mut users) = service();
        users.add_user(student("alice")).unwrap();

        let reloaded = UserService::load(users.store().clone()).unwrap();
        assert_eq!(reloaded.users().len(), 1);
        assert_eq!(reloaded.users()[0].username(), "alice");
    }

    #[test]
    fn test_duplicate_username_rejected_including_root() {
        let (_dir, mut users) = service();
        users.add_user(student("alice")).unwrap();

        assert!(matches!(
            users.add_user(student("alice")),
            Err(ServiceError::DuplicateUsername(name)) if name == "alice"
        ));
        assert!(matches!(
            users.add_user(student("admin")),
            Err(ServiceError::DuplicateUsername(_))
        ));
        assert_eq!(users.users().len(), 1);
    }

    #[test]
    fn test_separators_cannot_smuggle_records() {
        let (_dir, mut users) = service();
        users.add_user(student("alice")).unwrap();

        let mut jane = Instructor::new("jane", "pw", "Jane").unwrap();
        jane.name = "Jane\nADMIN|evil|pw|Evil|".to_string();
        assert!(matches!(
            users.add_user(jane.into()),
            Err(ServiceError::Validation(_))
        ));

        let smuggle = UserUpdate {
            name: Some("Alice\nADMIN|evil|pw|Evil|".to_string()),
            ..UserUpdate::default()
        };
        assert!(users.update_user("alice", smuggle).is_err());
        let repassword = UserUpdate {
            password: Some("pw|x".to_string()),
            ..UserUpdate::default()
        };
        assert!(users.update_user("alice", repassword).is_err());

        let reloaded = UserService::load(users.store().clone()).unwrap();
        assert_eq!(reloaded.users().len(), 1);
        assert!(reloaded.find("evil").is_none());
        assert!(!reloaded.authenticate("evil", "pw"));
        assert_eq!(reloaded.users()[0].display_name(), "ALICE");
    }

    #[test]
    fn test_update_user_checks_collisions_excluding_self() {
        let (_dir, mut users) = service();
        users.add_user(student("alice")).unwrap();
        users.add_user(student("bob")).unwrap();

        let rename_to_bob = UserUpdate {
            username: Some("bob".to_string()),
            ..UserUpdate::default()
        };
        assert!(matches!(
            users.update_user("alice", rename_to_bob),
            Err(ServiceError::DuplicateUsername(_))
        ));

        let same_name = UserUpdate {
            username: Some("alice".to_string()),
            password: Some("new".to_string()),
            name: Some("Alice Smith".to_string()),
        };
        users.update_user("alice", same_name).unwrap();
        assert!(users.authenticate("alice", "new"));
        assert_eq!(users.find("alice").unwrap().display_name(), "Alice Smith");
    }

    #[test]
    fn test_invalid_update_leaves_user_untouched() {
        let (_dir, mut users) = service();
        users.add_user(student("alice")).unwrap();

        let update = UserUpdate {
            password: Some("changed".to_string()),
            name: Some(String::new()),
            ..UserUpdate::default()
        };
        assert!(users.update_user("alice", update).is_err());
        assert!(users.authenticate("alice", "pw"));
    }

    #[test]
    fn test_delete_user() {
        let (_dir, mut users) = service();
        users.add_user(student("alice")).unwrap();

        let removed = users.delete_user("alice").unwrap();
        assert_eq!(removed.username(), "alice");
        assert!(matches!(
            users.delete_user("alice"),
            Err(ServiceError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_login_is_role_scoped() {
        let (_dir, mut users) = service();
        users.add_user(student("alice")).unwrap();

        assert!(users.login(Role::Student, "alice", "pw").is_some());
        assert!(users.login(Role::Instructor, "alice", "pw").is_none());
        assert!(users.login(Role::Student, "alice", "PW").is_none());

        let root = users.login(Role::Admin, "admin", "123").unwrap();
        assert_eq!(root.display_name(), "Admin Name");
        assert!(users.authenticate("admin", "123"));
    }

    #[test]
    fn test_role_checks() {
        let (_dir, mut users) = service();
        users.add_user(student("alice")).unwrap();
        users
            .add_user(Instructor::new("jane", "pw", "Jane").unwrap().into())
            .unwrap();

        assert!(matches!(
            users.set_assigned_courses("alice", &["Algebra".to_string()]),
            Err(ServiceError::NotAnInstructor(_))
        ));
        users
            .set_assigned_courses("jane", &["Algebra".to_string()])
            .unwrap();
        assert_eq!(users.instructor("jane").unwrap().assigned_courses(), ["Algebra"]);
        assert!(matches!(
            users.set_assigned_courses("jane", &["Intro, Lab".to_string()]),
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(users.instructor("jane").unwrap().assigned_courses(), ["Algebra"]);
        assert!(users.student("jane").is_err());
        assert_eq!(users.users_with_role(Role::Student).count(), 1);
    }
}
