//! Operations that span users and courses: assignment, enrollment, grading and
//! feedback

use super::courses::CourseManager;
use super::users::{instructor_mut, student_mut, UserService};
use crate::core::error::{ServiceError, ServiceResult, StoreError, ValidationError};
use crate::core::models::fields::{free_text, list_item, not_placeholder};
use crate::core::models::student::{letter_for_score, normalize_letter_grade, NO_GRADE};
use crate::core::models::{Admin, Course, FeedbackRecord, GradeLogEntry, Identity, Student};
use crate::core::store::{FileStore, Loaded};

/// How far [`Registrar::record_grade`] got
#[derive(Debug)]
pub enum GradeOutcome {
    /// Live grade saved and grade log appended
    Recorded(GradeLogEntry),
    /// Live grade saved, but the grade log could not be appended
    LogFailed(StoreError),
}

/// Owns the user service and the course manager and keeps them in step
#[derive(Debug)]
pub struct Registrar {
    users: UserService,
    courses: CourseManager,
}

impl Registrar {
    /// Create the data directory if needed and load users and courses
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created or a data file
    /// cannot be read.
    pub fn open(store: FileStore, root: Option<Admin>) -> Result<Self, StoreError> {
        store.ensure_data_directory_exists()?;
        let mut users = UserService::load(store.clone())?;
        if let Some(root) = root {
            users = users.with_root_admin(root);
        }
        let courses = CourseManager::load(store)?;
        Ok(Self { users, courses })
    }

    /// User service
    #[must_use]
    pub const fn users(&self) -> &UserService {
        &self.users
    }

    /// Mutable user service
    pub fn users_mut(&mut self) -> &mut UserService {
        &mut self.users
    }

    /// Course manager
    #[must_use]
    pub const fn courses(&self) -> &CourseManager {
        &self.courses
    }

    /// Mutable course manager
    pub fn courses_mut(&mut self) -> &mut CourseManager {
        &mut self.courses
    }

    /// Underlying file store
    #[must_use]
    pub const fn store(&self) -> &FileStore {
        self.users.store()
    }

    /// Assign an instructor to a course on both sides and save both files
    ///
    /// The course gets the instructor's name; the instructor gets the course name.
    /// If the course file cannot be saved, the user file is restored.
    ///
    /// # Returns
    /// `false` if the assignment already existed on both sides
    ///
    /// # Errors
    /// Returns an error if the instructor or course is missing, either name
    /// would be read back as the `None` placeholder or cannot sit in a list, or
    /// saving fails. Nothing changes on either side in that case.
    pub fn assign_course(&mut self, instructor: &str, course: &str) -> ServiceResult<bool> {
        let lecturer = self.users.instructor(instructor)?;
        let display = lecturer.listed_name().to_string();
        list_item("instructor name", &display)?;
        not_placeholder("instructor name", &display)?;
        not_placeholder("course name", course)?;
        let listed = self
            .courses
            .find(course)
            .ok_or_else(|| ServiceError::CourseNotFound(course.to_string()))?
            .instructors()
            .contains(&display);
        if listed && lecturer.teaches(course) {
            return Ok(false);
        }

        let previous = self.users.users().to_vec();
        self.users
            .modify(|users| Ok(instructor_mut(users, instructor)?.assign_course(course)))?;

        let saved = self.courses.modify(|courses| {
            let target = courses
                .iter_mut()
                .find(|c| c.name == course)
                .ok_or_else(|| ServiceError::CourseNotFound(course.to_string()))?;
            target.add_instructor(&display);
            Ok(())
        });
        if let Err(e) = saved {
            crate::error!("Assignment of {} to {} failed: {}", instructor, course, e);
            if let Err(rollback) = self.users.modify(|users| {
                *users = previous;
                Ok(())
            }) {
                crate::error!("Could not restore users after failed assignment: {}", rollback);
            }
            return Err(e);
        }

        crate::info!("Assigned {} to {}", instructor, course);
        Ok(true)
    }

    /// Enroll a student in an existing course with grade `0.0` / `N/A`
    ///
    /// # Errors
    /// Returns an error if the course or student is missing, the student is
    /// already enrolled, or saving fails.
    pub fn enroll(&mut self, student: &str, course: &str) -> ServiceResult<()> {
        if self.courses.find(course).is_none() {
            return Err(ServiceError::CourseNotFound(course.to_string()));
        }
        self.users.modify(|users| {
            if student_mut(users, student)?.enroll(course)? {
                Ok(())
            } else {
                Err(ServiceError::AlreadyEnrolled {
                    username: student.to_string(),
                    course: course.to_string(),
                })
            }
        })?;
        crate::info!("Enrolled {} in {}", student, course);
        Ok(())
    }

    /// Set a student's grade in a course, save users, then append to the grade log
    ///
    /// `letter` is upper-cased and checked; without one, the letter follows from
    /// the score. `instructor` is the username of the grading instructor, or
    /// `None` when an admin records the grade.
    ///
    /// # Errors
    /// Returns an error if the grade is invalid, the student or instructor is
    /// missing, the student is not enrolled, or users cannot be saved. A failed
    /// log append after a successful save is reported as
    /// [`GradeOutcome::LogFailed`] instead.
    pub fn record_grade(
        &mut self,
        student: &str,
        course: &str,
        numeric_grade: f32,
        letter: Option<&str>,
        instructor: Option<&str>,
    ) -> ServiceResult<GradeOutcome> {
        let letter = match letter {
            Some(letter) => normalize_letter_grade(letter)?,
            None => letter_for_score(numeric_grade).to_string(),
        };
        let graded_by = match instructor {
            Some(username) => self.users.instructor(username)?.listed_name().to_string(),
            None => NO_GRADE.to_string(),
        };

        let student_name = self.users.modify(|users| {
            let record = student_mut(users, student)?;
            record.set_numeric_grade(course, numeric_grade)?;
            record.set_letter_grade(course, &letter)?;
            Ok(record.name().to_string())
        })?;

        let entry = GradeLogEntry::now(
            &student_name,
            student,
            course,
            &graded_by,
            numeric_grade,
            &letter,
        );
        match self.store().save_grade(&entry) {
            Ok(()) => {
                crate::info!("Recorded {} ({}) for {} in {}", numeric_grade, letter, student, course);
                Ok(GradeOutcome::Recorded(entry))
            }
            Err(e) => {
                crate::warn!("Grade saved for {} but not logged: {}", student, e);
                Ok(GradeOutcome::LogFailed(e))
            }
        }
    }

    /// Append a student's feedback about a course they are enrolled in
    ///
    /// # Errors
    /// Returns an error if the message is blank or spans several lines, the
    /// student or course is missing, the student is not enrolled, or the log
    /// cannot be appended.
    pub fn submit_feedback(
        &self,
        student: &str,
        course: &str,
        message: &str,
    ) -> ServiceResult<FeedbackRecord> {
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyField("feedback message").into());
        }
        free_text("feedback message", message)?;
        let learner = self.users.student(student)?;
        let target = self
            .courses
            .find(course)
            .ok_or_else(|| ServiceError::CourseNotFound(course.to_string()))?;
        if !learner.is_enrolled(course) {
            return Err(ValidationError::NotEnrolled(course.to_string()).into());
        }

        let record = FeedbackRecord::now(
            learner.name(),
            student,
            course,
            &target.instructor_display(),
            message,
        );
        self.store().save_feedback(&record)?;
        crate::info!("Feedback from {} on {}", student, course);
        Ok(record)
    }

    /// Courses assigned to an instructor that exist in the catalogue, in assignment order
    ///
    /// # Errors
    /// Returns an error if the user is missing or not an instructor.
    pub fn instructor_schedule(&self, instructor: &str) -> ServiceResult<Vec<&Course>> {
        let lecturer = self.users.instructor(instructor)?;
        Ok(lecturer
            .assigned_courses()
            .iter()
            .filter_map(|name| self.courses.find(name))
            .collect())
    }

    /// Students enrolled in a course, in user-file order
    ///
    /// # Errors
    /// Returns [`ServiceError::CourseNotFound`] if the course does not exist.
    pub fn course_roster(&self, course: &str) -> ServiceResult<Vec<&Student>> {
        if self.courses.find(course).is_none() {
            return Err(ServiceError::CourseNotFound(course.to_string()));
        }
        Ok(self
            .users
            .users()
            .iter()
            .filter_map(|u| u.as_student())
            .filter(|s| s.is_enrolled(course))
            .collect())
    }

    /// Read the feedback log
    ///
    /// # Errors
    /// Returns an error if the log exists but cannot be read.
    pub fn load_feedback(&self) -> Result<Loaded<FeedbackRecord>, StoreError> {
        self.store().load_feedback()
    }

    /// Read the grade log
    ///
    /// # Errors
    /// Returns an error if the log exists but cannot be read.
    pub fn load_grades(&self) -> Result<Loaded<GradeLogEntry>, StoreError> {
        self.store().load_grades()
    }
}
