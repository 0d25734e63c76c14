//! Course catalogue backed by `courses.txt`

use super::stage_and_persist;
use crate::core::error::{ServiceError, ServiceResult, StoreError};
use crate::core::models::Course;
use crate::core::store::{FileStore, LoadReport};
use chrono::NaiveDate;

/// Room given to courses created without one
pub const DEFAULT_ROOM: &str = "TBD";
/// Branch given to courses created without one
pub const DEFAULT_BRANCH: &str = "Main";

/// Fields replaced by [`CourseManager::update_course`]; room, branch and price are kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseUpdate {
    /// New course name
    pub name: String,
    /// New instructor names
    pub instructors: Vec<String>,
    /// New start date
    pub start_date: String,
    /// New end date
    pub end_date: String,
    /// New description
    pub description: String,
}

/// Courses starting or ending soon, and courses whose dates could not be read
#[derive(Debug, Default)]
pub struct BoundaryScan<'a> {
    /// Courses with a start or end date within the window
    pub near: Vec<&'a Course>,
    /// Names of courses with an unparsable start or end date
    pub invalid_dates: Vec<&'a str>,
}

/// Owns the course collection
#[derive(Debug)]
pub struct CourseManager {
    store: FileStore,
    courses: Vec<Course>,
    report: LoadReport,
}

impl CourseManager {
    /// Load courses from the store
    ///
    /// # Errors
    /// Returns an error if `courses.txt` exists but cannot be read.
    pub fn load(store: FileStore) -> Result<Self, StoreError> {
        let loaded = store.load_courses()?;
        crate::debug!("Loaded {} courses", loaded.records.len());
        Ok(Self {
            store,
            courses: loaded.records,
            report: loaded.report,
        })
    }

    /// Courses in file order
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// What the initial load decoded and skipped
    #[must_use]
    pub const fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// First course with exactly this name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.name == name)
    }

    /// Name of the course at a 0-based position
    #[must_use]
    pub fn course_name_by_index(&self, index: usize) -> Option<&str> {
        self.courses.get(index).map(|c| c.name.as_str())
    }

    /// Instructor display string of every course, in course order
    #[must_use]
    pub fn instructor_names(&self) -> Vec<String> {
        self.courses.iter().map(Course::instructor_display).collect()
    }

    /// Add a course and save; names are not required to be unique
    ///
    /// # Errors
    /// Returns an error if a field breaks the data file rules (see
    /// [`Course::validate`]) or saving fails.
    pub fn add_course(&mut self, course: Course) -> ServiceResult<()> {
        course.validate()?;
        let name = course.name.clone();
        self.modify(|courses| {
            courses.push(course);
            Ok(())
        })?;
        crate::info!("Added course {}", name);
        Ok(())
    }

    /// Add a course with room `TBD`, branch `Main` and price `0.0`, then save
    ///
    /// # Errors
    /// Returns an error if the name is blank or saving fails.
    pub fn add_course_with_defaults(
        &mut self,
        name: &str,
        instructor: &str,
        start_date: &str,
        end_date: &str,
        description: &str,
    ) -> ServiceResult<()> {
        let course = Course::new(name, 0.0)?
            .with_instructor(instructor)
            .with_room(DEFAULT_ROOM)
            .with_branch(DEFAULT_BRANCH)
            .with_dates(start_date, end_date)
            .with_description(description);
        self.add_course(course)
    }

    /// Update the first course named exactly `name`, keeping its room, branch and price
    ///
    /// # Errors
    /// Returns [`ServiceError::CourseNotFound`] if no course matches, or an error
    /// if a new field is invalid or saving fails.
    pub fn update_course(&mut self, name: &str, update: CourseUpdate) -> ServiceResult<()> {
        self.modify(|courses| {
            let slot = courses
                .iter_mut()
                .find(|c| c.name == name)
                .ok_or_else(|| ServiceError::CourseNotFound(name.to_string()))?;
            let mut course = Course::new(update.name, slot.price())?
                .with_room(slot.room.clone())
                .with_branch(slot.branch.clone())
                .with_dates(update.start_date, update.end_date)
                .with_description(update.description);
            course.set_instructors(&update.instructors);
            course.validate()?;
            *slot = course;
            Ok(())
        })?;
        crate::info!("Updated course {}", name);
        Ok(())
    }

    /// Replace every field of the first course whose name matches, ignoring case
    ///
    /// # Errors
    /// Returns [`ServiceError::CourseNotFound`] if no course matches, or an error
    /// if the replacement is invalid or saving fails.
    pub fn replace_course(&mut self, name: &str, course: Course) -> ServiceResult<()> {
        course.validate()?;
        self.modify(|courses| {
            let slot = courses
                .iter_mut()
                .find(|c| c.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| ServiceError::CourseNotFound(name.to_string()))?;
            *slot = course;
            Ok(())
        })?;
        crate::info!("Replaced course {}", name);
        Ok(())
    }

    /// Delete every course whose name matches, ignoring case, and save
    ///
    /// # Returns
    /// Number of courses removed
    ///
    /// # Errors
    /// Returns [`ServiceError::CourseNotFound`] if nothing matches, or an error if
    /// saving fails.
    pub fn delete_course(&mut self, name: &str) -> ServiceResult<usize> {
        let removed = self.modify(|courses| {
            let before = courses.len();
            courses.retain(|c| !c.name.eq_ignore_ascii_case(name));
            match before - courses.len() {
                0 => Err(ServiceError::CourseNotFound(name.to_string())),
                removed => Ok(removed),
            }
        })?;
        crate::info!("Deleted {} course(s) named {}", removed, name);
        Ok(removed)
    }

    /// Courses whose start or end date falls within `days` days on or after `today`
    #[must_use]
    pub fn courses_near_boundary(&self, today: NaiveDate, days: i64) -> BoundaryScan<'_> {
        let mut scan = BoundaryScan::default();
        let within = |date: NaiveDate| (0..=days).contains(&(date - today).num_days());
        for course in &self.courses {
            match (course.start(), course.end()) {
                (Ok(start), Ok(end)) => {
                    if within(start) || within(end) {
                        scan.near.push(course);
                    }
                }
                _ => scan.invalid_dates.push(&course.name),
            }
        }
        scan
    }

    /// Stage a change to the course list, save it, and commit it on success
    pub(crate) fn modify<R>(
        &mut self,
        mutate: impl FnOnce(&mut Vec<Course>) -> ServiceResult<R>,
    ) -> ServiceResult<R> {
        let store = &self.store;
        stage_and_persist(&mut self.courses, mutate, |courses| {
            store.save_courses(courses)
        })
    }
}
