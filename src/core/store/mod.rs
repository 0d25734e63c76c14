//! File store: whole-file persistence for courses and users, append-only logs
//! for feedback and grades
//!
//! Every call opens, reads or writes and closes its file. There is no locking;
//! one process writes at a time.

pub mod encoding;
mod logs;
pub mod report;

pub use encoding::TextEncoding;
pub use report::{ConversionReport, LoadReport, Loaded, SkippedLine};

use crate::core::codec;
use crate::core::error::{FormatError, StoreError};
use crate::core::models::{Course, User};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// The four data files kept in the data directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFile {
    /// `courses.txt`, rewritten on every save
    Courses,
    /// `users.txt`, rewritten on every save
    Users,
    /// `feedbacks.txt`, append-only
    Feedback,
    /// `grades.txt`, append-only
    Grades,
}

impl DataFile {
    /// File name inside the data directory
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Courses => "courses.txt",
            Self::Users => "users.txt",
            Self::Feedback => "feedbacks.txt",
            Self::Grades => "grades.txt",
        }
    }

    /// Header comment written as the first line
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Courses => codec::COURSES_HEADER,
            Self::Users => codec::USERS_HEADER,
            Self::Feedback => codec::FEEDBACK_HEADER,
            Self::Grades => codec::GRADES_HEADER,
        }
    }
}

/// Flat-file store rooted at one data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Create a store for `data_dir`; nothing is touched on disk yet
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Data directory
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of one data file
    #[must_use]
    pub fn path_for(&self, file: DataFile) -> PathBuf {
        self.data_dir.join(file.file_name())
    }

    /// Create the data directory (and parents) if missing
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn ensure_data_directory_exists(&self) -> Result<(), StoreError> {
        if self.data_dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            crate::error!(
                "Failed to create data directory {}: {}",
                self.data_dir.display(),
                e
            );
            StoreError::io(&self.data_dir, e)
        })?;
        crate::info!("Created data directory {}", self.data_dir.display());
        Ok(())
    }

    /// Load every course; a missing file yields an empty collection
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn load_courses(&self) -> Result<Loaded<Course>, StoreError> {
        self.load_records(DataFile::Courses, codec::decode_course)
    }

    /// Replace `courses.txt` with `courses`, creating the data directory if needed
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file written.
    pub fn save_courses(&self, courses: &[Course]) -> Result<(), StoreError> {
        self.save_records(DataFile::Courses, courses.iter().map(codec::encode_course))
    }

    /// Load every user; a missing file yields an empty collection
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn load_users(&self) -> Result<Loaded<User>, StoreError> {
        self.load_records(DataFile::Users, codec::decode_user)
    }

    /// Replace `users.txt` with `users`, creating the data directory if needed
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file written.
    pub fn save_users(&self, users: &[User]) -> Result<(), StoreError> {
        self.save_records(DataFile::Users, users.iter().map(codec::encode_user))
    }

    /// Read a data file as text, or `None` if it does not exist
    fn read_text(&self, file: DataFile) -> Result<Option<(String, TextEncoding)>, StoreError> {
        let path = self.path_for(file);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                crate::error!("Failed to read {}: {}", path.display(), e);
                return Err(StoreError::io(path, e));
            }
        };
        let decoded = encoding::decode_any(&bytes).ok_or(StoreError::Encoding { path })?;
        Ok(Some(decoded))
    }

    fn load_records<T>(
        &self,
        file: DataFile,
        decode: fn(&str) -> Result<T, FormatError>,
    ) -> Result<Loaded<T>, StoreError> {
        let Some((text, text_encoding)) = self.read_text(file)? else {
            crate::debug!("{} not found, starting empty", file.file_name());
            return Ok(Loaded::empty());
        };
        if text_encoding != TextEncoding::Utf8 {
            crate::warn!(
                "{} is not UTF-8, read as {}",
                file.file_name(),
                text_encoding
            );
        }

        let mut loaded = Loaded::empty();
        for (index, line) in text.lines().enumerate() {
            if !codec::is_data_line(line) {
                continue;
            }
            match decode(line) {
                Ok(record) => loaded.records.push(record),
                Err(error) => {
                    crate::debug!(
                        "Skipping {} line {}: {}",
                        file.file_name(),
                        index + 1,
                        error
                    );
                    loaded.report.skipped.push(SkippedLine {
                        line_number: index + 1,
                        error,
                    });
                }
            }
        }
        loaded.report.loaded = loaded.records.len();

        crate::debug!(
            "Loaded {} records from {} ({} skipped)",
            loaded.report.loaded,
            file.file_name(),
            loaded.report.skipped.len()
        );
        Ok(loaded)
    }

    fn save_records<I>(&self, file: DataFile, lines: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = String>,
    {
        self.ensure_data_directory_exists()?;
        let path = self.path_for(file);
        let count = write_file(&path, file.header(), lines).map_err(|e| {
            crate::error!("Failed to save {}: {}", path.display(), e);
            StoreError::io(&path, e)
        })?;
        crate::debug!("Saved {} records to {}", count, path.display());
        Ok(())
    }
}

/// Truncate `path` and write the header followed by `lines`; returns the line count
fn write_file<I>(path: &Path, header: &str, lines: I) -> std::io::Result<usize>
where
    I: IntoIterator<Item = String>,
{
    let mut writer = BufWriter::new(fs::File::create(path)?);
    writeln!(writer, "{header}")?;
    let mut count = 0;
    for line in lines {
        writeln!(writer, "{line}")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Instructor, Student};
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("data"));
        store.ensure_data_directory_exists().unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_files_load_empty() {
        let (_dir, store) = store();
        let courses = store.load_courses().unwrap();
        assert!(courses.records.is_empty());
        assert!(courses.report.is_clean());
        assert!(store.load_users().unwrap().records.is_empty());
    }

    #[test]
    fn test_save_writes_header_first() {
        let (_dir, store) = store();
        let course = Course::new("Algebra", 100.0).unwrap();
        store.save_courses(&[course]).unwrap();

        let text = fs::read_to_string(store.path_for(DataFile::Courses)).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(codec::COURSES_HEADER));
        assert_eq!(lines.next(), Some("Algebra|None|||100.0|||"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_users_round_trip_through_file() {
        let (_dir, store) = store();
        let mut jane = Instructor::new("jane", "pw", "Jane").unwrap();
        jane.assign_course("Algebra");
        let mut alice = Student::new("alice", "pw", "Alice").unwrap();
        alice.add_course("Algebra", 92.5, "A").unwrap();
        let users: Vec<User> = vec![jane.into(), alice.into()];

        store.save_users(&users).unwrap();
        assert_eq!(store.load_users().unwrap().records, users);
    }

    #[test]
    fn test_malformed_lines_reported_not_fatal() {
        let (_dir, store) = store();
        fs::write(
            store.path_for(DataFile::Users),
            "# Users Data\n\nADMIN|root|pw|Root|\nGHOST|x|y|z|\nSTUDENT|bob\n",
        )
        .unwrap();

        let loaded = store.load_users().unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.report.loaded, 1);
        let lines: Vec<_> = loaded.report.skipped.iter().map(|s| s.line_number).collect();
        assert_eq!(lines, [4, 5]);
    }

    #[test]
    fn test_latin1_file_still_loads() {
        let (_dir, store) = store();
        fs::write(
            store.path_for(DataFile::Courses),
            b"Caf\xE9 Culture|None|1|Main|10.0|2025-01-01|2025-02-01|x\n",
        )
        .unwrap();
        let loaded = store.load_courses().unwrap();
        assert_eq!(loaded.records[0].name, "Café Culture");
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("absent").join("data"));
        store.save_users(&[]).unwrap();
        store.save_courses(&[Course::new("Algebra", 1.0).unwrap()]).unwrap();

        assert!(store.data_dir().is_dir());
        assert_eq!(store.load_courses().unwrap().records.len(), 1);
        assert!(store.load_users().unwrap().records.is_empty());
    }

    #[test]
    fn test_save_fails_when_directory_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("data");
        fs::write(&blocker, "not a directory").unwrap();

        let store = FileStore::new(&blocker);
        let err = store.save_courses(&[]).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
