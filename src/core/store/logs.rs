//! Append-only feedback and grade logs, plus their repair tools

use super::encoding::{self, TextEncoding};
use super::{write_file, ConversionReport, DataFile, FileStore, Loaded};
use crate::core::codec;
use crate::core::error::StoreError;
use crate::core::models::{FeedbackRecord, GradeLogEntry};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

impl FileStore {
    /// Append one feedback record, creating `feedbacks.txt` with its header first if needed
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or appended to.
    pub fn save_feedback(&self, record: &FeedbackRecord) -> Result<(), StoreError> {
        self.append_line(DataFile::Feedback, &codec::encode_feedback(record))
    }

    /// Append one grade entry, creating `grades.txt` with its header first if needed
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or appended to.
    pub fn save_grade(&self, entry: &GradeLogEntry) -> Result<(), StoreError> {
        self.append_line(DataFile::Grades, &codec::encode_grade_entry(entry))
    }

    /// Read the feedback log; a missing file yields an empty log
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn load_feedback(&self) -> Result<Loaded<FeedbackRecord>, StoreError> {
        self.load_records(DataFile::Feedback, codec::decode_feedback)
    }

    /// Read the grade log; a missing file yields an empty log
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn load_grades(&self) -> Result<Loaded<GradeLogEntry>, StoreError> {
        self.load_records(DataFile::Grades, codec::decode_grade_entry)
    }

    /// Discard every feedback record, leaving only the header
    ///
    /// # Errors
    /// Returns an error if the file cannot be rewritten.
    pub fn reset_feedback_file(&self) -> Result<(), StoreError> {
        self.reset_log(DataFile::Feedback)
    }

    /// Discard every grade entry, leaving only the header
    ///
    /// # Errors
    /// Returns an error if the file cannot be rewritten.
    pub fn reset_grade_file(&self) -> Result<(), StoreError> {
        self.reset_log(DataFile::Grades)
    }

    /// Rewrite `feedbacks.txt` as UTF-8, keeping lines with at least five delimiters
    ///
    /// # Errors
    /// Returns an error if the file cannot be decoded or replaced. The original
    /// file is left untouched in that case.
    pub fn convert_feedback_file_to_utf8(&self) -> Result<ConversionReport, StoreError> {
        self.convert_log(DataFile::Feedback, codec::FEEDBACK_MIN_DELIMITERS)
    }

    /// Rewrite `grades.txt` as UTF-8, keeping lines with at least six delimiters
    ///
    /// # Errors
    /// Returns an error if the file cannot be decoded or replaced. The original
    /// file is left untouched in that case.
    pub fn convert_grade_file_to_utf8(&self) -> Result<ConversionReport, StoreError> {
        self.convert_log(DataFile::Grades, codec::GRADE_MIN_DELIMITERS)
    }

    fn append_line(&self, file: DataFile, line: &str) -> Result<(), StoreError> {
        self.ensure_data_directory_exists()?;
        let path = self.path_for(file);
        if !path.exists() {
            write_file(&path, file.header(), std::iter::empty())
                .map_err(|e| StoreError::io(&path, e))?;
            crate::debug!("Created {}", path.display());
        }

        OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut out| writeln!(out, "{line}"))
            .map_err(|e| {
                crate::error!("Failed to append to {}: {}", path.display(), e);
                StoreError::io(&path, e)
            })
    }

    fn reset_log(&self, file: DataFile) -> Result<(), StoreError> {
        self.save_records(file, std::iter::empty())?;
        crate::info!("Reset {}", file.file_name());
        Ok(())
    }

    fn convert_log(
        &self,
        file: DataFile,
        min_delimiters: usize,
    ) -> Result<ConversionReport, StoreError> {
        self.ensure_data_directory_exists()?;
        let path = self.path_for(file);
        if !path.exists() {
            self.reset_log(file)?;
            return Ok(ConversionReport {
                encoding: TextEncoding::Utf8,
                kept: 0,
                discarded: 0,
            });
        }

        let bytes = fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
        let Some((text, text_encoding)) = encoding::decode_any(&bytes) else {
            crate::error!("No supported encoding could read {}", path.display());
            return Err(StoreError::Encoding { path });
        };

        let mut kept = Vec::new();
        let mut discarded = 0;
        for line in text.lines().filter(|line| codec::is_data_line(line)) {
            if codec::delimiter_count(line) >= min_delimiters {
                kept.push(line.to_string());
            } else {
                discarded += 1;
            }
        }
        let report = ConversionReport {
            encoding: text_encoding,
            kept: kept.len(),
            discarded,
        };

        let mut temp = path.clone().into_os_string();
        temp.push(".temp");
        let temp = PathBuf::from(temp);
        let replaced = write_file(&temp, file.header(), kept)
            .and_then(|_| fs::rename(&temp, &path));
        if let Err(e) = replaced {
            crate::error!("Failed to convert {}: {}", path.display(), e);
            let _ = fs::remove_file(&temp);
            return Err(StoreError::io(&path, e));
        }

        crate::info!(
            "Converted {} from {}: {} kept, {} discarded",
            file.file_name(),
            report.encoding,
            report.kept,
            report.discarded
        );
        Ok(report)
    }
}
