//! Outcome reports for loads and salvage conversions

use super::encoding::TextEncoding;
use crate::core::error::FormatError;

/// A data line that was skipped during a load
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number in the file
    pub line_number: usize,
    /// Why the line could not be decoded
    pub error: FormatError,
}

/// Counts of decoded and skipped lines for one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Records decoded successfully
    pub loaded: usize,
    /// Lines that were skipped, in file order
    pub skipped: Vec<SkippedLine>,
}

impl LoadReport {
    /// Whether every data line decoded
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Records loaded from a file together with the load report
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    /// Decoded records in file order
    pub records: Vec<T>,
    /// What was loaded and what was skipped
    pub report: LoadReport,
}

impl<T> Loaded<T> {
    pub(crate) const fn empty() -> Self {
        Self {
            records: Vec::new(),
            report: LoadReport {
                loaded: 0,
                skipped: Vec::new(),
            },
        }
    }
}

/// Result of rewriting a log file as UTF-8
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionReport {
    /// Encoding the original file was read with
    pub encoding: TextEncoding,
    /// Lines carried over to the new file
    pub kept: usize,
    /// Data lines dropped for having too few fields
    pub discarded: usize,
}
