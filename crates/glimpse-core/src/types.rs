//! Per-file and per-selection results handed to the output layer.

use serde::Serialize;
use std::path::PathBuf;

use crate::metadata::Metadata;
use crate::output::TextRender;

/// Everything extracted from one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileMetadata {
    /// Path of the source file
    pub file_path: PathBuf,

    /// Just the filename portion
    pub file_name: String,

    /// File size in bytes
    pub file_size: u64,

    /// Decoded directories, keyed by name
    pub directories: Metadata,
}

impl TextRender for FileMetadata {
    fn text_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("== {} ==", self.file_path.display())];
        if self.directories.is_empty() {
            lines.push("(no metadata)".to_string());
        }
        lines.extend(self.directories.dump_lines());
        lines
    }
}

/// Detail lines for a set of files.
#[derive(Debug, Clone, Serialize)]
pub struct DetailReport {
    /// Files the selection was built from
    pub files: Vec<PathBuf>,

    /// Display lines in order
    pub details: Vec<String>,
}

impl TextRender for DetailReport {
    fn text_lines(&self) -> Vec<String> {
        self.details.clone()
    }
}

/// Counters for a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionStats {
    pub succeeded: usize,
    pub failed: usize,
    pub total_bytes: u64,
}

impl ExtractionStats {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}
