//! Finding JPEG files under the paths given on the command line.
//!
//! A candidate needs a configured extension and the `FF D8 FF` signature.
//! Candidates that fail the signature sniff, or cannot be read, are kept
//! aside with the reason so callers can report them.

use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::validate::Validator;
use crate::config::ProcessingConfig;

/// Finds JPEG files by extension and signature.
pub struct FileDiscovery {
    extensions: Vec<String>,
}

/// A JPEG file ready for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Why a candidate was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// JPEG extension, but the stream does not start with SOI
    NotJpeg,
    /// The file or directory entry could not be read
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotJpeg => write!(f, "no JPEG start-of-image signature"),
            SkipReason::Unreadable(message) => write!(f, "unreadable: {message}"),
        }
    }
}

/// A candidate left out of the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of one discovery run, both lists sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub files: Vec<DiscoveredFile>,
    pub skipped: Vec<SkippedFile>,
}

impl FileDiscovery {
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            extensions: config
                .supported_formats
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        }
    }

    /// Discover JPEG files at a path: the path itself if it is a file,
    /// otherwise everything below it.
    pub fn discover(&self, path: &Path) -> Discovery {
        let mut found = Discovery::default();

        if path.is_file() {
            if self.has_jpeg_extension(path) {
                self.consider(path.to_path_buf(), &mut found);
            }
            return found;
        }

        for entry in WalkDir::new(path).follow_links(true) {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    if self.has_jpeg_extension(entry.path()) {
                        self.consider(entry.into_path(), &mut found);
                    }
                }
                Ok(_) => {}
                Err(e) => found.skipped.push(SkippedFile {
                    path: e.path().map(Path::to_path_buf).unwrap_or_else(|| path.to_path_buf()),
                    reason: SkipReason::Unreadable(e.to_string()),
                }),
            }
        }

        found.files.sort_by(|a, b| a.path.cmp(&b.path));
        found.skipped.sort_by(|a, b| a.path.cmp(&b.path));
        found
    }

    /// Check the extension against the configured list, ignoring case.
    pub fn has_jpeg_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    fn consider(&self, path: PathBuf, found: &mut Discovery) {
        let sniffed = std::fs::metadata(&path)
            .and_then(|meta| Ok((meta.len(), Validator::has_jpeg_signature(&path)?)));
        match sniffed {
            Ok((size, true)) => found.files.push(DiscoveredFile { path, size }),
            Ok((_, false)) => {
                tracing::debug!("{:?} has a JPEG extension but no SOI signature", path);
                found.skipped.push(SkippedFile {
                    path,
                    reason: SkipReason::NotJpeg,
                });
            }
            Err(e) => found.skipped.push(SkippedFile {
                path,
                reason: SkipReason::Unreadable(e.to_string()),
            }),
        }
    }
}
