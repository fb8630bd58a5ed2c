//! Error types for the Glimpse metadata pipeline.
//!
//! Errors are organized by stage. Segment-level errors (`SegmentError`) are
//! what the scanner and decoders return; the orchestrator swallows them per
//! segment. Tag-level errors (`TagDecodeError`) never propagate at all: they
//! are recorded on the owning directory and decoding moves on.

use std::path::PathBuf;
use thiserror::Error;

use crate::jpeg::Marker;

/// Top-level error type for Glimpse operations.
#[derive(Error, Debug)]
pub enum GlimpseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File-level pipeline errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Segment scanning or decoding errors
    #[error("Segment error: {0}")]
    Segment(#[from] SegmentError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while walking a JPEG stream or decoding one of its segments.
#[derive(Error, Debug)]
pub enum SegmentError {
    /// Structural corruption: a length or header shorter than required.
    #[error("Malformed stream: {0}")]
    MalformedStream(String),

    /// The requested marker did not appear before end of stream or scan data.
    #[error("Segment {0} not found")]
    SegmentNotFound(Marker),

    /// The underlying stream could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SegmentError {
    /// Create a malformed stream error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedStream(msg.into())
    }
}

/// A single tag entry that could not be decoded.
///
/// Recorded on the directory (as its display string); the remaining entries
/// are still decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Tag 0x{tag_id:04x}: {message}")]
pub struct TagDecodeError {
    pub tag_id: u16,
    pub message: String,
}

impl TagDecodeError {
    pub fn new(tag_id: u16, message: impl Into<String>) -> Self {
        Self {
            tag_id,
            message: message.into(),
        }
    }
}

/// Typed tag lookups fail explicitly instead of coercing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagAccessError {
    /// No tag with this id in the directory
    #[error("Tag 0x{0:04x} is not present")]
    Missing(u16),

    /// The tag exists but holds a different kind of value
    #[error("Tag 0x{tag_id:04x} holds {actual}, expected {expected}")]
    TypeMismatch {
        tag_id: u16,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// File-level errors raised before a stream is scanned.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// File does not start with a JPEG start-of-image marker
    #[error("Not a JPEG file: {0}")]
    NotJpeg(PathBuf),

    /// The file could not be opened or read
    #[error("Cannot read {path}: {message}")]
    Read { path: PathBuf, message: String },
}

/// Convenience type alias for Glimpse results.
pub type Result<T> = std::result::Result<T, GlimpseError>;

/// Convenience type alias for segment-level results.
pub type SegmentResult<T> = std::result::Result<T, SegmentError>;
