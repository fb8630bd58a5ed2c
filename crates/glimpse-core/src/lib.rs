//! Glimpse Core - JPEG metadata extraction and photo detail formatting.
//!
//! Glimpse scans a JPEG stream for its metadata segments, decodes them into
//! named tag directories, and turns those into display lines for one photo or
//! a selection of albums.
//!
//! # Architecture
//!
//! ```text
//! JPEG bytes → Segment scan → Decoders (EXIF, SOF0, COM) → Metadata → Detail lines
//! ```
//!
//! Extraction is synchronous and keeps no state between calls, so separate
//! files can be processed on separate threads.
//!
//! # Usage
//!
//! ```rust,ignore
//! use glimpse_core::{Config, Glimpse};
//!
//! fn main() -> glimpse_core::Result<()> {
//!     let glimpse = Glimpse::new(Config::load()?);
//!
//!     let file = glimpse.extract("./IMG_0001.jpg".as_ref())?;
//!     for line in file.directories.dump_lines() {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod decode;
pub mod detail;
pub mod error;
pub mod jpeg;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod types;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use config::Config;
pub use detail::{DetailFormatter, MediaBucket, MediaItem, MediaSet, Selection};
pub use error::{
    ConfigError, GlimpseError, PipelineError, Result, SegmentError, SegmentResult, TagAccessError,
    TagDecodeError,
};
pub use jpeg::{Marker, SegmentReader};
pub use metadata::{Directory, DirectoryKind, Metadata, Rational, TagValue};
pub use output::{OutputFormat, OutputWriter, TextRender};
pub use pipeline::{FileDiscovery, MetadataExtractor, Validator};
pub use types::{DetailReport, ExtractionStats, FileMetadata};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use detail::ParentSet;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main entry point: validated extraction and detail formatting for files
/// on disk.
pub struct Glimpse {
    config: Config,
    validator: Validator,
    extractor: MetadataExtractor,
    formatter: DetailFormatter,
}

impl Glimpse {
    /// Create a new Glimpse instance with the given configuration.
    pub fn new(config: Config) -> Self {
        tracing::debug!("Initializing Glimpse v{}", VERSION);
        Self {
            validator: Validator::new(config.limits.clone()),
            extractor: MetadataExtractor::new(),
            formatter: DetailFormatter::from_config(&config.detail),
            config,
        }
    }

    /// Create a new Glimpse instance with the configuration file, if any.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(Config::load()?))
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn formatter(&self) -> &DetailFormatter {
        &self.formatter
    }

    /// Validate a file and extract its metadata.
    pub fn extract(&self, path: &Path) -> Result<FileMetadata> {
        self.validator.validate(path)?;
        let directories = self.extractor.extract(path)?;
        let file_size = std::fs::metadata(path)?.len();
        tracing::debug!(
            "{:?}: {} directories{}",
            path,
            directories.len(),
            if directories.has_errors() { " with errors" } else { "" }
        );
        Ok(FileMetadata {
            file_path: path.to_path_buf(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            file_size,
            directories,
        })
    }

    /// Build a media item for a file, with coordinates from its GPS block.
    pub fn media_item(&self, id: u64, path: &Path) -> Result<MediaItem> {
        self.validator.validate(path)?;
        let metadata = match self.extractor.extract(path) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::debug!("Building {:?} without metadata: {}", path, e);
                None
            }
        };
        Ok(MediaItem::from_file(id, path, metadata.as_ref())?)
    }

    /// Group files into a selection: a single item for one file, otherwise
    /// one whole-set bucket per containing directory.
    pub fn selection(&self, paths: &[PathBuf]) -> Result<Selection> {
        if let [only] = paths {
            return Ok(Selection::single_item(self.media_item(0, only)?));
        }

        let mut sets: BTreeMap<PathBuf, MediaSet> = BTreeMap::new();
        for (index, path) in paths.iter().enumerate() {
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            let next_id = sets.len() as u64;
            let set = sets.entry(dir.clone()).or_insert_with(|| {
                let name = dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                MediaSet::new(next_id, name)
            });
            let mut item = self.media_item(index as u64, path)?;
            item.parent = Some(ParentSet {
                id: set.id,
                name: set.name.clone(),
            });
            set.add_item(item);
        }

        Ok(Selection::new(
            sets.into_values().map(MediaBucket::whole_set).collect(),
        ))
    }

    /// Detail lines for the given files.
    pub fn details(&self, paths: &[PathBuf]) -> Result<DetailReport> {
        let selection = self.selection(paths)?;
        Ok(DetailReport {
            files: paths.to_vec(),
            details: self.formatter.populate(&selection),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{camera_exif, JpegBuilder};

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_glimpse_new() {
        let glimpse = Glimpse::new(Config::default());
        assert_eq!(glimpse.config().processing.parallel_workers, 4);
    }

    #[test]
    fn test_extract_rejects_non_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, b"GIF89a").unwrap();
        let err = Glimpse::new(Config::default()).extract(&path).unwrap_err();
        assert!(matches!(err, GlimpseError::Pipeline(PipelineError::NotJpeg(_))));
    }

    #[test]
    fn test_extract_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("IMG_0001.jpg");
        let bytes = JpegBuilder::new().exif(&camera_exif()).sof0(64, 48).build();
        std::fs::write(&path, &bytes).unwrap();

        let file = Glimpse::new(Config::default()).extract(&path).unwrap();
        assert_eq!(file.file_name, "IMG_0001.jpg");
        assert_eq!(file.file_size, bytes.len() as u64);
        assert_eq!(file.directories.len(), 2);
    }

    #[test]
    fn test_selection_groups_by_directory() {
        let root = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for (album, name) in [("Paris", "a.jpg"), ("Rome", "b.jpg"), ("Paris", "c.jpg")] {
            let dir = root.path().join(album);
            std::fs::create_dir_all(&dir).unwrap();
            let path = dir.join(name);
            std::fs::write(&path, JpegBuilder::new().build()).unwrap();
            paths.push(path);
        }

        let glimpse = Glimpse::new(Config::default());
        let selection = glimpse.selection(&paths).unwrap();
        assert_eq!(selection.len(), 2);
        assert!(selection.is_set_selection());
        let paris = selection.first_set().unwrap();
        assert_eq!(paris.name, "Paris");
        assert_eq!(paris.num_items(), 2);

        let report = glimpse.details(&paths).unwrap();
        assert_eq!(report.details[0], "2 albums selected");
        assert_eq!(report.details[1], "3 items selected");
    }

    #[test]
    fn test_single_file_is_item_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("IMG_20230115_143000.jpg");
        std::fs::write(&path, JpegBuilder::new().build()).unwrap();

        let report = Glimpse::new(Config::default()).details(&[path]).unwrap();
        assert_eq!(report.details[0], "Title: IMG_20230115_143000");
        assert_eq!(report.details[1], "Type: image/jpeg");
        assert_eq!(report.details[2], "Taken on: 2023-01-15 14:30:00");
    }
}
