//! Tag directory model.
//!
//! A [`Metadata`] holds one [`Directory`] per decoded segment kind. Each
//! directory maps tag ids to typed [`TagValue`]s and carries the non-fatal
//! errors recorded while decoding it.

mod describe;
mod directory;
pub mod tags;
mod value;

pub use describe::{decimal_degrees, exposure_program_name, metering_mode_name};
pub use directory::{Directory, DirectoryKind, Tag};
pub use value::{Rational, TagValue};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// All directories extracted from one stream, keyed by kind.
///
/// Built fresh for each extraction and not modified after it is returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    directories: BTreeMap<DirectoryKind, Directory>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory, replacing any existing one of the same kind.
    pub fn insert(&mut self, directory: Directory) {
        self.directories.insert(directory.kind(), directory);
    }

    pub fn get(&self, kind: DirectoryKind) -> Option<&Directory> {
        self.directories.get(&kind)
    }

    /// Look a directory up by its name, e.g. `"Exif"`.
    pub fn get_by_name(&self, name: &str) -> Option<&Directory> {
        DirectoryKind::from_name(name).and_then(|kind| self.get(kind))
    }

    pub fn contains(&self, kind: DirectoryKind) -> bool {
        self.directories.contains_key(&kind)
    }

    pub fn directories(&self) -> impl Iterator<Item = &Directory> {
        self.directories.values()
    }

    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    /// True if any directory recorded a decode error.
    pub fn has_errors(&self) -> bool {
        self.directories.values().any(Directory::has_errors)
    }

    /// Text dump of every directory, one line per tag or error.
    pub fn dump_lines(&self) -> Vec<String> {
        self.directories
            .values()
            .flat_map(Directory::dump_lines)
            .collect()
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.directories.len()))?;
        for directory in self.directories.values() {
            map.serialize_entry(directory.name(), directory)?;
        }
        map.end()
    }
}
