//! Named groups of decoded tags.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::Display;

use super::describe::describe;
use super::tags::tag_name;
use super::{Rational, TagValue};
use crate::error::TagAccessError;

/// Which directory a tag belongs to. Tag ids are only unique within one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DirectoryKind {
    /// IFD0, Exif sub-IFD and Interoperability IFD of the `APP1` block
    Exif,
    /// GPS sub-IFD of the `APP1` block
    Gps,
    /// Baseline frame header (`SOF0`)
    Jpeg,
    /// Text comment (`COM`)
    JpegComment,
}

impl DirectoryKind {
    pub const ALL: [DirectoryKind; 4] = [Self::Exif, Self::Gps, Self::Jpeg, Self::JpegComment];

    pub fn name(self) -> &'static str {
        match self {
            Self::Exif => "Exif",
            Self::Gps => "GPS",
            Self::Jpeg => "Jpeg",
            Self::JpegComment => "JpegComment",
        }
    }

    /// Look a kind up by its name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for DirectoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A borrowed view of one tag within its directory.
#[derive(Debug, Clone, Copy)]
pub struct Tag<'a> {
    directory: &'a Directory,
    id: u16,
    value: &'a TagValue,
}

impl<'a> Tag<'a> {
    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn directory_name(&self) -> &'static str {
        self.directory.name()
    }

    pub fn value(&self) -> &'a TagValue {
        self.value
    }

    /// Human-readable tag name, or `Unknown tag (0x....)`.
    pub fn name(&self) -> String {
        match tag_name(self.directory.kind, self.id) {
            Some(name) => name.to_string(),
            None => format!("Unknown tag (0x{:04x})", self.id),
        }
    }

    /// Rendered description; falls back to the raw value string.
    pub fn description(&self) -> String {
        describe(self.directory, self.id).unwrap_or_else(|| self.value.to_string())
    }
}

/// An ordered collection of tags keyed by id, plus the non-fatal errors
/// recorded while it was decoded.
///
/// Tags decoded before an error stay in place; nothing is rolled back.
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    kind: DirectoryKind,
    tags: BTreeMap<u16, TagValue>,
    errors: Vec<String>,
}

impl Directory {
    pub fn new(kind: DirectoryKind) -> Self {
        Self {
            kind,
            tags: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn kind(&self) -> DirectoryKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Insert or replace a tag value.
    pub fn set(&mut self, id: u16, value: TagValue) {
        self.tags.insert(id, value);
    }

    pub fn contains(&self, id: u16) -> bool {
        self.tags.contains_key(&id)
    }

    pub fn get(&self, id: u16) -> Option<&TagValue> {
        self.tags.get(&id)
    }

    pub fn tag(&self, id: u16) -> Option<Tag<'_>> {
        self.tags.get(&id).map(|value| Tag {
            directory: self,
            id,
            value,
        })
    }

    /// Tags in ascending id order.
    pub fn tags(&self) -> impl Iterator<Item = Tag<'_>> {
        self.tags.iter().map(move |(&id, value)| Tag {
            directory: self,
            id,
            value,
        })
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn add_error(&mut self, error: impl Display) {
        self.errors.push(error.to_string());
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn lookup(&self, id: u16) -> Result<&TagValue, TagAccessError> {
        self.tags.get(&id).ok_or(TagAccessError::Missing(id))
    }

    fn mismatch(id: u16, expected: &'static str, actual: &TagValue) -> TagAccessError {
        TagAccessError::TypeMismatch {
            tag_id: id,
            expected,
            actual: actual.kind_name(),
        }
    }

    /// A single-component integer value.
    pub fn get_int(&self, id: u16) -> Result<i64, TagAccessError> {
        let value = self.lookup(id)?;
        value
            .as_int()
            .ok_or_else(|| Self::mismatch(id, "integer", value))
    }

    /// A single-component rational value.
    pub fn get_rational(&self, id: u16) -> Result<Rational, TagAccessError> {
        let value = self.lookup(id)?;
        value
            .as_rational()
            .ok_or_else(|| Self::mismatch(id, "rational", value))
    }

    pub fn get_text(&self, id: u16) -> Result<&str, TagAccessError> {
        let value = self.lookup(id)?;
        value.as_text().ok_or_else(|| Self::mismatch(id, "text", value))
    }

    pub fn get_bytes(&self, id: u16) -> Result<&[u8], TagAccessError> {
        let value = self.lookup(id)?;
        value
            .as_bytes()
            .ok_or_else(|| Self::mismatch(id, "byte array", value))
    }

    /// The raw value of any type rendered as a string.
    pub fn get_string(&self, id: u16) -> Result<String, TagAccessError> {
        self.lookup(id).map(TagValue::to_string)
    }

    /// The rendered description of a tag, if present.
    pub fn description(&self, id: u16) -> Option<String> {
        self.tag(id).map(|tag| tag.description())
    }

    /// `[<directory>] <tag name> = <description>` per tag, then
    /// `ERROR: <message>` per recorded error.
    pub fn dump_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .tags()
            .map(|tag| format!("[{}] {} = {}", self.name(), tag.name(), tag.description()))
            .collect();
        lines.extend(self.errors.iter().map(|e| format!("ERROR: {e}")));
        lines
    }
}

#[derive(Serialize)]
struct TagRecord<'a> {
    id: u16,
    name: String,
    description: String,
    value: &'a TagValue,
}

impl Serialize for Directory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tags: Vec<TagRecord<'_>> = self
            .tags()
            .map(|tag| TagRecord {
                id: tag.id(),
                name: tag.name(),
                description: tag.description(),
                value: tag.value(),
            })
            .collect();
        let mut state = serializer.serialize_struct("Directory", 3)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("tags", &tags)?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}
