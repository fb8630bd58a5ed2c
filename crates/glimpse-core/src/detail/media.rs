//! Media read model consumed by the detail formatter.
//!
//! Timestamps are epoch milliseconds unless the field name says otherwise.
//! An absent optional field means "not valid"; there are no sentinel values.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::metadata::tags::gps;
use crate::metadata::{decimal_degrees, DirectoryKind, Metadata, TagValue};

/// The set an item belongs to, as seen from the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentSet {
    pub id: u64,
    pub name: String,
}

/// One photo or video.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaItem {
    pub id: u64,
    /// Display title, typically the file name without extension
    pub caption: String,
    pub mime_type: String,
    pub file_path: Option<PathBuf>,
    /// Capture time already resolved to local wall-clock time
    pub local_time: Option<NaiveDateTime>,
    pub date_taken_ms: Option<i64>,
    pub date_added_secs: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Previously computed reverse-geocoded location
    pub reverse_geocoded_location: Option<String>,
    pub parent: Option<ParentSet>,
}

impl MediaItem {
    pub fn new(id: u64, caption: impl Into<String>) -> Self {
        Self {
            id,
            caption: caption.into(),
            ..Self::default()
        }
    }

    /// Both coordinates, when known.
    pub fn lat_long(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn date_added_ms(&self) -> Option<i64> {
        self.date_added_secs.and_then(|secs| secs.checked_mul(1000))
    }

    /// Build an item for a file on disk.
    ///
    /// The caption is the file stem, the added time is the modification
    /// time, and coordinates come from the GPS directory when one was
    /// extracted.
    pub fn from_file(id: u64, path: &Path, metadata: Option<&Metadata>) -> std::io::Result<Self> {
        let modified = std::fs::metadata(path)?.modified()?;
        let date_added_secs = modified
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|d| i64::try_from(d.as_secs()).ok());

        let (latitude, longitude) = match metadata.and_then(gps_position) {
            Some((lat, long)) => (Some(lat), Some(long)),
            None => (None, None),
        };

        let parent = path.parent().and_then(|dir| {
            let name = dir.file_name()?.to_string_lossy().into_owned();
            Some(ParentSet { id: 0, name })
        });

        Ok(Self {
            id,
            caption: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            mime_type: mime_type_for(path).to_string(),
            file_path: Some(path.to_path_buf()),
            date_added_secs,
            latitude,
            longitude,
            parent,
            ..Self::default()
        })
    }
}

/// MIME type from the file extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg" | "jpe" | "jfif") => "image/jpeg",
        Some("png") => "image/png",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

/// Signed decimal latitude and longitude from the GPS directory.
pub fn gps_position(metadata: &Metadata) -> Option<(f64, f64)> {
    let dir = metadata.get(DirectoryKind::Gps)?;
    let coordinate = |value_tag: u16, ref_tag: u16, negative: &str| -> Option<f64> {
        let degrees = match dir.get(value_tag)? {
            TagValue::Rationals(parts) => decimal_degrees(parts)?,
            _ => return None,
        };
        let reference = dir.get_text(ref_tag).unwrap_or_default().trim();
        Some(if reference.eq_ignore_ascii_case(negative) {
            -degrees
        } else {
            degrees
        })
    };
    Some((
        coordinate(gps::LATITUDE, gps::LATITUDE_REF, "S")?,
        coordinate(gps::LONGITUDE, gps::LONGITUDE_REF, "W")?,
    ))
}

/// Inclusive `[min, max]` tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Range<T> {
    fn include(range: &mut Option<Self>, value: T) {
        match range {
            Some(r) => {
                if value < r.min {
                    r.min = value;
                }
                if value > r.max {
                    r.max = value;
                }
            }
            None => *range = Some(Range { min: value, max: value }),
        }
    }
}

/// A named group of items (an album) with aggregates maintained as items
/// are added.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaSet {
    pub id: u64,
    pub name: String,
    items: Vec<MediaItem>,
    capture_range: Option<Range<i64>>,
    added_range: Option<Range<i64>>,
    latitude_range: Option<Range<f64>>,
    longitude_range: Option<Range<f64>>,
    /// Previously computed reverse-geocoded location
    pub reverse_geocoded_location: Option<String>,
}

impl MediaSet {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_item(&mut self, item: MediaItem) {
        if let Some(taken) = item.date_taken_ms {
            Range::include(&mut self.capture_range, taken);
        }
        if let Some(added) = item.date_added_ms() {
            Range::include(&mut self.added_range, added);
        }
        if let Some((lat, long)) = item.lat_long() {
            Range::include(&mut self.latitude_range, lat);
            Range::include(&mut self.longitude_range, long);
        }
        self.items.push(item);
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    /// Min/max capture time of the items, when any item has one.
    pub fn capture_range(&self) -> Option<Range<i64>> {
        self.capture_range
    }

    /// Min/max added time of the items in milliseconds.
    pub fn added_range(&self) -> Option<Range<i64>> {
        self.added_range
    }

    /// True once at least one item contributed coordinates.
    pub fn is_lat_long_determined(&self) -> bool {
        self.latitude_range.is_some()
    }

    /// Bounding box of the items' coordinates as (latitude, longitude).
    pub fn bounds(&self) -> Option<(Range<f64>, Range<f64>)> {
        self.latitude_range.zip(self.longitude_range)
    }
}

impl Extend<MediaItem> for MediaSet {
    fn extend<I: IntoIterator<Item = MediaItem>>(&mut self, iter: I) {
        for item in iter {
            self.add_item(item);
        }
    }
}

/// One group of a selection: either a whole set, or explicit items picked
/// from a set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaBucket {
    pub set: Option<MediaSet>,
    /// Empty when the whole set is selected
    pub items: Vec<MediaItem>,
}

impl MediaBucket {
    pub fn whole_set(set: MediaSet) -> Self {
        Self {
            set: Some(set),
            items: Vec::new(),
        }
    }

    pub fn items(set: Option<MediaSet>, items: Vec<MediaItem>) -> Self {
        Self { set, items }
    }

    pub fn is_set_selection(&self) -> bool {
        self.items.is_empty()
    }

    /// The selected items: the listed ones, or all of the set's.
    pub fn selected_items(&self) -> &[MediaItem] {
        if self.is_set_selection() {
            self.set.as_ref().map(MediaSet::items).unwrap_or_default()
        } else {
            &self.items
        }
    }
}

/// What the user has selected: one bucket per originally selected group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    pub buckets: Vec<MediaBucket>,
}

impl Selection {
    pub fn new(buckets: Vec<MediaBucket>) -> Self {
        Self { buckets }
    }

    pub fn single_item(item: MediaItem) -> Self {
        Self::new(vec![MediaBucket::items(None, vec![item])])
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// More than one group, or one group that is a whole set.
    pub fn is_set_selection(&self) -> bool {
        match self.buckets.as_slice() {
            [] => false,
            [only] => only.is_set_selection(),
            _ => true,
        }
    }

    /// One group listing more than one item.
    pub fn is_multiple_item_selection(&self) -> bool {
        matches!(self.buckets.as_slice(), [only] if only.items.len() > 1)
    }

    pub fn first_set(&self) -> Option<&MediaSet> {
        self.buckets.first().and_then(|b| b.set.as_ref())
    }

    pub fn first_item(&self) -> Option<&MediaItem> {
        self.buckets.first().and_then(|b| b.items.first())
    }
}
