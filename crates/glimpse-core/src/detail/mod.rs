//! Detail formatting: display lines for a selection of media.
//!
//! A selection of one item produces item facts (title, type, capture time,
//! album, location and camera settings read back from the file's EXIF
//! block). Any other selection is folded into one set and produces counts,
//! a time range and a location.

pub mod fallback;
pub mod geocode;
pub mod media;
pub mod strings;

pub use geocode::{geocoder_by_name, CoordinateGeocoder, LocationSubject, NoGeocoder, ReverseGeocoder};
pub use media::{MediaBucket, MediaItem, MediaSet, ParentSet, Range, Selection};
pub use strings::{EnglishStrings, StringId, StringLookup, TableStrings};

use chrono::NaiveDateTime;
use std::fmt::Write;
use std::sync::Arc;

use crate::config::DetailConfig;
use crate::decode::ExifDecoder;
use crate::metadata::tags::exif;
use crate::metadata::{exposure_program_name, metering_mode_name, Directory, DirectoryKind, TagValue};
use crate::pipeline::MetadataExtractor;

/// Produces detail lines for selections. Safe to share between threads.
pub struct DetailFormatter {
    strings: Box<dyn StringLookup>,
    geocoder: Arc<dyn ReverseGeocoder>,
    extractor: MetadataExtractor,
    date_format: String,
}

impl DetailFormatter {
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self {
            strings: Box::new(EnglishStrings),
            geocoder,
            extractor: MetadataExtractor::with_decoders(vec![Box::new(ExifDecoder)]),
            date_format: DetailConfig::default().date_format,
        }
    }

    /// Formatter configured from the `[detail]` section. Unknown geocoder
    /// names fall back to no geocoding. Labels missing from `[detail.labels]`
    /// stay English.
    pub fn from_config(config: &DetailConfig) -> Self {
        let geocoder: Arc<dyn ReverseGeocoder> = match geocoder_by_name(&config.geocoder) {
            Some(geocoder) => Arc::from(geocoder),
            None => {
                tracing::warn!("Unknown geocoder '{}', locations disabled", config.geocoder);
                Arc::new(NoGeocoder)
            }
        };
        let formatter = Self::new(geocoder).with_date_format(config.date_format.clone());
        if config.labels.is_empty() {
            formatter
        } else {
            formatter.with_strings(TableStrings::from_keys(&config.labels))
        }
    }

    pub fn with_strings(mut self, strings: impl StringLookup + 'static) -> Self {
        self.strings = Box::new(strings);
        self
    }

    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Detail lines for a selection. An empty selection has no details.
    pub fn populate(&self, selection: &Selection) -> Vec<String> {
        if selection.is_set_selection() && selection.len() == 1 {
            // A single whole set already carries its aggregates.
            return selection
                .first_set()
                .map(|set| self.set_details(set, 1))
                .unwrap_or_default();
        }
        if selection.is_set_selection() || selection.is_multiple_item_selection() {
            let mut union = MediaSet::new(0, "selection");
            for bucket in &selection.buckets {
                union.extend(bucket.selected_items().iter().cloned());
            }
            return self.set_details(&union, selection.len());
        }
        selection
            .first_item()
            .map(|item| self.item_details(item))
            .unwrap_or_default()
    }

    /// Lines for a set, counted as `original_sets` selected groups.
    pub fn set_details(&self, set: &MediaSet, original_sets: usize) -> Vec<String> {
        let mut lines = Vec::with_capacity(5);

        lines.push(self.count_line(original_sets, StringId::AlbumSelected, StringId::AlbumsSelected));
        lines.push(self.count_line(set.num_items(), StringId::ItemSelected, StringId::ItemsSelected));

        let (start, end) = match fallback::set_time_range(set) {
            Some((start, end)) => (self.format_time(start), self.format_time(end)),
            None => {
                let unknown = self.label(StringId::DateUnknown);
                (unknown.clone(), unknown)
            }
        };
        lines.push(format!("{}: {}", self.label(StringId::Start), start));
        lines.push(format!("{}: {}", self.label(StringId::End), end));

        let location = fallback::resolve_location(
            set.reverse_geocoded_location.as_deref(),
            set.is_lat_long_determined(),
            self.geocoder.as_ref(),
            LocationSubject::Set(set),
        );
        if let Some(location) = location {
            lines.push(format!("{}: {}", self.label(StringId::Location), location));
        }
        lines
    }

    /// Lines for a single item.
    pub fn item_details(&self, item: &MediaItem) -> Vec<String> {
        let mut lines = vec![
            format!("{}: {}", self.label(StringId::Title), item.caption),
            format!("{}: {}", self.label(StringId::Type), item.mime_type),
        ];

        let exif_dir = self.reread_exif(item);
        let exif_dir = exif_dir.as_ref();

        if let Some(size) = exif_dir.and_then(image_size) {
            lines.push(format!("Image Size: {size}"));
        }

        let taken_on = match fallback::taken_on(item, exif_dir) {
            Some(time) => self.format_time(time),
            None => self.label(StringId::DateUnknown),
        };
        lines.push(format!("{}: {}", self.label(StringId::TakenOn), taken_on));

        match &item.parent {
            Some(parent) => lines.push(format!("{}: {}", self.label(StringId::Album), parent.name)),
            None => lines.push(format!("{}:", self.label(StringId::Album))),
        }

        let location = fallback::resolve_location(
            item.reverse_geocoded_location.as_deref(),
            item.lat_long().is_some(),
            self.geocoder.as_ref(),
            LocationSubject::Item(item),
        );
        if let Some(location) = location {
            lines.push(format!("{}: {}", self.label(StringId::Location), location));
        }

        if let Some(dir) = exif_dir {
            lines.extend(camera_lines(dir));
        }
        lines
    }

    /// Exif directory read fresh from the item's file. Failure only costs
    /// the EXIF-derived lines.
    fn reread_exif(&self, item: &MediaItem) -> Option<Directory> {
        let path = item.file_path.as_deref()?;
        match self.extractor.extract(path) {
            Ok(metadata) => metadata.get(DirectoryKind::Exif).cloned(),
            Err(e) => {
                tracing::debug!("No EXIF re-read for {:?}: {}", path, e);
                None
            }
        }
    }

    fn label(&self, id: StringId) -> String {
        self.strings.lookup(id)
    }

    fn count_line(&self, count: usize, singular: StringId, plural: StringId) -> String {
        let id = if count == 1 { singular } else { plural };
        format!("{} {}", count, self.label(id))
    }

    fn format_time(&self, time: NaiveDateTime) -> String {
        let mut out = String::new();
        if write!(out, "{}", time.format(&self.date_format)).is_err() {
            tracing::debug!("Invalid date format '{}', using default", self.date_format);
            out = time.format(fallback::DEFAULT_DATE_FORMAT).to_string();
        }
        out
    }
}

/// `WxH` from the primary image tags, falling back to the Exif pixel
/// dimensions.
fn image_size(dir: &Directory) -> Option<String> {
    let dimension =
        |primary: u16, secondary: u16| non_empty(dir, primary).or_else(|| non_empty(dir, secondary));
    let width = dimension(exif::IMAGE_WIDTH, exif::EXIF_IMAGE_WIDTH)?;
    let height = dimension(exif::IMAGE_HEIGHT, exif::EXIF_IMAGE_HEIGHT)?;
    Some(format!("{width}x{height}"))
}

/// Raw value as trimmed text, or `None` if absent or blank.
fn non_empty(dir: &Directory, id: u16) -> Option<String> {
    let text = dir.get_string(id).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Rationals rendered in simplest form; other values as raw text.
fn simple_number(dir: &Directory, id: u16, allow_decimal: bool) -> Option<String> {
    match dir.get(id)? {
        TagValue::Rational(r) => Some(r.to_simple_string(allow_decimal)),
        _ => non_empty(dir, id),
    }
}

/// Camera facts in display order; absent fields produce no line.
fn camera_lines(dir: &Directory) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(maker) = non_empty(dir, exif::MAKE) {
        let camera = match non_empty(dir, exif::MODEL) {
            Some(model) if model.contains(&maker) => model,
            Some(model) => format!("{maker} {model}"),
            None => maker,
        };
        lines.push(format!("Camera: {camera}"));
    }

    if let Some(focal) = simple_number(dir, exif::FOCAL_LENGTH, true) {
        let mut line = format!("Focal Length: {focal} mm");
        if let Some(equivalent) = non_empty(dir, exif::FOCAL_LENGTH_35MM) {
            line.push_str(&format!(" (35mm equivalent: {equivalent}mm)"));
        }
        lines.push(line);
    }
    if let Some(aperture) = simple_number(dir, exif::FNUMBER, true) {
        lines.push(format!("Aperture: f/{aperture}"));
    }
    if let Some(exposure) = simple_number(dir, exif::EXPOSURE_TIME, false) {
        lines.push(format!("Exposure Time: {exposure} s"));
    }
    if let Some(iso) = non_empty(dir, exif::ISO_EQUIVALENT) {
        lines.push(format!("ISO Speed: {iso}"));
    }
    if let Some(bias) = simple_number(dir, exif::EXPOSURE_BIAS, true) {
        lines.push(format!("Exposure Bias: {bias} eV"));
    }
    if let Some(mode) = dir.get_int(exif::METERING_MODE).ok().and_then(metering_mode_name) {
        lines.push(format!("Metering Mode: {mode}"));
    }
    if let Some(program) = dir
        .get_int(exif::EXPOSURE_PROGRAM)
        .ok()
        .and_then(exposure_program_name)
    {
        lines.push(format!("Exposure: {program}"));
    }
    lines
}
