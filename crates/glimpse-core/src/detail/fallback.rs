//! Ordered fallback chains for timestamps and locations.
//!
//! Each chain is a fixed list of sources evaluated in order; the first source
//! that yields a value wins and later sources are not consulted.

use chrono::{DateTime, NaiveDateTime};

use super::geocode::{LocationSubject, ReverseGeocoder};
use super::media::{MediaItem, MediaSet, Range};
use crate::metadata::tags::exif;
use crate::metadata::Directory;

/// Layout used for rendered timestamps unless configured otherwise.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// EXIF `DateTime` layout.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Layout of a timestamp embedded in a caption such as `IMG_20230115_143000`.
pub const CAPTION_DATETIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Characters skipped before the caption timestamp (`IMG_`, `VID_`).
const CAPTION_PREFIX_LEN: usize = 4;
const CAPTION_TIMESTAMP_LEN: usize = 15;

/// A named data source.
struct Source<F> {
    name: &'static str,
    run: F,
}

fn first_present<F, T>(sources: &[Source<F>], mut call: impl FnMut(&F) -> Option<T>) -> Option<T> {
    sources.iter().find_map(|source| {
        let value = call(&source.run);
        if value.is_some() {
            tracing::trace!("Resolved by {}", source.name);
        }
        value
    })
}

/// Inputs of the "taken on" chain.
pub struct TakenOnInput<'a> {
    pub item: &'a MediaItem,
    /// Exif directory re-extracted from the item's file, if that worked
    pub exif: Option<&'a Directory>,
}

fn cached_local_time(input: &TakenOnInput<'_>) -> Option<NaiveDateTime> {
    input.item.local_time
}

fn exif_datetime(input: &TakenOnInput<'_>) -> Option<NaiveDateTime> {
    let text = input.exif?.get_text(exif::DATETIME).ok()?;
    NaiveDateTime::parse_from_str(text.trim(), EXIF_DATETIME_FORMAT).ok()
}

fn caption_timestamp(input: &TakenOnInput<'_>) -> Option<NaiveDateTime> {
    parse_caption_timestamp(&input.item.caption)
}

fn date_taken(input: &TakenOnInput<'_>) -> Option<NaiveDateTime> {
    from_millis(input.item.date_taken_ms?)
}

fn date_added(input: &TakenOnInput<'_>) -> Option<NaiveDateTime> {
    from_millis(input.item.date_added_ms()?)
}

type TakenOnSource = for<'a, 'b> fn(&'b TakenOnInput<'a>) -> Option<NaiveDateTime>;

const TAKEN_ON: [Source<TakenOnSource>; 5] = [
    Source {
        name: "cached local time",
        run: cached_local_time,
    },
    Source {
        name: "EXIF DateTime",
        run: exif_datetime,
    },
    Source {
        name: "caption timestamp",
        run: caption_timestamp,
    },
    Source {
        name: "date taken",
        run: date_taken,
    },
    Source {
        name: "date added",
        run: date_added,
    },
];

/// Resolve when an item was taken. `None` means every source was absent
/// and the caller shows the unknown placeholder.
pub fn taken_on(item: &MediaItem, exif: Option<&Directory>) -> Option<NaiveDateTime> {
    let input = TakenOnInput { item, exif };
    first_present(&TAKEN_ON, |source| source(&input))
}

/// Parse the 15 characters after a 4-character prefix. The prefix is
/// counted in characters, so it may be non-ASCII. Shorter captions, or
/// characters that do not fit the layout, yield `None`.
pub fn parse_caption_timestamp(caption: &str) -> Option<NaiveDateTime> {
    let (start, _) = caption.char_indices().nth(CAPTION_PREFIX_LEN)?;
    let text = caption.get(start..start + CAPTION_TIMESTAMP_LEN)?;
    NaiveDateTime::parse_from_str(text, CAPTION_DATETIME_FORMAT).ok()
}

/// Epoch milliseconds as UTC wall-clock time.
pub fn from_millis(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

type RangeSource = fn(&MediaSet) -> Option<Range<i64>>;

const SET_RANGE: [Source<RangeSource>; 2] = [
    Source {
        name: "capture timestamps",
        run: MediaSet::capture_range,
    },
    Source {
        name: "added timestamps",
        run: MediaSet::added_range,
    },
];

/// Resolve the start and end of a set. `None` means neither capture nor
/// added timestamps are available.
pub fn set_time_range(set: &MediaSet) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let range = first_present(&SET_RANGE, |source| source(set))?;
    Some((from_millis(range.min)?, from_millis(range.max)?))
}

/// Cached location first, otherwise ask the geocoder when coordinates are
/// known. Empty strings count as no location.
pub fn resolve_location(
    cached: Option<&str>,
    lat_long_determined: bool,
    geocoder: &dyn ReverseGeocoder,
    subject: LocationSubject<'_>,
) -> Option<String> {
    let location = match cached {
        Some(cached) => Some(cached.to_string()),
        None if lat_long_determined => geocoder.compute_location(subject),
        None => None,
    };
    location.filter(|s| !s.trim().is_empty())
}
