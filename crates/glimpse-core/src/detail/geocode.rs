//! Reverse geocoding collaborators.
//!
//! Implementations are shared between concurrent formatter calls, hence the
//! `Send + Sync` bound. Rate limiting is the implementation's business.

use super::media::{MediaItem, MediaSet};

/// What a location is being computed for.
#[derive(Debug, Clone, Copy)]
pub enum LocationSubject<'a> {
    Item(&'a MediaItem),
    Set(&'a MediaSet),
}

pub trait ReverseGeocoder: Send + Sync {
    /// A display location, or `None` if nothing could be resolved.
    fn compute_location(&self, subject: LocationSubject<'_>) -> Option<String>;
}

/// Never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeocoder;

impl ReverseGeocoder for NoGeocoder {
    fn compute_location(&self, _subject: LocationSubject<'_>) -> Option<String> {
        None
    }
}

/// Renders decimal coordinates. A set resolves to the centre of its
/// bounding box.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateGeocoder {
    precision: usize,
}

impl CoordinateGeocoder {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }
}

impl Default for CoordinateGeocoder {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ReverseGeocoder for CoordinateGeocoder {
    fn compute_location(&self, subject: LocationSubject<'_>) -> Option<String> {
        let (lat, long) = match subject {
            LocationSubject::Item(item) => item.lat_long()?,
            LocationSubject::Set(set) => {
                let (lat, long) = set.bounds()?;
                ((lat.min + lat.max) / 2.0, (long.min + long.max) / 2.0)
            }
        };
        let p = self.precision;
        Some(format!("{lat:.p$}, {long:.p$}"))
    }
}

/// Geocoder selected by name: `"coordinates"` or `"none"`.
pub fn geocoder_by_name(name: &str) -> Option<Box<dyn ReverseGeocoder>> {
    match name {
        "coordinates" => Some(Box::new(CoordinateGeocoder::default())),
        "none" => Some(Box::new(NoGeocoder)),
        _ => None,
    }
}
