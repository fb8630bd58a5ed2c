//! Configuration validation with range checks.

use chrono::format::{Item, StrftimeItems};

use crate::detail::StringId;
use crate::error::ConfigError;

use super::Config;

const OUTPUT_FORMATS: [&str; 3] = ["text", "json", "jsonl"];
const LOG_FORMATS: [&str; 2] = ["pretty", "json"];
const GEOCODERS: [&str; 2] = ["coordinates", "none"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.parallel_workers must be > 0".into(),
            ));
        }
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.detail.date_format.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "detail.date_format must not be empty".into(),
            ));
        }
        if StrftimeItems::new(&self.detail.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::ValidationError(format!(
                "detail.date_format '{}' is not a valid strftime pattern",
                self.detail.date_format
            )));
        }
        if !GEOCODERS.contains(&self.detail.geocoder.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "detail.geocoder must be one of {:?}, got '{}'",
                GEOCODERS, self.detail.geocoder
            )));
        }
        if let Some(key) = self
            .detail
            .labels
            .keys()
            .find(|key| StringId::from_key(key).is_none())
        {
            return Err(ConfigError::ValidationError(format!(
                "detail.labels has unknown key '{key}'"
            )));
        }
        if !OUTPUT_FORMATS.contains(&self.output.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be one of {:?}, got '{}'",
                OUTPUT_FORMATS, self.output.format
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be one of {:?}, got '{}'",
                LOG_FORMATS, self.logging.format
            )));
        }
        Ok(())
    }
}
