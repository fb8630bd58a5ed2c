//! Metadata extraction: every decoder against one scanned stream.

use std::path::Path;

use crate::decode::{default_decoders, SegmentDecoder};
use crate::error::{SegmentError, SegmentResult};
use crate::jpeg::SegmentReader;
use crate::metadata::Metadata;

/// Runs the segment decoders against a JPEG stream and gathers their
/// directories.
///
/// A missing segment or a failed decode only costs that segment's
/// directories; the others are still returned.
pub struct MetadataExtractor {
    decoders: Vec<Box<dyn SegmentDecoder>>,
}

impl MetadataExtractor {
    /// Extractor with the EXIF, frame and comment decoders.
    pub fn new() -> Self {
        Self {
            decoders: default_decoders(),
        }
    }

    /// Extractor with a custom decoder set.
    pub fn with_decoders(decoders: Vec<Box<dyn SegmentDecoder>>) -> Self {
        Self { decoders }
    }

    /// Extract from a file on disk.
    ///
    /// Fails only if the file cannot be read or does not start with SOI.
    pub fn extract(&self, path: &Path) -> SegmentResult<Metadata> {
        let reader = SegmentReader::open(path)?;
        tracing::debug!("Extracting metadata from {:?} ({} bytes)", path, reader.len());
        Ok(self.extract_from(&reader))
    }

    /// Extract from an in-memory stream.
    pub fn extract_bytes(&self, bytes: impl Into<Vec<u8>>) -> SegmentResult<Metadata> {
        let reader = SegmentReader::new(bytes)?;
        Ok(self.extract_from(&reader))
    }

    /// Extract from an already opened stream. Never fails: a stream with no
    /// decodable segments yields an empty `Metadata`.
    pub fn extract_from(&self, reader: &SegmentReader) -> Metadata {
        let mut metadata = Metadata::new();
        for decoder in &self.decoders {
            self.run_decoder(decoder.as_ref(), reader, &mut metadata);
        }
        metadata
    }

    /// Feed the first accepted occurrence of the decoder's marker to it.
    fn run_decoder(&self, decoder: &dyn SegmentDecoder, reader: &SegmentReader, metadata: &mut Metadata) {
        let marker = decoder.marker();
        for occurrence in 0.. {
            let payload = match reader.read_segment_at(marker, occurrence) {
                Ok(payload) => payload,
                Err(SegmentError::SegmentNotFound(_)) => {
                    tracing::debug!("No {} segment for the {} decoder", marker, decoder.name());
                    return;
                }
                Err(e) => {
                    tracing::warn!("Scanning for {} failed, skipping: {}", marker, e);
                    return;
                }
            };

            if !decoder.accepts(payload) {
                tracing::debug!(
                    "{} occurrence {} is not for the {} decoder",
                    marker,
                    occurrence,
                    decoder.name()
                );
                continue;
            }

            match decoder.decode(payload) {
                Ok(directories) => {
                    for directory in directories {
                        if directory.has_errors() {
                            tracing::debug!(
                                "{} directory decoded with {} errors",
                                directory.name(),
                                directory.errors().len()
                            );
                        }
                        metadata.insert(directory);
                    }
                }
                Err(e) => {
                    tracing::warn!("{} decoder failed on {}: {}", decoder.name(), marker, e);
                }
            }
            return;
        }
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}
