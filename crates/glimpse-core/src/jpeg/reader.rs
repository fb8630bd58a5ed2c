//! Segment scanner over an in-memory JPEG stream.
//!
//! A JPEG stream is a sequence of `0xFF xx` markers. Apart from the standalone
//! markers, each is followed by a big-endian `u16` length (counting the length
//! field itself) and the payload. Segments are skipped by their declared
//! length, never by sniffing for the next `0xFF`. Scanning stops at the
//! start-of-scan marker because the entropy-coded data after it is not
//! length-prefixed.

use std::io::Read;
use std::path::Path;

use super::Marker;
use crate::error::{SegmentError, SegmentResult};

/// One length-prefixed segment found while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Marker code that introduced the segment
    pub marker: Marker,
    /// Byte offset of the marker's `0xFF` prefix within the stream
    pub offset: usize,
    /// Payload bytes, excluding the marker and length field
    pub payload: &'a [u8],
}

/// Reads marker segments from one immutable JPEG byte stream.
///
/// Every lookup starts a fresh scan from just after the SOI marker, so the
/// same marker can be requested any number of times.
#[derive(Debug, Clone)]
pub struct SegmentReader {
    data: Vec<u8>,
}

impl SegmentReader {
    /// Wrap an in-memory stream. Fails if it does not begin with SOI.
    pub fn new(data: impl Into<Vec<u8>>) -> SegmentResult<Self> {
        let data = data.into();
        if data.len() < 2 || data[0] != 0xFF || data[1] != Marker::SOI.0 {
            return Err(SegmentError::malformed(
                "stream does not begin with a JPEG start-of-image marker",
            ));
        }
        Ok(Self { data })
    }

    /// Read a whole file into memory and wrap it.
    pub fn open(path: &Path) -> SegmentResult<Self> {
        Self::new(std::fs::read(path)?)
    }

    /// Drain a reader into memory and wrap it.
    pub fn from_reader<R: Read>(mut reader: R) -> SegmentResult<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::new(data)
    }

    /// Total stream length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Payload of the first segment with the given marker.
    pub fn read_segment(&self, marker: Marker) -> SegmentResult<&[u8]> {
        self.read_segment_at(marker, 0)
    }

    /// Payload of the `occurrence`-th (zero-based) segment with the given marker.
    pub fn read_segment_at(&self, marker: Marker, occurrence: usize) -> SegmentResult<&[u8]> {
        let mut seen = 0;
        for segment in self.segments() {
            let segment = segment?;
            if segment.marker != marker {
                tracing::trace!(
                    "Skipping {} segment at offset {} ({} bytes)",
                    segment.marker,
                    segment.offset,
                    segment.payload.len()
                );
                continue;
            }
            if seen == occurrence {
                tracing::trace!("Found {} segment at offset {}", marker, segment.offset);
                return Ok(segment.payload);
            }
            seen += 1;
        }
        Err(SegmentError::SegmentNotFound(marker))
    }

    /// Iterate the length-prefixed segments preceding the scan data.
    ///
    /// Yields at most one error, after which the iterator is exhausted.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            data: &self.data,
            pos: 2,
            done: false,
        }
    }
}

/// Iterator returned by [`SegmentReader::segments`].
pub struct Segments<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Segments<'a> {
    fn fail(&mut self, message: String) -> Option<SegmentResult<Segment<'a>>> {
        self.done = true;
        Some(Err(SegmentError::MalformedStream(message)))
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = SegmentResult<Segment<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;
        while !self.done {
            if self.pos >= data.len() {
                self.done = true;
                return None;
            }
            if data[self.pos] != 0xFF {
                let message = format!(
                    "expected marker prefix 0xFF at offset {}, found 0x{:02X}",
                    self.pos, data[self.pos]
                );
                return self.fail(message);
            }

            // Any number of 0xFF fill bytes may precede the marker code.
            let mut cursor = self.pos;
            while cursor < data.len() && data[cursor] == 0xFF {
                cursor += 1;
            }
            if cursor >= data.len() {
                self.done = true;
                return None;
            }
            let marker = Marker(data[cursor]);
            let offset = cursor - 1;
            cursor += 1;

            if marker == Marker::EOI || marker == Marker::SOS {
                self.done = true;
                return None;
            }
            if marker.is_standalone() {
                self.pos = cursor;
                continue;
            }

            if cursor + 2 > data.len() {
                return self.fail(format!(
                    "{marker} segment at offset {offset} is missing its length field"
                ));
            }
            let length = u16::from_be_bytes([data[cursor], data[cursor + 1]]) as usize;
            if length < 2 {
                return self.fail(format!(
                    "{marker} segment at offset {offset} declares length {length}, shorter than its length field"
                ));
            }
            let remaining = data.len() - cursor;
            if length > remaining {
                return self.fail(format!(
                    "{marker} segment at offset {offset} declares {length} bytes but only {remaining} remain"
                ));
            }

            let end = cursor + length;
            self.pos = end;
            return Some(Ok(Segment {
                marker,
                offset,
                payload: &data[cursor + 2..end],
            }));
        }
        None
    }
}
