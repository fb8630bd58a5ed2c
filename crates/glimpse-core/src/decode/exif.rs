//! EXIF/TIFF decoding of the `APP1` segment.
//!
//! Layout: the 6-byte `Exif\0\0` preamble, then a TIFF structure whose first
//! two bytes (`II` or `MM`) fix the byte order of everything after them.
//! Offsets inside the TIFF structure are relative to its first byte.
//!
//! A malformed entry is recorded on its directory and the walk carries on
//! with the next entry.

use std::collections::{HashSet, VecDeque};

use super::SegmentDecoder;
use crate::error::{SegmentError, SegmentResult, TagDecodeError};
use crate::jpeg::Marker;
use crate::metadata::tags::exif;
use crate::metadata::{Directory, DirectoryKind, Rational, TagValue};

/// Fixed preamble of an EXIF `APP1` payload.
pub const EXIF_PREAMBLE: &[u8; 6] = b"Exif\0\0";

const TIFF_MAGIC: u16 = 42;
const ENTRY_SIZE: usize = 12;

/// Byte order declared by the TIFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    fn from_marker(marker: &[u8]) -> Option<Self> {
        match marker {
            b"II" => Some(Self::LittleEndian),
            b"MM" => Some(Self::BigEndian),
            _ => None,
        }
    }

    fn u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::LittleEndian => u16::from_le_bytes(bytes),
            Self::BigEndian => u16::from_be_bytes(bytes),
        }
    }

    fn u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::LittleEndian => u32::from_le_bytes(bytes),
            Self::BigEndian => u32::from_be_bytes(bytes),
        }
    }

    fn u64(self, bytes: [u8; 8]) -> u64 {
        match self {
            Self::LittleEndian => u64::from_le_bytes(bytes),
            Self::BigEndian => u64::from_be_bytes(bytes),
        }
    }
}

/// TIFF field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Byte,
    Ascii,
    Short,
    Long,
    Rational,
    SByte,
    Undefined,
    SShort,
    SLong,
    SRational,
    Float,
    Double,
}

impl Format {
    fn from_code(code: u16) -> Option<Self> {
        let format = match code {
            1 => Self::Byte,
            2 => Self::Ascii,
            3 => Self::Short,
            4 => Self::Long,
            5 => Self::Rational,
            6 => Self::SByte,
            7 => Self::Undefined,
            8 => Self::SShort,
            9 => Self::SLong,
            10 => Self::SRational,
            11 => Self::Float,
            12 => Self::Double,
            _ => return None,
        };
        Some(format)
    }

    /// Bytes per component.
    fn size(self) -> usize {
        match self {
            Self::Byte | Self::Ascii | Self::SByte | Self::Undefined => 1,
            Self::Short | Self::SShort => 2,
            Self::Long | Self::SLong | Self::Float => 4,
            Self::Rational | Self::SRational | Self::Double => 8,
        }
    }
}

/// Bounds-checked reads over the TIFF structure.
#[derive(Clone, Copy)]
struct Tiff<'a> {
    data: &'a [u8],
    order: ByteOrder,
}

impl<'a> Tiff<'a> {
    fn slice(&self, offset: usize, len: usize) -> Option<&'a [u8]> {
        let end = offset.checked_add(len)?;
        self.data.get(offset..end)
    }

    fn u16_at(&self, offset: usize) -> Option<u16> {
        let b = self.slice(offset, 2)?;
        Some(self.order.u16([b[0], b[1]]))
    }

    fn u32_at(&self, offset: usize) -> Option<u32> {
        let b = self.slice(offset, 4)?;
        Some(self.order.u32([b[0], b[1], b[2], b[3]]))
    }
}

/// Walks IFDs, following sub-IFD pointers, and collects tags into the Exif
/// and GPS directories.
///
/// Sub-IFDs are queued rather than walked recursively, so a long pointer
/// chain costs queue entries, not stack frames.
struct IfdWalker<'a> {
    tiff: Tiff<'a>,
    visited: HashSet<usize>,
    pending: VecDeque<(usize, DirectoryKind)>,
    exif: Directory,
    gps: Directory,
}

impl<'a> IfdWalker<'a> {
    fn directory(&mut self, kind: DirectoryKind) -> &mut Directory {
        match kind {
            DirectoryKind::Gps => &mut self.gps,
            _ => &mut self.exif,
        }
    }

    /// Walk the IFD at `offset` and every sub-IFD reachable from it.
    fn run(&mut self, offset: usize, kind: DirectoryKind) {
        self.pending.push_back((offset, kind));
        while let Some((offset, kind)) = self.pending.pop_front() {
            self.walk(offset, kind);
        }
    }

    fn walk(&mut self, offset: usize, kind: DirectoryKind) {
        if !self.visited.insert(offset) {
            self.directory(kind)
                .add_error(format!("IFD at offset {offset} is referenced more than once"));
            return;
        }
        let Some(count) = self.tiff.u16_at(offset) else {
            self.directory(kind)
                .add_error(format!("IFD offset {offset} is beyond the end of the TIFF data"));
            return;
        };
        tracing::trace!("{} IFD at offset {} with {} entries", kind, offset, count);

        for index in 0..count as usize {
            let entry_offset = offset + 2 + index * ENTRY_SIZE;
            if self.tiff.slice(entry_offset, ENTRY_SIZE).is_none() {
                self.directory(kind).add_error(format!(
                    "IFD at offset {offset} is truncated after {index} of {count} entries"
                ));
                return;
            }
            match self.read_entry(entry_offset) {
                Ok((tag, Some(value))) => self.store(kind, tag, value),
                Ok((tag, None)) => {
                    tracing::trace!("Tag 0x{:04x} has no components, skipped", tag);
                }
                Err(e) => {
                    tracing::debug!("{} entry {} undecodable: {}", kind, index, e);
                    self.directory(kind).add_error(e);
                }
            }
        }
    }

    /// Store a decoded value, or queue the sub-IFD it points at.
    fn store(&mut self, kind: DirectoryKind, tag: u16, value: TagValue) {
        let sub_ifd = match (kind, tag) {
            (DirectoryKind::Exif, exif::EXIF_OFFSET | exif::INTEROP_OFFSET) => {
                Some(DirectoryKind::Exif)
            }
            (DirectoryKind::Exif, exif::GPS_INFO) => Some(DirectoryKind::Gps),
            _ => None,
        };
        match (sub_ifd, value.as_int()) {
            (Some(target), Some(pointer)) if pointer >= 0 => {
                self.pending.push_back((pointer as usize, target))
            }
            (Some(_), _) => self.directory(kind).add_error(TagDecodeError::new(
                tag,
                format!("sub-IFD pointer holds {value}, expected an offset"),
            )),
            (None, _) => self.directory(kind).set(tag, value),
        }
    }

    /// Decode one 12-byte entry: tag, format, component count, and either
    /// the inline value or an offset to it.
    fn read_entry(&self, entry_offset: usize) -> Result<(u16, Option<TagValue>), TagDecodeError> {
        let tiff = self.tiff;
        let truncated = |what: &str| TagDecodeError::new(0, format!("entry {what} truncated"));
        let tag = tiff.u16_at(entry_offset).ok_or_else(|| truncated("tag"))?;
        let code = tiff
            .u16_at(entry_offset + 2)
            .ok_or_else(|| TagDecodeError::new(tag, "format field truncated"))?;
        let count = tiff
            .u32_at(entry_offset + 4)
            .ok_or_else(|| TagDecodeError::new(tag, "count field truncated"))? as usize;

        let format = Format::from_code(code)
            .ok_or_else(|| TagDecodeError::new(tag, format!("invalid format code {code}")))?;
        if count == 0 {
            return Ok((tag, None));
        }
        let byte_len = count.checked_mul(format.size()).ok_or_else(|| {
            TagDecodeError::new(tag, format!("component count {count} overflows"))
        })?;

        let value_offset = if byte_len <= 4 {
            entry_offset + 8
        } else {
            tiff.u32_at(entry_offset + 8)
                .ok_or_else(|| TagDecodeError::new(tag, "value offset truncated"))?
                as usize
        };
        let bytes = tiff.slice(value_offset, byte_len).ok_or_else(|| {
            TagDecodeError::new(
                tag,
                format!("{byte_len} value bytes at offset {value_offset} lie outside the TIFF data"),
            )
        })?;

        Ok((tag, Some(decode_value(format, bytes, tiff.order))))
    }
}

fn ints(values: Vec<i64>) -> TagValue {
    if values.len() == 1 {
        TagValue::Int(values[0])
    } else {
        TagValue::Ints(values)
    }
}

fn rationals(values: Vec<Rational>) -> TagValue {
    if values.len() == 1 {
        TagValue::Rational(values[0])
    } else {
        TagValue::Rationals(values)
    }
}

fn floats(values: Vec<f64>) -> TagValue {
    if values.len() == 1 {
        TagValue::Float(values[0])
    } else {
        TagValue::Floats(values)
    }
}

/// Convert raw component bytes into a typed value. `bytes` holds exactly
/// `count * format.size()` bytes.
fn decode_value(format: Format, bytes: &[u8], order: ByteOrder) -> TagValue {
    let u16s = || bytes.chunks_exact(2).map(|c| order.u16([c[0], c[1]]));
    let u32s = || {
        bytes
            .chunks_exact(4)
            .map(|c| order.u32([c[0], c[1], c[2], c[3]]))
    };
    match format {
        Format::Byte if bytes.len() == 1 => TagValue::Int(bytes[0] as i64),
        Format::Byte | Format::Undefined => TagValue::Bytes(bytes.to_vec()),
        Format::Ascii => {
            let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
            TagValue::Text(String::from_utf8_lossy(&bytes[..end]).into_owned())
        }
        Format::SByte => ints(bytes.iter().map(|&b| b as i8 as i64).collect()),
        Format::Short => ints(u16s().map(i64::from).collect()),
        Format::SShort => ints(u16s().map(|v| v as i16 as i64).collect()),
        Format::Long => ints(u32s().map(i64::from).collect()),
        Format::SLong => ints(u32s().map(|v| v as i32 as i64).collect()),
        Format::Rational => {
            let parts: Vec<u32> = u32s().collect();
            rationals(
                parts
                    .chunks_exact(2)
                    .map(|p| Rational::new(p[0] as i64, p[1] as i64))
                    .collect(),
            )
        }
        Format::SRational => {
            let parts: Vec<u32> = u32s().collect();
            rationals(
                parts
                    .chunks_exact(2)
                    .map(|p| Rational::new(p[0] as i32 as i64, p[1] as i32 as i64))
                    .collect(),
            )
        }
        Format::Float => floats(u32s().map(|v| f32::from_bits(v) as f64).collect()),
        Format::Double => floats(
            bytes
                .chunks_exact(8)
                .map(|c| {
                    let mut raw = [0u8; 8];
                    raw.copy_from_slice(c);
                    f64::from_bits(order.u64(raw))
                })
                .collect(),
        ),
    }
}

/// Decodes the EXIF `APP1` payload into the `Exif` directory, plus a `GPS`
/// directory when the GPS sub-IFD is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifDecoder;

impl ExifDecoder {
    pub fn decode_payload(payload: &[u8]) -> SegmentResult<Vec<Directory>> {
        if payload.len() < EXIF_PREAMBLE.len() || !payload.starts_with(EXIF_PREAMBLE) {
            return Err(SegmentError::malformed(
                "APP1 payload does not begin with the Exif preamble",
            ));
        }
        let data = &payload[EXIF_PREAMBLE.len()..];
        if data.len() < 8 {
            return Err(SegmentError::malformed(format!(
                "TIFF header needs 8 bytes, found {}",
                data.len()
            )));
        }
        let order = ByteOrder::from_marker(&data[..2]).ok_or_else(|| {
            SegmentError::malformed(format!(
                "unrecognized TIFF byte order marker 0x{:02X}{:02X}",
                data[0], data[1]
            ))
        })?;
        let tiff = Tiff { data, order };

        let mut walker = IfdWalker {
            tiff,
            visited: HashSet::new(),
            pending: VecDeque::new(),
            exif: Directory::new(DirectoryKind::Exif),
            gps: Directory::new(DirectoryKind::Gps),
        };

        // Header fields are known to be in bounds after the length check.
        let magic = tiff.u16_at(2).unwrap_or_default();
        if magic != TIFF_MAGIC {
            walker
                .exif
                .add_error(format!("unexpected TIFF marker {magic}, expected {TIFF_MAGIC}"));
        }
        let first_ifd = tiff.u32_at(4).unwrap_or_default() as usize;
        walker.run(first_ifd, DirectoryKind::Exif);

        let IfdWalker { exif, gps, .. } = walker;
        tracing::debug!(
            "Decoded EXIF: {} tags, {} GPS tags, {} errors",
            exif.len(),
            gps.len(),
            exif.errors().len() + gps.errors().len()
        );
        let mut directories = vec![exif];
        if !gps.is_empty() || gps.has_errors() {
            directories.push(gps);
        }
        Ok(directories)
    }
}

impl SegmentDecoder for ExifDecoder {
    fn name(&self) -> &'static str {
        "exif"
    }

    fn marker(&self) -> Marker {
        Marker::APP1
    }

    fn accepts(&self, payload: &[u8]) -> bool {
        payload.starts_with(EXIF_PREAMBLE)
    }

    fn decode(&self, payload: &[u8]) -> SegmentResult<Vec<Directory>> {
        Self::decode_payload(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tags::gps;
    use crate::testing::{camera_exif, Entry, ExifBuilder};

    fn decode(builder: &ExifBuilder) -> Vec<Directory> {
        ExifDecoder::decode_payload(&builder.build()).unwrap()
    }

    #[test]
    fn test_rejects_missing_preamble() {
        let err = ExifDecoder::decode_payload(b"http://ns.adobe.com/xap/1.0/\0").unwrap_err();
        assert!(matches!(err, SegmentError::MalformedStream(_)));
    }

    #[test]
    fn test_rejects_short_tiff_header() {
        let err = ExifDecoder::decode_payload(b"Exif\0\0MM\0").unwrap_err();
        assert!(matches!(err, SegmentError::MalformedStream(_)));
    }

    #[test]
    fn test_rejects_unknown_byte_order() {
        let err = ExifDecoder::decode_payload(b"Exif\0\0XX\0\x2a\0\0\0\x08").unwrap_err();
        assert!(err.to_string().contains("byte order"));
    }

    #[test]
    fn test_decodes_ifd0_and_exif_sub_ifd() {
        let dirs = decode(&camera_exif());
        assert_eq!(dirs.len(), 1);
        let dir = &dirs[0];
        assert!(!dir.has_errors(), "{:?}", dir.errors());
        assert_eq!(dir.get_text(exif::MAKE), Ok("Canon"));
        assert_eq!(dir.get_text(exif::DATETIME), Ok("2023:01:15 14:30:00"));
        assert_eq!(dir.get_rational(exif::EXPOSURE_TIME), Ok(Rational::new(1, 125)));
        assert_eq!(dir.get_rational(exif::EXPOSURE_BIAS), Ok(Rational::new(-2, 3)));
        assert_eq!(dir.get_int(exif::METERING_MODE), Ok(5));
        assert_eq!(dir.get_bytes(exif::EXIF_VERSION), Ok(&b"0230"[..]));
        // Pointer tags are followed, not stored.
        assert!(!dir.contains(exif::EXIF_OFFSET));
    }

    #[test]
    fn test_little_and_big_endian_agree() {
        let entries = |b: ExifBuilder| {
            b.ifd0(Entry::ascii(exif::MODEL, "X100V"))
                .exif(Entry::Short(exif::ISO_EQUIVALENT, 640))
                .exif(Entry::Long(exif::EXIF_IMAGE_WIDTH, 6240))
                .exif(Entry::Rational(exif::FNUMBER, 56, 10))
        };
        let be = decode(&entries(ExifBuilder::big_endian()));
        let le = decode(&entries(ExifBuilder::little_endian()));
        assert_eq!(be, le);
        assert_eq!(le[0].get_int(exif::ISO_EQUIVALENT), Ok(640));
        assert_eq!(le[0].get_int(exif::EXIF_IMAGE_WIDTH), Ok(6240));
    }

    #[test]
    fn test_corrupt_entry_recorded_and_skipped() {
        let builder = ExifBuilder::big_endian()
            .ifd0(Entry::ascii(exif::MAKE, "Nikon"))
            .ifd0(Entry::Raw {
                tag: exif::SOFTWARE,
                format: 0x00FF,
                count: 1,
                value: [0; 4],
            })
            .ifd0(Entry::Short(exif::ORIENTATION, 6))
            .ifd0(Entry::Raw {
                tag: exif::ARTIST,
                format: 2,
                count: 64,
                value: [0x00, 0x00, 0xFF, 0x00],
            });
        let dirs = decode(&builder);
        let dir = &dirs[0];
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.errors().len(), 2);
        assert!(dir.errors()[0].contains("invalid format code 255"));
        assert!(dir.errors()[1].contains("outside the TIFF data"));
        assert_eq!(dir.get_int(exif::ORIENTATION), Ok(6));
    }

    #[test]
    fn test_gps_goes_to_its_own_directory() {
        let builder = ExifBuilder::little_endian()
            .ifd0(Entry::ascii(exif::MAKE, "Apple"))
            .gps(Entry::ascii(gps::LATITUDE_REF, "N"))
            .gps(Entry::Rationals(
                gps::LATITUDE,
                vec![(37, 1), (46, 1), (2964, 100)],
            ));
        let dirs = decode(&builder);
        assert_eq!(dirs.len(), 2);
        assert_eq!(dirs[1].kind(), DirectoryKind::Gps);
        assert_eq!(dirs[1].get_text(gps::LATITUDE_REF), Ok("N"));
        assert!(matches!(
            dirs[1].get(gps::LATITUDE),
            Some(TagValue::Rationals(parts)) if parts.len() == 3
        ));
        assert!(!dirs[0].contains(gps::LATITUDE_REF));
    }

    #[test]
    fn test_self_referencing_ifd_is_reported() {
        // Exif pointer back at IFD0.
        let builder = ExifBuilder::big_endian()
            .ifd0(Entry::ascii(exif::MAKE, "Loop"))
            .ifd0(Entry::Long(exif::EXIF_OFFSET, 8));
        let dirs = decode(&builder);
        assert_eq!(dirs[0].get_text(exif::MAKE), Ok("Loop"));
        assert!(dirs[0].errors()[0].contains("more than once"));
    }

    #[test]
    fn test_long_sub_ifd_chain_is_walked_without_recursion() {
        // 3600 one-entry IFDs, each pointing at the next through ExifOffset,
        // with Orientation in the last one. Fits a single APP1 segment.
        const LINKS: usize = 3600;
        const IFD_LEN: usize = 2 + ENTRY_SIZE + 4;
        let mut payload = b"Exif\0\0MM\0\x2a\0\0\0\x08".to_vec();
        for index in 0..=LINKS {
            payload.extend_from_slice(&1u16.to_be_bytes());
            if index < LINKS {
                let next = (8 + (index + 1) * IFD_LEN) as u32;
                payload.extend_from_slice(&exif::EXIF_OFFSET.to_be_bytes());
                payload.extend_from_slice(&4u16.to_be_bytes());
                payload.extend_from_slice(&1u32.to_be_bytes());
                payload.extend_from_slice(&next.to_be_bytes());
            } else {
                payload.extend_from_slice(&exif::ORIENTATION.to_be_bytes());
                payload.extend_from_slice(&3u16.to_be_bytes());
                payload.extend_from_slice(&1u32.to_be_bytes());
                payload.extend_from_slice(&[0x00, 0x06, 0x00, 0x00]);
            }
            payload.extend_from_slice(&0u32.to_be_bytes());
        }
        assert!(payload.len() < u16::MAX as usize);

        let dirs = ExifDecoder::decode_payload(&payload).unwrap();
        assert!(!dirs[0].has_errors(), "{:?}", dirs[0].errors());
        assert_eq!(dirs[0].get_int(exif::ORIENTATION), Ok(6));
        assert!(!dirs[0].contains(exif::EXIF_OFFSET));
    }

    #[test]
    fn test_first_ifd_out_of_bounds() {
        let mut payload = b"Exif\0\0MM\0\x2a".to_vec();
        payload.extend_from_slice(&0x1000u32.to_be_bytes());
        let dirs = ExifDecoder::decode_payload(&payload).unwrap();
        assert!(dirs[0].is_empty());
        assert!(dirs[0].errors()[0].contains("beyond the end"));
    }

    #[test]
    fn test_wrong_tiff_magic_is_recorded_not_fatal() {
        let mut payload = ExifBuilder::big_endian()
            .ifd0(Entry::ascii(exif::MAKE, "Canon"))
            .build();
        payload[6 + 3] = 0x2B;
        let dirs = ExifDecoder::decode_payload(&payload).unwrap();
        assert_eq!(dirs[0].get_text(exif::MAKE), Ok("Canon"));
        assert!(dirs[0].errors()[0].contains("unexpected TIFF marker"));
    }

    #[test]
    fn test_ascii_stops_at_nul_and_bytes_stay_raw() {
        let builder = ExifBuilder::big_endian()
            .ifd0(Entry::Undefined(exif::USER_COMMENT, b"ASCII\0\0\0hi".to_vec()))
            .ifd0(Entry::Bytes(0x9C9B, vec![0x41, 0x00, 0x42, 0x00]))
            .ifd0(Entry::Raw {
                tag: exif::MODEL,
                format: 2,
                count: 4,
                value: *b"A1\0Z",
            });
        let dirs = decode(&builder);
        assert_eq!(dirs[0].get_text(exif::MODEL), Ok("A1"));
        assert_eq!(dirs[0].get_bytes(0x9C9B), Ok(&[0x41, 0x00, 0x42, 0x00][..]));
    }

    #[test]
    fn test_decode_is_deterministic() {
        let payload = camera_exif().build();
        let first = ExifDecoder::decode_payload(&payload).unwrap();
        let second = ExifDecoder::decode_payload(&payload).unwrap();
        assert_eq!(first, second);
    }
}
