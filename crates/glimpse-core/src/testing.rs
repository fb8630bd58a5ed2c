//! In-memory JPEG and EXIF fixture builders for tests.
//!
//! Self-contained so integration tests can pull it in with `#[path]`.
#![allow(dead_code)]

/// Builds a JPEG byte stream segment by segment.
pub struct JpegBuilder {
    bytes: Vec<u8>,
}

impl JpegBuilder {
    pub fn new() -> Self {
        Self {
            bytes: vec![0xFF, 0xD8],
        }
    }

    /// Append a length-prefixed segment.
    pub fn segment(mut self, marker: impl Into<u8>, payload: &[u8]) -> Self {
        let length = (payload.len() + 2) as u16;
        self.bytes.push(0xFF);
        self.bytes.push(marker.into());
        self.bytes.extend_from_slice(&length.to_be_bytes());
        self.bytes.extend_from_slice(payload);
        self
    }

    /// Append bytes verbatim (for corrupt streams).
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Append an `APP1` segment holding the given EXIF payload.
    pub fn exif(self, exif: &ExifBuilder) -> Self {
        self.segment(0xE1u8, &exif.build())
    }

    /// Append a baseline frame header with three 8-bit components.
    pub fn sof0(self, width: u16, height: u16) -> Self {
        self.segment(0xC0u8, &sof0_payload(width, height))
    }

    /// Append a comment segment.
    pub fn comment(self, text: &str) -> Self {
        self.segment(0xFEu8, text.as_bytes())
    }

    /// Append a start-of-scan header followed by entropy-coded bytes that
    /// include stuffed `0xFF 0x00` pairs and a restart marker.
    pub fn scan(mut self) -> Self {
        self.bytes
            .extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
        self.bytes
            .extend_from_slice(&[0x12, 0xFF, 0x00, 0x34, 0xFF, 0xD0, 0x56, 0xFF, 0x00, 0x78]);
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.bytes.extend_from_slice(&[0xFF, 0xD9]);
        self.bytes
    }

    pub fn build_without_eoi(self) -> Vec<u8> {
        self.bytes
    }
}

impl Default for JpegBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Baseline frame header: precision, height, width, then Y/Cb/Cr descriptors.
pub fn sof0_payload(width: u16, height: u16) -> Vec<u8> {
    let mut payload = vec![8];
    payload.extend_from_slice(&height.to_be_bytes());
    payload.extend_from_slice(&width.to_be_bytes());
    payload.push(3);
    payload.extend_from_slice(&[1, 0x22, 0]);
    payload.extend_from_slice(&[2, 0x11, 1]);
    payload.extend_from_slice(&[3, 0x11, 1]);
    payload
}

/// One IFD entry to encode.
#[derive(Debug, Clone)]
pub enum Entry {
    Ascii(u16, String),
    Short(u16, u16),
    Long(u16, u32),
    Rational(u16, u32, u32),
    SRational(u16, i32, i32),
    Rationals(u16, Vec<(u32, u32)>),
    Undefined(u16, Vec<u8>),
    Bytes(u16, Vec<u8>),
    /// Entry written exactly as given; `value` is the raw 4-byte field.
    Raw {
        tag: u16,
        format: u16,
        count: u32,
        value: [u8; 4],
    },
}

impl Entry {
    pub fn ascii(tag: u16, text: &str) -> Self {
        Self::Ascii(tag, text.to_string())
    }
}

/// Builds an `APP1` EXIF payload: preamble, TIFF header, IFD0 with optional
/// Exif and GPS sub-IFDs, and an out-of-line data area.
pub struct ExifBuilder {
    little_endian: bool,
    ifd0: Vec<Entry>,
    exif: Vec<Entry>,
    gps: Vec<Entry>,
}

impl ExifBuilder {
    pub fn big_endian() -> Self {
        Self {
            little_endian: false,
            ifd0: Vec::new(),
            exif: Vec::new(),
            gps: Vec::new(),
        }
    }

    pub fn little_endian() -> Self {
        Self {
            little_endian: true,
            ..Self::big_endian()
        }
    }

    pub fn ifd0(mut self, entry: Entry) -> Self {
        self.ifd0.push(entry);
        self
    }

    pub fn exif(mut self, entry: Entry) -> Self {
        self.exif.push(entry);
        self
    }

    pub fn gps(mut self, entry: Entry) -> Self {
        self.gps.push(entry);
        self
    }

    fn u16(&self, v: u16) -> [u8; 2] {
        if self.little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        }
    }

    fn u32(&self, v: u32) -> [u8; 4] {
        if self.little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        }
    }

    fn ifd_size(entries: usize) -> usize {
        2 + 12 * entries + 4
    }

    /// Full payload including the `Exif\0\0` preamble.
    pub fn build(&self) -> Vec<u8> {
        let mut out = b"Exif\0\0".to_vec();
        out.extend_from_slice(&self.build_tiff());
        out
    }

    /// TIFF structure only.
    pub fn build_tiff(&self) -> Vec<u8> {
        let mut ifd0 = self.ifd0.clone();
        let ifd0_count =
            ifd0.len() + usize::from(!self.exif.is_empty()) + usize::from(!self.gps.is_empty());
        let ifd0_offset = 8;
        let exif_offset = ifd0_offset + Self::ifd_size(ifd0_count);
        let exif_size = if self.exif.is_empty() {
            0
        } else {
            Self::ifd_size(self.exif.len())
        };
        let gps_offset = exif_offset + exif_size;
        let gps_size = if self.gps.is_empty() {
            0
        } else {
            Self::ifd_size(self.gps.len())
        };
        let data_offset = gps_offset + gps_size;

        if !self.exif.is_empty() {
            ifd0.push(Entry::Long(0x8769, exif_offset as u32));
        }
        if !self.gps.is_empty() {
            ifd0.push(Entry::Long(0x8825, gps_offset as u32));
        }

        let mut tiff = Vec::new();
        if self.little_endian {
            tiff.extend_from_slice(b"II");
        } else {
            tiff.extend_from_slice(b"MM");
        }
        tiff.extend_from_slice(&self.u16(42));
        tiff.extend_from_slice(&self.u32(ifd0_offset as u32));

        let mut data = Vec::new();
        for entries in [&ifd0, &self.exif, &self.gps] {
            if entries.is_empty() {
                continue;
            }
            tiff.extend_from_slice(&self.u16(entries.len() as u16));
            for entry in entries.iter() {
                self.write_entry(&mut tiff, &mut data, data_offset, entry);
            }
            tiff.extend_from_slice(&self.u32(0));
        }
        tiff.extend_from_slice(&data);
        tiff
    }

    fn write_entry(&self, ifd: &mut Vec<u8>, data: &mut Vec<u8>, data_offset: usize, entry: &Entry) {
        let (tag, format, count, bytes) = match entry {
            Entry::Ascii(tag, text) => {
                let mut bytes = text.as_bytes().to_vec();
                bytes.push(0);
                (*tag, 2u16, bytes.len() as u32, bytes)
            }
            Entry::Short(tag, v) => (*tag, 3, 1, self.u16(*v).to_vec()),
            Entry::Long(tag, v) => (*tag, 4, 1, self.u32(*v).to_vec()),
            Entry::Rational(tag, n, d) => {
                let mut bytes = self.u32(*n).to_vec();
                bytes.extend_from_slice(&self.u32(*d));
                (*tag, 5, 1, bytes)
            }
            Entry::SRational(tag, n, d) => {
                let mut bytes = self.u32(*n as u32).to_vec();
                bytes.extend_from_slice(&self.u32(*d as u32));
                (*tag, 10, 1, bytes)
            }
            Entry::Rationals(tag, values) => {
                let mut bytes = Vec::new();
                for (n, d) in values {
                    bytes.extend_from_slice(&self.u32(*n));
                    bytes.extend_from_slice(&self.u32(*d));
                }
                (*tag, 5, values.len() as u32, bytes)
            }
            Entry::Undefined(tag, bytes) => (*tag, 7, bytes.len() as u32, bytes.clone()),
            Entry::Bytes(tag, bytes) => (*tag, 1, bytes.len() as u32, bytes.clone()),
            Entry::Raw {
                tag,
                format,
                count,
                value,
            } => {
                ifd.extend_from_slice(&self.u16(*tag));
                ifd.extend_from_slice(&self.u16(*format));
                ifd.extend_from_slice(&self.u32(*count));
                ifd.extend_from_slice(value);
                return;
            }
        };

        ifd.extend_from_slice(&self.u16(tag));
        ifd.extend_from_slice(&self.u16(format));
        ifd.extend_from_slice(&self.u32(count));
        if bytes.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..bytes.len()].copy_from_slice(&bytes);
            ifd.extend_from_slice(&inline);
        } else {
            let offset = data_offset + data.len();
            ifd.extend_from_slice(&self.u32(offset as u32));
            data.extend_from_slice(&bytes);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        }
    }
}

/// A typical camera EXIF block.
pub fn camera_exif() -> ExifBuilder {
    ExifBuilder::big_endian()
        .ifd0(Entry::ascii(0x010F, "Canon"))
        .ifd0(Entry::ascii(0x0110, "Canon EOS 5D Mark III"))
        .ifd0(Entry::Short(0x0112, 1))
        .ifd0(Entry::ascii(0x0132, "2023:01:15 14:30:00"))
        .exif(Entry::Rational(0x829A, 1, 125))
        .exif(Entry::Rational(0x829D, 28, 10))
        .exif(Entry::Short(0x8822, 3))
        .exif(Entry::Short(0x8827, 400))
        .exif(Entry::Undefined(0x9000, b"0230".to_vec()))
        .exif(Entry::SRational(0x9204, -2, 3))
        .exif(Entry::Short(0x9207, 5))
        .exif(Entry::Rational(0x920A, 50, 1))
        .exif(Entry::Short(0xA405, 50))
}
