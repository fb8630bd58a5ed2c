//! JPEG stream structure: marker codes and the segment scanner.

mod reader;

pub use reader::SegmentReader;

use serde::{Serialize, Serializer};

/// The second byte of a two-byte `0xFF xx` JPEG marker code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marker(pub u8);

impl Marker {
    pub const TEM: Self = Self(0x01);
    pub const SOF0: Self = Self(0xC0);
    pub const SOF1: Self = Self(0xC1);
    pub const SOF2: Self = Self(0xC2);
    pub const DHT: Self = Self(0xC4);
    pub const RST0: Self = Self(0xD0);
    pub const RST7: Self = Self(0xD7);
    pub const SOI: Self = Self(0xD8);
    pub const EOI: Self = Self(0xD9);
    pub const SOS: Self = Self(0xDA);
    pub const DQT: Self = Self(0xDB);
    pub const APP0: Self = Self(0xE0);
    pub const APP1: Self = Self(0xE1);
    pub const APPD: Self = Self(0xED);
    pub const COM: Self = Self(0xFE);

    /// Markers that stand alone, without a length field or payload.
    pub fn is_standalone(self) -> bool {
        self == Self::TEM || self == Self::SOI || self == Self::EOI || self.is_restart()
    }

    /// Restart markers RST0..RST7 only appear inside entropy-coded data.
    pub fn is_restart(self) -> bool {
        (Self::RST0.0..=Self::RST7.0).contains(&self.0)
    }

    /// Short mnemonic for logs and error messages.
    pub fn name(self) -> String {
        match self {
            Self::TEM => "TEM".into(),
            Self::SOI => "SOI".into(),
            Self::EOI => "EOI".into(),
            Self::SOS => "SOS".into(),
            Self::DQT => "DQT".into(),
            Self::DHT => "DHT".into(),
            Self::COM => "COM".into(),
            Marker(n @ 0xC0..=0xCF) if n != 0xC4 && n != 0xC8 && n != 0xCC => {
                format!("SOF{}", n - 0xC0)
            }
            Marker(n @ 0xD0..=0xD7) => format!("RST{}", n - 0xD0),
            Marker(n @ 0xE0..=0xEF) => format!("APP{:X}", n - 0xE0),
            Marker(n) => format!("0xFF{n:02X}"),
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<Marker> for u8 {
    fn from(marker: Marker) -> u8 {
        marker.0
    }
}

impl Serialize for Marker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}
