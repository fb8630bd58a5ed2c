//! Baseline frame header (`SOF0`).

use super::SegmentDecoder;
use crate::error::{SegmentError, SegmentResult, TagDecodeError};
use crate::jpeg::Marker;
use crate::metadata::tags::jpeg;
use crate::metadata::{Directory, DirectoryKind, TagValue};

/// Precision, height, width and component count.
const HEADER_LEN: usize = 6;
const COMPONENT_LEN: usize = 3;
const COMPONENT_TAGS: [u16; 4] = [
    jpeg::COMPONENT_DATA_1,
    jpeg::COMPONENT_DATA_2,
    jpeg::COMPONENT_DATA_3,
    jpeg::COMPONENT_DATA_4,
];

/// Reads the fixed frame header layout into the `Jpeg` directory. Each
/// component is stored as the raw bytes `[id, sampling factors, table]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder;

impl FrameDecoder {
    pub fn decode_payload(payload: &[u8]) -> SegmentResult<Directory> {
        if payload.len() < HEADER_LEN {
            return Err(SegmentError::malformed(format!(
                "SOF0 header needs {HEADER_LEN} bytes, found {}",
                payload.len()
            )));
        }

        let mut dir = Directory::new(DirectoryKind::Jpeg);
        let height = u16::from_be_bytes([payload[1], payload[2]]);
        let width = u16::from_be_bytes([payload[3], payload[4]]);
        let components = payload[5] as usize;
        dir.set(jpeg::DATA_PRECISION, TagValue::Int(payload[0] as i64));
        dir.set(jpeg::IMAGE_HEIGHT, TagValue::Int(height as i64));
        dir.set(jpeg::IMAGE_WIDTH, TagValue::Int(width as i64));
        dir.set(jpeg::NUMBER_OF_COMPONENTS, TagValue::Int(components as i64));

        for (index, tag) in COMPONENT_TAGS.iter().enumerate().take(components) {
            let start = HEADER_LEN + index * COMPONENT_LEN;
            match payload.get(start..start + COMPONENT_LEN) {
                Some(bytes) => dir.set(*tag, TagValue::Bytes(bytes.to_vec())),
                None => {
                    dir.add_error(TagDecodeError::new(
                        *tag,
                        format!("component {} truncated", index + 1),
                    ));
                    break;
                }
            }
        }
        if components > COMPONENT_TAGS.len() {
            tracing::debug!("SOF0 declares {} components, kept {}", components, COMPONENT_TAGS.len());
        }

        Ok(dir)
    }
}

impl SegmentDecoder for FrameDecoder {
    fn name(&self) -> &'static str {
        "frame"
    }

    fn marker(&self) -> Marker {
        Marker::SOF0
    }

    fn decode(&self, payload: &[u8]) -> SegmentResult<Vec<Directory>> {
        Self::decode_payload(payload).map(|dir| vec![dir])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sof0_payload;

    #[test]
    fn test_decodes_header_and_components() {
        let dir = FrameDecoder::decode_payload(&sof0_payload(4000, 3000)).unwrap();
        assert_eq!(dir.get_int(jpeg::DATA_PRECISION), Ok(8));
        assert_eq!(dir.get_int(jpeg::IMAGE_WIDTH), Ok(4000));
        assert_eq!(dir.get_int(jpeg::IMAGE_HEIGHT), Ok(3000));
        assert_eq!(dir.get_int(jpeg::NUMBER_OF_COMPONENTS), Ok(3));
        assert_eq!(dir.get_bytes(jpeg::COMPONENT_DATA_1), Ok(&[1, 0x22, 0][..]));
        assert!(!dir.contains(jpeg::COMPONENT_DATA_4));
        assert_eq!(
            dir.description(jpeg::COMPONENT_DATA_1).as_deref(),
            Some("Y component: Quantization table 0, Sampling factors 2 horiz/2 vert")
        );
        assert!(!dir.has_errors());
    }

    #[test]
    fn test_short_header_is_malformed() {
        let err = FrameDecoder::decode_payload(&[8, 0x0B, 0xB8, 0x0F]).unwrap_err();
        assert!(matches!(err, SegmentError::MalformedStream(_)));
    }

    #[test]
    fn test_truncated_component_is_recorded() {
        let mut payload = sof0_payload(640, 480);
        payload.truncate(HEADER_LEN + COMPONENT_LEN + 1);
        let dir = FrameDecoder::decode_payload(&payload).unwrap();
        assert_eq!(dir.get_int(jpeg::IMAGE_WIDTH), Ok(640));
        assert!(dir.contains(jpeg::COMPONENT_DATA_1));
        assert!(!dir.contains(jpeg::COMPONENT_DATA_2));
        assert_eq!(dir.errors().len(), 1);
    }
}
