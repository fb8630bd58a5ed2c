//! Comment segment (`COM`).

use super::SegmentDecoder;
use crate::error::SegmentResult;
use crate::jpeg::Marker;
use crate::metadata::tags::comment;
use crate::metadata::{Directory, DirectoryKind, TagValue};

/// Stores the whole payload as text. Invalid UTF-8 is replaced rather than
/// rejected, and trailing NULs are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentDecoder;

impl CommentDecoder {
    pub fn decode_payload(payload: &[u8]) -> Directory {
        let end = payload
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        let text = String::from_utf8_lossy(&payload[..end]).into_owned();
        let mut dir = Directory::new(DirectoryKind::JpegComment);
        dir.set(comment::COMMENT, TagValue::Text(text));
        dir
    }
}

impl SegmentDecoder for CommentDecoder {
    fn name(&self) -> &'static str {
        "comment"
    }

    fn marker(&self) -> Marker {
        Marker::COM
    }

    fn decode(&self, payload: &[u8]) -> SegmentResult<Vec<Directory>> {
        Ok(vec![Self::decode_payload(payload)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_text() {
        let dir = CommentDecoder::decode_payload(b"Shot on a tripod");
        assert_eq!(dir.get_text(comment::COMMENT), Ok("Shot on a tripod"));
    }

    #[test]
    fn test_trailing_nuls_dropped() {
        let dir = CommentDecoder::decode_payload(b"hello\0\0");
        assert_eq!(dir.get_text(comment::COMMENT), Ok("hello"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = CommentDecoder::decode_payload(&[b'a', 0xFF, b'b']);
        assert_eq!(dir.get_text(comment::COMMENT), Ok("a\u{FFFD}b"));
    }

    #[test]
    fn test_empty_payload() {
        let dir = CommentDecoder::decode_payload(&[]);
        assert_eq!(dir.get_text(comment::COMMENT), Ok(""));
    }
}
