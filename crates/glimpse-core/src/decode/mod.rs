//! Segment decoders.
//!
//! Each decoder turns the payload of one marker segment into one or more
//! tag directories. Decoders never see the stream itself; the reader locates
//! segments and hands over their payloads.

mod comment;
mod exif;
mod frame;

pub use comment::CommentDecoder;
pub use exif::{ByteOrder, ExifDecoder, EXIF_PREAMBLE};
pub use frame::FrameDecoder;

use crate::error::SegmentResult;
use crate::jpeg::Marker;
use crate::metadata::Directory;

/// Decodes the payload of one kind of marker segment.
pub trait SegmentDecoder: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// The marker whose segments this decoder understands.
    fn marker(&self) -> Marker;

    /// Whether this particular occurrence is meant for the decoder.
    /// Several unrelated formats share `APP1`, for example.
    fn accepts(&self, _payload: &[u8]) -> bool {
        true
    }

    fn decode(&self, payload: &[u8]) -> SegmentResult<Vec<Directory>>;
}

/// The decoders the reader runs, in extraction order.
pub fn default_decoders() -> Vec<Box<dyn SegmentDecoder>> {
    vec![
        Box::new(ExifDecoder),
        Box::new(FrameDecoder),
        Box::new(CommentDecoder),
    ]
}
