//! File-level pipeline components.
//!
//! - **discovery**: Find JPEG files in directories
//! - **validate**: Size and signature checks before scanning
//! - **metadata**: Run the segment decoders and gather directories

pub mod discovery;
pub mod metadata;
pub mod validate;

pub use discovery::{DiscoveredFile, Discovery, FileDiscovery, SkipReason, SkippedFile};
pub use metadata::MetadataExtractor;
pub use validate::Validator;
