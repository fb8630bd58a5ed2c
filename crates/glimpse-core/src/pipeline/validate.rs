//! File checks run before a stream is scanned.

use std::io::Read;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Rejects files that are missing, too large, or not JPEG.
///
/// Scan cost is linear in the bytes read, so the size limit is the bound on
/// how long one extraction can take.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Check existence, size and the SOI signature.
    pub fn validate(&self, path: &Path) -> Result<(), PipelineError> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| PipelineError::Read {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {}", e),
        })?;

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        self.check_signature(path)
    }

    fn check_signature(&self, path: &Path) -> Result<(), PipelineError> {
        let is_jpeg = Self::has_jpeg_signature(path).map_err(|e| PipelineError::Read {
            path: path.to_path_buf(),
            message: format!("Cannot read header: {}", e),
        })?;
        if !is_jpeg {
            return Err(PipelineError::NotJpeg(path.to_path_buf()));
        }
        Ok(())
    }

    /// Read the first bytes of a file and check them for the SOI signature.
    pub(crate) fn has_jpeg_signature(path: &Path) -> std::io::Result<bool> {
        let mut header = Vec::with_capacity(3);
        std::fs::File::open(path)?.take(3).read_to_end(&mut header)?;
        Ok(Self::is_jpeg_header(&header))
    }

    /// SOI followed by the first byte of the next marker: `FF D8 FF`.
    fn is_jpeg_header(header: &[u8]) -> bool {
        header.starts_with(&[0xFF, 0xD8, 0xFF])
    }
}
