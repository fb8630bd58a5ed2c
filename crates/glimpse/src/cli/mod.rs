//! CLI command implementations.

pub mod config;
pub mod details;
pub mod dump;
pub mod types;

use glimpse_core::{Config, FileDiscovery};
use std::path::PathBuf;

/// Expand the given paths into JPEG files. Files are kept when their
/// extension is supported and they start with SOI; directories are walked.
/// Candidates that fail the signature check are reported and left out.
pub(crate) fn collect_files(config: &Config, inputs: &[PathBuf]) -> Vec<PathBuf> {
    let discovery = FileDiscovery::new(config.processing.clone());
    let mut files = Vec::new();
    for input in inputs {
        let found = discovery.discover(input);
        for skipped in &found.skipped {
            tracing::warn!("Skipping {:?}: {}", skipped.path, skipped.reason);
        }
        if found.files.is_empty() {
            tracing::warn!("No JPEG files found at {:?}", input);
        }
        files.extend(found.files.into_iter().map(|file| file.path));
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_files_mixes_files_and_directories() {
        let root = tempfile::tempdir().unwrap();
        let album = root.path().join("album");
        std::fs::create_dir_all(&album).unwrap();
        std::fs::write(album.join("b.jpg"), [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();
        std::fs::write(album.join("a.jpeg"), [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();
        std::fs::write(album.join("notes.txt"), b"skip").unwrap();
        std::fs::write(album.join("c.jpg"), b"GIF89a").unwrap();
        let single = root.path().join("single.jpg");
        std::fs::write(&single, [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();

        let files = collect_files(&Config::default(), &[single.clone(), album.clone()]);
        assert_eq!(files, vec![single, album.join("a.jpeg"), album.join("b.jpg")]);
    }

    #[test]
    fn collect_files_skips_unsupported_file() {
        let root = tempfile::tempdir().unwrap();
        let png = root.path().join("image.png");
        std::fs::write(&png, b"png").unwrap();
        assert!(collect_files(&Config::default(), &[png]).is_empty());
    }
}
