//! Core types for image generation.

use crate::error::{ImageGenError, Result};
use std::path::{Path, PathBuf};

/// MIME type assumed when an inline part does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// A request to generate an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// The text prompt describing the desired image. Sent as-is.
    pub prompt: String,
}

impl GenerationRequest {
    /// Creates a new request with the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Metadata about the generation process.
#[derive(Debug, Clone, Default)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Round-trip duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Index of the candidate the image came from.
    pub candidate_index: usize,
    /// Index of the part within that candidate.
    pub part_index: usize,
}

/// A generated image with its data and metadata.
#[derive(Debug, Clone)]
#[must_use = "generated image should be saved or processed"]
pub struct GeneratedImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// MIME type as reported by the API.
    pub mime_type: String,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GeneratedImage {
    /// Creates a new generated image.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>, metadata: GenerationMetadata) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
            metadata,
        }
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the image to `path`, creating missing parent directories.
    ///
    /// An existing file is overwritten.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<SavedImage> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ImageGenError::io(parent, e))?;
        }
        std::fs::write(path, &self.data).map_err(|e| ImageGenError::io(path, e))?;

        Ok(SavedImage {
            path: path.to_path_buf(),
            mime_type: self.mime_type.clone(),
            size: self.size(),
        })
    }
}

/// An image that has been written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Where the image was written.
    pub path: PathBuf,
    /// MIME type as reported by the API.
    pub mime_type: String,
    /// Number of bytes written.
    pub size: usize,
}

impl SavedImage {
    /// Human-readable success line.
    pub fn summary(&self) -> String {
        format!(
            "✓ Saved ({}): {} [{} bytes]",
            self.mime_type,
            self.path.display(),
            format_byte_count(self.size)
        )
    }
}

/// Formats a byte count with comma thousands separators (`1234567` → `1,234,567`).
pub fn format_byte_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_byte_count() {
        assert_eq!(format_byte_count(0), "0");
        assert_eq!(format_byte_count(7), "7");
        assert_eq!(format_byte_count(999), "999");
        assert_eq!(format_byte_count(1000), "1,000");
        assert_eq!(format_byte_count(123456), "123,456");
        assert_eq!(format_byte_count(1234567), "1,234,567");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.png");
        let image = GeneratedImage::new(b"abc".to_vec(), "image/png", Default::default());

        let saved = image.save(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
        assert_eq!(saved.size, 3);
        assert_eq!(saved.path, path);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        std::fs::write(&path, b"a much longer previous file").unwrap();

        let image = GeneratedImage::new(b"new".to_vec(), "image/png", Default::default());
        image.save(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_save_into_file_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a dir").unwrap();

        let image = GeneratedImage::new(b"abc".to_vec(), "image/png", Default::default());
        let err = image.save(blocker.join("out.png")).unwrap_err();

        assert!(matches!(err, ImageGenError::Io { .. }));
    }

    #[test]
    fn test_summary_line() {
        let saved = SavedImage {
            path: PathBuf::from("./generated.png"),
            mime_type: "image/jpeg".into(),
            size: 1_048_576,
        };
        assert_eq!(
            saved.summary(),
            "✓ Saved (image/jpeg): ./generated.png [1,048,576 bytes]"
        );
    }
}
