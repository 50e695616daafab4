//! Image provider trait and utilities.

use crate::error::Result;
use crate::image::types::{GeneratedImage, GenerationRequest, SavedImage};
use async_trait::async_trait;
use std::path::Path;

/// Trait for image generation backends.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generates an image from the given request.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage>;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str;
}

/// Generates one image and writes it to `path`.
///
/// Nothing is written unless generation succeeds.
pub async fn generate_to_file<P>(
    provider: &P,
    request: &GenerationRequest,
    path: impl AsRef<Path>,
) -> Result<SavedImage>
where
    P: ImageProvider + ?Sized,
{
    if request.prompt.is_empty() {
        tracing::warn!("prompt is empty, sending it anyway");
    }

    let image = provider.generate(request).await?;
    let saved = image.save(path)?;

    tracing::info!(
        provider = provider.name(),
        path = %saved.path.display(),
        mime_type = %saved.mime_type,
        size = saved.size,
        "image saved"
    );
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageGenError;
    use crate::image::types::GenerationMetadata;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeProvider {
        calls: AtomicUsize,
        result: fn() -> Result<GeneratedImage>,
    }

    impl FakeProvider {
        fn new(result: fn() -> Result<GeneratedImage>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result,
            }
        }
    }

    #[async_trait]
    impl ImageProvider for FakeProvider {
        async fn generate(&self, _request: &GenerationRequest) -> Result<GeneratedImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    #[tokio::test]
    async fn test_generate_to_file_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/image.webp");
        let provider = FakeProvider::new(|| {
            Ok(GeneratedImage::new(
                vec![1, 2, 3, 4],
                "image/webp",
                GenerationMetadata::default(),
            ))
        });

        let saved = generate_to_file(&provider, &GenerationRequest::new("x"), &path)
            .await
            .unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(saved.mime_type, "image/webp");
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_generate_to_file_writes_nothing_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/image.png");
        let provider = FakeProvider::new(|| {
            Err(ImageGenError::NoImage {
                response: "{}".into(),
            })
        });

        let err = generate_to_file(&provider, &GenerationRequest::new(""), &path)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("No image found"));
        assert!(!path.exists());
        assert!(!dir.path().join("out").exists());
    }
}
