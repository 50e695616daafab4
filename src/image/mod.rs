//! Image generation module.

mod provider;
pub mod providers;
mod types;

pub use provider::{generate_to_file, ImageProvider};
pub use types::{
    format_byte_count, GeneratedImage, GenerationMetadata, GenerationRequest, SavedImage,
    DEFAULT_MIME_TYPE,
};
