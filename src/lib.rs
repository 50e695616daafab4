#![warn(missing_docs)]
//! Generate a single image from a text prompt with Google Gemini.
//!
//! The crate sends one `generateContent` request, picks the first inline
//! image out of the response and writes it to disk.
//!
//! # Quick Start
//!
//! ```no_run
//! use imagegen::{generate_to_file, GeminiProvider, GenerationRequest};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> imagegen::Result<()> {
//!     // Reads GEMINI_API_KEY unless a key is passed to the builder.
//!     let provider = GeminiProvider::builder().build()?;
//!     let request = GenerationRequest::new("A pirate ship at dawn");
//!     let saved = generate_to_file(&provider, &request, "./generated.png").await?;
//!     println!("{}", saved.summary());
//!     Ok(())
//! }
//! ```

pub mod config;
mod error;
pub mod image;

pub use error::{ImageGenError, Result};

pub use image::{
    format_byte_count, generate_to_file, GeneratedImage, GenerationMetadata, GenerationRequest,
    ImageProvider, SavedImage,
};

pub use image::providers::{GeminiModel, GeminiProvider, GeminiProviderBuilder};
