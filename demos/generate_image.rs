//! Basic image generation example.
//!
//! Run with: `cargo run --example generate_image -- "a treasure map"`
//!
//! Requires `GEMINI_API_KEY` environment variable.

use imagegen::{generate_to_file, GeminiModel, GeminiProvider, GenerationRequest};

#[tokio::main(flavor = "current_thread")]
async fn main() -> imagegen::Result<()> {
    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "A weathered treasure map on parchment".to_string());

    let provider = GeminiProvider::builder()
        .model(GeminiModel::FlashImage)
        .build()?;

    let request = GenerationRequest::new(prompt);
    let saved = generate_to_file(&provider, &request, "output/map.png").await?;

    println!("{}", saved.summary());
    Ok(())
}
