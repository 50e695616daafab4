//! Image generation providers.

mod gemini;

pub use gemini::{
    GeminiModel, GeminiProvider, GeminiProviderBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
