pub mod gemini;

pub use gemini::{GeminiBackend, EMPTY_RESPONSE_FALLBACK};
