pub mod client;

pub use client::{
    GeminiApiKey, GeminiClient, GeminiClientError, GeminiClientErrorKind, GeminiModel, Result,
};
