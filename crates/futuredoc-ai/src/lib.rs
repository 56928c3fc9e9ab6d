//! Analysis layer: sends a document to a generative-AI service and parses its structured reply.

mod client;
pub use client::AnalysisClient;

mod error;
pub use error::{AnalysisError, GENERIC_FAILURE_MESSAGE};

pub mod gemini;
pub use gemini::{GeminiClient, GeminiConfig};

pub mod prompt;
