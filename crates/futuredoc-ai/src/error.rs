use thiserror::Error;

/// Message shown for every failure other than missing configuration.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to process the document. Check that it is a valid legal file.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("service returned no text")]
    EmptyResponse,

    #[error("malformed analysis JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl AnalysisError {
    /// The text a user sees. Configuration problems are shown verbatim;
    /// everything else collapses to [`GENERIC_FAILURE_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingApiKey => self.to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
