use async_trait::async_trait;
use futuredoc_core::{AnalysisResult, MediaType};

use crate::AnalysisError;

/// A service that turns a document into an [`AnalysisResult`].
///
/// One call, one outbound request. Implementations do not retry.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(
        &self,
        file_bytes: &[u8],
        media_type: MediaType,
    ) -> Result<AnalysisResult, AnalysisError>;
}
