pub mod analysis;
pub mod media;
pub mod schema;

pub use analysis::{AnalysisRecord, AnalysisResult, FACTS_MAX_ITEMS, SUMMARY_MAX_WORDS};
pub use media::{MediaType, SourceDocument, UnsupportedMediaType};
pub use schema::analysis_response_schema;
