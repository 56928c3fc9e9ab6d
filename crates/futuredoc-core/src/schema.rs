//! Response schema sent to the analysis service.
//!
//! The service is asked to constrain its output to this shape; the same
//! shape is what [`AnalysisResult`](crate::AnalysisResult) deserializes.

use serde_json::{Value, json};

/// OpenAPI-subset schema for `{summary: string, facts: string[]}`.
pub fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "Executive summary of the case, at most 100 words."
            },
            "facts": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Relevant facts and case metadata."
            }
        },
        "required": ["summary", "facts"]
    })
}
