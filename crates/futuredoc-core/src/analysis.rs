//! Analysis results and the history records that wrap them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Word budget requested for the summary. Requested in the prompt, never enforced.
pub const SUMMARY_MAX_WORDS: usize = 100;

/// Item budget requested for the fact list. Requested in the prompt, never enforced.
pub const FACTS_MAX_ITEMS: usize = 30;

/// Structured output of one analysis call.
///
/// Both fields are required on the wire; a response missing either one
/// fails to deserialize, so there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(alias = "resumo")]
    pub summary: String,
    #[serde(alias = "lista_fatos")]
    pub facts: Vec<String>,
}

impl AnalysisResult {
    pub fn new(summary: impl Into<String>, facts: Vec<String>) -> Self {
        Self {
            summary: summary.into(),
            facts,
        }
    }

    pub fn summary_word_count(&self) -> usize {
        self.summary.split_whitespace().count()
    }

    /// True when the service ignored the size limits asked for in the prompt.
    pub fn exceeds_requested_bounds(&self) -> bool {
        self.summary_word_count() > SUMMARY_MAX_WORDS || self.facts.len() > FACTS_MAX_ITEMS
    }
}

/// One immutable history entry.
///
/// Serialized with the `id` / `timestamp` / `fileName` / `result` layout
/// used by the persisted collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fileName")]
    pub source_file_name: String,
    pub result: AnalysisResult,
}

impl AnalysisRecord {
    /// Wrap a fresh result with a new identifier and the current time.
    pub fn create(source_file_name: impl Into<String>, result: AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            source_file_name: source_file_name.into(),
            result,
        }
    }
}
