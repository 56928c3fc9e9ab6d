//! The intake session state machine.
//!
//! ```text
//! Idle ──select──▶ Processing ──ok──▶ Success
//!                      │                 ▲
//!                      └──err──▶ Error   │
//! any ──select history entry─────────────┘
//! ```
//!
//! Success and Error return to Processing on the next file selection.

use futuredoc_ai::AnalysisClient;
use futuredoc_core::{
    AnalysisRecord, AnalysisResult, MediaType, SourceDocument, UnsupportedMediaType,
};
use futuredoc_store::{KeyValueStore, RecordStore};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Where the session is in the intake flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Processing,
    Success,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// An accepted file waiting for its analysis call.
///
/// Produced by [`IntakeSession::begin`]; only the most recent one may be
/// completed.
#[derive(Debug)]
pub struct PendingAnalysis {
    ticket: u64,
    file_name: String,
    media_type: MediaType,
    bytes: Vec<u8>,
}

impl PendingAnalysis {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }
}

/// View state and collaborators for one user session.
///
/// Owns the in-memory history and the displayed result; the record store
/// is only reached through [`RecordStore::append`] and
/// [`RecordStore::list_all`].
pub struct IntakeSession<C, S> {
    client: C,
    records: RecordStore<S>,
    history: Vec<AnalysisRecord>,
    status: Status,
    result: Option<AnalysisResult>,
    error_message: Option<String>,
    ticket: u64,
}

impl<C: AnalysisClient, S: KeyValueStore> IntakeSession<C, S> {
    /// Start a session, loading the persisted history.
    pub async fn load(client: C, records: RecordStore<S>) -> Self {
        let history = records.list_all().await;
        info!(records = history.len(), "history loaded");
        Self {
            client,
            records,
            history,
            status: Status::Idle,
            result: None,
            error_message: None,
            ticket: 0,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The result currently on display, if any.
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// In-memory history, newest first.
    pub fn history(&self) -> &[AnalysisRecord] {
        &self.history
    }

    pub fn records(&self) -> &RecordStore<S> {
        &self.records
    }

    /// Accept a file and move to Processing.
    ///
    /// Unsupported types are rejected without touching the session state.
    pub fn begin(&mut self, doc: SourceDocument) -> Result<PendingAnalysis, UnsupportedMediaType> {
        let media_type = doc.accepted_media_type().inspect_err(|e| {
            warn!(file = %doc.file_name, error = %e, "rejected file");
        })?;

        self.ticket += 1;
        self.status = Status::Processing;
        self.result = None;
        self.error_message = None;
        info!(file = %doc.file_name, media_type = %media_type, "processing document");

        Ok(PendingAnalysis {
            ticket: self.ticket,
            file_name: doc.file_name,
            media_type,
            bytes: doc.bytes,
        })
    }

    /// Run the analysis for `pending` and settle into Success or Error.
    ///
    /// On success the record is persisted and prepended to the in-memory
    /// history; the history is updated even if persistence failed. A
    /// pending analysis superseded by a later [`begin`](Self::begin) is
    /// dropped without contacting the service.
    pub async fn complete(&mut self, pending: PendingAnalysis) -> Status {
        if pending.ticket != self.ticket {
            warn!(file = %pending.file_name, "discarding superseded analysis");
            return self.status;
        }

        match self.client.analyze(&pending.bytes, pending.media_type).await {
            Ok(result) => {
                self.result = Some(result.clone());
                self.status = Status::Success;

                let record = AnalysisRecord::create(pending.file_name, result);
                self.records.append(&record).await;
                info!(record_id = %record.id, file = %record.source_file_name, "analysis stored");
                self.history.insert(0, record);
            }
            Err(e) => {
                error!(file = %pending.file_name, error = %e, "analysis failed");
                self.status = Status::Error;
                self.error_message = Some(e.user_message());
            }
        }
        debug!(status = self.status.as_str(), "analysis settled");
        self.status
    }

    /// [`begin`](Self::begin) followed by [`complete`](Self::complete).
    pub async fn submit(&mut self, doc: SourceDocument) -> Result<Status, UnsupportedMediaType> {
        let pending = self.begin(doc)?;
        Ok(self.complete(pending).await)
    }

    /// Re-display a stored result without re-running the analysis.
    ///
    /// Returns `None` and leaves the state alone when `id` is not in the history.
    pub fn select_history(&mut self, id: Uuid) -> Option<&AnalysisResult> {
        let Some(record) = self.history.iter().find(|r| r.id == id) else {
            warn!(record_id = %id, "history entry not found");
            return None;
        };
        self.result = Some(record.result.clone());
        self.error_message = None;
        self.status = Status::Success;
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futuredoc_ai::{AnalysisError, GENERIC_FAILURE_MESSAGE};
    use futuredoc_store::{MemoryStore, StoreError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Client returning a canned reply and counting calls.
    struct StubClient {
        reply: Result<AnalysisResult, String>,
        calls: AtomicUsize,
    }

    impl StubClient {
        fn ok(summary: &str, facts: &[&str]) -> Self {
            Self {
                reply: Ok(AnalysisResult::new(
                    summary,
                    facts.iter().map(|f| f.to_string()).collect(),
                )),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(cause: &str) -> Self {
            Self {
                reply: Err(cause.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisClient for StubClient {
        async fn analyze(
            &self,
            _file_bytes: &[u8],
            _media_type: MediaType,
        ) -> Result<AnalysisResult, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(result) => Ok(result.clone()),
                Err(cause) => Err(AnalysisError::Server {
                    status: 502,
                    body: cause.clone(),
                }),
            }
        }
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
    }

    fn text_file(name: &str, content: &str) -> SourceDocument {
        SourceDocument::new(name, "text/plain", content.as_bytes().to_vec())
    }

    async fn session(client: StubClient) -> IntakeSession<StubClient, MemoryStore> {
        IntakeSession::load(client, RecordStore::new(MemoryStore::open())).await
    }

    #[tokio::test]
    async fn new_session_is_idle() {
        let s = session(StubClient::ok("x", &[])).await;
        assert_eq!(s.status(), Status::Idle);
        assert!(s.result().is_none());
        assert!(s.history().is_empty());
    }

    #[tokio::test]
    async fn accepting_a_file_moves_to_processing_immediately() {
        let mut s = session(StubClient::ok("x", &[])).await;
        let pending = s.begin(text_file("a.txt", "conteúdo")).unwrap();
        assert_eq!(s.status(), Status::Processing);
        assert_eq!(pending.media_type(), MediaType::PlainText);
        assert_eq!(pending.file_name(), "a.txt");

        let pdf = SourceDocument::new("b.pdf", "application/pdf", b"%PDF".to_vec());
        s.begin(pdf).unwrap();
        assert_eq!(s.status(), Status::Processing);
    }

    #[tokio::test]
    async fn plain_text_scenario_reaches_success() {
        let mut s = session(StubClient::ok("Resumo X", &["Fato A", "Fato B"])).await;

        let status = s
            .submit(text_file("processo.txt", "Processo nº 123..."))
            .await
            .unwrap();

        assert_eq!(status, Status::Success);
        let shown = s.result().unwrap();
        assert_eq!(shown.summary, "Resumo X");
        assert_eq!(shown.facts, vec!["Fato A", "Fato B"]);
        assert!(s.error_message().is_none());

        assert_eq!(s.history().len(), 1);
        let record = &s.history()[0];
        assert_eq!(record.source_file_name, "processo.txt");
        assert_eq!(&record.result, shown);
        assert_eq!(s.records().list_all().await, s.history());
    }

    #[tokio::test]
    async fn transport_failure_scenario_reaches_error() {
        let mut s = session(StubClient::failing("connection reset by peer")).await;

        let status = s.submit(text_file("a.txt", "texto")).await.unwrap();

        assert_eq!(status, Status::Error);
        assert_eq!(s.error_message(), Some(GENERIC_FAILURE_MESSAGE));
        assert!(!s.error_message().unwrap().contains("connection reset"));
        assert!(s.result().is_none());
        assert!(s.history().is_empty());
        assert!(s.records().list_all().await.is_empty());
    }

    #[tokio::test]
    async fn missing_key_message_is_shown_verbatim() {
        struct NoKeyClient;

        #[async_trait]
        impl AnalysisClient for NoKeyClient {
            async fn analyze(
                &self,
                _file_bytes: &[u8],
                _media_type: MediaType,
            ) -> Result<AnalysisResult, AnalysisError> {
                Err(AnalysisError::MissingApiKey)
            }
        }

        let mut s = IntakeSession::load(NoKeyClient, RecordStore::new(MemoryStore::open())).await;
        s.submit(text_file("a.txt", "texto")).await.unwrap();
        assert_eq!(s.status(), Status::Error);
        assert_eq!(s.error_message(), Some("API key is not configured"));
    }

    #[tokio::test]
    async fn unsupported_type_never_reaches_the_client() {
        let mut s = session(StubClient::ok("x", &[])).await;
        let image = SourceDocument::new("foto.png", "image/png", vec![0x89, b'P', b'N', b'G']);

        let err = s.submit(image).await.unwrap_err();
        assert_eq!(err.found, "image/png");
        assert_eq!(s.status(), Status::Idle);
        assert_eq!(s.client.calls(), 0);
        assert!(s.history().is_empty());
    }

    #[tokio::test]
    async fn unsupported_type_keeps_previous_result_on_screen() {
        let mut s = session(StubClient::ok("Resumo", &["Fato"])).await;
        s.submit(text_file("a.txt", "texto")).await.unwrap();

        let docx = SourceDocument::new(
            "contrato.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            vec![],
        );
        assert!(s.begin(docx).is_err());
        assert_eq!(s.status(), Status::Success);
        assert_eq!(s.result().unwrap().summary, "Resumo");
        assert_eq!(s.client.calls(), 1);
    }

    #[tokio::test]
    async fn new_selection_clears_previous_error() {
        let mut s = session(StubClient::failing("timeout")).await;
        s.submit(text_file("a.txt", "texto")).await.unwrap();
        assert!(s.error_message().is_some());

        s.begin(text_file("b.txt", "outro")).unwrap();
        assert_eq!(s.status(), Status::Processing);
        assert!(s.error_message().is_none());
        assert!(s.result().is_none());
    }

    #[tokio::test]
    async fn each_success_prepends_one_record() {
        let mut s = session(StubClient::ok("Resumo", &["Fato"])).await;
        s.submit(text_file("primeiro.txt", "1")).await.unwrap();
        s.submit(text_file("segundo.txt", "2")).await.unwrap();

        let names: Vec<_> = s
            .history()
            .iter()
            .map(|r| r.source_file_name.as_str())
            .collect();
        assert_eq!(names, vec!["segundo.txt", "primeiro.txt"]);
        assert_eq!(s.client.calls(), 2);
    }

    #[tokio::test]
    async fn third_record_lands_in_front_of_seeded_history() {
        let kv = MemoryStore::open();
        let seeded = RecordStore::new(kv);
        let oldest = AnalysisRecord::create("antigo.txt", AnalysisResult::new("A", vec![]));
        let older = AnalysisRecord::create("anterior.txt", AnalysisResult::new("B", vec![]));
        seeded.append(&oldest).await;
        seeded.append(&older).await;

        let mut s = IntakeSession::load(StubClient::ok("C", &["Fato C"]), seeded).await;
        assert_eq!(s.history().len(), 2);
        s.submit(text_file("novo.txt", "3")).await.unwrap();

        let stored = s.records().list_all().await;
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].source_file_name, "novo.txt");
        assert_eq!(stored[1].id, older.id);
        assert_eq!(stored[2].id, oldest.id);
        assert_eq!(s.history(), stored.as_slice());
    }

    #[tokio::test]
    async fn persistence_failure_still_shows_result_and_history() {
        let mut s = IntakeSession::load(
            StubClient::ok("Resumo", &["Fato"]),
            RecordStore::new(ReadOnlyStore),
        )
        .await;

        let status = s.submit(text_file("a.txt", "texto")).await.unwrap();
        assert_eq!(status, Status::Success);
        assert_eq!(s.history().len(), 1);
        assert!(s.records().list_all().await.is_empty());
        assert!(s.error_message().is_none());
    }

    #[tokio::test]
    async fn selecting_history_redisplays_without_analysis() {
        let mut s = session(StubClient::ok("Resumo", &["Fato"])).await;
        s.submit(text_file("a.txt", "texto")).await.unwrap();
        let id = s.history()[0].id;

        s.begin(text_file("b.txt", "outro")).unwrap();
        assert_eq!(s.status(), Status::Processing);

        let shown = s.select_history(id).cloned();
        assert_eq!(shown.unwrap().summary, "Resumo");
        assert_eq!(s.status(), Status::Success);
        assert_eq!(s.client.calls(), 1);
    }

    #[tokio::test]
    async fn selecting_history_from_error_state_clears_message() {
        let records = RecordStore::new(MemoryStore::open());
        let record = AnalysisRecord::create("velho.pdf", AnalysisResult::new("Antigo", vec![]));
        records.append(&record).await;

        let mut s = IntakeSession::load(StubClient::failing("boom"), records).await;
        s.submit(text_file("a.txt", "texto")).await.unwrap();
        assert_eq!(s.status(), Status::Error);

        assert!(s.select_history(record.id).is_some());
        assert_eq!(s.status(), Status::Success);
        assert!(s.error_message().is_none());
    }

    #[tokio::test]
    async fn unknown_history_id_changes_nothing() {
        let mut s = session(StubClient::ok("x", &[])).await;
        assert!(s.select_history(Uuid::new_v4()).is_none());
        assert_eq!(s.status(), Status::Idle);
    }

    #[tokio::test]
    async fn superseded_pending_analysis_is_dropped() {
        let mut s = session(StubClient::ok("Resumo", &[])).await;
        let stale = s.begin(text_file("velho.txt", "1")).unwrap();
        let fresh = s.begin(text_file("novo.txt", "2")).unwrap();

        assert_eq!(s.complete(stale).await, Status::Processing);
        assert_eq!(s.client.calls(), 0);
        assert!(s.history().is_empty());

        assert_eq!(s.complete(fresh).await, Status::Success);
        assert_eq!(s.history()[0].source_file_name, "novo.txt");
    }
}
