mod display;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use futuredoc_ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use futuredoc_ai::{GeminiClient, GeminiConfig};
use futuredoc_core::{MediaType, SourceDocument, UnsupportedMediaType};
use futuredoc_intake::{IntakeSession, Status};
use futuredoc_store::{FileStore, RecordStore};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "futuredoc", version, about = "Summarise legal documents and extract case facts")]
struct Cli {
    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Model used for analysis.
    #[arg(long, env = "FUTUREDOC_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// Base URL of the analysis service.
    #[arg(long, env = "FUTUREDOC_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Directory holding the analysis history.
    #[arg(long, env = "FUTUREDOC_DATA_DIR", default_value = ".futuredoc", global = true)]
    data_dir: PathBuf,

    /// HTTP timeout in seconds (none by default).
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse a PDF or plain-text document and store the result.
    Analyze {
        file: PathBuf,

        /// MIME type of the file; inferred from the extension when omitted.
        #[arg(long)]
        media_type: Option<String>,
    },
    /// List stored analyses, newest first.
    History,
    /// Show a stored analysis without contacting the service.
    Show { id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("futuredoc v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let client = GeminiClient::new(GeminiConfig {
        api_key: cli.api_key,
        model: cli.model,
        base_url: cli.base_url,
        timeout: cli.timeout_secs.map(Duration::from_secs),
    })
    .context("building analysis client")?;
    tracing::debug!(model = client.model(), data_dir = %cli.data_dir.display(), "configured");
    let records = RecordStore::new(FileStore::open(&cli.data_dir));
    let mut session = IntakeSession::load(client, records).await;

    match cli.command {
        Command::Analyze { file, media_type } => {
            let media_type = resolve_media_type(&file, media_type.as_deref())?;
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());

            let doc = SourceDocument::new(file_name.clone(), media_type.as_mime(), bytes);
            match session.submit(doc).await? {
                Status::Success => {
                    if let Some(result) = session.result() {
                        print!("{}", display::render_result_card(&file_name, result));
                    }
                }
                _ => bail!(
                    "{}",
                    session.error_message().unwrap_or("analysis did not complete")
                ),
            }
        }
        Command::History => {
            print!("{}", display::render_history(session.history()));
        }
        Command::Show { id } => {
            let Some(file_name) = session
                .history()
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.source_file_name.clone())
            else {
                bail!("no stored analysis with id {id}");
            };
            if let Some(result) = session.select_history(id) {
                print!("{}", display::render_result_card(&file_name, result));
            }
        }
    }

    Ok(())
}

/// Pick the media type from `--media-type` or the extension, before the file is read.
fn resolve_media_type(
    file: &Path,
    explicit: Option<&str>,
) -> Result<MediaType, UnsupportedMediaType> {
    match explicit {
        Some(mime) => MediaType::from_mime(mime),
        None => MediaType::from_path(file),
    }
}
