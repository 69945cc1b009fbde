//! Fleet evidence CLI: normalize a photo, upload it and submit the record it proves.
//!
//! Reads configuration from the environment (and `.env`): FLEET_API_URL,
//! FLEET_API_TOKEN, STORAGE_BACKEND and the settings of the chosen backend.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use fleet_cli::{format_size, init_tracing, load_payload, read_raw_image, truncate_string};
use fleet_core::{EvidenceConfig, EvidenceKind, EvidencePayload, SubmitMethod, SubmitTarget};
use fleet_evidence::{CaptureContext, CaptureState};
use fleet_processing::ImageNormalizer;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "fleet-evidence", about = "Fleet evidence photo CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a photo, upload it and submit the record
    Capture {
        /// Photo to attach
        #[arg(long)]
        file: PathBuf,
        /// Endpoint path, e.g. /abastecimentos or /jornadas/{id}/finalizar
        #[arg(long)]
        endpoint: String,
        /// create (POST) or update (PUT)
        #[arg(long, default_value = "create")]
        method: String,
        /// refueling, maintenance-order, trip-start or trip-end; inferred from the endpoint when omitted
        #[arg(long)]
        kind: Option<String>,
        /// Substituted into a {id} or :id endpoint segment
        #[arg(long)]
        record_id: Option<String>,
        /// Record as inline JSON or path to a JSON file
        #[arg(long)]
        payload: String,
        /// Submit without asking for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Write the normalized JPEG of a photo without uploading it
    Normalize {
        /// Photo to normalize
        #[arg(long)]
        file: PathBuf,
        /// Output path
        #[arg(long)]
        out: PathBuf,
    },
}

async fn ask_confirmation() -> anyhow::Result<bool> {
    eprint!("Confirm upload and submission? [y/N] ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read confirmation")?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "sim"))
}

fn failure_text(message: &str, suggested_action: Option<&str>) -> String {
    match suggested_action {
        Some(action) => format!("{} ({})", message, action),
        None => message.to_string(),
    }
}

async fn run_capture(
    file: PathBuf,
    endpoint: String,
    method: String,
    kind: Option<String>,
    record_id: Option<String>,
    payload: String,
    yes: bool,
) -> anyhow::Result<()> {
    let config = EvidenceConfig::from_env()?;
    let context = CaptureContext::from_config(&config).await?;

    let method: SubmitMethod = method.parse()?;
    let kind = match kind {
        Some(kind) => kind.parse::<EvidenceKind>()?,
        None => EvidenceKind::infer(&endpoint, method),
    };
    let target = match method {
        SubmitMethod::Create => SubmitTarget::create(endpoint),
        SubmitMethod::Update => SubmitTarget::update(endpoint, record_id),
    };
    let payload = EvidencePayload::from_json(kind, load_payload(&payload).await?)?;

    let raw = read_raw_image(&file).await?;
    let mut capture = context.capture(payload, target);

    match capture.select(raw).await {
        CaptureState::ReadyToConfirm { width, height, .. } => {
            let (width, height) = (*width, *height);
            let image = capture
                .normalized_image()
                .context("Normalized photo missing after selection")?;
            eprintln!(
                "Photo: {} ({}x{}, {})",
                truncate_string(&image.file_name, 40),
                width,
                height,
                format_size(image.size())
            );
            eprintln!(
                "Record: {} -> {} {} (photo field {})",
                kind,
                capture.target().method.as_http_method(),
                capture.target().path,
                kind.photo_field()
            );
        }
        CaptureState::Failed {
            message,
            suggested_action,
            ..
        } => bail!("{}", failure_text(message, *suggested_action)),
        other => bail!("Unexpected state after selection: {}", other.name()),
    }

    if !yes && !ask_confirmation().await? {
        tracing::info!(kind = %kind, "Submission cancelled at confirmation prompt");
        capture.abandon();
        eprintln!("Cancelled");
        return Ok(());
    }

    match capture.confirm().await {
        CaptureState::Succeeded { response } => {
            let out = serde_json::to_string_pretty(response).context("Serialize response")?;
            println!("{}", out);
            Ok(())
        }
        CaptureState::Failed {
            message,
            suggested_action,
            ..
        } => bail!("{}", failure_text(message, *suggested_action)),
        other => bail!("Unexpected state after confirmation: {}", other.name()),
    }
}

async fn run_normalize(file: PathBuf, out: PathBuf) -> anyhow::Result<()> {
    let config = EvidenceConfig::read_env()?;
    let raw = read_raw_image(&file).await?;
    let input_size = raw.size();

    let image = ImageNormalizer::from_config(&config).normalize(raw).await?;

    tokio::fs::write(&out, &image.data)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;

    println!(
        "{} -> {} ({}x{}, {} -> {})",
        file.display(),
        out.display(),
        image.width,
        image.height,
        format_size(input_size),
        format_size(image.size())
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Capture {
            file,
            endpoint,
            method,
            kind,
            record_id,
            payload,
            yes,
        } => run_capture(file, endpoint, method, kind, record_id, payload, yes).await,
        Commands::Normalize { file, out } => run_normalize(file, out).await,
    }
}
