use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jobify::analytics::{summarize, ApplicationRecord};
use jobify::utils::{parse_job_url, read_file_safe};
use jobify::{start_web_server, ConfigManager, ExtractionRequest, JobExtractor};
use std::path::PathBuf;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "jobify", version, about = "Job posting extraction service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Extract application fields from one posting URL and print them
    Extract { url: String },
    /// Print dashboard statistics for a JSON array of application records
    Summarize { file: PathBuf },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("jobify=info,rocket=warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_current_span(true).with_span_list(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = ConfigManager::load()?;
            info!(
                "Environment: {}",
                jobify::environment::EnvironmentConfig::get_environment()
            );
            start_web_server(config).await
        }
        Command::Extract { url } => {
            let config = ConfigManager::load()?;
            let extractor = JobExtractor::from_config(&config)?;
            let url = parse_job_url(&url)?;

            let fields = extractor
                .extract(&ExtractionRequest::new(url, "cli"))
                .await
                .context("Extraction failed")?;

            println!("{}", serde_json::to_string_pretty(&fields)?);
            Ok(())
        }
        Command::Summarize { file } => {
            let content = read_file_safe(&file).await?;
            let records: Vec<ApplicationRecord> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse records in {}", file.display()))?;

            let summary = summarize(&records, chrono::Utc::now().date_naive());
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}
