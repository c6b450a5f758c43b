use clap::Parser;
use reelname::catalog::{OmdbClient, RetryingCatalog};
use reelname::config::Config;
use reelname::prompt::TerminalSelector;
use reelname::renamer::FolderRenamer;
use reelname::resolve::{NameNormalizer, ResolutionPipeline};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reelname")]
#[command(about = "Rename movie folders to '<Title> (<Year>) - IMDb- <Rating>'", long_about = None)]
struct Cli {
    /// Report intended renames without touching the filesystem
    #[arg(long)]
    dry_run: bool,
}

/// Send all tracing output to the append-only log file
fn init_logging(log_file: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    // Use RUST_LOG env var if set, otherwise default to info level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.log_file) {
        eprintln!(
            "Failed to open log file {}: {}",
            config.log_file.display(),
            e
        );
        std::process::exit(1);
    }

    info!(
        "Starting reelname (root: {}, dry run: {})",
        config.root_path.display(),
        cli.dry_run
    );

    let client = match OmdbClient::new(config.omdb_api_key.clone(), config.request_timeout) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            eprintln!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let catalog = Arc::new(RetryingCatalog::new(client, config.retry_policy()));
    let pipeline = ResolutionPipeline::new(
        catalog,
        NameNormalizer::new(config.normalizer_config()),
        config.pipeline_config(),
    );
    let renamer = FolderRenamer::new(pipeline, cli.dry_run);
    let mut selector = TerminalSelector::stdio();

    if let Err(e) = renamer.run(&config.root_path, &mut selector).await {
        println!("{}", e);
        std::process::exit(1);
    }
}
