use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use rootdocs::models::load_repositories;
use rootdocs::{logging, Config, Error, Extractor, FsStore, GitHubClient};

#[derive(Parser, Debug)]
#[command(name = "rootdocs-extract")]
#[command(version = "0.1.0")]
#[command(about = "Download root-level community documents from GitHub repositories")]
struct Args {
    /// Configuration file (defaults to config/rootdocs.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let settings = &config.extractor;

    logging::init_logging(&settings.log_file, args.verbose)?;

    // Everything the run needs is checked before the first repository is touched
    let repos = load_repositories(&settings.repositories_file).map_err(logged)?;
    let token = settings.github_token().map_err(logged)?;
    tracing::info!(
        "Loaded {} repositories from {}",
        repos.len(),
        settings.repositories_file.display()
    );

    let github = GitHubClient::new(
        &token,
        &settings.api_url,
        Duration::from_secs(settings.timeout_secs),
    )
    .map_err(logged)?;
    let store = FsStore::new(&settings.output_dir, &config.classifier.output_dir);

    let extractor = Extractor::new(github, store, settings);
    extractor.run(&repos).await;

    Ok(())
}

/// Records a setup failure in the run log before `main` returns it.
fn logged(e: Error) -> Error {
    if e.is_fatal() {
        tracing::error!("{}", e);
    } else {
        tracing::error!("Unexpected setup failure: {}", e);
    }
    e
}
