use clap::Parser;
use std::path::PathBuf;

use rootdocs::{
    logging, Classifier, ClassifierOptions, Config, Error, FsStore, OpenAIProvider, PromptSet,
};

#[derive(Parser, Debug)]
#[command(name = "rootdocs-classify")]
#[command(version = "0.1.0")]
#[command(about = "Classify extracted root documents with a language model")]
struct Args {
    /// Configuration file (defaults to config/rootdocs.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validation mode: classify only this many random files per language
    #[arg(long)]
    sample: Option<usize>,

    /// Seed for validation-mode sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if args.sample.is_some() {
        config.classifier.sample_per_language = args.sample;
    }
    if args.seed.is_some() {
        config.classifier.sample_seed = args.seed;
    }
    let settings = &config.classifier;

    logging::init_logging(&settings.log_file, args.verbose)?;

    let prompts = PromptSet::load(settings.prompts_file.as_deref()).map_err(logged)?;
    let api_key = settings.api_key().map_err(logged)?;

    let llm = OpenAIProvider::new(api_key, &settings.api_url, &settings.model).map_err(logged)?;
    let store = FsStore::new(&settings.input_dir, &settings.output_dir);

    if let Some(k) = settings.sample_per_language {
        tracing::info!("Validation mode: sampling up to {} file(s) per language", k);
    }

    let classifier = Classifier::new(llm, store, prompts, ClassifierOptions::from(settings));
    // Per-file failures are handled inside the run; only the input listing can end it
    if let Err(e) = classifier.run().await {
        if e.is_fatal() {
            return Err(logged(e).into());
        }
        tracing::error!("Classification stopped: {}", e);
    }

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
