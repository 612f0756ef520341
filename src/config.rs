use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config/rootdocs.yaml";

pub const DEFAULT_TARGET_FILES: &[&str] = &[
    "readme",
    "contributing",
    "code_of_conduct",
    "governance",
    "codeowners",
    "community",
    "support",
    "security",
    "release",
    "code-of-conduct",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extractor: ExtractorConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub output_dir: PathBuf,
    pub repositories_file: PathBuf,
    pub log_file: PathBuf,
    pub target_files: Vec<String>,
    /// Name of the environment variable holding the GitHub token.
    pub token_env: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data/root_files"),
            repositories_file: PathBuf::from("config/repositories.json"),
            log_file: PathBuf::from("logs/extractor.log"),
            target_files: DEFAULT_TARGET_FILES.iter().map(|s| s.to_string()).collect(),
            token_env: "GITHUB_TOKEN".to_string(),
            api_url: "https://api.github.com".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub log_file: PathBuf,
    /// Name of the environment variable holding the text-generation API key.
    pub api_key_env: String,
    pub api_url: String,
    pub model: String,
    /// Restrict discovery to these language directories. Empty means all.
    pub languages: Vec<String>,
    /// Validation mode: classify at most this many random files per language.
    pub sample_per_language: Option<usize>,
    pub sample_seed: Option<u64>,
    pub concurrency_limit: usize,
    pub prompts_file: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/root_files"),
            output_dir: PathBuf::from("data/classification"),
            log_file: PathBuf::from("logs/classifier.log"),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini-2024-07-18".to_string(),
            languages: Vec::new(),
            sample_per_language: None,
            sample_seed: None,
            concurrency_limit: 1,
            prompts_file: None,
        }
    }
}

impl Config {
    /// Loads the YAML configuration. An explicit path must exist; without one the
    /// default location is tried and built-in defaults are used if it is absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "configuration file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw)
            .map_err(|e| Error::Config(format!("invalid configuration: {}", e)))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read configuration {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&raw)
    }

    fn validate(&self) -> Result<()> {
        if self.extractor.target_files.is_empty() {
            return Err(Error::Config(
                "extractor.target_files must not be empty".to_string(),
            ));
        }

        if self.classifier.concurrency_limit == 0 {
            return Err(Error::Config(
                "classifier.concurrency_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl ExtractorConfig {
    pub fn github_token(&self) -> Result<String> {
        read_secret(&self.token_env)
    }
}

impl ClassifierConfig {
    pub fn api_key(&self) -> Result<String> {
        read_secret(&self.api_key_env)
    }
}

/// Runtime knobs of the classifier, split from the file-level settings.
#[derive(Debug, Clone)]
pub struct ClassifierOptions {
    pub languages: Vec<String>,
    pub sample_per_language: Option<usize>,
    pub sample_seed: Option<u64>,
    pub concurrency_limit: usize,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self::from(&ClassifierConfig::default())
    }
}

impl From<&ClassifierConfig> for ClassifierOptions {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            languages: config.languages.iter().map(|l| l.to_lowercase()).collect(),
            sample_per_language: config.sample_per_language,
            sample_seed: config.sample_seed,
            concurrency_limit: config.concurrency_limit.max(1),
        }
    }
}

fn read_secret(var: &str) -> Result<String> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!(
            "{} environment variable not set",
            var
        ))),
    }
}
