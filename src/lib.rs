pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod github;
pub mod llm;
pub mod storage;
pub mod extractor;
pub mod classifier;
mod progress;

pub use config::{ClassifierOptions, Config};
pub use error::{Error, Result};
pub use github::{GitHubClient, RepoSource};
pub use llm::{LLMProvider, OpenAIProvider, PromptSet};
pub use storage::{DocumentStore, FsStore, MemoryStore};
pub use extractor::Extractor;
pub use classifier::Classifier;
