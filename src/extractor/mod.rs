pub mod matcher;
pub mod pipeline;

pub use matcher::TargetMatcher;
pub use pipeline::{ExtractionSummary, Extractor, RepoOutcome};
