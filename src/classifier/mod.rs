pub mod sampler;
pub mod pipeline;

pub use sampler::{sample, sample_per_language};
pub use pipeline::{ClassificationSummary, Classifier};
