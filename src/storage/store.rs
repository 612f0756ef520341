use crate::error::Result;
use crate::models::AggregateKey;

/// The only channel between the extractor and the classifier: aggregate text files
/// are written by one and enumerated and read by the other, classification output
/// is written alongside in a mirrored layout.
pub trait DocumentStore: Send + Sync {
    fn write_aggregate(&self, key: &AggregateKey, content: &str) -> Result<()>;

    /// Every available aggregate, sorted by language then file name.
    fn list_aggregates(&self) -> Result<Vec<AggregateKey>>;

    fn read_aggregate(&self, key: &AggregateKey) -> Result<String>;

    fn write_classification(&self, key: &AggregateKey, json: &str) -> Result<()>;

    fn read_classification(&self, key: &AggregateKey) -> Result<Option<String>>;
}
