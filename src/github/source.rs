use async_trait::async_trait;

use crate::error::Result;
use crate::models::ContentEntry;

/// Read access to repository root contents.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// Lists the entries of the repository's top-level directory, in API order.
    async fn list_root(&self, owner: &str, repo: &str) -> Result<Vec<ContentEntry>>;

    /// Downloads the raw body of a file.
    async fn fetch_raw(&self, download_url: &str) -> Result<String>;
}
