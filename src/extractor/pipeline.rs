use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::extractor::matcher::TargetMatcher;
use crate::github::RepoSource;
use crate::models::{AggregateKey, AggregateText, RepositoryRecord};
use crate::progress::progress_bar;
use crate::storage::DocumentStore;

/// What extraction produced for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    /// An aggregate file was written holding these source files, in listing order.
    Written { key: AggregateKey, files: Vec<String> },
    /// Nothing matched (or every matched download failed); no file was written.
    NoMatches,
}

#[derive(Debug, Clone)]
pub struct ExtractionSummary {
    pub processed: usize,
    pub written: usize,
    pub empty: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct Extractor {
    source: Arc<dyn RepoSource>,
    store: Arc<dyn DocumentStore>,
    matcher: TargetMatcher,
}

impl Extractor {
    pub fn new(
        source: impl RepoSource + 'static,
        store: impl DocumentStore + 'static,
        config: &ExtractorConfig,
    ) -> Self {
        Self {
            source: Arc::new(source),
            store: Arc::new(store),
            matcher: TargetMatcher::new(&config.target_files),
        }
    }

    /// Processes every repository in order. A failing repository is logged and
    /// counted; it never stops the ones after it.
    pub async fn run(&self, repos: &[RepositoryRecord]) -> ExtractionSummary {
        let started_at = Utc::now();
        tracing::info!("Extraction started at {}", started_at);

        let mut summary = ExtractionSummary {
            processed: 0,
            written: 0,
            empty: 0,
            failed: 0,
            started_at,
            finished_at: started_at,
        };

        let pb = progress_bar(repos.len(), "repos");

        for repo in repos {
            let full_name = repo.full_name();
            tracing::info!(
                repo = %full_name,
                "Processing repository (language: {})",
                repo.language
            );

            match self.extract_repository(repo).await {
                Ok(RepoOutcome::Written { .. }) => summary.written += 1,
                Ok(RepoOutcome::NoMatches) => summary.empty += 1,
                Err(e) => {
                    tracing::error!(repo = %full_name, action = "error", "Error processing repository: {}", e);
                    summary.failed += 1;
                }
            }

            summary.processed += 1;
            pb.inc(1);
        }

        pb.finish_with_message("Extraction complete");

        summary.finished_at = Utc::now();
        tracing::info!(
            "Extraction finished at {}: {} processed, {} written, {} without matches, {} failed",
            summary.finished_at,
            summary.processed,
            summary.written,
            summary.empty,
            summary.failed
        );
        tracing::info!("Total duration: {}", summary.finished_at - summary.started_at);

        summary
    }

    /// Lists the repository root, downloads every matching file and writes the
    /// aggregate. Failed downloads are logged and left out; the remaining blocks
    /// are still written.
    pub async fn extract_repository(&self, repo: &RepositoryRecord) -> Result<RepoOutcome> {
        let full_name = repo.full_name();
        let entries = self.source.list_root(&repo.owner, &repo.name).await?;

        let mut aggregate = AggregateText::new();

        for entry in &entries {
            if !self.matcher.is_target(entry) {
                tracing::info!(
                    repo = %full_name,
                    file = %entry.name,
                    action = "skipped",
                    "Skipping non-matching entry"
                );
                continue;
            }

            let Some(url) = entry.download_url.as_deref().filter(|u| !u.is_empty()) else {
                tracing::warn!(
                    repo = %full_name,
                    file = %entry.name,
                    action = "skipped",
                    "File has no download URL"
                );
                continue;
            };

            match self.source.fetch_raw(url).await {
                Ok(content) => {
                    aggregate.push_file(&entry.name, &content);
                    tracing::info!(
                        repo = %full_name,
                        file = %entry.name,
                        action = "added",
                        "Downloaded root file"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        repo = %full_name,
                        file = %entry.name,
                        action = "error",
                        "Failed to download file: {}",
                        e
                    );
                }
            }
        }

        if aggregate.is_empty() {
            tracing::info!(
                repo = %full_name,
                action = "skipped",
                "No matching root files, nothing written"
            );
            return Ok(RepoOutcome::NoMatches);
        }

        let key = repo.aggregate_key();
        let files = aggregate.files().to_vec();
        self.store.write_aggregate(&key, aggregate.as_str())?;
        tracing::info!(
            repo = %full_name,
            action = "added",
            "Wrote {} file(s) to {}",
            files.len(),
            key
        );

        Ok(RepoOutcome::Written { key, files })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::MockRepoSource;
    use crate::storage::MemoryStore;
    use std::sync::{Arc, Mutex};

    fn extractor(source: MockRepoSource, store: MemoryStore) -> Extractor {
        Extractor::new(source, store, &ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_only_matching_files_are_fetched() {
        let mut source = MockRepoSource::new();
        source
            .add_file("octocat", "demo", "README.md", "# Demo")
            .add_file("octocat", "demo", "LICENSE", "MIT")
            .add_dir("octocat", "demo", "readme-assets")
            .add_file("octocat", "demo", "CONTRIBUTING.md", "Open a PR");
        let store = MemoryStore::new();

        let outcome = extractor(source.clone(), store.clone())
            .extract_repository(&RepositoryRecord::new("octocat", "demo", "python"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RepoOutcome::Written {
                key: AggregateKey::new("python", "octocat_demo"),
                files: vec!["README.md".to_string(), "CONTRIBUTING.md".to_string()],
            }
        );
        assert_eq!(source.downloads().len(), 2);

        let text = store
            .read_aggregate(&AggregateKey::new("python", "octocat_demo"))
            .unwrap();
        assert!(text.contains("# Demo"));
        assert!(!text.contains("LICENSE"));
        assert!(!text.contains("readme-assets"));
    }

    #[tokio::test]
    async fn test_missing_download_url_skipped() {
        let mut source = MockRepoSource::new();
        source.add_undownloadable("octocat", "demo", "README.md");
        let store = MemoryStore::new();

        let outcome = extractor(source, store.clone())
            .extract_repository(&RepositoryRecord::new("octocat", "demo", "python"))
            .await
            .unwrap();

        assert_eq!(outcome, RepoOutcome::NoMatches);
        assert!(store.list_aggregates().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_download_keeps_other_blocks() {
        let mut source = MockRepoSource::new();
        source
            .add_file("octocat", "demo", "README.md", "# Demo")
            .add_file("octocat", "demo", "SECURITY.md", "Report privately")
            .fail_download("octocat", "demo", "README.md");
        let store = MemoryStore::new();

        let outcome = extractor(source, store.clone())
            .extract_repository(&RepositoryRecord::new("octocat", "demo", "python"))
            .await
            .unwrap();

        assert!(matches!(outcome, RepoOutcome::Written { ref files, .. } if files == &["SECURITY.md"]));
        let text = store
            .read_aggregate(&AggregateKey::new("python", "octocat_demo"))
            .unwrap();
        assert!(!text.contains("README.md"));
        assert!(text.contains("Report privately"));
    }

    #[tokio::test]
    async fn test_listing_failure_is_an_error() {
        let mut source = MockRepoSource::new();
        source.fail_repo("octocat", "broken");

        let result = extractor(source, MemoryStore::new())
            .extract_repository(&RepositoryRecord::new("octocat", "broken", "go"))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_root_writes_nothing() {
        let mut source = MockRepoSource::new();
        source.add_repo("octocat", "bare");
        let store = MemoryStore::new();

        let outcome = extractor(source.clone(), store.clone())
            .extract_repository(&RepositoryRecord::new("octocat", "bare", "rust"))
            .await
            .unwrap();

        assert_eq!(outcome, RepoOutcome::NoMatches);
        assert!(source.downloads().is_empty());
        assert!(store.list_aggregates().unwrap().is_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_written_repository_logged_as_added() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut source = MockRepoSource::new();
        source.add_file("octocat", "demo", "README.md", "# Demo");
        extractor(source, MemoryStore::new())
            .extract_repository(&RepositoryRecord::new("octocat", "demo", "python"))
            .await
            .unwrap();

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        let line = output
            .lines()
            .find(|l| l.contains("Wrote 1 file(s) to python/octocat_demo.txt"))
            .unwrap();
        assert!(line.contains("action=\"added\""), "{}", line);
        assert!(line.contains("repo=octocat/demo"), "{}", line);
    }
}
