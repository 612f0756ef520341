use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::github::source::RepoSource;
use crate::models::ContentEntry;

/// Scripted [`RepoSource`] for tests: repositories, listings and file bodies are
/// registered up front and no network is touched.
#[derive(Debug, Clone, Default)]
pub struct MockRepoSource {
    listings: HashMap<String, Vec<ContentEntry>>,
    bodies: HashMap<String, String>,
    failing_repos: HashSet<String>,
    failing_downloads: HashSet<String>,
    downloads: Arc<Mutex<Vec<String>>>,
}

impl MockRepoSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn download_url(owner: &str, repo: &str, name: &str) -> String {
        format!("mock://{}/{}/{}", owner, repo, name)
    }

    /// Registers a repository with an empty root.
    pub fn add_repo(&mut self, owner: &str, repo: &str) -> &mut Self {
        self.listings
            .entry(format!("{}/{}", owner, repo))
            .or_default();
        self
    }

    pub fn add_file(&mut self, owner: &str, repo: &str, name: &str, content: &str) -> &mut Self {
        let url = Self::download_url(owner, repo, name);
        self.listings
            .entry(format!("{}/{}", owner, repo))
            .or_default()
            .push(ContentEntry::file(name, &url));
        self.bodies.insert(url, content.to_string());
        self
    }

    pub fn add_dir(&mut self, owner: &str, repo: &str, name: &str) -> &mut Self {
        self.listings
            .entry(format!("{}/{}", owner, repo))
            .or_default()
            .push(ContentEntry::dir(name));
        self
    }

    /// Adds a file entry that carries no download URL.
    pub fn add_undownloadable(&mut self, owner: &str, repo: &str, name: &str) -> &mut Self {
        let mut entry = ContentEntry::file(name, "");
        entry.download_url = None;
        self.listings
            .entry(format!("{}/{}", owner, repo))
            .or_default()
            .push(entry);
        self
    }

    /// Makes listing the repository fail.
    pub fn fail_repo(&mut self, owner: &str, repo: &str) -> &mut Self {
        self.failing_repos.insert(format!("{}/{}", owner, repo));
        self
    }

    /// Makes downloading one registered file fail.
    pub fn fail_download(&mut self, owner: &str, repo: &str, name: &str) -> &mut Self {
        self.failing_downloads
            .insert(Self::download_url(owner, repo, name));
        self
    }

    /// URLs requested through `fetch_raw`, in call order.
    pub fn downloads(&self) -> Vec<String> {
        self.downloads
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RepoSource for MockRepoSource {
    async fn list_root(&self, owner: &str, repo: &str) -> Result<Vec<ContentEntry>> {
        let full_name = format!("{}/{}", owner, repo);
        if self.failing_repos.contains(&full_name) {
            return Err(Error::GitHubApi(format!(
                "Failed to fetch {}: 502 Bad Gateway",
                full_name
            )));
        }

        self.listings
            .get(&full_name)
            .cloned()
            .ok_or(Error::RepoNotFound(full_name))
    }

    async fn fetch_raw(&self, download_url: &str) -> Result<String> {
        if let Ok(mut calls) = self.downloads.lock() {
            calls.push(download_url.to_string());
        }

        if self.failing_downloads.contains(download_url) {
            return Err(Error::GitHubApi(format!(
                "Failed to fetch {}: 500 Internal Server Error",
                download_url
            )));
        }

        self.bodies
            .get(download_url)
            .cloned()
            .ok_or_else(|| Error::RepoNotFound(download_url.to_string()))
    }
}
