use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Rate limit exceeded, resets in {0} seconds")]
    RateLimited(u64),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Configuration and logging failures abort a run before any item is processed.
    /// A credential that cannot be sent as a header counts as configuration.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::Logging(_) | Error::InvalidHeader(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(Error::Config("missing token".into()).is_fatal());
        assert!(!Error::RateLimited(30).is_fatal());
        assert!(!Error::RepoNotFound("octocat/missing".into()).is_fatal());
        assert!(!Error::ParseError("no json".into()).is_fatal());
        assert!(!Error::Storage("input directory unreadable".into()).is_fatal());

        let bad_token = reqwest::header::HeaderValue::from_str("token\nwith newline").unwrap_err();
        assert!(Error::from(bad_token).is_fatal());
    }
}
