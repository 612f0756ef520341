pub mod client;
pub mod source;
pub mod mock;

pub use client::GitHubClient;
pub use source::RepoSource;
pub use mock::MockRepoSource;
