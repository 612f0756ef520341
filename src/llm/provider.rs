use async_trait::async_trait;
use crate::error::Result;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Sends one system + user message pair and returns the raw completion text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
    fn name(&self) -> &str;
}
