use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::llm::provider::LLMProvider;

/// Deterministic [`LLMProvider`] for tests. A response is chosen by the first rule
/// whose marker is contained in the user prompt; otherwise the default applies.
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Option<String>,
    rules: Vec<(String, Option<String>)>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Some(response.into()),
            rules: Vec::new(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider that fails every request not matched by a rule.
    pub fn failing() -> Self {
        Self {
            default_response: None,
            rules: Vec::new(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_response(&mut self, marker: impl Into<String>, response: impl Into<String>) {
        self.rules.push((marker.into(), Some(response.into())));
    }

    /// Makes requests containing `marker` fail with an API error.
    pub fn add_error(&mut self, marker: impl Into<String>) {
        self.rules.push((marker.into(), None));
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// User prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LLMProvider for MockProvider {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let response = self
            .rules
            .iter()
            .find(|(marker, _)| prompt.contains(marker.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.default_response.clone());

        response.ok_or_else(|| Error::LLMApi("mock provider error".to_string()))
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
