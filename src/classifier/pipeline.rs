use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::sync::Arc;

use crate::classifier::sampler::sample_per_language;
use crate::config::ClassifierOptions;
use crate::error::Result;
use crate::llm::parser::parse_json_object;
use crate::llm::{LLMProvider, PromptDefinition, PromptSet, SYSTEM_PROMPT};
use crate::models::{AggregateKey, ClassificationResult};
use crate::progress::progress_bar;
use crate::storage::DocumentStore;

#[derive(Debug, Clone)]
pub struct ClassificationSummary {
    pub selected: usize,
    pub classified: usize,
    /// Files written with fewer keys than there are prompts.
    pub incomplete: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct Classifier {
    llm: Arc<dyn LLMProvider>,
    store: Arc<dyn DocumentStore>,
    prompts: PromptSet,
    options: ClassifierOptions,
}

impl Classifier {
    pub fn new(
        llm: impl LLMProvider + 'static,
        store: impl DocumentStore + 'static,
        prompts: PromptSet,
        options: ClassifierOptions,
    ) -> Self {
        Self {
            llm: Arc::new(llm),
            store: Arc::new(store),
            prompts,
            options,
        }
    }

    /// Every aggregate file in scope, or a per-language random sample of them in
    /// validation mode.
    pub fn select_files(&self) -> Result<Vec<AggregateKey>> {
        let keys: Vec<AggregateKey> = self
            .store
            .list_aggregates()?
            .into_iter()
            .filter(|key| {
                self.options.languages.is_empty()
                    || self.options.languages.contains(&key.language.to_lowercase())
            })
            .collect();

        let Some(k) = self.options.sample_per_language else {
            return Ok(keys);
        };

        let mut rng = match self.options.sample_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(sample_per_language(&keys, k, &mut rng))
    }

    /// Classifies every selected file. Only a failure to enumerate the input is
    /// returned as an error; per-file and per-prompt failures are logged.
    pub async fn run(&self) -> Result<ClassificationSummary> {
        let started_at = Utc::now();
        tracing::info!(
            "Classification started at {} using {}",
            started_at,
            self.llm.name()
        );

        let files = self.select_files()?;
        tracing::info!("Selected {} file(s) for classification", files.len());

        let mut summary = ClassificationSummary {
            selected: files.len(),
            classified: 0,
            incomplete: 0,
            failed: 0,
            started_at,
            finished_at: started_at,
        };

        let pb = progress_bar(files.len(), "files");

        for key in &files {
            tracing::info!(file = %key, "Processing file");

            match self.classify_file(key).await {
                Ok(result) => {
                    summary.classified += 1;
                    if result.len() < self.prompts.len() {
                        summary.incomplete += 1;
                    }
                }
                Err(e) => {
                    tracing::error!(file = %key, action = "error", "Failed to classify file: {}", e);
                    summary.failed += 1;
                }
            }

            pb.inc(1);
        }

        pb.finish_with_message("Classification complete");

        summary.finished_at = Utc::now();
        tracing::info!(
            "Classification finished at {}: {} selected, {} classified ({} incomplete), {} failed",
            summary.finished_at,
            summary.selected,
            summary.classified,
            summary.incomplete,
            summary.failed
        );
        tracing::info!("Total duration: {}", summary.finished_at - summary.started_at);

        Ok(summary)
    }

    /// Reads one aggregate, applies every prompt and writes the merged result.
    pub async fn classify_file(&self, key: &AggregateKey) -> Result<ClassificationResult> {
        let text = self.store.read_aggregate(key)?;
        let label = key.to_string();

        let result = self.classify_text(&label, &text).await;

        self.store
            .write_classification(key, &result.to_json_pretty()?)?;
        tracing::info!(file = %label, "Saved classification with {} key(s)", result.len());

        Ok(result)
    }

    /// Applies every prompt to `text`. Prompts whose request fails or whose answer
    /// is not a JSON object are left out of the result.
    pub async fn classify_text(&self, label: &str, text: &str) -> ClassificationResult {
        let mut result = ClassificationResult::new();

        if text.trim().is_empty() {
            tracing::warn!(file = %label, action = "skipped", "Skipping empty file");
            return result;
        }

        let outcomes: Vec<(&PromptDefinition, Result<Value>)> = stream::iter(self.prompts.iter())
            .map(move |prompt| async move { (prompt, self.apply_prompt(prompt, text).await) })
            .buffered(self.options.concurrency_limit)
            .collect()
            .await;

        for (prompt, outcome) in outcomes {
            match outcome {
                Ok(fragment) => {
                    tracing::info!(file = %label, prompt = %prompt.id, action = "added", "Applied prompt");
                    result.insert(&prompt.id, fragment);
                }
                Err(e) => {
                    tracing::error!(
                        file = %label,
                        prompt = %prompt.id,
                        action = "error",
                        "Error processing prompt: {}",
                        e
                    );
                }
            }
        }

        result
    }

    async fn apply_prompt(&self, prompt: &PromptDefinition, text: &str) -> Result<Value> {
        let raw = self
            .llm
            .complete(SYSTEM_PROMPT, &prompt.render(text))
            .await?;
        parse_json_object(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockProvider;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn prompts() -> PromptSet {
        PromptSet::new(vec![
            PromptDefinition::new("team", "ASK:team"),
            PromptDefinition::new("funding", "ASK:funding"),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_unparseable_prompt_is_omitted() {
        let mut llm = MockProvider::new(r#"{"mention": "yes"}"#);
        llm.add_response("ASK:funding", "Sorry, I cannot answer that.");
        let classifier =
            Classifier::new(llm, MemoryStore::new(), prompts(), ClassifierOptions::default());

        let result = classifier.classify_text("python/a_b.txt", "# Readme").await;

        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["team"]);
        assert_eq!(result.get("team"), Some(&json!({"mention": "yes"})));
    }

    #[tokio::test]
    async fn test_api_error_is_omitted() {
        let mut llm = MockProvider::new(r#"{"mention": "no"}"#);
        llm.add_error("ASK:team");
        let classifier =
            Classifier::new(llm, MemoryStore::new(), prompts(), ClassifierOptions::default());

        let result = classifier.classify_text("go/a_b.txt", "text").await;
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["funding"]);
    }

    #[tokio::test]
    async fn test_empty_text_makes_no_requests() {
        let llm = MockProvider::new("{}");
        let classifier = Classifier::new(
            llm.clone(),
            MemoryStore::new(),
            prompts(),
            ClassifierOptions::default(),
        );

        let result = classifier.classify_text("go/a_b.txt", "  \n").await;
        assert!(result.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_carries_document() {
        let llm = MockProvider::new("{}");
        let classifier = Classifier::new(
            llm.clone(),
            MemoryStore::new(),
            prompts(),
            ClassifierOptions::default(),
        );

        classifier.classify_text("go/a_b.txt", "# Readme body").await;
        assert_eq!(
            llm.prompts(),
            vec![
                "ASK:team\n\nText to analyze:\n# Readme body".to_string(),
                "ASK:funding\n\nText to analyze:\n# Readme body".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrent_fan_out_keeps_prompt_order() {
        let mut llm = MockProvider::failing();
        llm.add_response("ASK:team", r#"{"t": 1}"#);
        llm.add_response("ASK:funding", r#"{"f": 2}"#);
        let options = ClassifierOptions {
            concurrency_limit: 4,
            ..ClassifierOptions::default()
        };
        let classifier = Classifier::new(llm, MemoryStore::new(), prompts(), options);

        let result = classifier.classify_text("go/a_b.txt", "text").await;
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["team", "funding"]);
    }

    #[test]
    fn test_language_filter() {
        let store = MemoryStore::new();
        store.write_aggregate(&AggregateKey::new("go", "a_b"), "x").unwrap();
        store.write_aggregate(&AggregateKey::new("python", "c_d"), "y").unwrap();
        let options = ClassifierOptions {
            languages: vec!["python".to_string()],
            ..ClassifierOptions::default()
        };
        let classifier = Classifier::new(MockProvider::new("{}"), store, prompts(), options);

        assert_eq!(
            classifier.select_files().unwrap(),
            vec![AggregateKey::new("python", "c_d")]
        );
    }
}
