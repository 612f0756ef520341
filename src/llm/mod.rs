pub mod provider;
pub mod openai;
pub mod prompts;
pub mod parser;
pub mod mock;

pub use provider::LLMProvider;
pub use openai::OpenAIProvider;
pub use prompts::{PromptDefinition, PromptSet, SYSTEM_PROMPT};
pub use mock::MockProvider;
