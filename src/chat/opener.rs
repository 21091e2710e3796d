//! Opener flow: produces the assistant's first message.
//!
//! Two interchangeable variants behind one enum, picked by `[opener] mode`:
//! `Model` asks the provider under fixed safety thresholds, `Fixed` returns a
//! constant and never fails.

use std::path::PathBuf;

use serde_json::json;
use tracing::debug;

use crate::config::{OpenerConfig, OpenerMode};
use crate::llm::{CompletionRequest, LlmProvider, OutputSchema, SafetySetting};

use super::ChatError;
use super::locale::Locale;
use super::prompt::{Flow, PromptBuilder};

const PROMPT_NAME: &str = "initialPrompt";

#[derive(Debug, Clone)]
pub struct ModelOpener {
    provider: LlmProvider,
    prompts_dir: PathBuf,
    locale: Locale,
    safety: Vec<SafetySetting>,
}

impl ModelOpener {
    pub fn new(
        provider: LlmProvider,
        prompts_dir: impl Into<PathBuf>,
        locale: Locale,
        safety: Vec<SafetySetting>,
    ) -> Self {
        Self { provider, prompts_dir: prompts_dir.into(), locale, safety }
    }

    pub fn output_schema() -> OutputSchema {
        OutputSchema::new("prompt", "An initial prompt or suggestion for the user.")
    }

    async fn suggest(&self) -> Result<String, ChatError> {
        let prompt = PromptBuilder::new(&self.prompts_dir)
            .template(Flow::Opener, self.locale)
            .build();
        debug!(locale = %self.locale, safety = self.safety.len(), "requesting opener");
        let request = CompletionRequest::new(PROMPT_NAME, prompt, json!({}), Self::output_schema())
            .with_safety(self.safety.clone());
        Ok(self.provider.generate(&request).await?)
    }
}

#[derive(Debug, Clone)]
pub enum Opener {
    Model(ModelOpener),
    Fixed(String),
}

impl Opener {
    /// Build the configured variant. `Fixed` without explicit text uses the
    /// locale's stock greeting.
    pub fn from_config(
        config: &OpenerConfig,
        provider: LlmProvider,
        prompts_dir: impl Into<PathBuf>,
        locale: Locale,
    ) -> Self {
        match config.mode {
            OpenerMode::Model => Opener::Model(ModelOpener::new(
                provider,
                prompts_dir,
                locale,
                config.safety.clone(),
            )),
            OpenerMode::Fixed => Opener::Fixed(
                config
                    .text
                    .clone()
                    .unwrap_or_else(|| locale.strings().fixed_opener.to_string()),
            ),
        }
    }

    pub async fn suggest(&self) -> Result<String, ChatError> {
        match self {
            Opener::Model(m) => m.suggest().await,
            Opener::Fixed(text) => Ok(text.clone()),
        }
    }
}
