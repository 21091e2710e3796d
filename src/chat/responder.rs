//! Response flow: message + history in, one assistant string out.

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::llm::{CompletionRequest, LlmProvider, OutputSchema};

use super::ChatError;
use super::locale::Locale;
use super::prompt::{Flow, PromptBuilder};
use super::topic::Topic;
use super::turn::Turn;

const PROMPT_NAME: &str = "generateChatbotResponse";

/// Structured input recorded alongside the rendered prompt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResponseInput<'a> {
    message: &'a str,
    chat_history: &'a [Turn],
    topic: Topic,
}

#[derive(Debug, Clone)]
pub struct ResponseGenerator {
    provider: LlmProvider,
    prompts_dir: PathBuf,
    locale: Locale,
    /// Trailing turns sent with each request; `0` sends everything.
    history_window: usize,
}

impl ResponseGenerator {
    pub fn new(provider: LlmProvider, prompts_dir: impl Into<PathBuf>, locale: Locale) -> Self {
        Self {
            provider,
            prompts_dir: prompts_dir.into(),
            locale,
            history_window: 0,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn output_schema() -> OutputSchema {
        OutputSchema::new("response", "The chatbot response.")
    }

    fn window<'a>(&self, history: &'a [Turn]) -> &'a [Turn] {
        if self.history_window == 0 || history.len() <= self.history_window {
            history
        } else {
            &history[history.len() - self.history_window..]
        }
    }

    /// Render the instruction text for `message` over `history`.
    pub fn render_prompt(&self, message: &str, history: &[Turn], topic: Topic) -> String {
        PromptBuilder::new(&self.prompts_dir)
            .template(Flow::Response, self.locale)
            .history("history", self.window(history))
            .with_vars([("message", message), ("topic", topic.label())])
            .build()
    }

    /// Ask the model for a reply. Provider failures propagate unchanged.
    pub async fn generate(
        &self,
        message: &str,
        history: &[Turn],
        topic: Topic,
    ) -> Result<String, ChatError> {
        let history = self.window(history);
        let input = serde_json::to_value(ResponseInput { message, chat_history: history, topic })?;
        let prompt = self.render_prompt(message, history, topic);

        debug!(
            turns = history.len(),
            topic = topic.slug(),
            locale = %self.locale,
            "requesting chat response"
        );

        let request = CompletionRequest::new(PROMPT_NAME, prompt, input, Self::output_schema());
        Ok(self.provider.generate(&request).await?)
    }
}
