//! Dummy LLM provider. Echoes the last prompt line back prefixed with
//! `[echo]`, wrapped in the requested output schema.
//! Used for tests and keyless runs without any network access.

use crate::llm::{CompletionRequest, ProviderError};

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let last = request
            .prompt
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or_default();
        Ok(request.output.wrap(format!("[echo] {last}")).to_string())
    }
}
