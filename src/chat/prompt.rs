//! Instruction templates and the builder that renders them.
//!
//! Templates live as plain text under `config/prompts/`, one file per flow
//! and locale (`response.es.txt`, `opener.en.txt`, …). A missing file falls
//! back to the built-in copy of the same text, so a bare binary still works.
//!
//! Variable substitution uses `{{key}}` syntax and runs once at
//! [`build()`](PromptBuilder::build) time over the joined parts. Substituted
//! values are never re-scanned, so a user message containing `{{history}}`
//! stays literal.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::locale::Locale;
use super::turn::Turn;

const SEPARATOR: &str = "\n\n";

/// Which flow a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Response,
    Opener,
}

impl Flow {
    fn stem(&self) -> &'static str {
        match self {
            Flow::Response => "response",
            Flow::Opener => "opener",
        }
    }

    /// File name under the prompts dir, e.g. `response.es.txt`.
    pub fn file_name(&self, locale: Locale) -> String {
        format!("{}.{}.txt", self.stem(), locale.code())
    }

    /// Built-in text used when the template file is absent.
    pub fn fallback(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Flow::Response, Locale::Es) => RESPONSE_ES,
            (Flow::Response, Locale::En) => RESPONSE_EN,
            (Flow::Opener, Locale::Es) => OPENER_ES,
            (Flow::Opener, Locale::En) => OPENER_EN,
        }
    }
}

const RESPONSE_ES: &str = "\
Eres un chatbot amigable y servicial. Responde al mensaje del usuario basándote en el historial de chat para mantener el contexto. Sé conciso. Responde en español.

Historial de chat:
{{history}}

Mensaje del usuario: {{message}}";

const RESPONSE_EN: &str = "\
You are a friendly and helpful chatbot. Answer the user's message using the chat history to keep context. Be concise. Answer in English.

Chat history:
{{history}}

User message: {{message}}";

const OPENER_ES: &str = "\
Sugiere un mensaje para que un usuario comience una conversación con este chatbot. Hazlo atractivo e informativo sobre las capacidades del chatbot. El chatbot es una IA conversacional de propósito general. Sugiere algo creativo y limítalo a 20 palabras. Escribe en español. Toda la salida debe ir en el campo 'prompt'.";

const OPENER_EN: &str = "\
Suggest a prompt for a user to begin a conversation with this chatbot. Make it engaging and informative about the chatbot's capabilities. The chatbot is a general purpose conversational AI. Suggest something creative, and limit it to 20 words. The entire output should be in the 'prompt' field.";

/// Fluent builder that assembles a prompt from template parts.
pub struct PromptBuilder {
    prompts_dir: PathBuf,
    parts: Vec<String>,
    vars: HashMap<String, String>,
}

impl PromptBuilder {
    /// Create a builder rooted at `prompts_dir` (e.g. `"config/prompts"`).
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
            parts: Vec::new(),
            vars: HashMap::new(),
        }
    }

    /// Append the flow's template for `locale`, or its built-in text.
    pub fn template(self, flow: Flow, locale: Locale) -> Self {
        let text = load_template(&self.prompts_dir, flow, locale);
        self.append(text)
    }

    /// Directly append a text fragment.
    pub fn append(mut self, text: impl Into<String>) -> Self {
        self.push(text.into());
        self
    }

    /// Register a single variable.
    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Register `{{key}}` → `value` substitution pairs.
    pub fn with_vars<'a, I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (k, v) in vars {
            self.vars.insert(k.to_string(), v.to_string());
        }
        self
    }

    /// Bind `key` to the turns rendered one `role: content` line each.
    pub fn history(self, key: &str, turns: &[Turn]) -> Self {
        let rendered = render_history(turns);
        self.var(key, rendered)
    }

    /// Join all parts with blank lines and substitute variables.
    pub fn build(self) -> String {
        substitute(&self.parts.join(SEPARATOR), &self.vars)
    }

    fn push(&mut self, text: String) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.parts.push(trimmed.to_string());
        }
    }
}

/// Read a flow template from `dir`, falling back to the built-in text.
pub fn load_template(dir: &Path, flow: Flow, locale: Locale) -> String {
    let path = dir.join(flow.file_name(locale));
    match fs::read_to_string(&path) {
        Ok(text) if !text.trim().is_empty() => text,
        _ => {
            tracing::debug!(path = %path.display(), "prompt: using built-in template");
            flow.fallback(locale).to_string()
        }
    }
}

pub fn render_history(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role.as_str(), t.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single left-to-right pass; unknown placeholders are kept verbatim.
fn substitute(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match vars.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
