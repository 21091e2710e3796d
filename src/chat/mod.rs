//! Chat flows and the view state that drives them.
//!
//! ```text
//! ChatView ── mount / clear ──▶ Opener::suggest()         ─┐
//!          └─ submit ─────────▶ ResponseGenerator::generate ├─▶ LlmProvider::generate
//!                                                           ─┘
//! ```
//!
//! Both flows render a template from [`prompt`], wrap it in a
//! [`CompletionRequest`](crate::llm::CompletionRequest) and hand it to the
//! provider. Failures propagate to the view, which substitutes the locale's
//! fallback text and raises a [`Notice`](view::Notice).

pub mod locale;
pub mod opener;
pub mod prompt;
pub mod responder;
pub mod topic;
pub mod turn;
pub mod view;

pub use locale::Locale;
pub use opener::Opener;
pub use responder::ResponseGenerator;
pub use topic::Topic;
pub use turn::{Role, Turn};
pub use view::{ChatView, Notice, NoticeLevel, Submit};

use thiserror::Error;

use crate::llm::ProviderError;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("failed to encode request input: {0}")]
    Encode(#[from] serde_json::Error),
}
