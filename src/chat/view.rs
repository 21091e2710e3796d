//! Chat view state: the turn list, input buffer, loading flag and scroll
//! position, plus the transitions that drive the two flows.
//!
//! The view is exclusively owned by its front end and mutated through
//! `&mut self`; at most one model call is in flight because every call is
//! awaited by the handler that started it.
//!
//! ```text
//! new ──mount──▶ ready ──submit──▶ loading ──reply/fallback──▶ ready
//!                  ▲                                             │
//!                  └───────────── clear (fresh opener) ◀─────────┘
//! ```

use tracing::{info, warn};

use crate::config::Config;
use crate::llm::LlmProvider;

use super::locale::{Locale, Strings};
use super::opener::Opener;
use super::responder::ResponseGenerator;
use super::topic::Topic;
use super::turn::Turn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient, non-blocking alert for the front end to show once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, description: &str) -> Self {
        Self { level, title: title.to_string(), description: description.to_string() }
    }
}

/// Outcome of [`ChatView::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    /// Input empty or a call already in flight; nothing changed.
    Ignored,
    /// User turn and model reply appended.
    Replied,
    /// User turn and fallback apology appended.
    Fallback,
}

pub struct ChatView {
    responder: ResponseGenerator,
    opener: Opener,
    strings: &'static Strings,
    turns: Vec<Turn>,
    input: String,
    loading: bool,
    topic: Topic,
    notices: Vec<Notice>,
    /// Turns hidden below the viewport; `0` pins the view to the newest turn.
    scroll_offset: usize,
}

impl ChatView {
    /// A fresh, unmounted view: no turns, loading until [`mount`](Self::mount).
    pub fn new(responder: ResponseGenerator, opener: Opener, locale: Locale) -> Self {
        Self {
            responder,
            opener,
            strings: locale.strings(),
            turns: Vec::new(),
            input: String::new(),
            loading: true,
            topic: Topic::default(),
            notices: Vec::new(),
            scroll_offset: 0,
        }
    }

    pub fn from_config(config: &Config, provider: LlmProvider) -> Self {
        let responder = ResponseGenerator::new(provider.clone(), &config.prompts_dir, config.locale)
            .with_history_window(config.chat.history_window);
        let opener = Opener::from_config(&config.opener, provider, &config.prompts_dir, config.locale);
        Self::new(responder, opener, config.locale).with_topic(config.chat.topic)
    }

    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = topic;
        self
    }

    // ── accessors ────────────────────────────────────────────────────────────

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn strings(&self) -> &'static Strings {
        self.strings
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    /// The clear control stays usable while the opener is loading.
    pub fn can_clear(&self) -> bool {
        !(self.loading && self.turns.len() > 1)
    }

    // ── transitions ──────────────────────────────────────────────────────────

    /// Request the opener and show it as the only turn.
    pub async fn mount(&mut self) {
        self.loading = true;
        let turn = match self.opener.suggest().await {
            Ok(text) => Turn::assistant(text),
            Err(e) => {
                warn!(error = %e, "could not fetch opener");
                self.notify(NoticeLevel::Error, self.strings.opener_error_title, self.strings.opener_error_description);
                Turn::assistant(self.strings.fallback_greeting)
            }
        };
        self.replace_turns(turn);
        self.loading = false;
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Topic is locked while a call is in flight. Returns whether it changed.
    pub fn set_topic(&mut self, topic: Topic) -> bool {
        if self.loading {
            return false;
        }
        self.topic = topic;
        true
    }

    /// Send the input buffer as a user turn and append the reply.
    pub async fn submit(&mut self) -> Submit {
        if !self.can_submit() {
            return Submit::Ignored;
        }

        let message = std::mem::take(&mut self.input);
        self.push_turn(Turn::user(message.clone()));
        self.loading = true;

        let outcome = match self.responder.generate(&message, &self.turns, self.topic).await {
            Ok(reply) => {
                self.push_turn(Turn::assistant(reply));
                Submit::Replied
            }
            Err(e) => {
                warn!(error = %e, "could not fetch response");
                self.push_turn(Turn::assistant(self.strings.fallback_apology));
                self.notify(NoticeLevel::Error, self.strings.response_error_title, self.strings.response_error_description);
                Submit::Fallback
            }
        };

        self.loading = false;
        outcome
    }

    /// Discard the conversation and start over from a fresh opener.
    pub async fn clear(&mut self) {
        self.loading = true;
        let turn = match self.opener.suggest().await {
            Ok(text) => {
                info!(discarded = self.turns.len(), "chat cleared");
                self.notify(NoticeLevel::Info, self.strings.cleared_title, self.strings.cleared_description);
                Turn::assistant(text)
            }
            Err(e) => {
                warn!(error = %e, "could not fetch opener after clear");
                Turn::assistant(self.strings.fallback_cleared)
            }
        };
        self.replace_turns(turn);
        self.loading = false;
    }

    /// Drain pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ── scrolling ────────────────────────────────────────────────────────────

    pub fn scroll_up(&mut self, n: usize) {
        let max = self.turns.len().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add(n).min(max);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll_offset == 0
    }

    /// The turns inside a viewport of `window` turns at the current scroll.
    pub fn visible(&self, window: usize) -> &[Turn] {
        let end = self.turns.len() - self.scroll_offset;
        let start = end.saturating_sub(window);
        &self.turns[start..end]
    }

    // ── internals ────────────────────────────────────────────────────────────

    fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.scroll_offset = 0;
    }

    fn replace_turns(&mut self, turn: Turn) {
        self.turns.clear();
        self.push_turn(turn);
    }

    fn notify(&mut self, level: NoticeLevel, title: &str, description: &str) {
        self.notices.push(Notice::new(level, title, description));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::dummy::DummyProvider;

    fn view() -> ChatView {
        let provider = LlmProvider::Dummy(DummyProvider);
        let responder = ResponseGenerator::new(provider, "/nonexistent", Locale::Es);
        ChatView::new(responder, Opener::Fixed("¡Bienvenido!".into()), Locale::Es)
    }

    #[tokio::test]
    async fn mount_shows_single_opener() {
        let mut v = view();
        assert!(v.is_loading());
        assert!(v.turns().is_empty());
        v.mount().await;
        assert!(!v.is_loading());
        assert_eq!(v.turns(), &[Turn::assistant("¡Bienvenido!")]);
        assert!(v.take_notices().is_empty());
    }

    #[tokio::test]
    async fn submit_clears_input_and_keeps_raw_text() {
        let mut v = view();
        v.mount().await;
        v.set_input("  hola  ");
        assert_eq!(v.submit().await, Submit::Replied);
        assert_eq!(v.input(), "");
        assert_eq!(v.turns()[1], Turn::user("  hola  "));
    }

    #[tokio::test]
    async fn topic_locked_while_loading() {
        let mut v = view();
        assert!(!v.set_topic(Topic::Natacion));
        v.mount().await;
        assert!(v.set_topic(Topic::Natacion));
        assert_eq!(v.topic(), Topic::Natacion);
    }

    #[tokio::test]
    async fn scrolling_clamps_and_repins_on_new_turn() {
        let mut v = view();
        v.mount().await;
        for m in ["a", "b"] {
            v.set_input(m);
            v.submit().await;
        }
        assert_eq!(v.turns().len(), 5);
        assert_eq!(v.visible(2), &v.turns()[3..5]);

        v.scroll_up(10);
        assert_eq!(v.visible(2), &v.turns()[0..1]);
        v.scroll_down(1);
        assert_eq!(v.visible(2), &v.turns()[0..2]);
        assert!(!v.is_at_bottom());

        v.set_input("c");
        v.submit().await;
        assert!(v.is_at_bottom());
    }

    #[tokio::test]
    async fn scroll_up_saturates_on_huge_counts() {
        let mut v = view();
        v.mount().await;
        v.set_input("a");
        v.submit().await;
        v.scroll_up(usize::MAX);
        v.scroll_up(usize::MAX);
        assert_eq!(v.visible(10), &v.turns()[0..1]);
        v.scroll_down(usize::MAX);
        assert!(v.is_at_bottom());
    }

    #[test]
    fn visible_on_empty_view() {
        let v = view();
        assert!(v.visible(10).is_empty());
    }

    #[test]
    fn clear_allowed_while_opener_loads() {
        let v = view();
        assert!(v.is_loading());
        assert!(v.can_clear());
        assert!(!v.can_submit());
    }
}
