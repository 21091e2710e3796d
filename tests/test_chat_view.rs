//! End-to-end behaviour of the chat view against the offline dummy provider
//! and an unreachable OpenAI-compatible endpoint.

use inimeg_chat::chat::{
    ChatView, Locale, NoticeLevel, Opener, ResponseGenerator, Role, Submit, Topic, Turn,
};
use inimeg_chat::chat::opener::ModelOpener;
use inimeg_chat::llm::LlmProvider;
use inimeg_chat::llm::providers::dummy::DummyProvider;
use inimeg_chat::llm::providers::openai_compatible::OpenAiCompatibleProvider;
use inimeg_chat::llm::safety::OPENER_DEFAULTS;

const PROMPTS: &str = "/nonexistent/prompts";

fn dummy() -> LlmProvider {
    LlmProvider::Dummy(DummyProvider)
}

/// Nothing listens on port 1, so every call fails fast with a transport error.
fn unreachable() -> LlmProvider {
    let p = OpenAiCompatibleProvider::new(
        "http://127.0.0.1:1/v1/chat/completions".into(),
        "test-model".into(),
        0.0,
        2,
        None,
    )
    .unwrap();
    LlmProvider::OpenAiCompatible(p)
}

fn model_opener(provider: LlmProvider) -> Opener {
    Opener::Model(ModelOpener::new(provider, PROMPTS, Locale::Es, OPENER_DEFAULTS.to_vec()))
}

fn view(responder: LlmProvider, opener: Opener) -> ChatView {
    ChatView::new(ResponseGenerator::new(responder, PROMPTS, Locale::Es), opener, Locale::Es)
}

#[tokio::test]
async fn scenario_mount_submit_clear() {
    let mut v = view(dummy(), model_opener(dummy()));
    assert!(v.turns().is_empty());

    v.mount().await;
    assert_eq!(v.turns().len(), 1);
    assert_eq!(v.turns()[0].role, Role::Assistant);

    v.set_input("hello");
    assert_eq!(v.submit().await, Submit::Replied);
    let turns = v.turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[1], Turn::user("hello"));
    assert_eq!(turns[2], Turn::assistant("[echo] Mensaje del usuario: hello"));
    assert!(!v.is_loading());

    v.clear().await;
    assert_eq!(v.turns().len(), 1);
    let notices = v.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert_eq!(notices[0].title, "Chat borrado");
}

#[tokio::test]
async fn every_non_empty_submit_adds_exactly_two_turns() {
    let mut v = view(dummy(), Opener::Fixed("hola".into()));
    v.mount().await;
    for (i, msg) in ["a", "¿cómo entreno?", "  x  ", "multi\nline"].iter().enumerate() {
        let before = v.turns().len();
        v.set_input(*msg);
        assert_eq!(v.submit().await, Submit::Replied);
        assert_eq!(v.turns().len(), before + 2, "message #{i}");
        assert_eq!(v.turns()[before].role, Role::User);
        assert_eq!(v.turns()[before + 1].role, Role::Assistant);
    }
}

#[tokio::test]
async fn submit_is_noop_for_blank_input() {
    let mut v = view(dummy(), Opener::Fixed("hola".into()));
    v.mount().await;
    for blank in ["", "   ", "\t\n"] {
        v.set_input(blank);
        assert!(!v.can_submit());
        assert_eq!(v.submit().await, Submit::Ignored);
        assert_eq!(v.turns().len(), 1);
    }
}

#[tokio::test]
async fn submit_is_noop_while_loading() {
    // Not yet mounted: the opener is still "loading".
    let mut v = view(dummy(), Opener::Fixed("hola".into()));
    v.set_input("hello");
    assert!(v.is_loading());
    assert_eq!(v.submit().await, Submit::Ignored);
    assert!(v.turns().is_empty());
    assert_eq!(v.input(), "hello");
}

#[tokio::test]
async fn clear_always_leaves_one_turn() {
    let mut v = view(dummy(), Opener::Fixed("hola".into()));
    v.mount().await;
    for n in 0..4 {
        for _ in 0..n {
            v.set_input("ping");
            v.submit().await;
        }
        v.clear().await;
        assert_eq!(v.turns(), &[Turn::assistant("hola")]);
    }
}

#[tokio::test]
async fn opener_failure_uses_fallback_greeting() {
    let mut v = view(dummy(), model_opener(unreachable()));
    v.mount().await;
    assert_eq!(v.turns(), &[Turn::assistant(Locale::Es.strings().fallback_greeting)]);
    assert!(!v.is_loading());

    let notices = v.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(v.take_notices().is_empty());
}

#[tokio::test]
async fn clear_failure_uses_cleared_fallback_without_notice() {
    let mut v = view(dummy(), model_opener(unreachable()));
    v.mount().await;
    v.take_notices();

    v.set_input("hola");
    v.submit().await;
    v.clear().await;
    assert_eq!(v.turns(), &[Turn::assistant("Chat borrado. ¿Cómo puedo ayudar?")]);
    assert!(v.take_notices().is_empty());
}

#[tokio::test]
async fn response_failure_appends_apology() {
    let mut v = view(unreachable(), Opener::Fixed("hola".into()));
    v.mount().await;

    v.set_input("hello");
    assert_eq!(v.submit().await, Submit::Fallback);
    assert_eq!(v.turns().len(), 3);
    assert_eq!(v.turns()[1], Turn::user("hello"));
    assert_eq!(v.turns()[2], Turn::assistant(Locale::Es.strings().fallback_apology));
    assert!(!v.is_loading());

    let notices = v.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Error de API");

    // Not fatal: the user can resubmit.
    v.set_input("otra vez");
    assert!(v.can_submit());
    assert_eq!(v.submit().await, Submit::Fallback);
    assert_eq!(v.turns().len(), 5);
}

#[tokio::test]
async fn topic_is_carried_into_view() {
    let v = view(dummy(), Opener::Fixed("hola".into())).with_topic(Topic::Natacion);
    assert_eq!(v.topic(), Topic::Natacion);
}
