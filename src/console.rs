//! Console front end. Reads lines from an async reader, drives the
//! [`ChatView`], and renders turns and notices to a writer.
//!
//! Runs until the `shutdown` token is cancelled (Ctrl-C), the reader hits
//! EOF, or the user types `/quit`. Each model call is awaited inline, so no
//! new line is read while one is outstanding.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::chat::{ChatView, Notice, NoticeLevel, Role, Submit, Topic, Turn};
use crate::error::AppError;

/// Turns shown when the transcript is redrawn after scrolling.
const WINDOW: usize = 10;

/// A console line that is a command rather than a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Clear,
    Topic(String),
    Topics,
    Up(usize),
    Down(usize),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// `None` for ordinary messages (anything not starting with `/`).
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).unwrap_or_default();
        let count = || arg.parse::<usize>().unwrap_or(1).max(1);
        Some(match name {
            "clear" => Command::Clear,
            "topic" => Command::Topic(arg.to_string()),
            "topics" => Command::Topics,
            "up" => Command::Up(count()),
            "down" => Command::Down(count()),
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        })
    }
}

/// Drive `view` from `input` until EOF, `/quit`, or shutdown.
pub async fn run<R, W>(
    mut view: ChatView,
    input: R,
    mut out: W,
    shutdown: CancellationToken,
) -> Result<ChatView, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let strings = view.strings();
    writeln!(out, "─────────────────────────────────")?;
    writeln!(out, " {} — {}", strings.title, strings.tagline)?;
    writeln!(out, " {}: {}   (/help, Ctrl-C to quit)", strings.topic_label, view.topic())?;
    writeln!(out, "─────────────────────────────────")?;

    typing(&mut out)?;
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => return Ok(view),
        _ = view.mount() => {}
    }
    flush_notices(&mut view, &mut out)?;
    print_turns(view.turns(), &mut out)?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let line = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                info!("console shutting down");
                break;
            }
            line = lines.next_line() => line,
        };

        let line = match line {
            Err(e) => {
                warn!("console read error: {e}");
                break;
            }
            Ok(None) => {
                info!("console input closed");
                writeln!(out)?;
                break;
            }
            Ok(Some(line)) => line,
        };

        match Command::parse(&line) {
            Some(Command::Quit) => break,
            Some(cmd) => {
                let cancelled = tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => true,
                    r = handle_command(&mut view, cmd, &mut out) => { r?; false }
                };
                if cancelled {
                    break;
                }
            }
            None => {
                view.set_input(line);
                if !view.can_submit() {
                    continue;
                }
                typing(&mut out)?;
                let outcome = tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    outcome = view.submit() => outcome,
                };
                debug!(?outcome, turns = view.turns().len(), "submit finished");
                if outcome != Submit::Ignored {
                    if let Some(reply) = view.turns().last() {
                        print_turn(reply, &mut out)?;
                    }
                }
                flush_notices(&mut view, &mut out)?;
            }
        }
    }

    out.flush()?;
    Ok(view)
}

async fn handle_command<W: Write>(
    view: &mut ChatView,
    cmd: Command,
    out: &mut W,
) -> Result<(), AppError> {
    let strings = view.strings();
    match cmd {
        Command::Clear => {
            if !view.can_clear() {
                writeln!(out, "{}", strings.busy)?;
                return Ok(());
            }
            typing(out)?;
            view.clear().await;
            flush_notices(view, out)?;
            print_turns(view.turns(), out)?;
        }
        Command::Topic(name) => match name.parse::<Topic>() {
            Ok(topic) => {
                if view.set_topic(topic) {
                    writeln!(out, "{}: {}", strings.topic_label, topic)?;
                } else {
                    writeln!(out, "{}", strings.busy)?;
                }
            }
            Err(e) => writeln!(out, "{e}")?,
        },
        Command::Topics => {
            for t in Topic::ALL {
                let marker = if t == view.topic() { "*" } else { " " };
                writeln!(out, " {marker} {} ({})", t.label(), t.slug())?;
            }
        }
        Command::Up(n) => {
            view.scroll_up(n);
            print_turns(view.visible(WINDOW), out)?;
        }
        Command::Down(n) => {
            view.scroll_down(n);
            print_turns(view.visible(WINDOW), out)?;
        }
        Command::Help => writeln!(out, "{}", strings.help)?,
        Command::Unknown(name) => writeln!(out, "unknown command: /{name}\n{}", strings.help)?,
        Command::Quit => {}
    }
    Ok(())
}

pub fn format_turn(turn: &Turn) -> String {
    let marker = match turn.role {
        Role::Assistant => "🤖",
        Role::User => "🧑",
    };
    format!("{marker} {}", turn.content)
}

pub fn format_notice(notice: &Notice) -> String {
    let level = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    format!("[{level}] {}: {}", notice.title, notice.description)
}

fn print_turn<W: Write>(turn: &Turn, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", format_turn(turn))
}

fn print_turns<W: Write>(turns: &[Turn], out: &mut W) -> std::io::Result<()> {
    turns.iter().try_for_each(|t| print_turn(t, out))
}

fn typing<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "🤖 …")?;
    out.flush()
}

fn flush_notices<W: Write>(view: &mut ChatView, out: &mut W) -> std::io::Result<()> {
    view.take_notices()
        .iter()
        .try_for_each(|n| writeln!(out, "{}", format_notice(n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{Locale, Opener, ResponseGenerator};
    use crate::llm::LlmProvider;
    use crate::llm::providers::dummy::DummyProvider;

    fn view() -> ChatView {
        let provider = LlmProvider::Dummy(DummyProvider);
        let responder = ResponseGenerator::new(provider, "/nonexistent", Locale::En);
        ChatView::new(responder, Opener::Fixed("Ready when you are.".into()), Locale::En)
    }

    async fn drive(script: &str) -> (ChatView, String) {
        let mut out = Vec::new();
        let view = run(view(), script.as_bytes(), &mut out, CancellationToken::new())
            .await
            .unwrap();
        (view, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse(" /clear "), Some(Command::Clear));
        assert_eq!(Command::parse("/topic natación"), Some(Command::Topic("natación".into())));
        assert_eq!(Command::parse("/up 3"), Some(Command::Up(3)));
        assert_eq!(Command::parse("/down"), Some(Command::Down(1)));
        assert_eq!(Command::parse("/up 0"), Some(Command::Up(1)));
        assert_eq!(Command::parse("/exit"), Some(Command::Quit));
        assert_eq!(Command::parse("/dance"), Some(Command::Unknown("dance".into())));
    }

    #[tokio::test]
    async fn conversation_then_clear() {
        let (view, out) = drive("hello\n/clear\n").await;
        assert_eq!(view.turns(), &[Turn::assistant("Ready when you are.")]);
        assert!(out.contains("🤖 Ready when you are."));
        assert!(out.contains("🤖 [echo] User message: hello"));
        assert!(out.contains("[info] Chat cleared"));
    }

    #[tokio::test]
    async fn blank_lines_are_not_submitted() {
        let (view, _) = drive("\n   \n").await;
        assert_eq!(view.turns().len(), 1);
    }

    #[tokio::test]
    async fn quit_stops_reading() {
        let (view, _) = drive("/quit\nhello\n").await;
        assert_eq!(view.turns().len(), 1);
    }

    #[tokio::test]
    async fn topic_command_updates_view() {
        let (view, out) = drive("/topic culturismo\n/topic ciclismo\n").await;
        assert_eq!(view.topic(), Topic::Culturismo);
        assert!(out.contains("Sport: Culturismo"));
        assert!(out.contains("unknown topic 'ciclismo'"));
    }

    #[tokio::test]
    async fn cancelled_before_mount_returns_untouched_view() {
        let token = CancellationToken::new();
        token.cancel();
        let mut out = Vec::new();
        let view = run(view(), "hello\n".as_bytes(), &mut out, token).await.unwrap();
        assert!(view.turns().is_empty());
    }

    #[test]
    fn notice_format() {
        let n = Notice {
            level: NoticeLevel::Error,
            title: "API error".into(),
            description: "Could not get a response from the AI.".into(),
        };
        assert_eq!(format_notice(&n), "[error] API error: Could not get a response from the AI.");
    }
}
