//! IniMeg console entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI flags
//!   3. Load config (+ env overrides)
//!   4. Resolve effective log level (CLI `-v` flags > env > config)
//!   5. Init logger once
//!   6. Build the LLM provider and probe it
//!   7. Spawn Ctrl-C → shutdown signal watcher
//!   8. Run the console until EOF, `/quit` or shutdown

use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use inimeg_chat::chat::ChatView;
use inimeg_chat::error::AppError;
use inimeg_chat::llm::providers;
use inimeg_chat::{config, console, logger};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present; ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let mut config = config::load(args.config_path.as_deref())?;
    if let Some(locale) = args.locale.as_deref() {
        config.locale = locale.parse().map_err(AppError::Config)?;
    }

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::init(effective_log_level, args.log_level.is_some())?;

    info!(
        app = %config.app_name,
        locale = %config.locale,
        provider = %config.llm.provider,
        opener = ?config.opener.mode,
        effective_log_level = %effective_log_level,
        "config loaded"
    );

    let provider = providers::build(&config.llm, config.llm_api_key.clone())?;
    if let Err(e) = provider.ping().await {
        // Not fatal: every call falls back to the locale's apology text.
        warn!(provider = provider.name(), error = %e, "llm endpoint not reachable");
    }

    let view = ChatView::from_config(&config, provider);

    // Ctrl-C handler: cancels the token so the console loop exits.
    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let view = console::run(view, stdin, std::io::stdout(), shutdown).await?;
    info!(turns = view.turns().len(), "console closed");
    Ok(())
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
    locale: Option<String>,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;
    let mut locale = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: inimeg [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: {})", config::DEFAULT_CONFIG_PATH);
                println!("  -l, --locale <es|en>       Override the configured locale");
                println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
                std::process::exit(0);
            }
            "-f" | "--config" => match iter.next() {
                Some(path) => config_path = Some(path),
                None => {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            },
            "-l" | "--locale" => match iter.next() {
                Some(code) => locale = Some(code),
                None => {
                    eprintln!("error: -l/--locale requires a locale code");
                    std::process::exit(1);
                }
            },
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            _ => {}
        }
    }

    CliArgs {
        log_level: logger::level_for_verbosity(verbosity),
        config_path,
        locale,
    }
}
