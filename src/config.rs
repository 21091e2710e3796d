//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` (or the `-f` path) relative to the current
//! working directory, then applies `INIMEG_LOG_LEVEL` and `INIMEG_LOCALE`
//! env overrides. The API key is only ever read from `LLM_API_KEY`.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::chat::{Locale, Topic};
use crate::error::AppError;
use crate::llm::safety::OPENER_DEFAULTS;
use crate::llm::{HarmBlockThreshold, HarmCategory, SafetySetting};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// OpenAI / OpenAI-compatible provider configuration.
/// Populated from `[llm.openai]` in the TOML.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature (ignored for models that forbid it).
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"dummy"`, `"openai"`).
    /// Maps to `default` in `[llm]` TOML.
    pub provider: String,
    pub openai: OpenAiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenerMode {
    Model,
    Fixed,
}

/// `[opener]`: how the first assistant message is produced.
#[derive(Debug, Clone)]
pub struct OpenerConfig {
    pub mode: OpenerMode,
    /// Constant text for `mode = "fixed"`; `None` uses the locale greeting.
    pub text: Option<String>,
    /// Thresholds sent with model-generated openers.
    pub safety: Vec<SafetySetting>,
}

/// `[chat]`: conversation defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub topic: Topic,
    /// Trailing turns sent with each request; `0` sends the whole history.
    pub history_window: usize,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub log_level: String,
    pub locale: Locale,
    /// Template directory (already expanded, no `~`).
    pub prompts_dir: PathBuf,
    pub llm: LlmConfig,
    /// API key from `LLM_API_KEY` env var; `None` for keyless local models.
    pub llm_api_key: Option<String>,
    pub opener: OpenerConfig,
    pub chat: ChatConfig,
}

// ── raw TOML shape ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawConfig {
    app: RawApp,
    #[serde(default)]
    llm: RawLlm,
    #[serde(default)]
    opener: RawOpener,
    #[serde(default)]
    chat: RawChat,
}

#[derive(Deserialize)]
struct RawApp {
    #[serde(default = "default_app_name")]
    name: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_locale")]
    locale: String,
    #[serde(default = "default_prompts_dir")]
    prompts_dir: String,
}

#[derive(Deserialize)]
struct RawLlm {
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    openai: RawOpenAiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), openai: RawOpenAiConfig::default() }
    }
}

#[derive(Deserialize)]
struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
    #[serde(default = "default_openai_temperature")]
    temperature: f32,
    #[serde(default = "default_openai_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_openai_temperature(),
            timeout_seconds: default_openai_timeout_seconds(),
        }
    }
}

#[derive(Deserialize)]
struct RawOpener {
    #[serde(default = "default_opener_mode")]
    mode: OpenerMode,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    safety: RawSafety,
}

impl Default for RawOpener {
    fn default() -> Self {
        Self { mode: default_opener_mode(), text: None, safety: RawSafety::default() }
    }
}

/// Per-category overrides; unset categories keep the stock threshold.
#[derive(Deserialize, Default)]
struct RawSafety {
    hate_speech: Option<HarmBlockThreshold>,
    dangerous_content: Option<HarmBlockThreshold>,
    harassment: Option<HarmBlockThreshold>,
    sexually_explicit: Option<HarmBlockThreshold>,
}

impl RawSafety {
    fn resolve(self) -> Vec<SafetySetting> {
        OPENER_DEFAULTS
            .iter()
            .map(|d| {
                let overridden = match d.category {
                    HarmCategory::HateSpeech => self.hate_speech,
                    HarmCategory::DangerousContent => self.dangerous_content,
                    HarmCategory::Harassment => self.harassment,
                    HarmCategory::SexuallyExplicit => self.sexually_explicit,
                };
                SafetySetting::new(d.category, overridden.unwrap_or(d.threshold))
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct RawChat {
    #[serde(default = "default_topic")]
    topic: String,
    #[serde(default)]
    history_window: usize,
}

impl Default for RawChat {
    fn default() -> Self {
        Self { topic: default_topic(), history_window: 0 }
    }
}

fn default_app_name() -> String { "IniMeg".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_locale() -> String { "es".to_string() }
fn default_prompts_dir() -> String { "config/prompts".to_string() }
fn default_llm_provider() -> String { "dummy".to_string() }
fn default_openai_api_base_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_openai_model() -> String { "gpt-4o-mini".to_string() }
fn default_openai_temperature() -> f32 { 0.7 }
fn default_openai_timeout_seconds() -> u64 { 60 }
fn default_opener_mode() -> OpenerMode { OpenerMode::Model }
fn default_topic() -> String { "atletismo".to_string() }

// ── loading ───────────────────────────────────────────────────────────────────

/// Load config from `path` (default `config/default.toml`), then apply
/// env-var overrides.
pub fn load(path: Option<&str>) -> Result<Config, AppError> {
    let log_level_override = env::var("INIMEG_LOG_LEVEL").ok();
    let locale_override = env::var("INIMEG_LOCALE").ok();
    let mut config = load_from(
        Path::new(path.unwrap_or(DEFAULT_CONFIG_PATH)),
        log_level_override.as_deref(),
        locale_override.as_deref(),
    )?;
    config.llm_api_key = env::var("LLM_API_KEY").ok().filter(|k| !k.trim().is_empty());
    Ok(config)
}

/// Internal loader. Accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    log_level_override: Option<&str>,
    locale_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    parse(&raw, log_level_override, locale_override)
        .map_err(|e| match e {
            AppError::Config(msg) => AppError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
}

fn parse(
    raw: &str,
    log_level_override: Option<&str>,
    locale_override: Option<&str>,
) -> Result<Config, AppError> {
    let parsed: RawConfig =
        toml::from_str(raw).map_err(|e| AppError::Config(format!("parse error: {e}")))?;

    let app = parsed.app;
    let locale = locale_override
        .unwrap_or(&app.locale)
        .parse::<Locale>()
        .map_err(AppError::Config)?;
    let topic = parsed.chat.topic.parse::<Topic>().map_err(AppError::Config)?;

    Ok(Config {
        app_name: app.name,
        log_level: log_level_override.unwrap_or(&app.log_level).to_string(),
        locale,
        prompts_dir: expand_home(&app.prompts_dir),
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                model: parsed.llm.openai.model,
                temperature: parsed.llm.openai.temperature,
                timeout_seconds: parsed.llm.openai.timeout_seconds,
            },
        },
        llm_api_key: None,
        opener: OpenerConfig {
            mode: parsed.opener.mode,
            text: parsed.opener.text.filter(|t| !t.trim().is_empty()),
            safety: parsed.opener.safety.resolve(),
        },
        chat: ChatConfig {
            topic,
            history_window: parsed.chat.history_window,
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
