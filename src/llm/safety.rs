//! Content-safety thresholds attached to a completion request.
//!
//! Wire names follow the Gemini convention (`HARM_CATEGORY_*`, `BLOCK_*`),
//! which OpenAI-compatible gateways in front of Gemini accept verbatim.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    pub const fn new(category: HarmCategory, threshold: HarmBlockThreshold) -> Self {
        Self { category, threshold }
    }
}

/// Thresholds used for opener generation unless overridden in `[opener.safety]`.
pub const OPENER_DEFAULTS: [SafetySetting; 4] = [
    SafetySetting::new(HarmCategory::HateSpeech, HarmBlockThreshold::BlockOnlyHigh),
    SafetySetting::new(HarmCategory::DangerousContent, HarmBlockThreshold::BlockNone),
    SafetySetting::new(HarmCategory::Harassment, HarmBlockThreshold::BlockMediumAndAbove),
    SafetySetting::new(HarmCategory::SexuallyExplicit, HarmBlockThreshold::BlockLowAndAbove),
];
