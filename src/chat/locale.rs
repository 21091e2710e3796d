//! User-facing text per locale.
//!
//! Locale picks the instruction templates and every fixed string the view
//! and console show; there is a single code path per flow.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Es,
    En,
}

/// Fixed strings for one locale.
#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub tagline: &'static str,
    pub fallback_greeting: &'static str,
    pub fallback_cleared: &'static str,
    pub fallback_apology: &'static str,
    pub fixed_opener: &'static str,
    pub opener_error_title: &'static str,
    pub opener_error_description: &'static str,
    pub response_error_title: &'static str,
    pub response_error_description: &'static str,
    pub cleared_title: &'static str,
    pub cleared_description: &'static str,
    pub topic_label: &'static str,
    pub busy: &'static str,
    pub help: &'static str,
}

static ES: Strings = Strings {
    title: "IniMeg",
    tagline: "Tu chatbot para deportistas",
    fallback_greeting: "¡Hola! Soy tu experto en entrenamiento deportivo. ¿En qué puedo ayudarte hoy?",
    fallback_cleared: "Chat borrado. ¿Cómo puedo ayudar?",
    fallback_apology: "Lo siento, tengo problemas para pensar en este momento. ¿Podrías intentar preguntar de nuevo?",
    fixed_opener: "¡Hola! Soy tu experto en entrenamiento deportivo. ¿En qué puedo ayudarte hoy?",
    opener_error_title: "Error",
    opener_error_description: "No se pudo cargar el mensaje inicial. Por favor, actualiza.",
    response_error_title: "Error de API",
    response_error_description: "No se pudo obtener una respuesta de la IA.",
    cleared_title: "Chat borrado",
    cleared_description: "La conversación ha sido reiniciada.",
    topic_label: "Deporte",
    busy: "Espera a que termine la respuesta actual.",
    help: "Comandos: /clear  /topic <deporte>  /topics  /up [n]  /down [n]  /help  /quit",
};

static EN: Strings = Strings {
    title: "IniMeg",
    tagline: "Your chatbot for athletes",
    fallback_greeting: "Hi! I'm your sports training expert. How can I help you today?",
    fallback_cleared: "Chat cleared. How can I help?",
    fallback_apology: "Sorry, I'm having trouble thinking right now. Could you try asking again?",
    fixed_opener: "Hi! I'm your sports training expert. How can I help you today?",
    opener_error_title: "Error",
    opener_error_description: "Could not load the initial message. Please refresh.",
    response_error_title: "API error",
    response_error_description: "Could not get a response from the AI.",
    cleared_title: "Chat cleared",
    cleared_description: "The conversation has been restarted.",
    topic_label: "Sport",
    busy: "Wait for the current reply to finish.",
    help: "Commands: /clear  /topic <sport>  /topics  /up [n]  /down [n]  /help  /quit",
};

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Locale::Es => &ES,
            Locale::En => &EN,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" | "es-es" | "spanish" => Ok(Locale::Es),
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{other}' (expected 'es' or 'en')")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codes() {
        assert_eq!("ES".parse::<Locale>().unwrap(), Locale::Es);
        assert_eq!("en-GB".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn spanish_fallbacks() {
        let s = Locale::Es.strings();
        assert!(s.fallback_greeting.starts_with("¡Hola!"));
        assert!(s.fallback_apology.starts_with("Lo siento"));
        assert_eq!(s.fallback_cleared, "Chat borrado. ¿Cómo puedo ayudar?");
    }
}
