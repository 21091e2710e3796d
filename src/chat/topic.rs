//! Sport selector. Accepted by the response flow as an extra input.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    #[default]
    Atletismo,
    Culturismo,
    Natacion,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Atletismo, Topic::Culturismo, Topic::Natacion];

    pub fn slug(&self) -> &'static str {
        match self {
            Topic::Atletismo => "atletismo",
            Topic::Culturismo => "culturismo",
            Topic::Natacion => "natacion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Topic::Atletismo => "Atletismo",
            Topic::Culturismo => "Culturismo",
            Topic::Natacion => "Natación",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "atletismo" => Ok(Topic::Atletismo),
            "culturismo" => Ok(Topic::Culturismo),
            "natacion" | "natación" => Ok(Topic::Natacion),
            other => Err(format!(
                "unknown topic '{other}' (expected one of: atletismo, culturismo, natacion)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively_with_accent() {
        assert_eq!("Natación".parse::<Topic>().unwrap(), Topic::Natacion);
        assert_eq!(" CULTURISMO ".parse::<Topic>().unwrap(), Topic::Culturismo);
        assert!("ciclismo".parse::<Topic>().is_err());
    }

    #[test]
    fn slug_round_trips() {
        for t in Topic::ALL {
            assert_eq!(t.slug().parse::<Topic>().unwrap(), t);
        }
    }

    #[test]
    fn default_is_atletismo() {
        assert_eq!(Topic::default(), Topic::Atletismo);
    }
}
