//! Presentation personas.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Who an answer is shaped for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Headline first, drill-down on request
    Executive,
    /// Numbers first, context second
    Analyst,
    /// Problem, cause, action
    Manager,
    /// Conversational
    #[default]
    Casual,
}

impl Persona {
    pub const ALL: [Persona; 4] = [Self::Executive, Self::Analyst, Self::Manager, Self::Casual];

    /// Parse a persona tag. Tags match exactly; anything else, including
    /// case or whitespace variants, falls back to casual.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "executive" => Self::Executive,
            "analyst" => Self::Analyst,
            "manager" => Self::Manager,
            other => {
                if other != "casual" {
                    tracing::debug!(persona = other, "unknown persona, using casual");
                }
                Self::Casual
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Executive => "executive",
            Self::Analyst => "analyst",
            Self::Manager => "manager",
            Self::Casual => "casual",
        }
    }
}

impl FromStr for Persona {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
