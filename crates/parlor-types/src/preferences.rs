//! UI preference types: theme, sidebar state, and model selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Colour theme of the chat UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("invalid theme: '{other}'")),
        }
    }
}

/// Which model the chat server should route a message to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSelector {
    #[default]
    Gemini,
    Azure,
}

impl ModelSelector {
    /// Display label used in UI text and error messages.
    pub fn label(self) -> &'static str {
        match self {
            ModelSelector::Gemini => "Gemini",
            ModelSelector::Azure => "Azure",
        }
    }
}

impl fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSelector::Gemini => write!(f, "gemini"),
            ModelSelector::Azure => write!(f, "azure"),
        }
    }
}

impl FromStr for ModelSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(ModelSelector::Gemini),
            "azure" => Ok(ModelSelector::Azure),
            other => Err(format!("invalid model: '{other}' (expected gemini or azure)")),
        }
    }
}

/// Persisted UI chrome state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub sidebar_collapsed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_theme_roundtrip() {
        for theme in [Theme::Light, Theme::Dark] {
            let parsed: Theme = theme.to_string().parse().unwrap();
            assert_eq!(parsed, theme);
        }
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_model_selector_wire_name() {
        let json = serde_json::to_string(&ModelSelector::Azure).unwrap();
        assert_eq!(json, "\"azure\"");
        assert_eq!(ModelSelector::default(), ModelSelector::Gemini);
        assert_eq!(ModelSelector::Gemini.label(), "Gemini");
    }

    #[test]
    fn test_model_selector_parse() {
        assert_eq!("AZURE".parse::<ModelSelector>().unwrap(), ModelSelector::Azure);
        assert!("gpt".parse::<ModelSelector>().is_err());
    }
}
