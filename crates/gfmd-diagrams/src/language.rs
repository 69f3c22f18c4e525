//! Markup languages recognized inside diagram regions.

use std::fmt;
use std::str::FromStr;

/// Diagram markup languages that can be rendered through Kroki.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MarkupLanguage {
    Mermaid,
    PlantUml,
}

/// Default language set, in detection order.
///
/// When a fence line mentions more than one name, the entry listed first wins.
pub const SUPPORTED_LANGUAGES: &[MarkupLanguage] =
    &[MarkupLanguage::Mermaid, MarkupLanguage::PlantUml];

impl MarkupLanguage {
    /// Parse a language from its exact identifier.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mermaid" => Some(Self::Mermaid),
            "plantuml" => Some(Self::PlantUml),
            _ => None,
        }
    }

    /// Identifier used both as the fence tag and as the Kroki endpoint.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::PlantUml => "plantuml",
        }
    }

    /// Find the first language in `languages` whose identifier occurs in `line`.
    #[must_use]
    pub fn detect(line: &str, languages: &[Self]) -> Option<Self> {
        languages
            .iter()
            .copied()
            .find(|language| line.contains(language.as_str()))
    }
}

impl fmt::Display for MarkupLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown language name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown markup language '{0}' (supported: mermaid, plantuml)")]
pub struct UnknownLanguage(pub String);

impl FromStr for MarkupLanguage {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownLanguage(s.to_owned()))
    }
}
