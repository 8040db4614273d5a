use crate::value::TokenValue;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Value family of a token. Generators and validators declare which families they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenCategory {
    Color,
    Dimension,
    FontWeight,
    Shadow,
    Opacity,
    Number,
}

impl TokenCategory {
    pub const ALL: [Self; 6] =
        [Self::Color, Self::Dimension, Self::FontWeight, Self::Shadow, Self::Opacity, Self::Number];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Dimension => "dimension",
            Self::FontWeight => "fontWeight",
            Self::Shadow => "shadow",
            Self::Opacity => "opacity",
            Self::Number => "number",
        }
    }
}

impl Display for TokenCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown token category `{s}`"))
    }
}

/// What a token is used for. Affect rules and validators dispatch on roles,
/// never on substrings of the token name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenRole {
    Background,
    Surface,
    Text,
    Accent,
    Border,
    FontSize,
    LineHeight,
    Spacing,
    InteractiveSize,
    #[default]
    Generic,
}

impl TokenRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Surface => "surface",
            Self::Text => "text",
            Self::Accent => "accent",
            Self::Border => "border",
            Self::FontSize => "fontSize",
            Self::LineHeight => "lineHeight",
            Self::Spacing => "spacing",
            Self::InteractiveSize => "interactiveSize",
            Self::Generic => "generic",
        }
    }
}

impl Display for TokenRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry describing a token before it has a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSpec {
    pub name: String,
    pub category: TokenCategory,
    #[serde(default)]
    pub role: TokenRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_variable: Option<String>,
}

impl TokenSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, category: TokenCategory, role: TokenRole) -> Self {
        Self { name: name.into(), category, role, css_variable: None }
    }

    #[must_use]
    pub fn with_css_variable(mut self, variable: impl Into<String>) -> Self {
        self.css_variable = Some(variable.into());
        self
    }

    /// CSS custom property for this token, `--<name>` unless overridden.
    #[must_use]
    pub fn css_variable(&self) -> Cow<'_, str> {
        self.css_variable
            .as_deref()
            .map_or_else(|| Cow::Owned(default_css_variable(&self.name)), Cow::Borrowed)
    }
}

/// `--<name>`, with namespace dots flattened to dashes.
#[must_use]
pub fn default_css_variable(name: &str) -> String {
    format!("--{}", name.replace('.', "-"))
}

/// How a token got its current value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "token", rename_all = "camelCase")]
pub enum Provenance {
    #[default]
    Direct,
    GeneratedFrom(String),
    AffectedBy(String),
}

/// A named, typed design value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub name: String,
    pub value: TokenValue,
    #[serde(default)]
    pub role: TokenRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl Token {
    #[must_use]
    pub fn direct(name: impl Into<String>, value: TokenValue, role: TokenRole) -> Self {
        Self { name: name.into(), value, role, domain: None, provenance: Provenance::Direct }
    }

    #[must_use]
    pub fn in_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub const fn category(&self) -> TokenCategory {
        self.value.category()
    }
}
