//! Typed token values.
//!
//! Every value carries its [`TokenCategory`] as the enum tag, so generators and
//! validators dispatch on the tag instead of guessing from token names.

use crate::token::TokenCategory;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Root font size used to convert relative units to pixels.
pub const ROOT_FONT_SIZE_PX: f64 = 16.0;

/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb` (the leading `#` is optional, case-insensitive).
    ///
    /// # Errors
    /// Returns [`ParseValueError`] when the input is not a 3 or 6 digit hex colour.
    pub fn from_hex(input: &str) -> Result<Self, ParseValueError> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseValueError::new(TokenCategory::Color, input));
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_owned(),
            _ => return Err(ParseValueError::new(TokenCategory::Color, input)),
        };

        let channel = |at: usize| {
            u8::from_str_radix(&expanded[at..at + 2], 16)
                .map_err(|_| ParseValueError::new(TokenCategory::Color, input))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb` form.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

/// CSS length units understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionUnit {
    Px,
    Rem,
    Em,
}

impl DimensionUnit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Rem => "rem",
            Self::Em => "em",
        }
    }
}

/// A length such as `16px` or `1.25rem`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    pub value: f64,
    pub unit: DimensionUnit,
}

impl Dimension {
    #[must_use]
    pub const fn new(value: f64, unit: DimensionUnit) -> Self {
        Self { value, unit }
    }

    #[must_use]
    pub const fn px(value: f64) -> Self {
        Self::new(value, DimensionUnit::Px)
    }

    #[must_use]
    pub const fn rem(value: f64) -> Self {
        Self::new(value, DimensionUnit::Rem)
    }

    /// Absolute size in pixels. `em` is treated like `rem` since no parent context exists here.
    #[must_use]
    pub fn to_px(self) -> f64 {
        match self.unit {
            DimensionUnit::Px => self.value,
            DimensionUnit::Rem | DimensionUnit::Em => self.value * ROOT_FONT_SIZE_PX,
        }
    }

    /// Same unit, sized to `px` pixels.
    #[must_use]
    pub fn with_px(self, px: f64) -> Self {
        match self.unit {
            DimensionUnit::Px => Self::px(px),
            DimensionUnit::Rem | DimensionUnit::Em => Self::new(px / ROOT_FONT_SIZE_PX, self.unit),
        }
    }

    /// Same unit, value multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.value * factor, self.unit)
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.value), self.unit.as_str())
    }
}

impl FromStr for Dimension {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (number, unit) = if let Some(n) = trimmed.strip_suffix("rem") {
            (n, DimensionUnit::Rem)
        } else if let Some(n) = trimmed.strip_suffix("em") {
            (n, DimensionUnit::Em)
        } else if let Some(n) = trimmed.strip_suffix("px") {
            (n, DimensionUnit::Px)
        } else {
            (trimmed, DimensionUnit::Px)
        };

        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| ParseValueError::new(TokenCategory::Dimension, s))?;
        if !value.is_finite() {
            return Err(ParseValueError::new(TokenCategory::Dimension, s));
        }
        Ok(Self::new(value, unit))
    }
}

impl Serialize for Dimension {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A typed design-token value; the variant is the token's category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum TokenValue {
    Color(Rgb),
    Dimension(Dimension),
    FontWeight(u16),
    Shadow(String),
    Opacity(f64),
    Number(f64),
}

impl TokenValue {
    #[must_use]
    pub const fn category(&self) -> TokenCategory {
        match self {
            Self::Color(_) => TokenCategory::Color,
            Self::Dimension(_) => TokenCategory::Dimension,
            Self::FontWeight(_) => TokenCategory::FontWeight,
            Self::Shadow(_) => TokenCategory::Shadow,
            Self::Opacity(_) => TokenCategory::Opacity,
            Self::Number(_) => TokenCategory::Number,
        }
    }

    #[must_use]
    pub const fn as_color(&self) -> Option<Rgb> {
        match self {
            Self::Color(rgb) => Some(*rgb),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_dimension(&self) -> Option<Dimension> {
        match self {
            Self::Dimension(dim) => Some(*dim),
            _ => None,
        }
    }

    /// Pixel size of a dimension value.
    #[must_use]
    pub fn as_px(&self) -> Option<f64> {
        self.as_dimension().map(Dimension::to_px)
    }

    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) | Self::Opacity(n) => Some(*n),
            _ => None,
        }
    }

    /// Parses CSS-like text as a value of the given category.
    ///
    /// # Errors
    /// Returns [`ParseValueError`] when `input` is not a valid literal for `category`.
    pub fn parse(category: TokenCategory, input: &str) -> Result<Self, ParseValueError> {
        let trimmed = input.trim();
        let invalid = || ParseValueError::new(category, input);
        match category {
            TokenCategory::Color => Rgb::from_hex(trimmed).map(Self::Color),
            TokenCategory::Dimension => trimmed.parse().map(Self::Dimension),
            TokenCategory::FontWeight => match trimmed.parse::<u16>() {
                Ok(weight) if (1..=1000).contains(&weight) => Ok(Self::FontWeight(weight)),
                _ => Err(invalid()),
            },
            TokenCategory::Shadow if !trimmed.is_empty() => Ok(Self::Shadow(trimmed.to_owned())),
            TokenCategory::Shadow => Err(invalid()),
            TokenCategory::Opacity => match trimmed.parse::<f64>() {
                Ok(alpha) if (0.0..=1.0).contains(&alpha) => Ok(Self::Opacity(alpha)),
                _ => Err(invalid()),
            },
            TokenCategory::Number => match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Self::Number(n)),
                _ => Err(invalid()),
            },
        }
    }
}

impl Display for TokenValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(rgb) => rgb.fmt(f),
            Self::Dimension(dim) => dim.fmt(f),
            Self::FontWeight(weight) => write!(f, "{weight}"),
            Self::Shadow(shadow) => f.write_str(shadow),
            Self::Opacity(n) | Self::Number(n) => f.write_str(&format_number(*n)),
        }
    }
}

impl From<Rgb> for TokenValue {
    fn from(rgb: Rgb) -> Self {
        Self::Color(rgb)
    }
}

impl From<Dimension> for TokenValue {
    fn from(dim: Dimension) -> Self {
        Self::Dimension(dim)
    }
}

/// A literal that does not parse for its declared category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseValueError {
    pub category: TokenCategory,
    pub input: String,
}

impl ParseValueError {
    #[must_use]
    pub fn new(category: TokenCategory, input: &str) -> Self {
        Self { category, input: input.to_owned() }
    }
}

impl Display for ParseValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a valid {} value", self.input, self.category)
    }
}

impl Error for ParseValueError {}

/// Rounds to three decimals and drops trailing zeros (`16`, `1.5`, `0.333`).
fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format!("{}", rounded + 0.0)
}
