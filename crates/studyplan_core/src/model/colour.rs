//! Toolkit-independent RGB colour used to tag modules.

use crate::model::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// `#RRGGBB`, bare `RRGGBB`, or `0xRRGGBBAA` (alpha ignored).
static HEX_COLOUR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:#|0x)?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})(?:[0-9a-fA-F]{2})?$")
        .expect("valid colour regex")
});

/// Opaque RGB colour, persisted as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const WHITE: Colour = Colour::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Formats as uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parses `#RRGGBB`, `RRGGBB` or `0xRRGGBBAA`.
    pub fn from_hex(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        let captures = HEX_COLOUR_RE
            .captures(trimmed)
            .ok_or_else(|| ValidationError::InvalidColour(value.to_string()))?;
        let channel = |index: usize| {
            u8::from_str_radix(&captures[index], 16)
                .map_err(|_| ValidationError::InvalidColour(value.to_string()))
        };
        Ok(Self::rgb(channel(1)?, channel(2)?, channel(3)?))
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Display for Colour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Colour {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_hex(value)
    }
}

impl TryFrom<String> for Colour {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Colour> for String {
    fn from(value: Colour) -> Self {
        value.to_hex()
    }
}
