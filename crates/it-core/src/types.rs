//! Common types used throughout issuetrack

use serde::{Deserialize, Serialize};

/// Display color for taxonomy entries (types, severities, priorities, statuses)
///
/// The API sends colors as CSS hex strings (`"#3498db"`). The raw value is kept
/// as-is; [`Color::rgb`] parses it on demand so a malformed color never fails
/// decoding of the surrounding entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color {
    /// Hex color code (e.g., "#FF0000")
    pub hex: String,
}

impl Color {
    pub fn new(hex: impl Into<String>) -> Self {
        Self { hex: hex.into() }
    }

    /// Parse `#RRGGBB` or `#RGB` into components
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let digits = self.hex.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => {
                let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
                let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
                let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
                Some((r, g, b))
            }
            3 => {
                let expand = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|v| v * 17);
                Some((expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.rgb().is_some()
    }
}

impl Default for Color {
    fn default() -> Self {
        Self {
            hex: "#3498db".to_string(),
        }
    }
}

impl From<&str> for Color {
    fn from(hex: &str) -> Self {
        Self::new(hex)
    }
}
