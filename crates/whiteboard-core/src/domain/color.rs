//! Stroke colors and the palette they are assigned from.
//!
//! A [`Color`] is a CSS hex color string (`#RGB` or `#RRGGBB`).  Browsers
//! hand it straight to `ctx.strokeStyle`, so the server never needs to
//! understand it beyond validating its shape.
//!
//! A [`ColorPalette`] is a fixed, ordered, non-empty list of colors.  The
//! registry walks it cyclically: once more clients have connected than there
//! are colors, colors are reused.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Colors assigned when no palette is configured.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
];

/// Errors raised while building a [`Color`] or [`ColorPalette`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    /// A palette must contain at least one color.
    #[error("palette must contain at least one color")]
    Empty,

    /// The string is not a `#RGB` or `#RRGGBB` hex color.
    #[error("invalid color {0:?}: expected #RGB or #RRGGBB")]
    InvalidColor(String),
}

// ── Color ─────────────────────────────────────────────────────────────────────

/// A CSS hex color, e.g. `#FF0000`.
///
/// Serialized as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Parses and validates a hex color string.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::InvalidColor`] unless `s` is `#` followed by
    /// exactly 3 or 6 hex digits.
    ///
    /// # Example
    ///
    /// ```rust
    /// use whiteboard_core::Color;
    ///
    /// assert!(Color::parse("#00ff00").is_ok());
    /// assert!(Color::parse("green").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PaletteError> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| PaletteError::InvalidColor(s.to_string()))?;

        let well_formed = matches!(digits.len(), 3 | 6)
            && digits.chars().all(|c| c.is_ascii_hexdigit());
        if !well_formed {
            return Err(PaletteError::InvalidColor(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the color as it is sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── ColorPalette ──────────────────────────────────────────────────────────────

/// An ordered, non-empty list of colors handed out in connection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    colors: Vec<Color>,
}

impl ColorPalette {
    /// Builds a palette from already-validated colors.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::Empty`] if `colors` is empty.
    pub fn new(colors: Vec<Color>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self { colors })
    }

    /// Parses every string and builds a palette, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first [`PaletteError::InvalidColor`] encountered, or
    /// [`PaletteError::Empty`] for an empty input.
    pub fn from_strs<I, S>(colors: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let colors = colors
            .into_iter()
            .map(|s| Color::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Returns the color for the `index`-th assignment, wrapping around.
    pub fn color_for(&self, index: u64) -> &Color {
        // `len` is non-zero by construction, so the modulo is well-defined.
        let slot = (index % self.colors.len() as u64) as usize;
        &self.colors[slot]
    }

    /// Number of distinct slots in the palette.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`: an empty palette cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The colors in assignment order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl Default for ColorPalette {
    /// The six-color palette: red, green, blue, yellow, magenta, cyan.
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE
                .iter()
                .map(|s| Color(s.to_string()))
                .collect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
