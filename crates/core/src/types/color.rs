//! Material color selection.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a form value is not one of the offered colors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown material color: {0}")]
pub struct ColorParseError(pub String);

/// Material color offered on the order form.
///
/// `Custom` carries no value of its own; the customer's free text lives in
/// [`OrderSubmission::custom_color`](crate::OrderSubmission::custom_color)
/// and is substituted when the order is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Color {
    #[default]
    Black,
    White,
    Gray,
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    Purple,
    Custom,
}

impl Color {
    /// Every selectable color, in the order the form lists them.
    pub const ALL: [Self; 10] = [
        Self::Black,
        Self::White,
        Self::Gray,
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Orange,
        Self::Purple,
        Self::Custom,
    ];

    /// Display label, also used as the form value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Black => "Black",
            Self::White => "White",
            Self::Gray => "Gray",
            Self::Red => "Red",
            Self::Blue => "Blue",
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Orange => "Orange",
            Self::Purple => "Purple",
            Self::Custom => "Custom",
        }
    }

    #[must_use]
    pub const fn is_custom(self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|color| color.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ColorParseError(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!("Blue".parse::<Color>().unwrap(), Color::Blue);
        assert_eq!(" custom ".parse::<Color>().unwrap(), Color::Custom);
        assert_eq!("GRAY".parse::<Color>().unwrap(), Color::Gray);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "Chartreuse".parse::<Color>(),
            Err(ColorParseError("Chartreuse".to_string()))
        );
    }

    #[test]
    fn test_every_label_parses_back() {
        for color in Color::ALL {
            assert_eq!(color.label().parse::<Color>().unwrap(), color);
        }
    }

    #[test]
    fn test_default_is_first_option() {
        assert_eq!(Color::default(), Color::ALL[0]);
        assert!(Color::Custom.is_custom());
        assert!(!Color::Black.is_custom());
    }
}
