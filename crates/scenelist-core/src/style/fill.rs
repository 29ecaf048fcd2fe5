//! Fill style types

use super::Color;

/// Background fill for a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FillStyle {
    /// No fill (transparent)
    #[default]
    None,

    /// Solid color fill
    Solid { color: Color },
}

impl FillStyle {
    /// Create a solid fill
    pub fn solid(color: Color) -> Self {
        FillStyle::Solid { color }
    }

    /// Check if there is no fill
    pub fn is_none(&self) -> bool {
        matches!(self, FillStyle::None)
    }

    /// Get the fill color, if any
    pub fn color(&self) -> Option<Color> {
        match self {
            FillStyle::None => None,
            FillStyle::Solid { color } => Some(*color),
        }
    }
}
