//! Page budget calculation.
//!
//! All engine heights are CSS pixels (96 per inch). Paper formats and margins are
//! configured in millimetres and converted once here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::error::ConfigurationError;

/// CSS pixels per millimetre (96 px/in ÷ 25.4 mm/in).
pub const MM_TO_PX: f32 = 96.0 / 25.4;

// ────────────────────────────────────────────────────────────────────────────
// PageBudget
// ────────────────────────────────────────────────────────────────────────────

/// Vertical budget of one page (or one column track), in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageBudget {
    pub total_height: f32,
    #[serde(default)]
    pub padding_top: f32,
    #[serde(default)]
    pub padding_bottom: f32,
}

impl PageBudget {
    pub fn new(total_height: f32, padding_top: f32, padding_bottom: f32) -> Self {
        Self {
            total_height,
            padding_top,
            padding_bottom,
        }
    }

    /// `total_height - padding_top - padding_bottom`.
    ///
    /// A page that cannot hold any content is a caller bug, so this fails fast
    /// instead of letting the packer spin on empty pages.
    pub fn usable_height(&self) -> Result<f32, ConfigurationError> {
        let usable = self.total_height - self.padding_top - self.padding_bottom;
        if usable.is_finite() && usable > 0.0 {
            Ok(usable)
        } else {
            Err(ConfigurationError::NonPositiveUsableHeight {
                usable_height: usable,
            })
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Paper formats
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFormat {
    A4,
    Letter,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PageFormat {
    /// `(width, height)` in millimetres.
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::Letter => (215.9, 279.4),
            PageFormat::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

impl FromStr for PageFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageFormat::A4),
            "letter" | "us-letter" => Ok(PageFormat::Letter),
            other => Err(ConfigurationError::InvalidPageSetup(format!(
                "unknown page format '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginsMm {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl MarginsMm {
    pub fn uniform(mm: f32) -> Self {
        Self {
            top: mm,
            bottom: mm,
            left: mm,
            right: mm,
        }
    }
}

/// Physical page description, as a template or the service config states it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    pub format: PageFormat,
    pub margins_mm: MarginsMm,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            format: PageFormat::A4,
            margins_mm: MarginsMm::uniform(15.0),
        }
    }
}

impl PageSetup {
    pub fn size(&self) -> PageSize {
        let (w, h) = self.format.dimensions_mm();
        PageSize {
            width: w * MM_TO_PX,
            height: h * MM_TO_PX,
        }
    }

    pub fn budget(&self) -> PageBudget {
        PageBudget::new(
            self.size().height,
            self.margins_mm.top * MM_TO_PX,
            self.margins_mm.bottom * MM_TO_PX,
        )
    }

    /// Horizontal space between the left and right margins, in pixels.
    pub fn content_width(&self) -> Result<f32, ConfigurationError> {
        let width = self.size().width - (self.margins_mm.left + self.margins_mm.right) * MM_TO_PX;
        if width.is_finite() && width > 0.0 {
            Ok(width)
        } else {
            Err(ConfigurationError::InvalidPageSetup(format!(
                "content width must be positive, got {width}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_height_subtracts_padding() {
        let budget = PageBudget::new(1100.0, 50.0, 50.0);
        assert_eq!(budget.usable_height().unwrap(), 1000.0);
    }

    #[test]
    fn test_zero_usable_height_is_configuration_error() {
        let budget = PageBudget::new(0.0, 0.0, 0.0);
        assert_eq!(
            budget.usable_height().unwrap_err(),
            ConfigurationError::NonPositiveUsableHeight { usable_height: 0.0 }
        );
    }

    #[test]
    fn test_padding_larger_than_page_is_configuration_error() {
        let budget = PageBudget::new(100.0, 60.0, 60.0);
        assert!(budget.usable_height().is_err());
    }

    #[test]
    fn test_a4_size_in_pixels() {
        let size = PageSetup::default().size();
        // 210mm × 297mm at 96dpi ≈ 793.7 × 1122.5
        assert!((size.width - 793.7).abs() < 0.1, "got {}", size.width);
        assert!((size.height - 1122.5).abs() < 0.1, "got {}", size.height);
    }

    #[test]
    fn test_setup_budget_uses_vertical_margins() {
        let setup = PageSetup {
            format: PageFormat::A4,
            margins_mm: MarginsMm {
                top: 20.0,
                bottom: 10.0,
                left: 0.0,
                right: 0.0,
            },
        };
        let usable = setup.budget().usable_height().unwrap();
        assert!((usable - 267.0 * MM_TO_PX).abs() < 0.01);
    }

    #[test]
    fn test_content_width_rejects_margins_wider_than_page() {
        let setup = PageSetup {
            format: PageFormat::Letter,
            margins_mm: MarginsMm::uniform(120.0),
        };
        assert!(setup.content_width().is_err());
    }

    #[test]
    fn test_page_format_from_str() {
        assert_eq!("A4".parse::<PageFormat>().unwrap(), PageFormat::A4);
        assert_eq!("letter".parse::<PageFormat>().unwrap(), PageFormat::Letter);
        assert!("tabloid".parse::<PageFormat>().is_err());
    }
}
