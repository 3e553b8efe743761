//! Static font-metric tables and the text-estimating measurement collaborator.
//!
//! Character widths are in em units (relative to font size). Static tables are an
//! approximation of real glyph shaping, close enough to decide where a page breaks
//! when the host cannot measure rendered output itself.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::block::{Block, BlockRole, Fragment};
use crate::layout::measure::Measure;

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Clean humanist sans-serif used by the modern templates.
    Inter,
    /// Old-style serif used by the classic templates.
    EbGaramond,
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "inter" => Ok(FontFamily::Inter),
            "eb_garamond" | "garamond" => Ok(FontFamily::EbGaramond),
            other => Err(format!("unknown font family '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font family.
///
/// `widths[i]` = width of ASCII character `(i + 32)` at 1em.
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Printed lines for one paragraph when greedily word-wrapped at `max_width_em`.
    ///
    /// A single word wider than the line still occupies one line (it overflows
    /// horizontally rather than being hyphenated).
    pub fn wrapped_lines(&self, paragraph: &str, max_width_em: f32) -> u16 {
        let mut words = paragraph.split_whitespace();
        let Some(first) = words.next() else {
            return 0;
        };

        let mut line_count = 1u16;
        let mut current_width = self.measure_str(first);
        for word in words {
            let word_w = self.measure_str(word);
            if current_width + self.space_width + word_w > max_width_em {
                line_count = line_count.saturating_add(1);
                current_width = word_w;
            } else {
                current_width += self.space_width + word_w;
            }
        }
        line_count
    }

    /// Lines for multi-paragraph text; explicit newlines always break.
    pub fn estimated_lines(&self, text: &str, max_width_em: f32) -> u16 {
        text.lines()
            .map(|p| self.wrapped_lines(p, max_width_em))
            .fold(0u16, u16::saturating_add)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static INTER_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
    space_width: 0.25,
};

/// Approx. 85% of Inter.
static EB_GARAMOND_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.21, 0.26, 0.32, 0.48, 0.48, 0.76, 0.57, 0.19, 0.28, 0.28, 0.33, 0.50, 0.24, 0.28, 0.24, 0.26,
        // 0     1     2     3     4     5     6     7     8     9
        0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48,
        // :     ;     <     =     >     ?     @
        0.24, 0.24, 0.50, 0.50, 0.50, 0.43, 0.87,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.57, 0.52, 0.52, 0.57, 0.48, 0.43, 0.57, 0.57, 0.21, 0.33, 0.52, 0.45, 0.66,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.57, 0.61, 0.48, 0.61, 0.52, 0.43, 0.48, 0.57, 0.57, 0.76, 0.52, 0.52, 0.48,
        // [     \     ]     ^     _     `
        0.24, 0.26, 0.24, 0.40, 0.48, 0.29,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.48, 0.48, 0.43, 0.48, 0.48, 0.26, 0.48, 0.48, 0.19, 0.19, 0.45, 0.19, 0.71,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.48, 0.48, 0.48, 0.48, 0.28, 0.37, 0.33, 0.48, 0.43, 0.61, 0.43, 0.43, 0.37,
        // {     |     }     ~
        0.28, 0.22, 0.28, 0.50,
    ],
    average_char_width: 0.44,
    space_width: 0.21,
};

pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Inter => &INTER_TABLE,
        FontFamily::EbGaramond => &EB_GARAMOND_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Text measurer
// ────────────────────────────────────────────────────────────────────────────

/// Typography of one column track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: FontFamily,
    pub font_size_px: f32,
    /// Line box height as a multiple of the font size.
    pub line_height: f32,
    /// Font size multiplier for `BlockRole::Heading` blocks.
    pub heading_scale: f32,
}

impl TextStyle {
    pub fn new(font: FontFamily, font_size_px: f32) -> Self {
        Self {
            font,
            font_size_px,
            line_height: 1.4,
            heading_scale: 1.3,
        }
    }
}

/// Estimates block heights as `lines × font size × line height`.
pub struct TextMeasurer {
    metrics: &'static FontMetricTable,
    style: TextStyle,
    text_width_px: f32,
}

impl TextMeasurer {
    pub fn new(style: TextStyle, text_width_px: f32) -> Self {
        Self {
            metrics: get_metrics(style.font),
            style,
            text_width_px,
        }
    }

    fn text_height(&self, text: &str, scale: f32) -> Option<f32> {
        let size = self.style.font_size_px * scale;
        if size <= 0.0 || self.text_width_px <= 0.0 {
            return None;
        }
        let lines = self.metrics.estimated_lines(text, self.text_width_px / size);
        Some(f32::from(lines) * size * self.style.line_height)
    }

    fn scale_for(&self, role: BlockRole) -> f32 {
        match role {
            BlockRole::Heading => self.style.heading_scale,
            BlockRole::Body => 1.0,
        }
    }
}

impl Measure for TextMeasurer {
    fn measure_block(&self, block: &Block) -> Option<f32> {
        self.text_height(&block.text, self.scale_for(block.role))
    }

    fn measure_fragment(&self, _block: &Block, fragment: &Fragment) -> Option<f32> {
        self.text_height(&fragment.text, 1.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
