use anyhow::{anyhow, Context, Result};

use crate::layout::budget::{MarginsMm, PageFormat, PageSetup};
use crate::layout::font_metrics::FontFamily;

/// Application configuration loaded from environment variables.
/// Every variable is optional; defaults describe an A4 page with 15mm margins.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub page_format: PageFormat,
    pub page_margin_mm: f32,
    pub default_font: FontFamily,
    pub font_size_px: f32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            page_format: optional_env("PAGE_FORMAT", "a4")
                .parse::<PageFormat>()
                .context("PAGE_FORMAT must be 'a4' or 'letter'")?,
            page_margin_mm: optional_env("PAGE_MARGIN_MM", "15")
                .parse::<f32>()
                .context("PAGE_MARGIN_MM must be a number")?,
            default_font: optional_env("DEFAULT_FONT", "inter")
                .parse::<FontFamily>()
                .map_err(|e| anyhow!(e))
                .context("DEFAULT_FONT must be 'inter' or 'eb_garamond'")?,
            font_size_px: optional_env("FONT_SIZE_PX", "14")
                .parse::<f32>()
                .context("FONT_SIZE_PX must be a number")?,
        })
    }

    /// Page setup applied when a request does not bring its own template.
    pub fn page_setup(&self) -> Result<PageSetup> {
        let setup = PageSetup {
            format: self.page_format,
            margins_mm: MarginsMm::uniform(self.page_margin_mm),
        };
        // Fail at startup rather than on the first request.
        setup.budget().usable_height()?;
        setup.content_width()?;
        Ok(setup)
    }
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
