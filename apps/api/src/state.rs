use crate::layout::document::TemplateOptions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Template used by the resume endpoint when the request does not send one.
    /// Single column, built from the configured page format, margins, and font.
    pub default_template: TemplateOptions,
}
