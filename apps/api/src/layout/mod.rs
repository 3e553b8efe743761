// Pagination engine: flows measured resume blocks into fixed-size pages.
// One algorithm for every template; templates differ only in TemplateOptions.
// The engine is synchronous and pure; handlers run it inside spawn_blocking.

pub mod assembler;
pub mod block;
pub mod budget;
pub mod columns;
pub mod document;
pub mod engine;
pub mod error;
pub mod font_metrics;
pub mod handlers;
pub mod measure;
pub mod packer;
pub mod splitter;

// Re-export the public API consumed by main and the router.
pub use document::TemplateOptions;
pub use font_metrics::FontFamily;
