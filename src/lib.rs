pub mod api;
pub mod core;
pub mod generators;
pub mod models;
pub mod templates;

// Re-export commonly used types
pub use crate::core::{AppConfig, DocumentError, DocumentResult};
pub use models::{
    DocumentAggregate, DocumentKind, DocumentOptions, DocumentPreview, DocumentRequest,
    LineItem, OutputFormat,
};

pub use generators::{DocumentRenderer, DocxRenderer, PdfRenderer, Renderers};
pub use templates::{DocumentView, TemplateEngine, Theme};
