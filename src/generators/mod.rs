pub mod docx;
pub mod logo;
pub mod pdf;

use async_trait::async_trait;

use crate::core::{AppConfig, DocumentResult};
use crate::models::OutputFormat;
use crate::templates::DocumentView;

pub use docx::DocxRenderer;
pub use logo::{LogoFetcher, LogoImage};
pub use pdf::PdfRenderer;

/// Convierte la vista de un documento en los bytes de un formato de salida
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    fn format(&self) -> OutputFormat;

    async fn render(&self, view: &DocumentView, logo: Option<&LogoImage>) -> DocumentResult<Vec<u8>>;
}

/// Un generador por formato soportado
pub struct Renderers {
    pdf: PdfRenderer,
    docx: DocxRenderer,
}

impl Renderers {
    pub fn new(config: &AppConfig) -> DocumentResult<Self> {
        Ok(Renderers {
            pdf: PdfRenderer::new(config)?,
            docx: DocxRenderer,
        })
    }

    pub fn for_format(&self, format: OutputFormat) -> &dyn DocumentRenderer {
        match format {
            OutputFormat::Pdf => &self.pdf,
            OutputFormat::Docx => &self.docx,
        }
    }
}
