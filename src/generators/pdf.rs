use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use uuid::Uuid;

use crate::core::{AppConfig, DocumentError, DocumentResult};
use crate::models::OutputFormat;
use crate::templates::{DocumentView, TemplateEngine, LOGO_FILE};
use super::{DocumentRenderer, LogoImage};

/// Generador de PDFs: plantilla minijinja -> fuente Typst -> `typst compile`
pub struct PdfRenderer {
    engine: TemplateEngine,
    temp_dir: PathBuf,
    typst_bin: String,
    timeout: Duration,
}

impl PdfRenderer {
    pub fn new(config: &AppConfig) -> DocumentResult<Self> {
        Ok(PdfRenderer {
            engine: TemplateEngine::new()?,
            temp_dir: PathBuf::from(&config.temp_dir),
            typst_bin: config.typst_bin.clone(),
            timeout: config.render_timeout(),
        })
    }

    /// Compila dentro de `workdir`; el logo, si hay, se deja al lado del fuente
    async fn compile(
        &self,
        workdir: &Path,
        source: String,
        logo: Option<&LogoImage>,
    ) -> DocumentResult<Vec<u8>> {
        let typ_path = workdir.join("document.typ");
        let pdf_path = workdir.join("document.pdf");

        tokio::fs::write(&typ_path, source).await?;
        if let Some(logo) = logo {
            tokio::fs::write(workdir.join(LOGO_FILE), &logo.png).await?;
        }

        let compile = Command::new(&self.typst_bin)
            .arg("compile")
            .arg(&typ_path)
            .arg(&pdf_path)
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, compile)
            .await
            .map_err(|_| {
                DocumentError::Render(format!(
                    "typst compilation timed out after {} ms",
                    self.timeout.as_millis()
                ))
            })?
            .map_err(|e| {
                DocumentError::Render(format!("cannot run '{}': {}", self.typst_bin, e))
            })?;

        if !output.status.success() {
            return Err(DocumentError::Render(format!(
                "typst compilation failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(tokio::fs::read(&pdf_path).await?)
    }
}

#[async_trait]
impl DocumentRenderer for PdfRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Pdf
    }

    async fn render(&self, view: &DocumentView, logo: Option<&LogoImage>) -> DocumentResult<Vec<u8>> {
        let source = self.engine.render_typst(view, logo.map(|_| LOGO_FILE))?;

        let workdir = self.temp_dir.join(format!("doc_{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&workdir).await?;

        let result = self.compile(&workdir, source, logo).await;

        // Limpiar siempre el directorio temporal
        if let Err(e) = tokio::fs::remove_dir_all(&workdir).await {
            tracing::warn!(path = %workdir.display(), error = %e, "temp dir cleanup failed");
        }

        result
    }
}
