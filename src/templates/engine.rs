use minijinja::{context, Environment};

use crate::core::{DocumentError, DocumentResult};
use super::helpers;
use super::theme::{BODY_TEXT_COLOR, DETAIL_COLOR, MUTED_BACKGROUND, RULE_COLOR};
use super::view::DocumentView;

const DOCUMENT_TEMPLATE: &str = "document.typ";

/// Nombre con el que el logo se deja junto al fuente Typst
pub const LOGO_FILE: &str = "logo.png";

/// Motor minijinja que produce el fuente Typst de un documento
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> DocumentResult<Self> {
        let mut env = Environment::new();

        env.add_filter("typst_str", helpers::typst_str);
        env.add_template(DOCUMENT_TEMPLATE, include_str!("document.typ.j2"))
            .map_err(|e| DocumentError::Render(format!("invalid document template: {}", e)))?;

        Ok(TemplateEngine { env })
    }

    /// Renderiza el fuente Typst; `logo` es la ruta relativa de la imagen si existe
    pub fn render_typst(&self, view: &DocumentView, logo: Option<&str>) -> DocumentResult<String> {
        let template = self
            .env
            .get_template(DOCUMENT_TEMPLATE)
            .map_err(|e| DocumentError::Render(e.to_string()))?;

        template
            .render(context! {
                doc => view,
                logo => logo,
                colors => context! {
                    muted => MUTED_BACKGROUND,
                    rule => RULE_COLOR,
                    detail => DETAIL_COLOR,
                    body => BODY_TEXT_COLOR,
                },
            })
            .map_err(|e| DocumentError::Render(format!("template rendering failed: {}", e)))
    }
}
