use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    /// Campo obligatorio ausente (o vacío) al construir el documento
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// Importe de línea o total fuera del rango de `Decimal`
    #[error("amount out of range: {0}")]
    AmountOutOfRange(String),

    #[error("unsupported output format '{0}', use 'pdf' or 'docx'")]
    UnsupportedOutputFormat(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentError {
    /// Errores causados por los datos enviados por el cliente
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DocumentError::MissingRequiredField(_)
                | DocumentError::AmountOutOfRange(_)
                | DocumentError::UnsupportedOutputFormat(_)
        )
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;
