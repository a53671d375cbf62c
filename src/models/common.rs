use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::DocumentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Pdf,
    Docx,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "docx" => Ok(OutputFormat::Docx),
            _ => Err(DocumentError::UnsupportedOutputFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Devis (presupuesto) o factura: misma forma, distinta fecha secundaria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Quote,
    Invoice,
}

impl DocumentKind {
    pub fn number_prefix(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "D",
            DocumentKind::Invoice => "F",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "DEVIS",
            DocumentKind::Invoice => "FACTURE",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "devis",
            DocumentKind::Invoice => "facture",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Quote => write!(f, "quote"),
            DocumentKind::Invoice => write!(f, "invoice"),
        }
    }
}

pub const DEFAULT_PAYMENT_STATUS: &str = "pending";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Paid,
    Overdue,
    Neutral,
}

/// Estado de pago libre: solo se interpreta para colorear el documento
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentStatus(String);

impl PaymentStatus {
    pub fn new(status: impl Into<String>) -> Self {
        PaymentStatus(status.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tone(&self) -> StatusTone {
        match self.0.trim().to_lowercase().as_str() {
            "paid" | "payée" | "payee" => StatusTone::Paid,
            "overdue" | "en retard" => StatusTone::Overdue,
            _ => StatusTone::Neutral,
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus(DEFAULT_PAYMENT_STATUS.to_string())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_is_case_insensitive() {
        assert_eq!("PDF".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!(" docx ".parse::<OutputFormat>().unwrap(), OutputFormat::Docx);
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        let err = "xlsx".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedOutputFormat(ref f) if f == "xlsx"));
    }

    #[test]
    fn payment_status_tones() {
        assert_eq!(PaymentStatus::new("paid").tone(), StatusTone::Paid);
        assert_eq!(PaymentStatus::new("Payée").tone(), StatusTone::Paid);
        assert_eq!(PaymentStatus::new("En retard").tone(), StatusTone::Overdue);
        assert_eq!(PaymentStatus::default().tone(), StatusTone::Neutral);
        assert_eq!(PaymentStatus::new("partially paid").tone(), StatusTone::Neutral);
    }
}
