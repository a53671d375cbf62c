use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Identidad del emisor usada cuando la petición no la trae
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SupplierDefaults {
    pub name: String,
    pub address: String,
    pub city: String,
    pub email: String,
    pub phone: String,
    pub tax_id: String,
    pub vat_number: Option<String>,
}

impl Default for SupplierDefaults {
    fn default() -> Self {
        SupplierDefaults {
            name: "Infinytia".to_string(),
            address: "61 Rue De Lyon".to_string(),
            city: "75012 Paris, FR".to_string(),
            email: "contact@infinytia.com".to_string(),
            phone: String::new(),
            tax_id: "93968736400017".to_string(),
            vat_number: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BankDetails {
    pub name: String,
    pub iban: String,
    pub bic: String,
}

impl BankDetails {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.iban.is_empty() && self.bic.is_empty()
    }
}

/// Valores por defecto de negocio que se inyectan al construir un documento
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentDefaults {
    pub supplier: SupplierDefaults,
    pub bank: BankDetails,
    pub payment_terms: String,
    pub late_penalties: String,
    /// Días entre emisión y expiración (devis) o vencimiento (factura)
    pub validity_days: i64,
    pub default_theme: String,
}

impl Default for DocumentDefaults {
    fn default() -> Self {
        DocumentDefaults {
            supplier: SupplierDefaults::default(),
            bank: BankDetails::default(),
            payment_terms: String::new(),
            late_penalties: String::new(),
            validity_days: 30,
            default_theme: "blue".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub temp_dir: String,
    pub typst_bin: String,
    pub render_timeout_ms: u64,
    pub logo_timeout_ms: u64,
    pub logo_max_bytes: usize,
    pub max_json_bytes: usize,
    pub rate_limit_per_minute: u32,
    pub rate_limit_burst: u32,
    pub documents: DocumentDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
            temp_dir: env::temp_dir().to_string_lossy().into_owned(),
            typst_bin: "typst".to_string(),
            render_timeout_ms: 30_000,
            logo_timeout_ms: 10_000,
            logo_max_bytes: 5_242_880, // 5MB
            max_json_bytes: 1_048_576, // 1MB
            rate_limit_per_minute: 120,
            rate_limit_burst: 20,
            documents: DocumentDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración: valores por defecto, luego variables `APP__*`
    /// (`APP__DOCUMENTS__SUPPLIER__NAME`, ...) y finalmente `PORT`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("port", env::var("PORT").ok())?
            .build()?;

        settings.try_deserialize()
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn logo_timeout(&self) -> Duration {
        Duration::from_millis(self.logo_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_organisation_identity() {
        let config = AppConfig::default();
        assert_eq!(config.documents.supplier.name, "Infinytia");
        assert_eq!(config.documents.supplier.tax_id, "93968736400017");
        assert_eq!(config.documents.validity_days, 30);
        assert!(config.documents.bank.is_empty());
    }

    #[test]
    fn partial_documents_section_keeps_other_defaults() {
        let parsed: DocumentDefaults =
            serde_json::from_str(r#"{"supplier": {"name": "Acme"}, "validity_days": 15}"#).unwrap();
        assert_eq!(parsed.supplier.name, "Acme");
        assert_eq!(parsed.supplier.city, "75012 Paris, FR");
        assert_eq!(parsed.validity_days, 15);
        assert_eq!(parsed.default_theme, "blue");
    }
}
