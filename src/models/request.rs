use serde::{Deserialize, Serialize};

use super::LineItem;

/// Parámetros de construcción de un devis o una factura.
///
/// Cada campo reconocido aparece aquí; los ausentes se completan con
/// `DocumentDefaults` al construir el `DocumentAggregate`. Los alias aceptan
/// las claves francesas que envían los flujos de automatización existentes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentOptions {
    #[serde(default, alias = "numero")]
    pub number: Option<String>,
    #[serde(default, alias = "date_emission")]
    pub issue_date: Option<String>,
    #[serde(default, alias = "date_expiration")]
    pub expiration_date: Option<String>,
    #[serde(default, alias = "date_echeance")]
    pub due_date: Option<String>,

    #[serde(default, alias = "fournisseur_nom")]
    pub supplier_name: Option<String>,
    #[serde(default, alias = "fournisseur_adresse")]
    pub supplier_address: Option<String>,
    #[serde(default, alias = "fournisseur_ville")]
    pub supplier_city: Option<String>,
    #[serde(default, alias = "fournisseur_email")]
    pub supplier_email: Option<String>,
    #[serde(default, alias = "fournisseur_telephone")]
    pub supplier_phone: Option<String>,
    #[serde(default, alias = "fournisseur_siret")]
    pub supplier_tax_id: Option<String>,
    #[serde(default, alias = "fournisseur_tva")]
    pub supplier_vat_number: Option<String>,

    #[serde(default, alias = "client_nom")]
    pub client_name: Option<String>,
    #[serde(default, alias = "client_adresse")]
    pub client_address: Option<String>,
    #[serde(default, alias = "client_ville")]
    pub client_city: Option<String>,
    #[serde(default, alias = "client_siret")]
    pub client_tax_id: Option<String>,
    #[serde(default, alias = "client_tva")]
    pub client_vat_number: Option<String>,
    #[serde(default, alias = "client_telephone")]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,

    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default, alias = "banque_nom")]
    pub bank_name: Option<String>,
    #[serde(default, alias = "banque_iban")]
    pub bank_iban: Option<String>,
    #[serde(default, alias = "banque_bic")]
    pub bank_bic: Option<String>,
    #[serde(default, alias = "conditions_paiement")]
    pub payment_terms: Option<String>,
    #[serde(default, alias = "penalites_retard")]
    pub late_penalties: Option<String>,
    #[serde(default, alias = "texte_intro")]
    pub intro_text: Option<String>,
    #[serde(default, alias = "texte_conclusion")]
    pub closing_text: Option<String>,

    // Solo facturas
    #[serde(default, alias = "statut_paiement")]
    pub payment_status: Option<String>,
    #[serde(default, alias = "numero_commande")]
    pub purchase_order: Option<String>,
    #[serde(default, alias = "reference_devis")]
    pub quote_reference: Option<String>,
}

fn default_format() -> String {
    "pdf".to_string()
}

/// Cuerpo JSON de las rutas de generación y previsualización
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRequest {
    #[serde(flatten)]
    pub options: DocumentOptions,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub theme: Option<String>,
}

/// Convierte `Some("")` o `Some("   ")` en `None`
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
