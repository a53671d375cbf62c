use serde::Serialize;

use crate::models::{DocumentAggregate, DocumentKind, DocumentVariant, LineItem, StatusTone};
use super::helpers::{format_money, format_rate};
use super::theme::{Theme, OVERDUE_COLOR, PAID_COLOR};

/// Proyección de un documento lista para maquetar: textos, importes
/// formateados y colores. La comparten los generadores PDF y DOCX.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub kind: DocumentKind,
    pub title: &'static str,
    pub number: String,
    pub info_rows: Vec<InfoRow>,
    pub supplier: PartyView,
    pub client: PartyView,
    pub intro_text: Option<String>,
    pub items: Vec<ItemView>,
    pub totals: TotalsView,
    pub payment_terms: Option<String>,
    pub late_penalties: Option<String>,
    pub bank_rows: Vec<InfoRow>,
    pub closing_text: Option<String>,
    pub signature: bool,
    pub footer: FooterView,
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize)]
pub struct InfoRow {
    pub label: String,
    pub value: String,
    pub color: Option<String>,
}

impl InfoRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        InfoRow {
            label: label.to_string(),
            value: value.into(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PartyView {
    pub heading: &'static str,
    pub name: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub description: String,
    pub details: Vec<String>,
    pub quantity: String,
    pub unit_price: String,
    pub tax_rate: String,
    pub net_amount: String,
    pub discount: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    pub tax_label: String,
    pub total_net: String,
    pub total_tax: String,
    pub total_gross: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FooterView {
    pub email: String,
    pub legal: String,
}

impl DocumentView {
    pub fn new(document: &DocumentAggregate, theme: &Theme) -> Self {
        let kind = document.kind();
        let supplier = document.supplier();
        let client = document.client();
        let presentation = document.presentation();

        let mut info_rows = vec![InfoRow::new(
            match kind {
                DocumentKind::Quote => "Numéro de devis",
                DocumentKind::Invoice => "Numéro de facture",
            },
            document.number(),
        )];
        info_rows.push(InfoRow::new("Date d'émission", document.issue_date()));

        match document.variant() {
            DocumentVariant::Quote { expiration_date } => {
                info_rows.push(InfoRow::new("Date d'expiration", expiration_date.as_str()));
            }
            DocumentVariant::Invoice {
                due_date,
                payment_status,
                purchase_order,
                quote_reference,
            } => {
                info_rows.push(InfoRow::new("Date d'échéance", due_date.as_str()));
                if let Some(po) = purchase_order {
                    info_rows.push(InfoRow::new("N° de commande", po.as_str()));
                }
                if let Some(reference) = quote_reference {
                    info_rows.push(InfoRow::new("Réf. devis", reference.as_str()));
                }
                let color = match payment_status.tone() {
                    StatusTone::Paid => PAID_COLOR,
                    StatusTone::Overdue => OVERDUE_COLOR,
                    StatusTone::Neutral => theme.primary,
                };
                info_rows.push(InfoRow {
                    label: "Statut".to_string(),
                    value: payment_status.to_string(),
                    color: Some(color.to_string()),
                });
            }
        }

        let mut supplier_lines = vec![supplier.address.clone(), supplier.city.clone()];
        if !supplier.email.is_empty() {
            supplier_lines.push(format!("Email: {}", supplier.email));
        }
        if !supplier.phone.is_empty() {
            supplier_lines.push(format!("Tél: {}", supplier.phone));
        }
        supplier_lines.push(format!("SIRET: {}", supplier.tax_id));

        let mut client_lines = vec![
            client.address.clone(),
            client.city.clone(),
            format!("SIRET: {}", client.tax_id),
            format!("N° TVA: {}", client.vat_number),
        ];
        if let Some(phone) = &client.phone {
            client_lines.push(format!("Tél: {}", phone));
        }
        if let Some(email) = &client.email {
            client_lines.push(format!("Email: {}", email));
        }

        let bank = document.bank();
        let bank_rows = if bank.is_empty() {
            Vec::new()
        } else {
            vec![
                InfoRow::new("Banque", bank.name.as_str()),
                InfoRow::new("IBAN", bank.iban.as_str()),
                InfoRow::new("BIC", bank.bic.as_str()),
            ]
        };

        let totals = document.totals();
        let vat_number = supplier
            .vat_number
            .clone()
            .unwrap_or_else(|| format!("FR{}", supplier.tax_id.chars().take(9).collect::<String>()));

        DocumentView {
            kind,
            title: kind.title(),
            number: document.number().to_string(),
            info_rows,
            supplier: PartyView {
                heading: "ÉMETTEUR",
                name: supplier.name.clone(),
                lines: supplier_lines,
            },
            client: PartyView {
                heading: "CLIENT",
                name: client.name.clone(),
                lines: client_lines,
            },
            intro_text: presentation.intro_text.clone(),
            items: document.items().iter().map(ItemView::from).collect(),
            totals: TotalsView {
                tax_label: tax_label(document.items()),
                total_net: format_money(totals.total_net),
                total_tax: format_money(totals.total_tax),
                total_gross: format_money(totals.total_gross),
            },
            payment_terms: non_empty(&presentation.payment_terms),
            late_penalties: non_empty(&presentation.late_penalties),
            bank_rows,
            closing_text: presentation.closing_text.clone(),
            signature: kind == DocumentKind::Quote,
            footer: FooterView {
                email: supplier.email.clone(),
                legal: format!(
                    "{} - SIRET: {} - TVA: {}",
                    supplier.name, supplier.tax_id, vat_number
                ),
            },
            theme: theme.clone(),
        }
    }
}

impl From<&LineItem> for ItemView {
    fn from(item: &LineItem) -> Self {
        ItemView {
            description: item.description().to_string(),
            details: item.details().to_vec(),
            quantity: item.quantity().to_string(),
            unit_price: format_money(item.unit_price()),
            tax_rate: format_rate(item.tax_rate()),
            net_amount: format_money(item.net_amount()),
            discount: (item.discount() > rust_decimal::Decimal::ZERO)
                .then(|| format!("-{}", format_money(item.discount()))),
        }
    }
}

/// `TVA (20%)` si todas las líneas comparten tipo, si no `TVA`
fn tax_label(items: &[LineItem]) -> String {
    match items.split_first() {
        Some((first, rest)) if rest.iter().all(|i| i.tax_rate() == first.tax_rate()) => {
            format!("TVA ({}%)", first.tax_rate().normalize())
        }
        _ => "TVA".to_string(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}
