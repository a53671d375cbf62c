use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::BankDetails;
use super::document::{Client, DocumentAggregate, DocumentVariant, Supplier, Totals};
use super::{DocumentKind, LineItem};

/// Representación JSON de un documento ya calculado, agrupada por bloques
#[derive(Debug, Clone, Serialize)]
pub struct DocumentPreview {
    pub identity: IdentityPreview,
    pub supplier: Supplier,
    pub client: Client,
    pub bank: BankDetails,
    pub items: Vec<ItemPreview>,
    pub totals: TotalsPreview,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityPreview {
    pub kind: DocumentKind,
    pub number: String,
    pub issue_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_reference: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemPreview {
    pub description: String,
    pub details: Vec<String>,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsPreview {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_net: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_gross: Decimal,
}

impl From<&LineItem> for ItemPreview {
    fn from(item: &LineItem) -> Self {
        ItemPreview {
            description: item.description().to_string(),
            details: item.details().to_vec(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
            tax_rate: item.tax_rate(),
            discount: item.discount(),
            net_amount: item.net_amount(),
            tax_amount: item.tax_amount(),
            gross_amount: item.gross_amount(),
        }
    }
}

impl From<&Totals> for TotalsPreview {
    fn from(totals: &Totals) -> Self {
        TotalsPreview {
            total_net: totals.total_net,
            total_tax: totals.total_tax,
            total_gross: totals.total_gross,
        }
    }
}

impl DocumentAggregate {
    /// Vista previa serializable; refleja los totales del último `compute_totals`
    pub fn to_serializable(&self) -> DocumentPreview {
        let mut identity = IdentityPreview {
            kind: self.kind(),
            number: self.number().to_string(),
            issue_date: self.issue_date().to_string(),
            expiration_date: None,
            due_date: None,
            payment_status: None,
            purchase_order: None,
            quote_reference: None,
        };

        match self.variant() {
            DocumentVariant::Quote { expiration_date } => {
                identity.expiration_date = Some(expiration_date.clone());
            }
            DocumentVariant::Invoice {
                due_date,
                payment_status,
                purchase_order,
                quote_reference,
            } => {
                identity.due_date = Some(due_date.clone());
                identity.payment_status = Some(payment_status.to_string());
                identity.purchase_order = purchase_order.clone();
                identity.quote_reference = quote_reference.clone();
            }
        }

        DocumentPreview {
            identity,
            supplier: self.supplier().clone(),
            client: self.client().clone(),
            bank: self.bank().clone(),
            items: self.items().iter().map(ItemPreview::from).collect(),
            totals: TotalsPreview::from(self.totals()),
        }
    }
}
