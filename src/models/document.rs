use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::core::{BankDetails, DocumentDefaults, DocumentError, DocumentResult};
use super::request::non_blank;
use super::{DocumentKind, DocumentOptions, LineItem, PaymentStatus};

pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Supplier {
    pub name: String,
    pub address: String,
    pub city: String,
    pub email: String,
    pub phone: String,
    pub tax_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Client {
    pub name: String,
    pub address: String,
    pub city: String,
    pub tax_id: String,
    pub vat_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Textos libres y referencias que solo afectan a la presentación
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presentation {
    pub logo_url: Option<String>,
    pub payment_terms: String,
    pub late_penalties: String,
    pub intro_text: Option<String>,
    pub closing_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentVariant {
    Quote {
        expiration_date: String,
    },
    Invoice {
        due_date: String,
        payment_status: PaymentStatus,
        purchase_order: Option<String>,
        quote_reference: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub total_net: Decimal,
    pub total_tax: Decimal,
    pub total_gross: Decimal,
}

/// Devis o factura: metadatos, líneas en orden de inserción y totales.
///
/// Los totales solo cambian al llamar `compute_totals`; añadir una línea no
/// los recalcula.
#[derive(Debug, Clone)]
pub struct DocumentAggregate {
    number: String,
    issue_date: String,
    variant: DocumentVariant,
    supplier: Supplier,
    client: Client,
    bank: BankDetails,
    presentation: Presentation,
    items: Vec<LineItem>,
    totals: Totals,
}

impl DocumentAggregate {
    pub fn new(
        kind: DocumentKind,
        options: DocumentOptions,
        defaults: &DocumentDefaults,
    ) -> DocumentResult<Self> {
        Self::new_at(kind, options, defaults, Local::now().date_naive())
    }

    /// Igual que `new` pero con la fecha del día fijada por el llamador
    pub fn new_at(
        kind: DocumentKind,
        options: DocumentOptions,
        defaults: &DocumentDefaults,
        today: NaiveDate,
    ) -> DocumentResult<Self> {
        let number = non_blank(options.number)
            .unwrap_or_else(|| generate_number(kind, today));
        let issue_date = non_blank(options.issue_date)
            .unwrap_or_else(|| today.format(DATE_FORMAT).to_string());

        let secondary = match kind {
            DocumentKind::Quote => options.expiration_date,
            DocumentKind::Invoice => options.due_date,
        };
        let secondary_date = non_blank(secondary)
            .unwrap_or_else(|| default_secondary_date(&issue_date, today, defaults.validity_days));

        let supplier_defaults = &defaults.supplier;
        let supplier = Supplier {
            name: or_default(options.supplier_name, &supplier_defaults.name),
            address: or_default(options.supplier_address, &supplier_defaults.address),
            city: or_default(options.supplier_city, &supplier_defaults.city),
            email: or_default(options.supplier_email, &supplier_defaults.email),
            phone: or_default(options.supplier_phone, &supplier_defaults.phone),
            tax_id: or_default(options.supplier_tax_id, &supplier_defaults.tax_id),
            vat_number: non_blank(options.supplier_vat_number)
                .or_else(|| non_blank(supplier_defaults.vat_number.clone())),
        };
        require(&supplier.name, "supplier name")?;
        require(&supplier.address, "supplier address")?;
        require(&supplier.city, "supplier city")?;
        require(&supplier.tax_id, "supplier tax id")?;

        let client = Client {
            name: required(options.client_name, "client name")?,
            address: required(options.client_address, "client address")?,
            city: required(options.client_city, "client city")?,
            tax_id: required(options.client_tax_id, "client tax id")?,
            vat_number: required(options.client_vat_number, "client vat number")?,
            phone: non_blank(options.client_phone),
            email: non_blank(options.client_email),
        };

        let bank = BankDetails {
            name: or_default(options.bank_name, &defaults.bank.name),
            iban: or_default(options.bank_iban, &defaults.bank.iban),
            bic: or_default(options.bank_bic, &defaults.bank.bic),
        };

        let presentation = Presentation {
            logo_url: non_blank(options.logo_url),
            payment_terms: or_default(options.payment_terms, &defaults.payment_terms),
            late_penalties: or_default(options.late_penalties, &defaults.late_penalties),
            intro_text: non_blank(options.intro_text),
            closing_text: non_blank(options.closing_text),
        };

        let variant = match kind {
            DocumentKind::Quote => DocumentVariant::Quote {
                expiration_date: secondary_date,
            },
            DocumentKind::Invoice => DocumentVariant::Invoice {
                due_date: secondary_date,
                payment_status: non_blank(options.payment_status)
                    .map(PaymentStatus::new)
                    .unwrap_or_default(),
                purchase_order: non_blank(options.purchase_order),
                quote_reference: non_blank(options.quote_reference),
            },
        };

        Ok(DocumentAggregate {
            number,
            issue_date,
            variant,
            supplier,
            client,
            bank,
            presentation,
            items: Vec::new(),
            totals: Totals::default(),
        })
    }

    pub fn add_item(&mut self, item: LineItem) {
        if item
            .checked_net_amount()
            .is_some_and(|net| net.is_sign_negative())
        {
            tracing::debug!(
                number = %self.number,
                description = item.description(),
                "negative line amount accepted"
            );
        }
        self.items.push(item);
    }

    /// Comprueba que ninguna línea ni suma desborde antes de `compute_totals`
    pub fn check_amounts(&self) -> DocumentResult<()> {
        let mut total_net = Decimal::ZERO;
        let mut total_tax = Decimal::ZERO;

        for item in &self.items {
            let out_of_range =
                || DocumentError::AmountOutOfRange(format!("line '{}'", item.description()));
            let net = item.checked_net_amount().ok_or_else(out_of_range)?;
            let tax = item.checked_tax_amount().ok_or_else(out_of_range)?;
            net.checked_add(tax).ok_or_else(out_of_range)?;

            total_net = total_net
                .checked_add(net)
                .ok_or_else(|| DocumentError::AmountOutOfRange("total net".to_string()))?;
            total_tax = total_tax
                .checked_add(tax)
                .ok_or_else(|| DocumentError::AmountOutOfRange("total tax".to_string()))?;
        }

        total_net
            .checked_add(total_tax)
            .ok_or_else(|| DocumentError::AmountOutOfRange("total gross".to_string()))?;
        Ok(())
    }

    /// Recalcula los tres totales a partir de las líneas actuales
    pub fn compute_totals(&mut self) {
        let total_net: Decimal = self.items.iter().map(LineItem::net_amount).sum();
        let total_tax: Decimal = self.items.iter().map(LineItem::tax_amount).sum();

        self.totals = Totals {
            total_net,
            total_tax,
            total_gross: total_net + total_tax,
        };
    }

    pub fn kind(&self) -> DocumentKind {
        match self.variant {
            DocumentVariant::Quote { .. } => DocumentKind::Quote,
            DocumentVariant::Invoice { .. } => DocumentKind::Invoice,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn issue_date(&self) -> &str {
        &self.issue_date
    }

    /// Fecha de expiración (devis) o de vencimiento (factura)
    pub fn secondary_date(&self) -> &str {
        match &self.variant {
            DocumentVariant::Quote { expiration_date } => expiration_date,
            DocumentVariant::Invoice { due_date, .. } => due_date,
        }
    }

    pub fn variant(&self) -> &DocumentVariant {
        &self.variant
    }

    pub fn supplier(&self) -> &Supplier {
        &self.supplier
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn bank(&self) -> &BankDetails {
        &self.bank
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("{}_{}.{}", self.kind().file_stem(), self.number, extension)
    }
}

/// `<prefijo>-<año>-<3 hex>`, p. ej. `D-2025-3fa`
pub fn generate_number(kind: DocumentKind, today: NaiveDate) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(3).collect();
    format!("{}-{}-{}", kind.number_prefix(), today.format("%Y"), suffix)
}

fn default_secondary_date(issue_date: &str, today: NaiveDate, validity_days: i64) -> String {
    let shift = |base: NaiveDate| {
        Duration::try_days(validity_days).and_then(|days| base.checked_add_signed(days))
    };

    // Fechas fuera del rango de chrono caen en hoy + validez
    NaiveDate::parse_from_str(issue_date, DATE_FORMAT)
        .ok()
        .and_then(shift)
        .or_else(|| shift(today))
        .unwrap_or(today)
        .format(DATE_FORMAT)
        .to_string()
}

fn or_default(value: Option<String>, default: &str) -> String {
    non_blank(value).unwrap_or_else(|| default.to_string())
}

fn required(value: Option<String>, field: &'static str) -> DocumentResult<String> {
    non_blank(value).ok_or(DocumentError::MissingRequiredField(field))
}

fn require(value: &str, field: &'static str) -> DocumentResult<()> {
    if value.trim().is_empty() {
        return Err(DocumentError::MissingRequiredField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn client_options() -> DocumentOptions {
        DocumentOptions {
            client_name: Some("CRINSTALLE".to_string()),
            client_address: Some("400 AVENUE GEORGES CLEMENCEAU".to_string()),
            client_city: Some("84300 CAVAILLON, FR".to_string()),
            client_tax_id: Some("952170736".to_string()),
            client_vat_number: Some("FR57952170736".to_string()),
            ..Default::default()
        }
    }

    fn quote() -> DocumentAggregate {
        DocumentAggregate::new_at(
            DocumentKind::Quote,
            client_options(),
            &DocumentDefaults::default(),
            today(),
        )
        .unwrap()
    }

    fn item(price: Decimal, discount: Decimal) -> LineItem {
        LineItem::new("Prestation")
            .with_unit_price(price)
            .with_discount(discount)
    }

    #[test]
    fn single_item_totals() {
        let mut doc = quote();
        doc.add_item(item(dec!(900), dec!(100)));
        doc.compute_totals();

        assert_eq!(doc.totals().total_net, dec!(800.00));
        assert_eq!(doc.totals().total_tax, dec!(160.00));
        assert_eq!(doc.totals().total_gross, dec!(960.00));
    }

    #[test]
    fn two_item_totals() {
        let mut doc = quote();
        doc.add_item(item(dec!(900), dec!(100)));
        doc.add_item(item(dec!(850), dec!(100)));
        doc.compute_totals();

        assert_eq!(doc.totals().total_net, dec!(1550.00));
        assert_eq!(doc.totals().total_tax, dec!(310.00));
        assert_eq!(doc.totals().total_gross, dec!(1860.00));
    }

    #[test]
    fn empty_document_totals_are_zero() {
        let mut doc = quote();
        doc.compute_totals();
        assert_eq!(*doc.totals(), Totals::default());
        assert_eq!(doc.totals().total_gross, Decimal::ZERO);
    }

    #[test]
    fn totals_only_change_on_recompute() {
        let mut doc = quote();
        doc.add_item(item(dec!(900), dec!(100)));
        doc.compute_totals();
        let before = *doc.totals();

        doc.add_item(item(dec!(850), dec!(100)));
        assert_eq!(*doc.totals(), before);

        doc.compute_totals();
        assert_eq!(doc.totals().total_net, dec!(1550));
        doc.compute_totals();
        assert_eq!(doc.totals().total_net, dec!(1550));
    }

    #[test]
    fn overflowing_line_is_out_of_range() {
        let mut doc = quote();
        doc.add_item(
            LineItem::new("Serveurs")
                .with_quantity(1000)
                .with_unit_price(dec!(10000000000000000000000000)),
        );

        let err = doc.check_amounts().unwrap_err();
        assert!(matches!(err, DocumentError::AmountOutOfRange(_)));
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "amount out of range: line 'Serveurs'");
    }

    #[test]
    fn overflowing_sum_is_out_of_range() {
        let mut doc = quote();
        let big = LineItem::new("Licence")
            .with_unit_price(Decimal::MAX)
            .with_tax_rate(Decimal::ZERO);
        doc.add_item(big.clone());
        assert!(doc.check_amounts().is_ok());

        doc.add_item(big);
        let err = doc.check_amounts().unwrap_err();
        assert_eq!(err.to_string(), "amount out of range: total net");
    }

    #[test]
    fn ordinary_amounts_pass_the_check() {
        let mut doc = quote();
        doc.add_item(item(dec!(900), dec!(100)));
        doc.add_item(item(dec!(-50), dec!(0)));
        assert!(doc.check_amounts().is_ok());
    }

    #[test]
    fn far_future_issue_date_falls_back_to_today() {
        let options = DocumentOptions {
            issue_date: Some(NaiveDate::MAX.format(DATE_FORMAT).to_string()),
            ..client_options()
        };
        let doc = DocumentAggregate::new_at(
            DocumentKind::Quote,
            options,
            &DocumentDefaults::default(),
            today(),
        )
        .unwrap();

        assert_eq!(doc.secondary_date(), "13/04/2025");
    }

    #[test]
    fn huge_validity_keeps_today() {
        assert_eq!(
            default_secondary_date("10/01/2025", today(), i64::MAX),
            "14/03/2025"
        );
    }

    #[test]
    fn missing_client_name_fails() {
        let options = DocumentOptions {
            client_name: None,
            ..client_options()
        };
        let err = DocumentAggregate::new_at(
            DocumentKind::Quote,
            options,
            &DocumentDefaults::default(),
            today(),
        )
        .unwrap_err();

        assert!(matches!(err, DocumentError::MissingRequiredField("client name")));
        assert_eq!(err.to_string(), "missing required field: client name");
    }

    #[test]
    fn blank_client_vat_number_fails() {
        let options = DocumentOptions {
            client_vat_number: Some("   ".to_string()),
            ..client_options()
        };
        let err = DocumentAggregate::new_at(
            DocumentKind::Invoice,
            options,
            &DocumentDefaults::default(),
            today(),
        )
        .unwrap_err();

        assert!(matches!(err, DocumentError::MissingRequiredField("client vat number")));
    }

    #[test]
    fn blank_supplier_default_fails() {
        let mut defaults = DocumentDefaults::default();
        defaults.supplier.tax_id = String::new();

        let err = DocumentAggregate::new_at(DocumentKind::Quote, client_options(), &defaults, today())
            .unwrap_err();
        assert!(matches!(err, DocumentError::MissingRequiredField("supplier tax id")));
    }

    #[test]
    fn identity_defaults_are_applied() {
        let doc = quote();

        assert!(doc.number().starts_with("D-2025-"));
        assert_eq!(doc.number().len(), "D-2025-".len() + 3);
        assert_eq!(doc.issue_date(), "14/03/2025");
        assert_eq!(doc.secondary_date(), "13/04/2025");
        assert_eq!(doc.supplier().name, "Infinytia");
        assert_eq!(doc.supplier().city, "75012 Paris, FR");
        assert_eq!(doc.kind(), DocumentKind::Quote);
    }

    #[test]
    fn expiration_follows_supplied_issue_date() {
        let options = DocumentOptions {
            issue_date: Some("01/01/2025".to_string()),
            ..client_options()
        };
        let doc = DocumentAggregate::new_at(
            DocumentKind::Quote,
            options,
            &DocumentDefaults::default(),
            today(),
        )
        .unwrap();

        assert_eq!(doc.secondary_date(), "31/01/2025");
    }

    #[test]
    fn unparseable_issue_date_is_kept_opaque() {
        let options = DocumentOptions {
            issue_date: Some("March 1st".to_string()),
            ..client_options()
        };
        let doc = DocumentAggregate::new_at(
            DocumentKind::Quote,
            options,
            &DocumentDefaults::default(),
            today(),
        )
        .unwrap();

        assert_eq!(doc.issue_date(), "March 1st");
        assert_eq!(doc.secondary_date(), "13/04/2025");
    }

    #[test]
    fn invoice_specific_fields() {
        let options = DocumentOptions {
            due_date: Some("30/04/2025".to_string()),
            expiration_date: Some("ignored".to_string()),
            purchase_order: Some("PO-77".to_string()),
            quote_reference: Some("D-2025-061".to_string()),
            ..client_options()
        };
        let doc = DocumentAggregate::new_at(
            DocumentKind::Invoice,
            options,
            &DocumentDefaults::default(),
            today(),
        )
        .unwrap();

        assert!(doc.number().starts_with("F-2025-"));
        assert_eq!(doc.secondary_date(), "30/04/2025");
        match doc.variant() {
            DocumentVariant::Invoice {
                payment_status,
                purchase_order,
                quote_reference,
                ..
            } => {
                assert_eq!(payment_status.as_str(), "pending");
                assert_eq!(purchase_order.as_deref(), Some("PO-77"));
                assert_eq!(quote_reference.as_deref(), Some("D-2025-061"));
            }
            other => panic!("expected invoice, got {:?}", other),
        }
    }

    #[test]
    fn items_keep_insertion_order() {
        let mut doc = quote();
        doc.add_item(LineItem::new("first"));
        doc.add_item(LineItem::new("second"));
        doc.add_item(LineItem::new("first"));

        let names: Vec<_> = doc.items().iter().map(LineItem::description).collect();
        assert_eq!(names, vec!["first", "second", "first"]);
    }

    #[test]
    fn file_name_uses_kind_and_number() {
        let options = DocumentOptions {
            number: Some("F-2025-001".to_string()),
            ..client_options()
        };
        let doc = DocumentAggregate::new_at(
            DocumentKind::Invoice,
            options,
            &DocumentDefaults::default(),
            today(),
        )
        .unwrap();

        assert_eq!(doc.file_name("pdf"), "facture_F-2025-001.pdf");
    }
}
