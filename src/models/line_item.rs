use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_QUANTITY: i64 = 1;
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

fn default_quantity() -> i64 {
    DEFAULT_QUANTITY
}

fn default_tax_rate() -> Decimal {
    DEFAULT_TAX_RATE
}

/// Línea facturable. Los importes derivados nunca se guardan: se recalculan
/// en cada llamada a partir de los campos de entrada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    description: String,
    #[serde(default)]
    details: Vec<String>,
    #[serde(default = "default_quantity", alias = "quantite")]
    quantity: i64,
    #[serde(default, alias = "prix_unitaire")]
    unit_price: Decimal,
    #[serde(default = "default_tax_rate", alias = "tva_taux")]
    tax_rate: Decimal,
    #[serde(default, alias = "remise")]
    discount: Decimal,
}

impl LineItem {
    /// Línea con cantidad 1, precio 0, IVA 20 % y sin descuento
    pub fn new(description: impl Into<String>) -> Self {
        LineItem {
            description: description.into(),
            details: Vec::new(),
            quantity: DEFAULT_QUANTITY,
            unit_price: Decimal::ZERO,
            tax_rate: DEFAULT_TAX_RATE,
            discount: Decimal::ZERO,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = unit_price;
        self
    }

    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// `quantity * unit_price - discount`, sin redondeo
    pub fn net_amount(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price - self.discount
    }

    pub fn tax_amount(&self) -> Decimal {
        self.net_amount() * self.tax_rate / Decimal::ONE_HUNDRED
    }

    pub fn gross_amount(&self) -> Decimal {
        self.net_amount() + self.tax_amount()
    }

    /// Igual que `net_amount`, pero `None` si el importe desborda `Decimal`
    pub fn checked_net_amount(&self) -> Option<Decimal> {
        Decimal::from(self.quantity)
            .checked_mul(self.unit_price)?
            .checked_sub(self.discount)
    }

    pub fn checked_tax_amount(&self) -> Option<Decimal> {
        self.checked_net_amount()?
            .checked_mul(self.tax_rate)?
            .checked_div(Decimal::ONE_HUNDRED)
    }
}
