use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    CreditCard,
}

/// One row of the `orders` table, flat and free of card data.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSnapshot {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub zip_code: String,
    pub address_street: String,
    pub address_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_neighborhood: Option<String>,
    pub address_city: String,
    pub address_state: String,
    pub created_at: DateTime<Utc>,
}

/// Card data that may be stored next to an order. Never holds more than the last 4 digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSnapshot {
    last_four: String,
    name: String,
}

impl CardSnapshot {
    pub fn new(number: &str, name: &str) -> Self {
        let digits: Vec<char> = number.chars().filter(|c| c.is_ascii_digit()).collect();
        let start = digits.len().saturating_sub(4);
        CardSnapshot {
            last_four: digits[start..].iter().collect(),
            name: name.trim().to_string(),
        }
    }

    pub fn last_four(&self) -> &str {
        &self.last_four
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Body sent to the store. Card columns are left out entirely when absent.
#[derive(Debug, Serialize)]
pub(crate) struct OrderRow<'a> {
    #[serde(flatten)]
    pub order: &'a OrderSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_name: Option<&'a str>,
}

impl<'a> OrderRow<'a> {
    pub fn new(order: &'a OrderSnapshot, card: Option<&'a CardSnapshot>) -> Self {
        OrderRow {
            order,
            card_number: card.map(CardSnapshot::last_four),
            card_name: card.map(CardSnapshot::name),
        }
    }
}
