use common::error::ChargeError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::misc::normalize::{amount_to_cents, digits_only};

/// Customer contact data as typed on the storefront, masks included.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// CPF, with or without punctuation.
    pub document: String,
}

/// Customer data as the gateway receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document: String,
}

impl From<&CustomerContact> for ChargeCustomer {
    fn from(contact: &CustomerContact) -> Self {
        ChargeCustomer {
            name: contact.name.trim().to_string(),
            email: contact.email.trim().to_string(),
            phone: digits_only(&contact.phone),
            document: digits_only(&contact.document),
        }
    }
}

/// Normalized inputs of one charge attempt.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub amount_cents: i64,
    pub customer: ChargeCustomer,
    pub offer_hash: String,
    pub description: String,
}

impl ChargeRequest {
    /// Builds a request from a currency amount. A document that is not
    /// 11 digits long is kept, the gateway validates it.
    pub fn new(
        amount: Decimal,
        contact: &CustomerContact,
        offer_hash: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ChargeError> {
        Ok(ChargeRequest {
            amount_cents: amount_to_cents(amount)?,
            customer: contact.into(),
            offer_hash: offer_hash.into(),
            description: description.into(),
        })
    }
}

/// One entry of an ordered fallback list.
#[derive(Debug, Clone)]
pub struct ChargeAttempt {
    pub offer_hash: String,
    pub description: String,
    pub amount: Decimal,
}

impl ChargeAttempt {
    pub fn new(
        offer_hash: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        ChargeAttempt {
            offer_hash: offer_hash.into(),
            description: description.into(),
            amount,
        }
    }
}

/// How the customer pays a created charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentCode {
    /// PIX copy-paste payload, always starts with `000201`.
    Pix(String),
    /// No copy-paste code, the customer pays on the gateway's page.
    Redirect { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeResult {
    pub payment_code: PaymentCode,
    /// Image URL or `data:` URI. Empty when the gateway sent none.
    pub qr_image_source: String,
    pub reference_id: String,
}

impl ChargeResult {
    pub fn pix_code(&self) -> Option<&str> {
        match &self.payment_code {
            PaymentCode::Pix(code) => Some(code),
            PaymentCode::Redirect { .. } => None,
        }
    }

    pub fn redirect_url(&self) -> Option<&str> {
        match &self.payment_code {
            PaymentCode::Redirect { url } => Some(url),
            PaymentCode::Pix(_) => None,
        }
    }
}
