use gateway::{ChargeResult, CustomerContact};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    misc::{
        mask::{format_cpf, format_phone},
        qr::display_qr_source,
    },
    models::cart::ShippingOption,
};

#[derive(Debug, Clone, Deserialize)]
pub struct PersonalData {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub cpf: String,
}

impl PersonalData {
    pub fn contact(&self) -> CustomerContact {
        CustomerContact {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            document: self.cpf.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressData {
    pub zip_code: String,
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct PixCheckoutRequest {
    pub personal: PersonalData,
    pub address: AddressData,
    #[serde(default)]
    pub shipping: ShippingOption,
}

/// Only what gets recorded. Expiry, CVV and installments are ignored if sent.
#[derive(Debug, Deserialize)]
pub struct CardDetails {
    pub number: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CardCheckoutRequest {
    pub personal: PersonalData,
    pub address: AddressData,
    #[serde(default)]
    pub shipping: ShippingOption,
    pub card: CardDetails,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub shipping: ShippingOption,
}

/// What the storefront needs to display the payment step.
#[derive(Debug, Serialize)]
pub struct PaymentView {
    pub payment_code: Option<String>,
    pub redirect_url: Option<String>,
    pub qr_image_source: String,
    pub reference_id: String,
}

impl From<&ChargeResult> for PaymentView {
    fn from(result: &ChargeResult) -> Self {
        PaymentView {
            payment_code: result.pix_code().map(str::to_string),
            redirect_url: result.redirect_url().map(str::to_string),
            qr_image_source: display_qr_source(result),
            reference_id: result.reference_id.clone(),
        }
    }
}

/// Customer data echoed back with the storefront masks applied.
#[derive(Debug, Serialize)]
pub struct CustomerEcho {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
}

impl From<&PersonalData> for CustomerEcho {
    fn from(personal: &PersonalData) -> Self {
        CustomerEcho {
            name: personal.name.trim().to_string(),
            email: personal.email.trim().to_string(),
            phone: format_phone(&personal.phone),
            cpf: format_cpf(&personal.cpf),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub payment: PaymentView,
    pub customer: CustomerEcho,
    /// Amount of the PIX charge.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub order_saved: bool,
    /// Set when the card was refused and a recovery PIX was issued instead.
    pub card_declined: bool,
}
