use serde::Serialize;

use crate::dtos::charge::{ChargeCustomer, ChargeRequest};

const PAYMENT_METHOD: &str = "pix";
const TRANSACTION_ORIGIN: &str = "api";

/// Body of `POST /transactions`.
#[derive(Debug, Serialize)]
pub struct TransactionPayload<'a> {
    pub amount: i64,
    pub offer_hash: &'a str,
    pub payment_method: &'static str,
    pub customer: PayloadCustomer<'a>,
    pub cart: [CartItem<'a>; 1],
    pub installments: u8,
    pub expire_in_days: u8,
    pub transaction_origin: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PayloadCustomer<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub document: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CartItem<'a> {
    pub product_hash: &'a str,
    pub title: &'a str,
    pub price: i64,
    pub quantity: u32,
    pub operation_type: u8,
    pub tangible: bool,
}

impl<'a> TransactionPayload<'a> {
    /// `product_hash` falls back to the offer hash when the gateway has no separate product.
    pub fn new(
        req: &'a ChargeRequest,
        customer: &'a ChargeCustomer,
        product_hash: Option<&'a str>,
    ) -> Self {
        TransactionPayload {
            amount: req.amount_cents,
            offer_hash: &req.offer_hash,
            payment_method: PAYMENT_METHOD,
            customer: PayloadCustomer {
                name: &customer.name,
                email: &customer.email,
                phone_number: &customer.phone,
                document: &customer.document,
            },
            cart: [CartItem {
                product_hash: product_hash.unwrap_or(&req.offer_hash),
                title: &req.description,
                price: req.amount_cents,
                quantity: 1,
                operation_type: 1,
                tangible: true,
            }],
            installments: 1,
            expire_in_days: 1,
            transaction_origin: TRANSACTION_ORIGIN,
        }
    }
}
