use common::{
    env_config::CheckoutConfig,
    error::{AppError, Res},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingOption {
    #[default]
    Free,
    Standard,
}

impl ShippingOption {
    pub fn price(&self, checkout: &CheckoutConfig) -> Decimal {
        match self {
            ShippingOption::Free => Decimal::ZERO,
            ShippingOption::Standard => checkout.shipping_price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl OrderSummary {
    /// The cart always holds the one configured product. Fails when the
    /// configured prices overflow.
    pub fn build(checkout: &CheckoutConfig, shipping: ShippingOption) -> Res<Self> {
        let items = vec![CartItem {
            id: checkout.product_id.clone(),
            name: checkout.product_name.clone(),
            price: checkout.product_price,
            quantity: 1,
        }];
        let overflow = || AppError::Internal("Order total out of range".to_string());
        let subtotal = items.iter().try_fold(Decimal::ZERO, |acc, item| {
            item.price
                .checked_mul(Decimal::from(item.quantity))
                .and_then(|line| acc.checked_add(line))
                .ok_or_else(overflow)
        })?;
        let shipping = shipping.price(checkout);
        let total = subtotal.checked_add(shipping).ok_or_else(overflow)?;

        Ok(OrderSummary {
            items,
            subtotal,
            shipping,
            total,
        })
    }
}
