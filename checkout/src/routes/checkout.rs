use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::{env_config::Config, error::Res, http::Success};
use gateway::PixClient;
use store::OrderRecorder;

use crate::{
    dtos::checkout::{CardCheckoutRequest, PixCheckoutRequest, SummaryQuery},
    models::cart::OrderSummary,
    services,
};

/// Returns the cart with subtotal, shipping and total for the chosen shipping option.
///
/// # Input
/// - `shipping`: query parameter, `free` (default) or `standard`
///
/// # Output
/// - Success: `{ items, subtotal, shipping, total }`
#[get("/summary")]
pub async fn get_summary(
    query: web::Query<SummaryQuery>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    Success::ok(OrderSummary::build(&config.checkout, query.shipping)?)
}

/// Generates a PIX charge for the order and records the order.
///
/// # Input
/// - `personal`: `name`, `email`, `phone`, `cpf` (required)
/// - `address`: `zip_code`, `street`, `number`, `neighborhood`, `city`, `state`
/// - `shipping`: `free` or `standard`
///
/// # Output
/// - Success: payment view (`payment_code` or `redirect_url`, `qr_image_source`,
///   `reference_id`), the charged `amount` and whether the order was recorded
/// - Error: 400 when the CPF is missing, 502 with a customer-facing message
///   when the gateway refuses or cannot be reached
#[post("/pix")]
pub async fn post_pix(
    req: web::Json<PixCheckoutRequest>,
    config: web::Data<Arc<Config>>,
    gateway: web::Data<Arc<PixClient>>,
    store: web::Data<Arc<OrderRecorder>>,
) -> Res<impl Responder> {
    let response =
        services::checkout::process_pix(&gateway, &store, &config, req.into_inner()).await?;
    Success::ok(response)
}

/// Records a card order and answers with the recovery PIX offer.
///
/// Same body as `/pix` plus `card`: `number` and `name`. Other card fields are
/// ignored and only the last 4 card digits are stored. The response comes after the
/// recovery delay and has `card_declined` set.
#[post("/card")]
pub async fn post_card(
    req: web::Json<CardCheckoutRequest>,
    config: web::Data<Arc<Config>>,
    gateway: web::Data<Arc<PixClient>>,
    store: web::Data<Arc<OrderRecorder>>,
) -> Res<impl Responder> {
    let response =
        services::checkout::process_card(&gateway, &store, &config, req.into_inner()).await?;
    Success::ok(response)
}
