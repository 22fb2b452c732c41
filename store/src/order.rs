use std::time::Duration;

use common::{
    env_config::StoreConfig,
    error::{AppError, Res},
};
use log::{error, info, warn};
use reqwest::{Client, Response, StatusCode, header};
use serde_json::json;
use url::Url;

use crate::{
    dtos::order::SaveOutcome,
    models::order::{CardSnapshot, OrderRow, OrderSnapshot},
};

/// Writes placed orders to the REST data store.
pub struct OrderRecorder {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl OrderRecorder {
    pub fn new(config: &StoreConfig) -> Res<Self> {
        let base = config.base_url.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{}/rest/v1/orders", base)).map_err(|e| {
            AppError::Internal(format!("Invalid store URL {}: {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(OrderRecorder {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    /// Saves an order, optionally with card data.
    ///
    /// Never returns an error: transport failures, timeouts and rejections
    /// become a failed `SaveOutcome`, so a store outage cannot block the payment.
    pub async fn save_order(
        &self,
        order: &OrderSnapshot,
        card: Option<&CardSnapshot>,
    ) -> SaveOutcome {
        match self.try_save(order, card).await {
            Ok(()) => {
                info!(
                    "Order saved for {} ({:?})",
                    order.customer_email, order.payment_method
                );
                SaveOutcome::saved()
            }
            Err(e) => {
                error!("Failed to save order at {}: {}", self.endpoint, e);
                SaveOutcome::failed(e.to_string())
            }
        }
    }

    async fn try_save(&self, order: &OrderSnapshot, card: Option<&CardSnapshot>) -> Res<()> {
        let mut response = self.post(&OrderRow::new(order, card)).await?;

        // the table may not have the card columns
        if response.status() == StatusCode::BAD_REQUEST && card.is_some() {
            warn!("Order store rejected the order with card fields, retrying without them");
            response = self.post(&OrderRow::new(order, None)).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let error_response = response
                .json::<serde_json::Value>()
                .await
                .unwrap_or(json!({ "message": "Erro desconhecido" }));
            let message = error_response["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!("Erro {}: Falha ao salvar pedido", status.as_u16())
                });
            return Err(AppError::Internal(message));
        }

        Ok(())
    }

    async fn post(&self, row: &OrderRow<'_>) -> Res<Response> {
        self.client
            .post(self.endpoint.clone())
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(AppError::from)
    }
}
