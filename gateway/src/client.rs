use std::{borrow::Cow, time::Duration};

use common::{
    env_config::{ContactPolicy, GatewayConfig},
    error::ChargeError,
};
use log::{info, warn};
use reqwest::{Client, header::ACCEPT};
use serde_json::Value;
use url::Url;

use crate::{
    dtos::charge::{ChargeAttempt, ChargeCustomer, ChargeRequest, ChargeResult, CustomerContact},
    misc::{
        locate::{parse_charge_response, rejection_detail},
        normalize::digits_only,
    },
    models::payload::TransactionPayload,
};

/// HTTP client of the PIX gateway.
///
/// Holds no state between calls: every `request_charge` is exactly one POST.
pub struct PixClient {
    client: Client,
    endpoint: Url,
    product_hash: Option<String>,
    contact_policy: ContactPolicy,
}

impl PixClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, ChargeError> {
        let base = config.base_url.trim_end_matches('/');
        let mut endpoint = Url::parse(&format!("{}/transactions", base)).map_err(|e| {
            ChargeError::Configuration(format!("Invalid gateway URL {}: {}", config.base_url, e))
        })?;
        // the gateway reads the credential from the query string, not from a header
        endpoint
            .query_pairs_mut()
            .append_pair("api_token", config.api_token.trim());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ChargeError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(PixClient {
            client,
            endpoint,
            product_hash: config.product_hash.clone(),
            contact_policy: config.contact_policy.clone(),
        })
    }

    /// Submits one charge and normalizes the gateway answer.
    pub async fn request_charge(&self, req: &ChargeRequest) -> Result<ChargeResult, ChargeError> {
        let customer = self.apply_contact_policy(&req.customer);
        let payload = TransactionPayload::new(req, &customer, self.product_hash.as_deref());

        info!(
            "Requesting PIX charge at {} offer={} amount_cents={}",
            self.endpoint.path(),
            req.offer_hash,
            req.amount_cents
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        let body: Value = serde_json::from_str(&raw).map_err(|e| {
            warn!(
                "Gateway answered HTTP {} with a non-JSON body for offer={}",
                status.as_u16(),
                req.offer_hash
            );
            ChargeError::InvalidResponseBody {
                status: status.as_u16(),
                reason: e.to_string(),
            }
        })?;

        if !status.is_success() {
            let detail = rejection_detail(&body, status.as_u16());
            warn!(
                "Gateway rejected offer={} with HTTP {}: {}",
                req.offer_hash,
                status.as_u16(),
                detail
            );
            return Err(ChargeError::GatewayRejected {
                status: status.as_u16(),
                detail,
            });
        }

        let result = parse_charge_response(&body).inspect_err(|_| {
            warn!("No payment code in gateway response for offer={}", req.offer_hash)
        })?;
        info!(
            "PIX charge created for offer={} reference_id={}",
            req.offer_hash, result.reference_id
        );
        Ok(result)
    }

    /// Tries each attempt in order and returns the first success.
    ///
    /// Attempts run one after the other and never twice. When all fail the
    /// error wraps the failure of the last one.
    pub async fn request_charge_with_fallback(
        &self,
        contact: &CustomerContact,
        attempts: &[ChargeAttempt],
    ) -> Result<ChargeResult, ChargeError> {
        let mut last = None;

        for (index, attempt) in attempts.iter().enumerate() {
            info!(
                "Charge attempt {}/{} offer={}",
                index + 1,
                attempts.len(),
                attempt.offer_hash
            );
            let outcome = match ChargeRequest::new(
                attempt.amount,
                contact,
                &attempt.offer_hash,
                &attempt.description,
            ) {
                Ok(req) => self.request_charge(&req).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(result) => return Ok(result),
                Err(e) => {
                    warn!("Charge attempt {} failed: {}", index + 1, e);
                    last = Some(e);
                }
            }
        }

        match last {
            Some(last) => Err(ChargeError::FallbackExhausted {
                attempts: attempts.len(),
                last: Box::new(last),
            }),
            None => Err(ChargeError::NoAttempts),
        }
    }

    fn apply_contact_policy<'a>(&self, customer: &'a ChargeCustomer) -> Cow<'a, ChargeCustomer> {
        match &self.contact_policy {
            ContactPolicy::PlaceholderPhone(placeholder) if customer.phone.is_empty() => {
                warn!("Customer left the phone blank, sending the configured placeholder");
                Cow::Owned(ChargeCustomer {
                    phone: digits_only(placeholder),
                    ..customer.clone()
                })
            }
            _ => Cow::Borrowed(customer),
        }
    }
}
