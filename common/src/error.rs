use actix_web::HttpResponse;
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    // === APPLICATION ERRORS ===
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Charge failure, already worded for the customer.
    #[error("{0}")]
    PaymentFailed(String),

    #[error("{0}")]
    Internal(String),
}

/// Failures of a single gateway charge request.
#[derive(Error, Debug)]
pub enum ChargeError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Gateway client misconfigured: {0}")]
    Configuration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Gateway returned a non-JSON body (HTTP {status}): {reason}")]
    InvalidResponseBody { status: u16, reason: String },

    #[error("Gateway rejected the charge (HTTP {status}): {detail}")]
    GatewayRejected { status: u16, detail: String },

    #[error("No payment code in gateway response")]
    NoPaymentCodeFound,

    #[error("All {attempts} charge attempts failed: {last}")]
    FallbackExhausted {
        attempts: usize,
        #[source]
        last: Box<ChargeError>,
    },

    #[error("No charge attempts supplied")]
    NoAttempts,
}

impl ChargeError {
    /// Best-effort human-readable detail of the failure.
    ///
    /// Gateway rejections yield the gateway's own message, fallback exhaustion
    /// yields the detail of the last attempt.
    pub fn detail(&self) -> String {
        match self {
            ChargeError::GatewayRejected { detail, .. } => detail.clone(),
            ChargeError::FallbackExhausted { last, .. } => last.detail(),
            other => other.to_string(),
        }
    }
}

impl AppError {
    pub fn to_http_response(&self) -> HttpResponse {
        let is_dev = cfg!(debug_assertions);

        let to_internal_json = |err_msg: &str| {
            if is_dev {
                serde_json::json!({ "error": err_msg })
            } else {
                serde_json::json!({ "error": "Internal server error" })
            }
        };

        match self {
            // === CONVERSION ERRORS ===
            AppError::Reqwest(error) => {
                log::error!("Reqwest error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }

            // === APPLICATION ERRORS ===
            AppError::BadRequest(message) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
            }
            AppError::PaymentFailed(_) => {
                HttpResponse::BadGateway().json(serde_json::json!({ "error": self.to_string() }))
            }

            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_detail_is_last_attempt_detail() {
        let err = ChargeError::FallbackExhausted {
            attempts: 3,
            last: Box::new(ChargeError::GatewayRejected {
                status: 422,
                detail: "invalid, too low".to_string(),
            }),
        };
        assert_eq!(err.detail(), "invalid, too low");
        assert!(err.to_string().starts_with("All 3 charge attempts failed"));
    }

    #[test]
    fn payment_failure_maps_to_bad_gateway() {
        let res = AppError::PaymentFailed("Pagamento recusado".to_string()).to_http_response();
        assert_eq!(res.status(), actix_web::http::StatusCode::BAD_GATEWAY);

        let res = AppError::BadRequest("CPF".to_string()).to_http_response();
        assert_eq!(res.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
