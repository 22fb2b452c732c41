use common::error::{AppError, ChargeError};

/// Gateway detail that means the offer and the amount do not agree on the gateway side.
pub const MISMATCH_SENTINEL: &str = "mismatch";

const CONFIGURATION_MESSAGE: &str =
    "Erro de configuração no pagamento. Por favor, tente novamente mais tarde.";
const GENERIC_MESSAGE: &str =
    "Ocorreu um erro ao processar seu pagamento. Verifique seus dados.";
const NETWORK_MESSAGE: &str =
    "Não foi possível conectar ao serviço de pagamento. Tente novamente em instantes.";
const NO_CODE_MESSAGE: &str = "Não foi possível gerar o código PIX. Tente novamente.";

/// Message shown to the customer for a failed charge.
///
/// Gateway rejections are shown as the gateway worded them, except when the
/// detail carries the mismatch sentinel.
pub fn user_message(err: &ChargeError) -> String {
    match err {
        ChargeError::GatewayRejected { .. } | ChargeError::FallbackExhausted { .. } => {
            let detail = err.detail();
            if detail.to_lowercase().contains(MISMATCH_SENTINEL) {
                CONFIGURATION_MESSAGE.to_string()
            } else if detail.trim().is_empty() {
                GENERIC_MESSAGE.to_string()
            } else {
                detail
            }
        }
        ChargeError::NetworkFailure(_) => NETWORK_MESSAGE.to_string(),
        ChargeError::InvalidResponseBody { .. } | ChargeError::NoPaymentCodeFound => {
            NO_CODE_MESSAGE.to_string()
        }
        ChargeError::Configuration(_) => CONFIGURATION_MESSAGE.to_string(),
        ChargeError::InvalidAmount(_) | ChargeError::NoAttempts => GENERIC_MESSAGE.to_string(),
    }
}

pub fn charge_failure(err: ChargeError) -> AppError {
    log::error!("Charge failed: {}", err);
    AppError::PaymentFailed(user_message(&err))
}
