use std::{env, str::FromStr, sync::Arc};

use rust_decimal::Decimal;

#[derive(Clone, Debug)]
/// Configuration struct for the checkout server.
///
/// This struct holds all the parameters required to run the server:
/// HTTP binding, CORS and logging preferences, the payment gateway,
/// the order store, the offer table and the storefront catalog.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (the storefront page).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// File the logger appends to.
    pub log_file: String,
    /// Payment gateway endpoint and credential.
    pub gateway: GatewayConfig,
    /// Order store endpoint and credential.
    pub store: StoreConfig,
    /// Gateway offer hashes per price tier.
    pub offers: OfferTable,
    /// Product, shipping and card recovery settings.
    pub checkout: CheckoutConfig,
}

#[derive(Clone, Debug)]
/// `GatewayConfig` holds everything the charge requester needs to reach the gateway.
pub struct GatewayConfig {
    /// Base URL, `/transactions` is appended to it.
    pub base_url: String,
    /// Credential sent as the `api_token` query parameter.
    pub api_token: String,
    /// Product hash placed in the cart item. The offer hash is used when unset.
    pub product_hash: Option<String>,
    /// Timeout applied to every gateway call, in seconds.
    pub timeout_secs: u64,
    /// What to do with contact data the customer left blank.
    pub contact_policy: ContactPolicy,
}

/// Rule applied to customer contact data before it is sent to the gateway.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ContactPolicy {
    /// Send exactly what the customer entered.
    #[default]
    Verbatim,
    /// Send the given digits when the entered phone has none.
    PlaceholderPhone(String),
}

#[derive(Clone, Debug)]
/// `StoreConfig` points at the REST data store that keeps placed orders.
pub struct StoreConfig {
    pub base_url: String,
    /// Sent both as `apikey` and as bearer token.
    pub api_key: String,
    /// Timeout applied to every store call, in seconds.
    pub timeout_secs: u64,
}

/// Price tiers configured on the gateway side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OfferTier {
    FreeShipping,
    PaidShipping,
    Discounted,
}

#[derive(Clone, Debug)]
/// Static table of gateway offer hashes, one per tier.
pub struct OfferTable {
    pub free_shipping: String,
    pub paid_shipping: String,
    pub discounted: String,
}

impl OfferTable {
    pub fn hash(&self, tier: OfferTier) -> &str {
        match tier {
            OfferTier::FreeShipping => &self.free_shipping,
            OfferTier::PaidShipping => &self.paid_shipping,
            OfferTier::Discounted => &self.discounted,
        }
    }

    /// Picks the tier matching the shipping cost of the order.
    pub fn tier_for_shipping(shipping: Decimal) -> OfferTier {
        if shipping.is_zero() {
            OfferTier::FreeShipping
        } else {
            OfferTier::PaidShipping
        }
    }
}

#[derive(Clone, Debug)]
/// The one product sold by the storefront and the amounts around it.
pub struct CheckoutConfig {
    pub product_id: String,
    pub product_name: String,
    pub product_price: Decimal,
    /// Price of standard shipping. Free shipping is always zero.
    pub shipping_price: Decimal,
    /// Line item title sent with regular PIX charges.
    pub charge_title: String,
    /// Amount of the PIX offered after a declined card.
    pub recovery_amount: Decimal,
    pub recovery_title: String,
    /// Delay before the recovery PIX is requested, in milliseconds.
    pub recovery_delay_ms: u64,
}

impl GatewayConfig {
    /// Creates a `GatewayConfig` with default timeout and verbatim contact data.
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        GatewayConfig {
            base_url: base_url.into(),
            api_token: api_token.into(),
            product_hash: None,
            timeout_secs: 30,
            contact_policy: ContactPolicy::Verbatim,
        }
    }

    /// Creates a new `GatewayConfig` instance from environment variables.
    ///
    /// - `GATEWAY_API_TOKEN`: Required.
    /// - `GATEWAY_URL`, `GATEWAY_PRODUCT_HASH`, `GATEWAY_TIMEOUT_SECS`,
    ///   `GATEWAY_PLACEHOLDER_PHONE`: Optional.
    ///
    /// # Panics
    ///
    /// This function will panic if `GATEWAY_API_TOKEN` is not set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let contact_policy = match env::var("GATEWAY_PLACEHOLDER_PHONE") {
            Ok(phone) if !phone.trim().is_empty() => ContactPolicy::PlaceholderPhone(phone),
            _ => ContactPolicy::Verbatim,
        };

        GatewayConfig {
            base_url: env::var("GATEWAY_URL")
                .unwrap_or_else(|_| "https://api.invictuspay.app.br/api/public/v1".to_string()),
            api_token: env::var("GATEWAY_API_TOKEN")
                .expect("GATEWAY_API_TOKEN must be set")
                .trim()
                .to_string(),
            product_hash: env::var("GATEWAY_PRODUCT_HASH")
                .ok()
                .filter(|hash| !hash.is_empty()),
            timeout_secs: env::var("GATEWAY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            contact_policy,
        }
    }
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        StoreConfig {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_secs: 10,
        }
    }

    /// `STORE_TIMEOUT_SECS` is optional (default: 10).
    ///
    /// # Panics
    ///
    /// This function will panic if `STORE_URL` or `STORE_API_KEY` is not set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        StoreConfig {
            base_url: env::var("STORE_URL").expect("STORE_URL must be set"),
            api_key: env::var("STORE_API_KEY").expect("STORE_API_KEY must be set"),
            timeout_secs: env::var("STORE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        }
    }
}

impl Default for OfferTable {
    fn default() -> Self {
        OfferTable {
            free_shipping: "gmvowuyoib".to_string(),
            paid_shipping: "ld4kumu4vp".to_string(),
            discounted: "offer_5990_discount".to_string(),
        }
    }
}

impl OfferTable {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = OfferTable::default();
        OfferTable {
            free_shipping: env::var("OFFER_FREE_SHIPPING").unwrap_or(defaults.free_shipping),
            paid_shipping: env::var("OFFER_PAID_SHIPPING").unwrap_or(defaults.paid_shipping),
            discounted: env::var("OFFER_DISCOUNTED").unwrap_or(defaults.discounted),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            product_id: "fadas-kit-artesanal".to_string(),
            product_name: "FADA ARTESANAL".to_string(),
            product_price: Decimal::new(7990, 2),
            shipping_price: Decimal::new(990, 2),
            charge_title: "Kit Fadas Artesanais".to_string(),
            recovery_amount: Decimal::new(5990, 2),
            recovery_title: "OFERTA EXCLUSIVA - RECUPERAÇÃO".to_string(),
            recovery_delay_ms: 2000,
        }
    }
}

impl CheckoutConfig {
    /// Reads the catalog from the environment, keeping defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = CheckoutConfig::default();
        CheckoutConfig {
            product_id: env::var("PRODUCT_ID").unwrap_or(defaults.product_id),
            product_name: env::var("PRODUCT_NAME").unwrap_or(defaults.product_name),
            product_price: decimal_var("PRODUCT_PRICE").unwrap_or(defaults.product_price),
            shipping_price: decimal_var("SHIPPING_PRICE").unwrap_or(defaults.shipping_price),
            charge_title: env::var("CHARGE_TITLE").unwrap_or(defaults.charge_title),
            recovery_amount: decimal_var("RECOVERY_AMOUNT").unwrap_or(defaults.recovery_amount),
            recovery_title: env::var("RECOVERY_TITLE").unwrap_or(defaults.recovery_title),
            recovery_delay_ms: env::var("RECOVERY_DELAY_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .unwrap_or(defaults.recovery_delay_ms),
        }
    }
}

fn decimal_var(key: &str) -> Option<Decimal> {
    env::var(key).ok().and_then(|v| Decimal::from_str(v.trim()).ok())
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: `development` or `production`
    /// - `GATEWAY_API_TOKEN`: gateway credential (via `GatewayConfig::from_env()`)
    /// - `STORE_URL`, `STORE_API_KEY`: order store (via `StoreConfig::from_env()`)
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `LOG_FILE`: Log file path (default: "checkout.log")
    /// - Offer and catalog settings (see `OfferTable` and `CheckoutConfig`)
    ///
    /// # Panics
    ///
    /// This function will panic if required environment variables are missing.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "checkout.log".to_string()),
            gateway: GatewayConfig::from_env(),
            store: StoreConfig::from_env(),
            offers: OfferTable::from_env(),
            checkout: CheckoutConfig::from_env(),
        })
    }
}
