use std::sync::Arc;

use common::{env_config::StoreConfig, error::Res};

pub mod order;

pub mod models {
    pub mod order;
}

pub mod dtos {
    pub mod order;
}

pub use dtos::order::SaveOutcome;
pub use models::order::{CardSnapshot, OrderSnapshot, PaymentMethod};
pub use order::OrderRecorder;

pub fn setup(config: &StoreConfig) -> Res<Arc<OrderRecorder>> {
    Ok(Arc::new(OrderRecorder::new(config)?))
}
