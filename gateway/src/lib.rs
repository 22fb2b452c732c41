pub mod client;

pub mod dtos {
    pub mod charge;
}

pub mod models {
    pub mod payload;
}

pub mod misc {
    pub mod locate;
    pub mod normalize;
}

pub use client::PixClient;
pub use dtos::charge::{
    ChargeAttempt, ChargeCustomer, ChargeRequest, ChargeResult, CustomerContact, PaymentCode,
};
