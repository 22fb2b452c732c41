use common::error::ChargeError;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

/// Converts a currency amount to integer cents, rounding half away from zero.
/// Fails when the result is below one cent.
pub fn amount_to_cents(amount: Decimal) -> Result<i64, ChargeError> {
    let cents = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| ChargeError::InvalidAmount(format!("{} is out of range", amount)))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| ChargeError::InvalidAmount(format!("{} is out of range", amount)))?;

    if cents < 1 {
        return Err(ChargeError::InvalidAmount(format!(
            "{} rounds to {} cents",
            amount, cents
        )));
    }
    Ok(cents)
}

/// Keeps only the ASCII digits of `value`.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}
