use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::error::{StoreError, StoreResult};
use crate::models::MonthKey;

/// Largest amount a single field may hold. Keeps every sum and percentage
/// far inside `Decimal` range.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Parse a user-typed amount such as `"1,250.50"` or `"$40"`.
/// Negative, empty, non-numeric and oversized input is rejected.
pub(crate) fn parse_amount(input: &str) -> StoreResult<Decimal> {
    let trimmed = input.trim();
    let without_symbol = trimmed
        .strip_prefix(|c: char| matches!(c, '$' | '¥' | '€' | '£'))
        .unwrap_or(trimmed);
    let cleaned: String = without_symbol
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    let amount =
        Decimal::from_str(&cleaned).map_err(|_| StoreError::InvalidAmount(input.to_string()))?;
    if (amount.is_sign_negative() && !amount.is_zero()) || amount > MAX_AMOUNT {
        return Err(StoreError::InvalidAmount(input.to_string()));
    }
    Ok(amount.normalize())
}

pub(crate) fn parse_month(input: &str) -> StoreResult<MonthKey> {
    MonthKey::from_str(input).map_err(|_| StoreError::InvalidMonth(input.to_string()))
}

pub(crate) fn parse_date(input: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| StoreError::InvalidDate(input.to_string()))
}
