//! Fixed-point odds and payout math.
//!
//! Odds are gross return multipliers scaled by [`ODDS_SCALE`]: a winning bet
//! of `amount` at odds `200` is credited `2 * amount`, stake included.
//! Prices are scaled by [`PRICE_SCALE`] and times are in seconds.

use crate::errors::ContractError;

pub const ODDS_SCALE: u32 = 100;
pub const MIN_ODDS: u32 = 120; // 1.2x
pub const MAX_ODDS: u32 = 10_000; // 100x

pub const PRICE_SCALE: u128 = 10_000;

/// Seconds of lead time that add 1.0x to the time multiplier
pub const TIME_NORMALIZATION: i128 = 30;
/// Price distance (0.5 at PRICE_SCALE) that adds 1.0x to the price multiplier
pub const PRICE_NORMALIZATION: u128 = 5_000;

/// Odds offered for a target cell `(target_time, target_price)` given the
/// current `(now_time, now_price)`.
///
/// `(1 + Δt / 30) * (1 + |Δp| / 0.5)`, clamped to `[MIN_ODDS, MAX_ODDS]`.
/// Targets at or before `now_time` collapse to `MIN_ODDS`.
pub fn calculate_odds(target_time: u64, target_price: u128, now_time: u64, now_price: u128) -> u32 {
    let max_ratio = (MAX_ODDS / ODDS_SCALE) as i128;

    // Each term saturates at MAX_ODDS on its own, which keeps the product small.
    let time_term = (TIME_NORMALIZATION + (target_time as i128 - now_time as i128))
        .clamp(0, TIME_NORMALIZATION * max_ratio);
    let price_term = PRICE_NORMALIZATION
        .saturating_add(target_price.abs_diff(now_price))
        .min(PRICE_NORMALIZATION * max_ratio as u128) as i128;

    let odds = ODDS_SCALE as i128 * time_term * price_term
        / (TIME_NORMALIZATION * PRICE_NORMALIZATION as i128);

    odds.clamp(MIN_ODDS as i128, MAX_ODDS as i128) as u32
}

/// Odds a bet may be opened with. Anything below 1.0x would pay less than the stake.
pub fn is_valid_odds(odds: u32) -> bool {
    (ODDS_SCALE..=MAX_ODDS).contains(&odds)
}

/// Amount credited for a winning bet, principal included.
pub fn gross_payout(amount: i128, odds: u32) -> Result<i128, ContractError> {
    amount
        .checked_mul(odds as i128)
        .ok_or(ContractError::ArithmeticOverflow)?
        .checked_div(ODDS_SCALE as i128)
        .ok_or(ContractError::ArithmeticOverflow)
}
