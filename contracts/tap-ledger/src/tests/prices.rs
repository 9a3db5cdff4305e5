//! Tests for price tick recording and odds quotes.

use super::{advance_time, setup, START_TIME};
use crate::errors::ContractError;
use crate::odds::{MAX_ODDS, MIN_ODDS, PRICE_SCALE};
use crate::types::PriceTick;
use soroban_sdk::{testutils::Address as _, Address, Env};

const PRICE: u128 = 2000 * PRICE_SCALE;

#[test]
fn test_record_price() {
    let env = Env::default();
    let (client, authority, _token) = setup(&env);

    assert_eq!(client.get_latest_price(), None);

    assert!(client.record_price(&authority, &PRICE, &1_000));
    assert_eq!(client.get_latest_price(), Some(PriceTick {
        price: PRICE,
        timestamp: 1_000,
    }));

    assert!(client.record_price(&authority, &(PRICE + 5), &2_000));
    assert_eq!(client.get_latest_price().unwrap().price, PRICE + 5);
}

#[test]
fn test_stale_and_duplicate_ticks_ignored() {
    let env = Env::default();
    let (client, authority, _token) = setup(&env);

    client.record_price(&authority, &PRICE, &5_000);

    // Duplicate timestamp
    assert!(!client.record_price(&authority, &(PRICE + 1), &5_000));
    // Out of order
    assert!(!client.record_price(&authority, &(PRICE + 2), &4_000));

    assert_eq!(client.get_latest_price(), Some(PriceTick {
        price: PRICE,
        timestamp: 5_000,
    }));
}

#[test]
fn test_record_price_validation() {
    let env = Env::default();
    let (client, authority, _token) = setup(&env);

    let result = client.try_record_price(&authority, &0, &1_000);
    assert_eq!(result, Err(Ok(ContractError::InvalidPrice)));

    let other = Address::generate(&env);
    let result = client.try_record_price(&other, &PRICE, &1_000);
    assert_eq!(result, Err(Ok(ContractError::Unauthorized)));

    assert_eq!(client.get_latest_price(), None);
}

#[test]
fn test_quote_odds_requires_price() {
    let env = Env::default();
    let (client, _authority, _token) = setup(&env);

    let result = client.try_quote_odds(&(START_TIME + 30), &PRICE);
    assert_eq!(result, Err(Ok(ContractError::NoPriceFeed)));
}

#[test]
fn test_quote_odds_uses_latest_tick_and_ledger_time() {
    let env = Env::default();
    let (client, authority, _token) = setup(&env);

    client.record_price(&authority, &PRICE, &(START_TIME * 1_000));

    // Target is the current cell
    assert_eq!(client.quote_odds(&START_TIME, &PRICE), MIN_ODDS);
    // (1 + 30/30) * (1 + 0.5/0.5) = 4.0x
    assert_eq!(client.quote_odds(&(START_TIME + 30), &(PRICE + 5_000)), 400);

    // Same target gets cheaper as time passes
    advance_time(&env, 15);
    assert_eq!(client.quote_odds(&(START_TIME + 30), &(PRICE + 5_000)), 300);

    assert_eq!(client.quote_odds(&(START_TIME + 100_000), &(PRICE * 2)), MAX_ODDS);
}

#[test]
fn test_calculate_odds_matches_quote() {
    let env = Env::default();
    let (client, authority, _token) = setup(&env);

    client.record_price(&authority, &PRICE, &1);

    let target_time = START_TIME + 45;
    let target_price = PRICE - 2_500;
    assert_eq!(
        client.quote_odds(&target_time, &target_price),
        client.calculate_odds(&target_time, &target_price, &START_TIME, &PRICE),
    );
    assert_eq!(client.calculate_odds(&START_TIME, &PRICE, &START_TIME, &PRICE), MIN_ODDS);
}
