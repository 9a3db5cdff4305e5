//! Error codes returned by the betting ledger contract.

use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    // Market setup
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Records
    AlreadyExists = 3,
    AccountNotFound = 4,
    BetNotFound = 5,

    // Bet and balance validation
    InsufficientBalance = 6,
    InvalidTimestamp = 7,
    InvalidBetAmount = 8,
    InvalidOdds = 9,
    MarketNotActive = 10,

    // Settlement
    BetNotActive = 11,
    BetNotExpired = 12,

    Unauthorized = 13,
    ArithmeticOverflow = 14,

    // Price feed and configuration
    InvalidPrice = 15,
    InvalidConfig = 16,
    NoPriceFeed = 17,

    // House bankroll
    InsufficientLiquidity = 18,
}
