#![no_std]
//! Custodial betting ledger for tap-to-predict price markets.
//!
//! Users hold a proxy balance in the contract, open time-boxed bets against a
//! locked-in odds multiplier, and the market authority settles each bet once
//! after expiry.

mod contract;
mod errors;
pub mod odds;
mod types;

#[cfg(test)]
mod tests;

pub use contract::{TapLedgerContract, TapLedgerContractClient, DEFAULT_MAX_DURATION, DEFAULT_MIN_BET};
pub use errors::ContractError;
pub use types::{Bet, BetLimits, BetStatus, DataKey, Market, PlayerStats, PriceTick, ProxyAccount};
