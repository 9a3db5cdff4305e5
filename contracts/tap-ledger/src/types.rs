//! Type definitions for the tap-trading betting ledger.

use soroban_sdk::{contracttype, Address};

/// Storage keys for contract data
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Market,
    Limits,
    Account(Address),
    Bet(Address, u64), // (owner, client-chosen bet timestamp)
    Stats(Address),
    LatestPrice,
}

/// Lifecycle of a single wager. `Won` and `Lost` are terminal.
#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum BetStatus {
    Open = 0,
    Won = 1,
    Lost = 2,
}

/// Custodial balance held on behalf of one owner.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct ProxyAccount {
    pub owner: Address,
    pub balance: i128,
    pub total_deposited: i128,
    pub total_withdrawn: i128,
    pub total_bets: u64,
}

impl ProxyAccount {
    pub fn new(owner: Address) -> Self {
        ProxyAccount {
            owner,
            balance: 0,
            total_deposited: 0,
            total_withdrawn: 0,
            total_bets: 0,
        }
    }
}

/// Market singleton: fee and volume aggregates plus the house bankroll.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Market {
    pub authority: Address,       // Settles bets and collects fees
    pub token: Address,           // Asset held in custody for every account
    pub total_volume: i128,       // Sum of every wager ever opened
    pub total_fees: i128,         // Lost wagers not yet withdrawn by the authority
    pub house_liquidity: i128,    // Bankroll free to back new bets
    pub reserved_liquidity: i128, // Bankroll locked for the net win of open bets
    pub is_active: bool,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Bet {
    pub user: Address,
    pub timestamp: u64,
    pub odds: u32,         // Gross return multiplier scaled by ODDS_SCALE (200 = 2.0x)
    pub expiry_time: u64,  // Ledger timestamp after which the bet can be settled
    pub amount: i128,      // Escrowed at open time
    pub status: BetStatus,
    pub opened_at: u64,
    pub payout: i128,      // Credited amount, set when the bet is won
}

impl Bet {
    pub fn is_active(&self) -> bool {
        self.status == BetStatus::Open
    }
}

/// Authority-managed limits applied when a bet is opened
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct BetLimits {
    pub min_bet: i128,
    pub max_duration: u64, // Max seconds between open time and expiry
}

#[contracttype]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerStats {
    pub total_wins: u32,
    pub total_losses: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_wagered: i128,
    pub total_payout: i128,
}

/// Latest price observed from the feed
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct PriceTick {
    pub price: u128,    // Scaled to 4 decimals (e.g., 2000.5 → 20005000)
    pub timestamp: u64, // Feed timestamp in milliseconds
}
