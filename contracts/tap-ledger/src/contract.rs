//! Core contract implementation for the tap-trading betting ledger.

use soroban_sdk::{contract, contractimpl, symbol_short, token, Address, Env};

use crate::errors::ContractError;
use crate::odds;
use crate::types::{
    Bet, BetLimits, BetStatus, DataKey, Market, PlayerStats, PriceTick, ProxyAccount,
};

pub const DEFAULT_MIN_BET: i128 = 1;
pub const DEFAULT_MAX_DURATION: u64 = 86_400;

#[contract]
pub struct TapLedgerContract;

#[contractimpl]
impl TapLedgerContract {
    /// Creates the market singleton (one-time only).
    /// `token` is the asset every proxy account is denominated in.
    pub fn initialize_market(env: Env, authority: Address, token: Address) -> Result<(), ContractError> {
        authority.require_auth();

        if env.storage().persistent().has(&DataKey::Market) {
            return Err(ContractError::AlreadyInitialized);
        }

        let market = Market {
            authority: authority.clone(),
            token: token.clone(),
            total_volume: 0,
            total_fees: 0,
            house_liquidity: 0,
            reserved_liquidity: 0,
            is_active: true,
        };
        env.storage().persistent().set(&DataKey::Market, &market);

        #[allow(deprecated)]
        env.events().publish(
            (symbol_short!("market"), symbol_short!("init")),
            (authority, token),
        );

        Ok(())
    }

    pub fn get_market(env: Env) -> Option<Market> {
        env.storage().persistent().get(&DataKey::Market)
    }

    /// Opens or closes the market for new bets (authority only).
    /// Settlement and withdrawals are unaffected.
    pub fn set_market_active(env: Env, caller: Address, is_active: bool) -> Result<(), ContractError> {
        caller.require_auth();

        let mut market = Self::_market(&env)?;
        if caller != market.authority {
            return Err(ContractError::Unauthorized);
        }

        market.is_active = is_active;
        env.storage().persistent().set(&DataKey::Market, &market);

        #[allow(deprecated)]
        env.events().publish(
            (symbol_short!("market"), symbol_short!("status")),
            is_active,
        );

        Ok(())
    }

    /// Sets the minimum wager and the longest allowed bet duration (authority only)
    pub fn set_limits(
        env: Env,
        caller: Address,
        min_bet: i128,
        max_duration: u64,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let market = Self::_market(&env)?;
        if caller != market.authority {
            return Err(ContractError::Unauthorized);
        }

        if min_bet <= 0 || max_duration == 0 {
            return Err(ContractError::InvalidConfig);
        }

        let limits = BetLimits { min_bet, max_duration };
        env.storage().persistent().set(&DataKey::Limits, &limits);

        #[allow(deprecated)]
        env.events().publish(
            (symbol_short!("market"), symbol_short!("limits")),
            (min_bet, max_duration),
        );

        Ok(())
    }

    pub fn get_limits(env: Env) -> BetLimits {
        env.storage()
            .persistent()
            .get(&DataKey::Limits)
            .unwrap_or(BetLimits {
                min_bet: DEFAULT_MIN_BET,
                max_duration: DEFAULT_MAX_DURATION,
            })
    }

    /// Sends accumulated house fees to the authority. Returns the fees left.
    pub fn withdraw_owner_fees(env: Env, caller: Address, amount: i128) -> Result<i128, ContractError> {
        caller.require_auth();

        let mut market = Self::_market(&env)?;
        if caller != market.authority {
            return Err(ContractError::Unauthorized);
        }

        if amount <= 0 {
            return Err(ContractError::InvalidBetAmount);
        }
        if market.total_fees < amount {
            return Err(ContractError::InsufficientBalance);
        }

        market.total_fees = market.total_fees
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        Self::_pay_out(&env, &market.token, &caller, amount);
        env.storage().persistent().set(&DataKey::Market, &market);

        #[allow(deprecated)]
        env.events().publish(
            (symbol_short!("market"), symbol_short!("fees")),
            (caller, amount, market.total_fees),
        );

        Ok(market.total_fees)
    }

    /// Adds tokens to the house bankroll that backs winning payouts (authority only).
    /// Returns the free bankroll.
    pub fn fund_house(env: Env, caller: Address, amount: i128) -> Result<i128, ContractError> {
        caller.require_auth();

        let mut market = Self::_market(&env)?;
        if caller != market.authority {
            return Err(ContractError::Unauthorized);
        }

        if amount <= 0 {
            return Err(ContractError::InvalidBetAmount);
        }

        market.house_liquidity = market.house_liquidity
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        token::TokenClient::new(&env, &market.token).transfer(
            &caller,
            &env.current_contract_address(),
            &amount,
        );
        env.storage().persistent().set(&DataKey::Market, &market);

        #[allow(deprecated)]
        env.events().publish(
            (symbol_short!("house"), symbol_short!("funded")),
            (amount, market.house_liquidity),
        );

        Ok(market.house_liquidity)
    }

    /// Takes free bankroll back out of custody (authority only).
    /// Liquidity reserved for open bets cannot be withdrawn.
    pub fn withdraw_house(env: Env, caller: Address, amount: i128) -> Result<i128, ContractError> {
        caller.require_auth();

        let mut market = Self::_market(&env)?;
        if caller != market.authority {
            return Err(ContractError::Unauthorized);
        }

        if amount <= 0 {
            return Err(ContractError::InvalidBetAmount);
        }
        if market.house_liquidity < amount {
            return Err(ContractError::InsufficientLiquidity);
        }

        market.house_liquidity = market.house_liquidity
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        Self::_pay_out(&env, &market.token, &caller, amount);
        env.storage().persistent().set(&DataKey::Market, &market);

        #[allow(deprecated)]
        env.events().publish(
            (symbol_short!("house"), symbol_short!("withdrawn")),
            (amount, market.house_liquidity),
        );

        Ok(market.house_liquidity)
    }

    /// Creates an empty proxy account for `owner`
    pub fn create_account(env: Env, owner: Address) -> Result<(), ContractError> {
        owner.require_auth();

        let key = DataKey::Account(owner.clone());
        if env.storage().persistent().has(&key) {
            return Err(ContractError::AlreadyExists);
        }

        env.storage().persistent().set(&key, &ProxyAccount::new(owner.clone()));

        #[allow(deprecated)]
        env.events().publish(
            (symbol_short!("account"), symbol_short!("created")),
            owner,
        );

        Ok(())
    }

    pub fn has_account(env: Env, owner: Address) -> bool {
        env.storage().persistent().has(&DataKey::Account(owner))
    }

    pub fn get_account(env: Env, owner: Address) -> Option<ProxyAccount> {
        env.storage().persistent().get(&DataKey::Account(owner))
    }

    /// Returns the owner's custodial balance (0 if no account)
    pub fn balance(env: Env, owner: Address) -> i128 {
        Self::get_account(env, owner).map_or(0, |account| account.balance)
    }

    /// Moves `amount` of the market token into custody. Returns the new balance.
    pub fn deposit(env: Env, caller: Address, owner: Address, amount: i128) -> Result<i128, ContractError> {
        caller.require_auth();

        if caller != owner {
            return Err(ContractError::Unauthorized);
        }
        if amount <= 0 {
            return Err(ContractError::InvalidBetAmount);
        }

        let market = Self::_market(&env)?;
        let mut account = Self::_account(&env, &owner)?;

        account.balance = account.balance
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        account.total_deposited = account.total_deposited
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        token::TokenClient::new(&env, &market.token).transfer(
            &owner,
            &env.current_contract_address(),
            &amount,
        );
        Self::_set_account(&env, &account);

        #[allow(deprecated)]
        env.events().publish(
            (symbol_short!("account"), symbol_short!("deposit")),
            (owner, amount, account.balance),
        );

        Ok(account.balance)
    }

    /// Returns `amount` from custody to the owner. Returns the new balance.
    pub fn withdraw(env: Env, caller: Address, owner: Address, amount: i128) -> Result<i128, ContractError> {
        caller.require_auth();

        if caller != owner {
            return Err(ContractError::Unauthorized);
        }
        if amount <= 0 {
            return Err(ContractError::InvalidBetAmount);
        }

        let market = Self::_market(&env)?;
        let mut account = Self::_account(&env, &owner)?;

        if account.balance < amount {
            return Err(ContractError::InsufficientBalance);
        }

        account.balance = account.balance
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        account.total_withdrawn = account.total_withdrawn
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        Self::_pay_out(&env, &market.token, &owner, amount);
        Self::_set_account(&env, &account);

        #[allow(deprecated)]
        env.events().publish(
            (symbol_short!("account"), symbol_short!("withdraw")),
            (owner, amount, account.balance),
        );

        Ok(account.balance)
    }

    /// Opens a bet keyed by `(owner, timestamp)` and escrows `amount` from the
    /// owner's balance. The net win the bet could pay is reserved from the
    /// house bankroll. A settled bet's key can be reused; its record is replaced.
    /// odds: gross multiplier scaled by 100 (e.g., 2.0x → 200)
    pub fn open_bet(
        env: Env,
        owner: Address,
        timestamp: u64,
        odds: u32,
        expiry_time: u64,
        amount: i128,
    ) -> Result<Bet, ContractError> {
        owner.require_auth();

        let mut market = Self::_market(&env)?;
        if !market.is_active {
            return Err(ContractError::MarketNotActive);
        }

        let limits = Self::get_limits(env.clone());
        if amount <= 0 || amount < limits.min_bet {
            return Err(ContractError::InvalidBetAmount);
        }

        if !odds::is_valid_odds(odds) {
            return Err(ContractError::InvalidOdds);
        }

        let now = env.ledger().timestamp();
        if expiry_time <= now || expiry_time - now > limits.max_duration {
            return Err(ContractError::InvalidTimestamp);
        }

        let mut account = Self::_account(&env, &owner)?;
        if account.balance < amount {
            return Err(ContractError::InsufficientBalance);
        }

        let bet_key = DataKey::Bet(owner.clone(), timestamp);
        if let Some(existing) = env.storage().persistent().get::<_, Bet>(&bet_key) {
            if existing.is_active() {
                return Err(ContractError::AlreadyExists);
            }
        }

        let reserve = Self::_net_win(amount, odds)?;
        if market.house_liquidity < reserve {
            return Err(ContractError::InsufficientLiquidity);
        }
        market.house_liquidity = market.house_liquidity
            .checked_sub(reserve)
            .ok_or(ContractError::ArithmeticOverflow)?;
        market.reserved_liquidity = market.reserved_liquidity
            .checked_add(reserve)
            .ok_or(ContractError::ArithmeticOverflow)?;

        account.balance = account.balance
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        account.total_bets = account.total_bets
            .checked_add(1)
            .ok_or(ContractError::ArithmeticOverflow)?;
        market.total_volume = market.total_volume
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        let mut stats = Self::get_player_stats(env.clone(), owner.clone());
        stats.total_wagered = stats.total_wagered
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        let bet = Bet {
            user: owner.clone(),
            timestamp,
            odds,
            expiry_time,
            amount,
            status: BetStatus::Open,
            opened_at: now,
            payout: 0,
        };

        Self::_set_account(&env, &account);
        env.storage().persistent().set(&DataKey::Market, &market);
        env.storage().persistent().set(&DataKey::Stats(owner.clone()), &stats);
        env.storage().persistent().set(&bet_key, &bet);

        #[allow(deprecated)]
        env.events().publish(
            (symbol_short!("bet"), symbol_short!("opened")),
            (owner, timestamp, amount, odds, expiry_time),
        );

        Ok(bet)
    }

    pub fn get_bet(env: Env, owner: Address, timestamp: u64) -> Option<Bet> {
        env.storage().persistent().get(&DataKey::Bet(owner, timestamp))
    }

    /// Settles an expired bet with the outcome supplied by the authority.
    /// Winners are credited `amount * odds / 100`, stake plus the reserved net win.
    /// Lost wagers become house fees and the reservation returns to the bankroll.
    /// Returns the amount credited to the owner.
    pub fn settle_bet(
        env: Env,
        caller: Address,
        owner: Address,
        timestamp: u64,
        is_won: bool,
    ) -> Result<i128, ContractError> {
        caller.require_auth();

        let mut market = Self::_market(&env)?;
        if caller != market.authority {
            return Err(ContractError::Unauthorized);
        }

        let bet_key = DataKey::Bet(owner.clone(), timestamp);
        let mut bet: Bet = env.storage()
            .persistent()
            .get(&bet_key)
            .ok_or(ContractError::BetNotFound)?;

        if !bet.is_active() {
            return Err(ContractError::BetNotActive);
        }
        if env.ledger().timestamp() < bet.expiry_time {
            return Err(ContractError::BetNotExpired);
        }

        let mut account = Self::_account(&env, &owner)?;
        let mut stats = Self::get_player_stats(env.clone(), owner.clone());

        let reserve = Self::_net_win(bet.amount, bet.odds)?;
        market.reserved_liquidity = market.reserved_liquidity
            .checked_sub(reserve)
            .ok_or(ContractError::ArithmeticOverflow)?;

        if is_won {
            let payout = odds::gross_payout(bet.amount, bet.odds)?;
            account.balance = account.balance
                .checked_add(payout)
                .ok_or(ContractError::ArithmeticOverflow)?;
            stats.total_payout = stats.total_payout
                .checked_add(payout)
                .ok_or(ContractError::ArithmeticOverflow)?;
            Self::_record_win(&mut stats);

            bet.status = BetStatus::Won;
            bet.payout = payout;
        } else {
            market.total_fees = market.total_fees
                .checked_add(bet.amount)
                .ok_or(ContractError::ArithmeticOverflow)?;
            market.house_liquidity = market.house_liquidity
                .checked_add(reserve)
                .ok_or(ContractError::ArithmeticOverflow)?;
            Self::_record_loss(&mut stats);

            bet.status = BetStatus::Lost;
        }

        // Status flip and funds move together
        env.storage().persistent().set(&bet_key, &bet);
        Self::_set_account(&env, &account);
        env.storage().persistent().set(&DataKey::Market, &market);
        env.storage().persistent().set(&DataKey::Stats(owner.clone()), &stats);

        let outcome = if is_won { symbol_short!("won") } else { symbol_short!("lost") };
        #[allow(deprecated)]
        env.events().publish(
            (symbol_short!("bet"), outcome),
            (owner, timestamp, bet.amount, bet.payout),
        );

        Ok(bet.payout)
    }

    /// Returns user statistics (wins, losses, streaks, volume)
    pub fn get_player_stats(env: Env, owner: Address) -> PlayerStats {
        env.storage()
            .persistent()
            .get(&DataKey::Stats(owner))
            .unwrap_or_default()
    }

    /// Records a price tick from the feed (authority only).
    /// Ticks not newer than the stored one are ignored and return false.
    pub fn record_price(env: Env, caller: Address, price: u128, timestamp: u64) -> Result<bool, ContractError> {
        caller.require_auth();

        let market = Self::_market(&env)?;
        if caller != market.authority {
            return Err(ContractError::Unauthorized);
        }

        if price == 0 {
            return Err(ContractError::InvalidPrice);
        }

        if let Some(latest) = Self::get_latest_price(env.clone()) {
            if timestamp <= latest.timestamp {
                return Ok(false);
            }
        }

        env.storage()
            .persistent()
            .set(&DataKey::LatestPrice, &PriceTick { price, timestamp });

        #[allow(deprecated)]
        env.events().publish(
            (symbol_short!("price"), symbol_short!("tick")),
            (price, timestamp),
        );

        Ok(true)
    }

    pub fn get_latest_price(env: Env) -> Option<PriceTick> {
        env.storage().persistent().get(&DataKey::LatestPrice)
    }

    /// Odds for a target cell against the ledger clock and the latest tick
    pub fn quote_odds(env: Env, target_time: u64, target_price: u128) -> Result<u32, ContractError> {
        let tick = Self::get_latest_price(env.clone()).ok_or(ContractError::NoPriceFeed)?;

        Ok(odds::calculate_odds(
            target_time,
            target_price,
            env.ledger().timestamp(),
            tick.price,
        ))
    }

    /// Pure odds calculation, exposed for clients that track their own price
    pub fn calculate_odds(
        _env: Env,
        target_time: u64,
        target_price: u128,
        now_time: u64,
        now_price: u128,
    ) -> u32 {
        odds::calculate_odds(target_time, target_price, now_time, now_price)
    }
}

impl TapLedgerContract {
    fn _market(env: &Env) -> Result<Market, ContractError> {
        env.storage()
            .persistent()
            .get(&DataKey::Market)
            .ok_or(ContractError::NotInitialized)
    }

    fn _account(env: &Env, owner: &Address) -> Result<ProxyAccount, ContractError> {
        env.storage()
            .persistent()
            .get(&DataKey::Account(owner.clone()))
            .ok_or(ContractError::AccountNotFound)
    }

    fn _set_account(env: &Env, account: &ProxyAccount) {
        let key = DataKey::Account(account.owner.clone());
        env.storage().persistent().set(&key, account);
    }

    /// Every balance, fee and reservation is backed by custody, so callers
    /// only check their own ledger figure before paying out.
    fn _pay_out(env: &Env, token: &Address, to: &Address, amount: i128) {
        token::TokenClient::new(env, token).transfer(&env.current_contract_address(), to, &amount);
    }

    /// Part of a winning payout above the stake
    fn _net_win(amount: i128, odds: u32) -> Result<i128, ContractError> {
        odds::gross_payout(amount, odds)?
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)
    }

    pub(crate) fn _record_win(stats: &mut PlayerStats) {
        stats.total_wins = stats.total_wins.saturating_add(1);
        stats.current_streak = stats.current_streak.saturating_add(1);

        if stats.current_streak > stats.best_streak {
            stats.best_streak = stats.current_streak;
        }
    }

    pub(crate) fn _record_loss(stats: &mut PlayerStats) {
        stats.total_losses = stats.total_losses.saturating_add(1);
        stats.current_streak = 0;
    }
}
