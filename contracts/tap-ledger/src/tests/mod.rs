//! Test modules for the tap-trading betting ledger contract.

mod prices;

use crate::contract::{TapLedgerContract, TapLedgerContractClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{StellarAssetClient, TokenClient},
    Address, Env,
};

/// Ledger time every test starts from
pub(crate) const START_TIME: u64 = 1_700_000_000;

/// House bankroll funded by `setup`
pub(crate) const HOUSE_BANKROLL: i128 = 10_000_000;

/// Registers the contract and a fresh token, initializes the market and
/// funds the house with `HOUSE_BANKROLL`.
/// Returns (client, authority, token).
pub(crate) fn setup(env: &Env) -> (TapLedgerContractClient<'_>, Address, Address) {
    let (client, authority, token) = setup_unfunded(env);

    mint(env, &token, &authority, HOUSE_BANKROLL);
    client.fund_house(&authority, &HOUSE_BANKROLL);

    (client, authority, token)
}

/// Same as `setup` but with an empty house bankroll
pub(crate) fn setup_unfunded(env: &Env) -> (TapLedgerContractClient<'_>, Address, Address) {
    env.mock_all_auths();
    env.ledger().with_mut(|li| {
        li.timestamp = START_TIME;
    });

    let contract_id = env.register(TapLedgerContract, ());
    let client = TapLedgerContractClient::new(env, &contract_id);

    let authority = Address::generate(env);
    let issuer = Address::generate(env);
    let token = env.register_stellar_asset_contract_v2(issuer).address();

    client.initialize_market(&authority, &token);

    (client, authority, token)
}

pub(crate) fn mint(env: &Env, token: &Address, to: &Address, amount: i128) {
    StellarAssetClient::new(env, token).mint(to, &amount);
}

pub(crate) fn token_balance(env: &Env, token: &Address, id: &Address) -> i128 {
    TokenClient::new(env, token).balance(id)
}

/// New user with a proxy account holding `amount`
pub(crate) fn funded_user(
    env: &Env,
    client: &TapLedgerContractClient<'_>,
    token: &Address,
    amount: i128,
) -> Address {
    let user = Address::generate(env);
    mint(env, token, &user, amount);
    client.create_account(&user);
    client.deposit(&user, &user, &amount);
    user
}

pub(crate) fn advance_time(env: &Env, seconds: u64) {
    env.ledger().with_mut(|li| {
        li.timestamp += seconds;
    });
}
