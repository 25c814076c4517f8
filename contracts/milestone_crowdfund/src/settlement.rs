//! Value movement in the settlement unit.
//!
//! Transfers go through the settlement token contract recorded at `init`.
//! Failures are caught and surfaced as [`Error::TransferFailed`] so the
//! caller gets a typed, retryable error; returning it aborts the invocation
//! and rolls back every write made before the transfer.

use soroban_sdk::{token, Address, Env};

use crate::errors::Error;
use crate::storage::get_settlement_token;

/// Move `amount` from `from` into the contract's escrow.
pub fn collect(env: &Env, from: &Address, amount: i128) -> Result<(), Error> {
    transfer(env, from, &env.current_contract_address(), amount)
}

/// Pay `amount` out of the contract's escrow to `to`.
pub fn disburse(env: &Env, to: &Address, amount: i128) -> Result<(), Error> {
    transfer(env, &env.current_contract_address(), to, amount)
}

fn transfer(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    let token_client = token::Client::new(env, &get_settlement_token(env)?);
    match token_client.try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}
