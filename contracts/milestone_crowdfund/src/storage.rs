//! # Storage
//!
//! Provides typed helpers over the three Soroban storage tiers used by the
//! crowdfund contract:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key               | Type      | Description                           |
//! |-------------------|-----------|---------------------------------------|
//! | `CampaignCount`   | `u64`     | Auto-increment campaign ID counter    |
//! | `SettlementToken` | `Address` | Token contract of the settlement unit |
//! | `Admin`           | `Address` | Account that initialised the contract |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                          | Type             | Description                   |
//! |------------------------------|------------------|-------------------------------|
//! | `CampConfig(id)`             | `CampaignConfig` | Immutable campaign config     |
//! | `CampState(id)`              | `CampaignState`  | Mutable totals and flags      |
//! | `Milestone(id, index)`       | `Milestone`      | One tranche                   |
//! | `Donation(id, donor)`        | `i128`           | Donor's current balance       |
//! | `Donors(id)`                 | `Vec<Address>`   | Ordered, de-duplicated roster |
//! | `Voted(id, index, voter)`    | `bool`           | Voter marker per milestone    |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! ## Temporary storage
//!
//! | Key        | Type   | Description                                  |
//! |------------|--------|----------------------------------------------|
//! | `Lock(id)` | `bool` | Held by [`crate::guard::CampaignLock`]       |
//!
//! Voted-sets are flattened into one marker entry per voter instead of a map
//! nested inside the milestone, so voting never rewrites a growing collection.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::errors::Error;
use crate::types::{Campaign, CampaignConfig, CampaignState, Milestone};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Global auto-increment counter for campaign IDs (Instance).
    CampaignCount,
    /// Settlement token contract address (Instance).
    SettlementToken,
    /// Account that signed `init` (Instance).
    Admin,
    /// Immutable campaign configuration keyed by ID (Persistent).
    CampConfig(u64),
    /// Mutable campaign state keyed by ID (Persistent).
    CampState(u64),
    /// Milestone keyed by campaign ID and index (Persistent).
    Milestone(u64, u32),
    /// Donor balance keyed by campaign ID and donor (Persistent).
    Donation(u64, Address),
    /// Donor roster keyed by campaign ID (Persistent).
    Donors(u64),
    /// "Has voted" marker keyed by campaign ID, milestone index and voter (Persistent).
    Voted(u64, u32, Address),
    /// Per-campaign reentrancy lock (Temporary).
    Lock(u64),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Atomically reads, increments, and stores the campaign counter.
/// Returns the ID to use for the *current* campaign (pre-increment value).
pub fn get_and_increment_campaign_id(env: &Env) -> Result<u64, Error> {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::CampaignCount)
        .unwrap_or(0);
    let next = current.checked_add(1).ok_or(Error::Overflow)?;
    env.storage()
        .instance()
        .set(&DataKey::CampaignCount, &next);
    Ok(current)
}

/// Number of campaigns created so far.
pub fn campaign_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::CampaignCount)
        .unwrap_or(0)
}

pub fn has_settlement_token(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::SettlementToken)
}

pub fn set_settlement_token(env: &Env, token: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::SettlementToken, token);
    bump_instance(env);
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    bump_instance(env);
}

pub fn get_admin(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

pub fn get_settlement_token(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::SettlementToken)
        .ok_or(Error::NotInitialized)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn set_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    bump_persistent(env, key);
}

/// Save the config, the initial state and an empty roster for a new campaign.
pub fn save_new_campaign(env: &Env, config: &CampaignConfig, state: &CampaignState) {
    set_persistent(env, &DataKey::CampConfig(config.id), config);
    set_persistent(env, &DataKey::CampState(config.id), state);
    set_persistent(env, &DataKey::Donors(config.id), &Vec::<Address>::new(env));
}

/// Load the full `Campaign` by combining config and state.
pub fn load_campaign(env: &Env, id: u64) -> Result<Campaign, Error> {
    let (config, state) = load_campaign_pair(env, id)?;
    Ok(Campaign::from_parts(config, state))
}

/// Load config and state together, bumping both TTLs.
pub fn load_campaign_pair(env: &Env, id: u64) -> Result<(CampaignConfig, CampaignState), Error> {
    Ok((load_campaign_config(env, id)?, load_campaign_state(env, id)?))
}

/// Load only the immutable campaign configuration.
pub fn load_campaign_config(env: &Env, id: u64) -> Result<CampaignConfig, Error> {
    let key = DataKey::CampConfig(id);
    let config: CampaignConfig = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::CampaignNotFound)?;
    bump_persistent(env, &key);
    Ok(config)
}

/// Load only the mutable campaign state.
pub fn load_campaign_state(env: &Env, id: u64) -> Result<CampaignState, Error> {
    let key = DataKey::CampState(id);
    let state: CampaignState = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::CampaignNotFound)?;
    bump_persistent(env, &key);
    Ok(state)
}

pub fn save_campaign_state(env: &Env, id: u64, state: &CampaignState) {
    set_persistent(env, &DataKey::CampState(id), state);
}

/// Load milestone `index` of campaign `id`.
///
/// Callers validate `index` against the campaign's milestone count first, so a
/// missing entry here also means the index is out of range.
pub fn load_milestone(env: &Env, id: u64, index: u32) -> Result<Milestone, Error> {
    let key = DataKey::Milestone(id, index);
    let milestone: Milestone = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::MilestoneNotFound)?;
    bump_persistent(env, &key);
    Ok(milestone)
}

pub fn save_milestone(env: &Env, id: u64, index: u32, milestone: &Milestone) {
    set_persistent(env, &DataKey::Milestone(id, index), milestone);
}

/// Current balance of `donor` in campaign `id`; zero if they never donated.
pub fn get_donation(env: &Env, id: u64, donor: &Address) -> i128 {
    let key = DataKey::Donation(id, donor.clone());
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(balance) => {
            bump_persistent(env, &key);
            balance
        }
        None => 0,
    }
}

pub fn set_donation(env: &Env, id: u64, donor: &Address, balance: i128) {
    set_persistent(env, &DataKey::Donation(id, donor.clone()), &balance);
}

pub fn load_donors(env: &Env, id: u64) -> Vec<Address> {
    let key = DataKey::Donors(id);
    match env.storage().persistent().get::<_, Vec<Address>>(&key) {
        Some(donors) => {
            bump_persistent(env, &key);
            donors
        }
        None => Vec::new(env),
    }
}

/// Append `donor` to the roster. The caller guarantees it is not already present.
pub fn push_donor(env: &Env, id: u64, donor: &Address) {
    let mut donors = load_donors(env, id);
    donors.push_back(donor.clone());
    set_persistent(env, &DataKey::Donors(id), &donors);
}

pub fn has_voted(env: &Env, id: u64, index: u32, voter: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Voted(id, index, voter.clone()))
}

pub fn mark_voted(env: &Env, id: u64, index: u32, voter: &Address) {
    set_persistent(env, &DataKey::Voted(id, index, voter.clone()), &true);
}
