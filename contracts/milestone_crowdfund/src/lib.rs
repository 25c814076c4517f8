//! # Milestone Crowdfund Contract
//!
//! Crowdfunding campaigns whose contributions stay in escrow and are released
//! to the creator one milestone at a time, only after the donors vote for it.
//! It exposes the single Soroban contract `MilestoneCrowdfund` whose entry
//! points cover the full campaign lifecycle:
//!
//! | Phase        | Entry Point(s)                                          |
//! |--------------|---------------------------------------------------------|
//! | Bootstrap    | [`MilestoneCrowdfund::init`]                            |
//! | Registration | [`MilestoneCrowdfund::create_campaign`]                 |
//! | Funding      | [`MilestoneCrowdfund::donate`]                          |
//! | Governance   | `propose_milestone`, `vote`, `finalize_milestone`       |
//! | Failure      | [`MilestoneCrowdfund::request_refund`]                  |
//! | Queries      | `get_campaign`, `get_milestone`, `get_donation`, `get_donor_list`, ... |
//!
//! ## Architecture
//!
//! Each component lives in its own module: [`registry`], [`donations`],
//! [`governance`] and [`refunds`], all over the typed helpers in [`storage`].
//! This file only authenticates callers and delegates.
//!
//! Every mutating operation on a campaign holds a [`guard::CampaignLock`] for
//! its whole duration, writes all state that gates a transfer before the
//! transfer is issued, and publishes exactly one event on success.

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

use soroban_sdk::{contract, contractimpl, Address, Env, String, Vec};

pub mod errors;
pub mod events;
mod donations;
mod governance;
mod guard;
mod refunds;
mod registry;
mod settlement;
mod storage;
mod types;

#[cfg(test)]
mod test_donor_roster;
#[cfg(test)]
mod test_governance;

pub use errors::{Error, ErrorKind};
pub use governance::{APPROVAL_PERCENT, QUORUM_PERCENT};
pub use types::{Campaign, Milestone, MilestonePlan, MilestoneStatus};

#[contract]
pub struct MilestoneCrowdfund;

#[contractimpl]
impl MilestoneCrowdfund {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Record the token contract whose unit all campaigns settle in.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls fail with `Error::AlreadyInitialized`.
    ///
    /// - `admin` must sign the transaction and is stored alongside the token.
    pub fn init(env: Env, admin: Address, settlement_token: Address) -> Result<(), Error> {
        admin.require_auth();
        if storage::has_settlement_token(&env) {
            return Err(Error::AlreadyInitialized);
        }
        storage::set_admin(&env, &admin);
        storage::set_settlement_token(&env, &settlement_token);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Campaign lifecycle
    // ─────────────────────────────────────────────────────────

    /// Create a campaign and return its ID.
    ///
    /// `conversion_rate` is the number of settlement units per display unit,
    /// computed off-chain; it is frozen together with the current ledger time.
    /// Milestone `i` is described by entry `i` of each array in `milestones`.
    #[allow(clippy::too_many_arguments)]
    pub fn create_campaign(
        env: Env,
        creator: Address,
        title: String,
        description: String,
        goal_display: i128,
        goal_settlement: i128,
        conversion_rate: i128,
        deadline: u64,
        milestones: MilestonePlan,
    ) -> Result<u64, Error> {
        creator.require_auth();
        registry::create(
            &env,
            creator,
            title,
            description,
            goal_display,
            goal_settlement,
            conversion_rate,
            deadline,
            milestones,
        )
    }

    /// Contribute `amount` settlement units to a campaign before its deadline.
    pub fn donate(env: Env, campaign_id: u64, donor: Address, amount: i128) -> Result<(), Error> {
        donor.require_auth();
        donations::donate(&env, campaign_id, donor, amount)
    }

    /// Submit evidence for a milestone and open it for voting.
    ///
    /// - `caller` must be the campaign creator.
    /// - The campaign must have reached its goal.
    pub fn propose_milestone(
        env: Env,
        campaign_id: u64,
        caller: Address,
        milestone_index: u32,
        evidence_uri: String,
    ) -> Result<(), Error> {
        caller.require_auth();
        governance::propose(&env, campaign_id, caller, milestone_index, evidence_uri)
    }

    /// Cast a single vote on a proposed milestone.
    ///
    /// `voter` must hold a positive balance in the campaign.
    pub fn vote(
        env: Env,
        campaign_id: u64,
        voter: Address,
        milestone_index: u32,
        approve: bool,
    ) -> Result<(), Error> {
        voter.require_auth();
        governance::vote(&env, campaign_id, voter, milestone_index, approve)
    }

    /// Release a proposed milestone's tranche to the creator if quorum and
    /// approval both hold. Callable by anyone; retry after more votes on
    /// `QuorumNotMet` / `ApprovalNotMet`.
    pub fn finalize_milestone(env: Env, campaign_id: u64, milestone_index: u32) -> Result<(), Error> {
        governance::finalize(&env, campaign_id, milestone_index)
    }

    /// Return the donor's full balance of a failed campaign. Returns the amount paid.
    pub fn request_refund(env: Env, campaign_id: u64, donor: Address) -> Result<i128, Error> {
        donor.require_auth();
        refunds::request_refund(&env, campaign_id, donor)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_campaign(env: Env, campaign_id: u64) -> Result<Campaign, Error> {
        storage::load_campaign(&env, campaign_id)
    }

    pub fn get_milestone(env: Env, campaign_id: u64, milestone_index: u32) -> Result<Milestone, Error> {
        let config = storage::load_campaign_config(&env, campaign_id)?;
        if milestone_index >= config.milestone_count {
            return Err(Error::MilestoneNotFound);
        }
        storage::load_milestone(&env, campaign_id, milestone_index)
    }

    pub fn get_milestone_status(
        env: Env,
        campaign_id: u64,
        milestone_index: u32,
    ) -> Result<MilestoneStatus, Error> {
        Ok(Self::get_milestone(env, campaign_id, milestone_index)?.status())
    }

    /// Current balance of `donor` in the campaign (zero after a refund).
    pub fn get_donation(env: Env, campaign_id: u64, donor: Address) -> Result<i128, Error> {
        storage::load_campaign_config(&env, campaign_id)?;
        Ok(storage::get_donation(&env, campaign_id, &donor))
    }

    /// Donors in order of their first contribution.
    pub fn get_donor_list(env: Env, campaign_id: u64) -> Result<Vec<Address>, Error> {
        storage::load_campaign_config(&env, campaign_id)?;
        Ok(storage::load_donors(&env, campaign_id))
    }

    pub fn has_voted(
        env: Env,
        campaign_id: u64,
        milestone_index: u32,
        voter: Address,
    ) -> bool {
        storage::has_voted(&env, campaign_id, milestone_index, &voter)
    }

    pub fn campaign_count(env: Env) -> u64 {
        storage::campaign_count(&env)
    }

    pub fn settlement_token(env: Env) -> Result<Address, Error> {
        storage::get_settlement_token(&env)
    }

    pub fn admin(env: Env) -> Result<Address, Error> {
        storage::get_admin(&env)
    }
}
