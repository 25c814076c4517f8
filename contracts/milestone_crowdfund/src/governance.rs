//! Milestone Governance: proposal, donor voting and release.
//!
//! ## Thresholds
//!
//! Both are evaluated at finalize time over the *current* tallies and the
//! *current* roster size, with integer cross-multiplication only:
//!
//! - quorum:   `(for + against) * 100 >= roster * QUORUM_PERCENT`
//! - approval: `for * 100 >= (for + against) * 100 * APPROVAL_PERCENT / 100`
//!
//! Ties approve. A milestone with no votes never meets quorum.

use soroban_sdk::{Address, Env, String};

use crate::errors::Error;
use crate::events::{self, MilestoneProposed, MilestoneReleased, VoteCast};
use crate::guard::CampaignLock;
use crate::settlement;
use crate::storage::{
    get_donation, has_voted, load_campaign_config, load_campaign_pair, load_campaign_state,
    load_milestone, mark_voted, save_campaign_state, save_milestone,
};
use crate::types::{CampaignConfig, Milestone, MilestoneStatus};

/// Share of the donor roster, in percent, that must vote.
pub const QUORUM_PERCENT: u64 = 30;
/// Share of cast votes, in percent, that must approve.
pub const APPROVAL_PERCENT: u64 = 50;

pub fn quorum_met(votes_for: u32, votes_against: u32, roster_size: u32) -> bool {
    let cast = votes_for as u64 + votes_against as u64;
    if cast == 0 {
        return false;
    }
    cast * 100 >= roster_size as u64 * QUORUM_PERCENT
}

pub fn approval_met(votes_for: u32, votes_against: u32) -> bool {
    let cast = votes_for as u64 + votes_against as u64;
    votes_for as u64 * 100 >= cast * 100 * APPROVAL_PERCENT / 100
}

fn load_indexed_milestone(
    env: &Env,
    config: &CampaignConfig,
    index: u32,
) -> Result<Milestone, Error> {
    if index >= config.milestone_count {
        return Err(Error::MilestoneNotFound);
    }
    load_milestone(env, config.id, index)
}

/// Reject anything but a `Proposed` milestone.
fn require_proposed(milestone: &Milestone) -> Result<(), Error> {
    match milestone.status() {
        MilestoneStatus::Proposed => Ok(()),
        MilestoneStatus::Pending => Err(Error::MilestoneNotProposed),
        MilestoneStatus::Released => Err(Error::MilestoneAlreadyReleased),
    }
}

pub fn propose(
    env: &Env,
    campaign_id: u64,
    caller: Address,
    milestone_index: u32,
    evidence_uri: String,
) -> Result<(), Error> {
    let _lock = CampaignLock::acquire(env, campaign_id)?;

    let config = load_campaign_config(env, campaign_id)?;
    if caller != config.creator {
        return Err(Error::NotCampaignCreator);
    }
    let mut milestone = load_indexed_milestone(env, &config, milestone_index)?;

    let state = load_campaign_state(env, campaign_id)?;
    if !state.goal_reached {
        return Err(Error::GoalNotReached);
    }
    if milestone.status() != MilestoneStatus::Pending {
        return Err(Error::AlreadyProposed);
    }

    let now = env.ledger().timestamp();
    milestone.evidence_uri = evidence_uri.clone();
    milestone.proposed_at = now;
    save_milestone(env, campaign_id, milestone_index, &milestone);

    events::emit_milestone_proposed(
        env,
        MilestoneProposed {
            campaign_id,
            milestone_index,
            evidence_uri,
            proposed_at: now,
        },
    );

    Ok(())
}

pub fn vote(
    env: &Env,
    campaign_id: u64,
    voter: Address,
    milestone_index: u32,
    approve: bool,
) -> Result<(), Error> {
    let _lock = CampaignLock::acquire(env, campaign_id)?;

    let config = load_campaign_config(env, campaign_id)?;
    let mut milestone = load_indexed_milestone(env, &config, milestone_index)?;

    if get_donation(env, campaign_id, &voter) <= 0 {
        return Err(Error::NotDonor);
    }
    require_proposed(&milestone)?;
    if has_voted(env, campaign_id, milestone_index, &voter) {
        return Err(Error::AlreadyVoted);
    }

    if approve {
        milestone.votes_for = milestone.votes_for.checked_add(1).ok_or(Error::Overflow)?;
    } else {
        milestone.votes_against = milestone
            .votes_against
            .checked_add(1)
            .ok_or(Error::Overflow)?;
    }
    mark_voted(env, campaign_id, milestone_index, &voter);
    save_milestone(env, campaign_id, milestone_index, &milestone);

    events::emit_vote_cast(
        env,
        VoteCast {
            campaign_id,
            milestone_index,
            voter,
            approve,
            votes_for: milestone.votes_for,
            votes_against: milestone.votes_against,
        },
    );

    Ok(())
}

pub fn finalize(env: &Env, campaign_id: u64, milestone_index: u32) -> Result<(), Error> {
    let _lock = CampaignLock::acquire(env, campaign_id)?;

    let (config, mut state) = load_campaign_pair(env, campaign_id)?;
    let mut milestone = load_indexed_milestone(env, &config, milestone_index)?;
    require_proposed(&milestone)?;

    if !quorum_met(milestone.votes_for, milestone.votes_against, state.donor_count) {
        return Err(Error::QuorumNotMet);
    }
    if !approval_met(milestone.votes_for, milestone.votes_against) {
        return Err(Error::ApprovalNotMet);
    }

    let amount = milestone.amount_settlement;
    let released_total = state
        .total_released
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    if released_total > state.total_donated {
        return Err(Error::InsufficientEscrow);
    }

    milestone.released = true;
    state.total_released = released_total;
    state.released_count = state.released_count.checked_add(1).ok_or(Error::Overflow)?;
    if state.released_count == config.milestone_count {
        state.finalized = true;
    }
    save_milestone(env, campaign_id, milestone_index, &milestone);
    save_campaign_state(env, campaign_id, &state);

    settlement::disburse(env, &config.creator, amount)?;

    events::emit_milestone_released(
        env,
        MilestoneReleased {
            campaign_id,
            milestone_index,
            recipient: config.creator.clone(),
            amount,
            display_amount: config.to_display(amount),
            campaign_finalized: state.finalized,
        },
    );

    Ok(())
}
