extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::invariants::assert_all_campaign_invariants;
use crate::test::{Fixture, T};
use crate::{Error, MilestoneStatus};

/// A funded campaign with `donors` equal donors and milestones `amounts`.
/// Milestone 0 is already proposed.
fn proposed_campaign(fx: &Fixture, donors: usize, amounts: &[i128]) -> (u64, std::vec::Vec<Address>) {
    let goal: i128 = amounts.iter().sum();
    let id = fx.create_campaign(goal, T + 100, amounts);
    let share = goal / donors as i128 + 1;
    let donors = (0..donors).map(|_| fx.donor(id, share)).collect();
    fx.client
        .propose_milestone(&id, &fx.creator, &0, &fx.evidence());
    (id, donors)
}

// ─────────────────────────────────────────────────────────
// Proposal
// ─────────────────────────────────────────────────────────

#[test]
fn test_only_creator_can_propose() {
    let fx = Fixture::new();
    let id = fx.create_campaign(100, T + 10, &[100]);
    fx.donor(id, 100);

    let intruder = Address::generate(&fx.env);
    let result = fx
        .client
        .try_propose_milestone(&id, &intruder, &0, &fx.evidence());
    assert_eq!(result.unwrap_err().unwrap(), Error::NotCampaignCreator);
    assert_eq!(
        fx.client.get_milestone_status(&id, &0),
        MilestoneStatus::Pending
    );
}

#[test]
fn test_propose_requires_goal() {
    let fx = Fixture::new();
    let id = fx.create_campaign(100, T + 10, &[100]);
    fx.donor(id, 99);

    let result = fx
        .client
        .try_propose_milestone(&id, &fx.creator, &0, &fx.evidence());
    assert_eq!(result.unwrap_err().unwrap(), Error::GoalNotReached);
}

#[test]
fn test_propose_unknown_milestone() {
    let fx = Fixture::new();
    let id = fx.create_campaign(100, T + 10, &[50, 50]);
    fx.donor(id, 100);

    let result = fx
        .client
        .try_propose_milestone(&id, &fx.creator, &2, &fx.evidence());
    assert_eq!(result.unwrap_err().unwrap(), Error::MilestoneNotFound);
}

#[test]
fn test_propose_twice_fails() {
    let fx = Fixture::new();
    let (id, _) = proposed_campaign(&fx, 1, &[100]);

    let result = fx
        .client
        .try_propose_milestone(&id, &fx.creator, &0, &fx.evidence());
    assert_eq!(result.unwrap_err().unwrap(), Error::AlreadyProposed);
}

#[test]
fn test_propose_after_deadline_is_allowed() {
    let fx = Fixture::new();
    let id = fx.create_campaign(100, T + 10, &[100]);
    fx.donor(id, 100);

    fx.set_time(T + 500);
    fx.client
        .propose_milestone(&id, &fx.creator, &0, &fx.evidence());
    assert_eq!(
        fx.client.get_milestone_status(&id, &0),
        MilestoneStatus::Proposed
    );
}

// ─────────────────────────────────────────────────────────
// Voting
// ─────────────────────────────────────────────────────────

#[test]
fn test_non_donor_cannot_vote() {
    let fx = Fixture::new();
    let (id, _) = proposed_campaign(&fx, 2, &[100]);

    let outsider = Address::generate(&fx.env);
    let result = fx.client.try_vote(&id, &outsider, &0, &true);
    assert_eq!(result.unwrap_err().unwrap(), Error::NotDonor);
    assert_eq!(fx.client.get_milestone(&id, &0).votes_for, 0);
}

#[test]
fn test_vote_on_pending_milestone_fails() {
    let fx = Fixture::new();
    let (id, donors) = proposed_campaign(&fx, 1, &[40, 60]);

    let result = fx.client.try_vote(&id, &donors[0], &1, &true);
    assert_eq!(result.unwrap_err().unwrap(), Error::MilestoneNotProposed);
}

#[test]
fn test_each_donor_votes_once() {
    let fx = Fixture::new();
    let (id, donors) = proposed_campaign(&fx, 2, &[100]);

    fx.client.vote(&id, &donors[0], &0, &true);
    assert!(fx.client.has_voted(&id, &0, &donors[0]));
    assert!(!fx.client.has_voted(&id, &0, &donors[1]));

    // Changing one's mind is a second vote.
    let result = fx.client.try_vote(&id, &donors[0], &0, &false);
    assert_eq!(result.unwrap_err().unwrap(), Error::AlreadyVoted);

    let milestone = fx.client.get_milestone(&id, &0);
    assert_eq!((milestone.votes_for, milestone.votes_against), (1, 0));
}

#[test]
fn test_votes_are_tracked_per_milestone() {
    let fx = Fixture::new();
    let (id, donors) = proposed_campaign(&fx, 1, &[40, 60]);
    fx.client
        .propose_milestone(&id, &fx.creator, &1, &fx.evidence());

    fx.client.vote(&id, &donors[0], &0, &true);
    fx.client.vote(&id, &donors[0], &1, &false);

    let first = fx.client.get_milestone(&id, &0);
    let second = fx.client.get_milestone(&id, &1);
    assert_eq!((first.votes_for, first.votes_against), (1, 0));
    assert_eq!((second.votes_for, second.votes_against), (0, 1));
}

// ─────────────────────────────────────────────────────────
// Finalization thresholds
// ─────────────────────────────────────────────────────────

#[test]
fn test_finalize_without_votes_fails_quorum() {
    let fx = Fixture::new();
    let (id, _) = proposed_campaign(&fx, 2, &[100]);

    let result = fx.client.try_finalize_milestone(&id, &0);
    assert_eq!(result.unwrap_err().unwrap(), Error::QuorumNotMet);
}

#[test]
fn test_one_of_three_donors_meets_quorum() {
    let fx = Fixture::new();
    let (id, donors) = proposed_campaign(&fx, 3, &[100]);

    fx.client.vote(&id, &donors[0], &0, &true);
    fx.client.finalize_milestone(&id, &0);

    assert_eq!(
        fx.client.get_milestone_status(&id, &0),
        MilestoneStatus::Released
    );
    assert_eq!(fx.token.balance(&fx.creator), 100);
}

#[test]
fn test_quorum_retry_after_more_votes() {
    let fx = Fixture::new();
    let (id, donors) = proposed_campaign(&fx, 4, &[100]);

    // 1 of 4 is 25%.
    fx.client.vote(&id, &donors[0], &0, &true);
    let result = fx.client.try_finalize_milestone(&id, &0);
    assert_eq!(result.unwrap_err().unwrap(), Error::QuorumNotMet);

    // The failed finalize left the milestone open.
    assert_eq!(
        fx.client.get_milestone_status(&id, &0),
        MilestoneStatus::Proposed
    );
    assert_eq!(fx.token.balance(&fx.creator), 0);

    fx.client.vote(&id, &donors[1], &0, &true);
    fx.client.finalize_milestone(&id, &0);
    assert_eq!(fx.token.balance(&fx.creator), 100);
}

#[test]
fn test_tie_approves() {
    let fx = Fixture::new();
    let (id, donors) = proposed_campaign(&fx, 2, &[100]);

    fx.client.vote(&id, &donors[0], &0, &true);
    fx.client.vote(&id, &donors[1], &0, &false);
    fx.client.finalize_milestone(&id, &0);

    assert_eq!(
        fx.client.get_milestone_status(&id, &0),
        MilestoneStatus::Released
    );
}

#[test]
fn test_majority_against_blocks_release() {
    let fx = Fixture::new();
    let (id, donors) = proposed_campaign(&fx, 3, &[100]);

    fx.client.vote(&id, &donors[0], &0, &true);
    fx.client.vote(&id, &donors[1], &0, &false);
    fx.client.vote(&id, &donors[2], &0, &false);

    let result = fx.client.try_finalize_milestone(&id, &0);
    assert_eq!(result.unwrap_err().unwrap(), Error::ApprovalNotMet);
    assert_eq!(fx.client.get_campaign(&id).total_released, 0);
    assert_eq!(fx.token.balance(&fx.creator), 0);
}

#[test]
fn test_finalize_pending_milestone_fails() {
    let fx = Fixture::new();
    let (id, _) = proposed_campaign(&fx, 1, &[40, 60]);

    let result = fx.client.try_finalize_milestone(&id, &1);
    assert_eq!(result.unwrap_err().unwrap(), Error::MilestoneNotProposed);
}

#[test]
fn test_released_milestone_is_terminal() {
    let fx = Fixture::new();
    let (id, donors) = proposed_campaign(&fx, 2, &[40, 60]);

    fx.client.vote(&id, &donors[0], &0, &true);
    fx.client.finalize_milestone(&id, &0);

    let result = fx.client.try_finalize_milestone(&id, &0);
    assert_eq!(result.unwrap_err().unwrap(), Error::MilestoneAlreadyReleased);

    let result = fx.client.try_vote(&id, &donors[1], &0, &true);
    assert_eq!(result.unwrap_err().unwrap(), Error::MilestoneAlreadyReleased);

    let result = fx
        .client
        .try_propose_milestone(&id, &fx.creator, &0, &fx.evidence());
    assert_eq!(result.unwrap_err().unwrap(), Error::AlreadyProposed);

    // Paid exactly once.
    assert_eq!(fx.token.balance(&fx.creator), 40);
    assert_eq!(fx.client.get_campaign(&id).total_released, 40);
}

#[test]
fn test_milestones_release_in_any_order() {
    let fx = Fixture::new();
    let (id, donors) = proposed_campaign(&fx, 1, &[40, 60]);
    fx.client
        .propose_milestone(&id, &fx.creator, &1, &fx.evidence());

    fx.client.vote(&id, &donors[0], &1, &true);
    fx.client.finalize_milestone(&id, &1);

    assert_eq!(
        fx.client.get_milestone_status(&id, &0),
        MilestoneStatus::Proposed
    );
    assert_eq!(fx.token.balance(&fx.creator), 60);
    assert!(!fx.client.get_campaign(&id).finalized);
    assert_all_campaign_invariants(&fx.client, id);
}

/// A milestone larger than what its own campaign holds cannot be paid from
/// another campaign's deposits, even though the contract's token balance
/// would cover it.
#[test]
fn test_release_limited_to_own_escrow() {
    let fx = Fixture::new();
    // Goal 50, but the plan asks for 80.
    let thin = fx.create_campaign(50, T + 10, &[80]);
    let donor = fx.donor(thin, 50);
    fx.client
        .propose_milestone(&thin, &fx.creator, &0, &fx.evidence());
    fx.client.vote(&thin, &donor, &0, &true);

    let other = fx.create_campaign(500, T + 10, &[500]);
    fx.donor(other, 500);
    assert_eq!(fx.token.balance(&fx.client.address), 550);

    let result = fx.client.try_finalize_milestone(&thin, &0);
    assert_eq!(result.unwrap_err().unwrap(), Error::InsufficientEscrow);
    assert_eq!(fx.token.balance(&fx.creator), 0);
    assert_eq!(fx.token.balance(&fx.client.address), 550);
}

#[test]
fn test_late_donor_raises_quorum_bar() {
    let fx = Fixture::new();
    let id = fx.create_campaign(100, T + 10, &[100]);
    let first = fx.donor(id, 100);
    fx.donor(id, 1);
    fx.client
        .propose_milestone(&id, &fx.creator, &0, &fx.evidence());
    fx.client.vote(&id, &first, &0, &true);

    // Two more donors join before anyone finalizes: 1 of 4 is below 30%.
    fx.donor(id, 1);
    fx.donor(id, 1);
    let result = fx.client.try_finalize_milestone(&id, &0);
    assert_eq!(result.unwrap_err().unwrap(), Error::QuorumNotMet);
}

#[test]
fn test_failed_payout_leaves_milestone_open() {
    let fx = Fixture::new();
    let (id, donors) = proposed_campaign(&fx, 1, &[100]);
    fx.client.vote(&id, &donors[0], &0, &true);

    // The creator cannot receive the settlement token.
    fx.set_token_authorized(&fx.creator, false);
    let result = fx.client.try_finalize_milestone(&id, &0);
    assert_eq!(result.unwrap_err().unwrap(), Error::TransferFailed);

    let milestone = fx.client.get_milestone(&id, &0);
    assert!(!milestone.released);
    assert_eq!(
        fx.client.get_milestone_status(&id, &0),
        MilestoneStatus::Proposed
    );
    let campaign = fx.client.get_campaign(&id);
    assert_eq!(campaign.total_released, 0);
    assert!(!campaign.finalized);
    assert_eq!(fx.token.balance(&fx.client.address), 101);

    // Retry once the creator can receive again.
    fx.set_token_authorized(&fx.creator, true);
    fx.client.finalize_milestone(&id, &0);
    assert_eq!(fx.token.balance(&fx.creator), 100);
    assert_eq!(fx.client.get_campaign(&id).total_released, 100);
}
