//! # Events
//!
//! The event log is the only audit trail of the contract. Each successful
//! mutating entry point publishes exactly one event; a failed invocation is
//! rolled back together with anything it published.
//!
//! Every event has the topic pair `(symbol, campaign_id)` and a typed struct as
//! its data, which the off-chain indexer decodes by field name.
//!
//! | Topic      | Data                  |
//! |------------|-----------------------|
//! | `created`  | [`CampaignCreated`]   |
//! | `donated`  | [`DonationReceived`]  |
//! | `proposed` | [`MilestoneProposed`] |
//! | `voted`    | [`VoteCast`]          |
//! | `released` | [`MilestoneReleased`] |
//! | `refunded` | [`RefundIssued`]      |

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub campaign_id: u64,
    pub creator: Address,
    pub title: String,
    pub goal_display: i128,
    pub goal_settlement: i128,
    pub conversion_rate: i128,
    pub deadline: u64,
    pub milestone_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationReceived {
    pub campaign_id: u64,
    pub donor: Address,
    pub amount: i128,
    pub display_amount: i128,
    pub total_donated: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneProposed {
    pub campaign_id: u64,
    pub milestone_index: u32,
    pub evidence_uri: String,
    pub proposed_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VoteCast {
    pub campaign_id: u64,
    pub milestone_index: u32,
    pub voter: Address,
    pub approve: bool,
    pub votes_for: u32,
    pub votes_against: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneReleased {
    pub campaign_id: u64,
    pub milestone_index: u32,
    pub recipient: Address,
    pub amount: i128,
    pub display_amount: i128,
    pub campaign_finalized: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundIssued {
    pub campaign_id: u64,
    pub donor: Address,
    pub amount: i128,
}

pub fn emit_campaign_created(env: &Env, event: CampaignCreated) {
    env.events()
        .publish((symbol_short!("created"), event.campaign_id), event);
}

pub fn emit_donation_received(env: &Env, event: DonationReceived) {
    env.events()
        .publish((symbol_short!("donated"), event.campaign_id), event);
}

pub fn emit_milestone_proposed(env: &Env, event: MilestoneProposed) {
    env.events()
        .publish((symbol_short!("proposed"), event.campaign_id), event);
}

pub fn emit_vote_cast(env: &Env, event: VoteCast) {
    env.events()
        .publish((symbol_short!("voted"), event.campaign_id), event);
}

pub fn emit_milestone_released(env: &Env, event: MilestoneReleased) {
    env.events()
        .publish((symbol_short!("released"), event.campaign_id), event);
}

pub fn emit_refund_issued(env: &Env, event: RefundIssued) {
    env.events()
        .publish((symbol_short!("refunded"), event.campaign_id), event);
}
