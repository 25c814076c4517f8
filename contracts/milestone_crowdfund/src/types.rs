//! # Types
//!
//! Shared data structures used across all modules of the crowdfund contract.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Campaign` is internally stored as two separate ledger entries:
//!
//! - [`CampaignConfig`]: written once at creation, never mutated. Holds the
//!   frozen conversion rate and its timestamp.
//! - [`CampaignState`]: written on every donation, release and refund.
//!
//! The public API exposes the reconstructed [`Campaign`] struct for convenience.
//! Milestones, donor balances and vote markers are their own keyed entries
//! (see [`crate::storage`]), so no entry grows with the number of donors
//! except the donor roster itself.
//!
//! ### Milestone lifecycle
//!
//! ```text
//! Pending ──propose──► Proposed ──finalize──► Released
//!                        │  ▲
//!                        └──┘ vote (tallies only)
//! ```
//!
//! `Released` is terminal. A milestone that never meets its thresholds stays
//! `Proposed` indefinitely.

use soroban_sdk::{contracttype, Address, String, Vec};

/// Immutable campaign configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub id: u64,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub goal_display: i128,
    pub goal_settlement: i128,
    /// Settlement units per one display unit, captured at creation.
    pub conversion_rate: i128,
    pub rate_timestamp: u64,
    pub deadline: u64,
    pub milestone_count: u32,
    pub created_at: u64,
}

impl CampaignConfig {
    /// Display-currency equivalent of `amount` at the frozen rate.
    ///
    /// Used for event payloads only; never stored or fed back into arithmetic.
    pub fn to_display(&self, amount: i128) -> i128 {
        amount / self.conversion_rate
    }
}

/// Mutable campaign state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignState {
    /// Sum of all current donor balances.
    pub total_donated: i128,
    /// Settlement units already paid to the creator through released milestones.
    pub total_released: i128,
    pub goal_reached: bool,
    /// Set once every milestone has been released.
    pub finalized: bool,
    /// Length of the donor roster.
    pub donor_count: u32,
    pub released_count: u32,
}

/// Full representation of a campaign, reconstructed from config and state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    /// Unique identifier (auto-incremented, never reused).
    pub id: u64,
    /// Address that created the campaign and receives released tranches.
    pub creator: Address,
    pub title: String,
    pub description: String,
    /// Goal in display currency (e.g. KES).
    pub goal_display: i128,
    /// Goal in settlement units.
    pub goal_settlement: i128,
    pub conversion_rate: i128,
    /// Ledger timestamp at which `conversion_rate` was captured.
    pub rate_timestamp: u64,
    /// Ledger timestamp after which donations stop and refunds may open.
    pub deadline: u64,
    pub total_donated: i128,
    pub total_released: i128,
    pub goal_reached: bool,
    pub finalized: bool,
    pub milestone_count: u32,
    pub donor_count: u32,
    pub created_at: u64,
}

impl Campaign {
    pub fn from_parts(config: CampaignConfig, state: CampaignState) -> Self {
        Campaign {
            id: config.id,
            creator: config.creator,
            title: config.title,
            description: config.description,
            goal_display: config.goal_display,
            goal_settlement: config.goal_settlement,
            conversion_rate: config.conversion_rate,
            rate_timestamp: config.rate_timestamp,
            deadline: config.deadline,
            total_donated: state.total_donated,
            total_released: state.total_released,
            goal_reached: state.goal_reached,
            finalized: state.finalized,
            milestone_count: config.milestone_count,
            donor_count: state.donor_count,
            created_at: config.created_at,
        }
    }
}

/// The three parallel milestone arrays supplied at campaign creation.
///
/// Entry `i` of each array describes milestone `i`; the arrays must have
/// equal, non-zero length.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestonePlan {
    pub descriptions: Vec<String>,
    pub amounts_display: Vec<i128>,
    pub amounts_settlement: Vec<i128>,
}

/// A release tranche of a campaign.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    pub description: String,
    pub amount_display: i128,
    pub amount_settlement: i128,
    pub released: bool,
    pub votes_for: u32,
    pub votes_against: u32,
    /// Opaque evidence URI; empty until proposed.
    pub evidence_uri: String,
    /// Ledger timestamp of the proposal; `0` means not yet proposed.
    pub proposed_at: u64,
}

impl Milestone {
    pub fn status(&self) -> MilestoneStatus {
        if self.released {
            MilestoneStatus::Released
        } else if self.proposed_at == 0 {
            MilestoneStatus::Pending
        } else {
            MilestoneStatus::Proposed
        }
    }
}

/// Lifecycle status of a milestone, derived from its fields.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MilestoneStatus {
    /// Created with the campaign; no evidence yet.
    Pending,
    /// Evidence submitted; open for votes and finalization.
    Proposed,
    /// Funds paid to the creator. Terminal.
    Released,
}
