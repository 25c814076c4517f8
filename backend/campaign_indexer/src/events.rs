//! Event types emitted by the milestone crowdfund contract.
//!
//! These mirror the topics published in
//! `contracts/milestone_crowdfund/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the crowdfund contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A campaign was registered (`created` topic).
    CampaignCreated,
    /// A donor contributed to a campaign (`donated` topic).
    DonationReceived,
    /// The creator submitted evidence for a milestone (`proposed` topic).
    MilestoneProposed,
    /// A donor voted on a proposed milestone (`voted` topic).
    VoteCast,
    /// A milestone tranche was paid to the creator (`released` topic).
    MilestoneReleased,
    /// A donor was refunded from a failed campaign (`refunded` topic).
    RefundIssued,
    /// An event from this contract that we don't recognise.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::CampaignCreated,
            "donated" => Self::DonationReceived,
            "proposed" => Self::MilestoneProposed,
            "voted" => Self::VoteCast,
            "released" => Self::MilestoneReleased,
            "refunded" => Self::RefundIssued,
            _ => Self::Unknown,
        }
    }

    /// Identifier stored in the `event_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignCreated => "campaign_created",
            Self::DonationReceived => "donation_received",
            Self::MilestoneProposed => "milestone_proposed",
            Self::VoteCast => "vote_cast",
            Self::MilestoneReleased => "milestone_released",
            Self::RefundIssued => "refund_issued",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the event's data carries a `milestone_index` field.
    pub fn is_milestone_scoped(&self) -> bool {
        matches!(
            self,
            Self::MilestoneProposed | Self::VoteCast | Self::MilestoneReleased
        )
    }
}

/// A decoded contract event, ready to be stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignEvent {
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub milestone_index: Option<i64>,
    /// Creator, donor, voter or recipient, depending on the kind.
    pub actor: Option<String>,
    /// Settlement units, kept as text since the contract uses `i128`.
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// An event row as read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub milestone_index: Option<i64>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
