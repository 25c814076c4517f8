//! # Errors
//!
//! Every entry point returns `Result<_, Error>`. A returned error aborts the
//! invocation, so the host discards all storage writes, events and token
//! sub-calls made before it: there is no partial application anywhere.
//!
//! Codes are part of the contract ABI and must stay stable.

use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized       = 1,
    NotInitialized           = 2,
    CampaignNotFound         = 3,
    MilestoneNotFound        = 4,
    NotCampaignCreator       = 5,
    NotDonor                 = 6,
    InvalidDeadline          = 7,
    InvalidGoal              = 8,
    InvalidConversionRate    = 9,
    NoMilestones             = 10,
    MilestoneLengthMismatch  = 11,
    InvalidAmount            = 12,
    CampaignEnded            = 13,
    CampaignFinalized        = 14,
    GoalNotReached           = 15,
    GoalReached              = 16,
    DeadlineNotReached       = 17,
    MilestoneNotProposed     = 18,
    MilestoneAlreadyReleased = 19,
    NothingToRefund          = 20,
    InsufficientEscrow       = 21,
    AlreadyProposed          = 22,
    AlreadyVoted             = 23,
    QuorumNotMet             = 24,
    ApprovalNotMet           = 25,
    TransferFailed           = 26,
    Reentrant                = 27,
    Overflow                 = 28,
}

/// Coarse classification of [`Error`] for callers deciding whether to retry.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    InvalidState,
    DuplicateAction,
    ThresholdNotMet,
    TransferFailure,
    InvalidInput,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CampaignNotFound | Error::MilestoneNotFound => ErrorKind::NotFound,

            Error::NotCampaignCreator | Error::NotDonor => ErrorKind::Unauthorized,

            Error::AlreadyInitialized
            | Error::NotInitialized
            | Error::CampaignEnded
            | Error::CampaignFinalized
            | Error::GoalNotReached
            | Error::GoalReached
            | Error::DeadlineNotReached
            | Error::MilestoneNotProposed
            | Error::MilestoneAlreadyReleased
            | Error::NothingToRefund
            | Error::InsufficientEscrow
            | Error::Reentrant => ErrorKind::InvalidState,

            Error::AlreadyProposed | Error::AlreadyVoted => ErrorKind::DuplicateAction,

            Error::QuorumNotMet | Error::ApprovalNotMet => ErrorKind::ThresholdNotMet,

            Error::TransferFailed => ErrorKind::TransferFailure,

            Error::InvalidDeadline
            | Error::InvalidGoal
            | Error::InvalidConversionRate
            | Error::NoMilestones
            | Error::MilestoneLengthMismatch
            | Error::InvalidAmount
            | Error::Overflow => ErrorKind::InvalidInput,
        }
    }

    /// Only a failed threshold (more votes may arrive) or a failed transfer
    /// can succeed when retried with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::ThresholdNotMet | ErrorKind::TransferFailure
        )
    }
}
