//! Refund Authority: returns a donor's balance once a campaign has failed.
//!
//! A campaign has failed when its deadline has passed and its goal was never
//! reached. Once `goal_reached` is set, refunds are closed for good, even if
//! some milestones are never released.

use soroban_sdk::{Address, Env};

use crate::errors::Error;
use crate::events::{self, RefundIssued};
use crate::guard::CampaignLock;
use crate::settlement;
use crate::storage::{get_donation, load_campaign_pair, save_campaign_state, set_donation};

pub fn request_refund(env: &Env, campaign_id: u64, donor: Address) -> Result<i128, Error> {
    let _lock = CampaignLock::acquire(env, campaign_id)?;

    let (config, mut state) = load_campaign_pair(env, campaign_id)?;

    if env.ledger().timestamp() < config.deadline {
        return Err(Error::DeadlineNotReached);
    }
    if state.goal_reached {
        return Err(Error::GoalReached);
    }

    let amount = get_donation(env, campaign_id, &donor);
    if amount <= 0 {
        return Err(Error::NothingToRefund);
    }

    // Zero the balance before paying out. The donor stays on the roster.
    set_donation(env, campaign_id, &donor, 0);
    state.total_donated = state
        .total_donated
        .checked_sub(amount)
        .ok_or(Error::Overflow)?;
    save_campaign_state(env, campaign_id, &state);

    settlement::disburse(env, &donor, amount)?;

    events::emit_refund_issued(
        env,
        RefundIssued {
            campaign_id,
            donor,
            amount,
        },
    );

    Ok(amount)
}
