//! Campaign Registry: validation and creation of campaigns.

use soroban_sdk::{Address, Env, String};

use crate::errors::Error;
use crate::events::{self, CampaignCreated};
use crate::storage::{
    get_and_increment_campaign_id, get_settlement_token, save_milestone, save_new_campaign,
};
use crate::types::{CampaignConfig, CampaignState, Milestone, MilestonePlan};

/// Check creation parameters without touching storage.
pub fn validate(
    now: u64,
    goal_settlement: i128,
    conversion_rate: i128,
    deadline: u64,
    plan: &MilestonePlan,
) -> Result<u32, Error> {
    if deadline <= now {
        return Err(Error::InvalidDeadline);
    }
    if goal_settlement <= 0 {
        return Err(Error::InvalidGoal);
    }
    if conversion_rate <= 0 {
        return Err(Error::InvalidConversionRate);
    }

    let count = plan.descriptions.len();
    if count == 0 {
        return Err(Error::NoMilestones);
    }
    if plan.amounts_display.len() != count || plan.amounts_settlement.len() != count {
        return Err(Error::MilestoneLengthMismatch);
    }
    // A non-positive tranche would move escrow in the wrong direction on release.
    if plan.amounts_settlement.iter().any(|amount| amount <= 0) {
        return Err(Error::InvalidAmount);
    }
    Ok(count)
}

#[allow(clippy::too_many_arguments)]
pub fn create(
    env: &Env,
    creator: Address,
    title: String,
    description: String,
    goal_display: i128,
    goal_settlement: i128,
    conversion_rate: i128,
    deadline: u64,
    plan: MilestonePlan,
) -> Result<u64, Error> {
    // Campaigns cannot exist before the settlement unit is known.
    get_settlement_token(env)?;

    let now = env.ledger().timestamp();
    let milestone_count = validate(now, goal_settlement, conversion_rate, deadline, &plan)?;

    let id = get_and_increment_campaign_id(env)?;

    let config = CampaignConfig {
        id,
        creator: creator.clone(),
        title: title.clone(),
        description,
        goal_display,
        goal_settlement,
        conversion_rate,
        rate_timestamp: now,
        deadline,
        milestone_count,
        created_at: now,
    };
    let state = CampaignState {
        total_donated: 0,
        total_released: 0,
        goal_reached: false,
        finalized: false,
        donor_count: 0,
        released_count: 0,
    };
    save_new_campaign(env, &config, &state);

    let empty_evidence = String::from_str(env, "");
    let slots = plan
        .descriptions
        .iter()
        .zip(plan.amounts_display.iter())
        .zip(plan.amounts_settlement.iter());
    for (index, ((description, amount_display), amount_settlement)) in (0u32..).zip(slots) {
        let milestone = Milestone {
            description,
            amount_display,
            amount_settlement,
            released: false,
            votes_for: 0,
            votes_against: 0,
            evidence_uri: empty_evidence.clone(),
            proposed_at: 0,
        };
        save_milestone(env, id, index, &milestone);
    }

    events::emit_campaign_created(
        env,
        CampaignCreated {
            campaign_id: id,
            creator,
            title,
            goal_display,
            goal_settlement,
            conversion_rate,
            deadline,
            milestone_count,
        },
    );

    Ok(id)
}
