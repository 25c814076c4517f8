//! Donation Accounting: contributions, donor balances and the donor roster.

use soroban_sdk::{Address, Env};

use crate::errors::Error;
use crate::events::{self, DonationReceived};
use crate::guard::CampaignLock;
use crate::settlement;
use crate::storage::{
    get_donation, load_campaign_pair, push_donor, save_campaign_state, set_donation,
};

pub fn donate(env: &Env, campaign_id: u64, donor: Address, amount: i128) -> Result<(), Error> {
    let _lock = CampaignLock::acquire(env, campaign_id)?;

    let (config, mut state) = load_campaign_pair(env, campaign_id)?;

    if state.finalized {
        return Err(Error::CampaignFinalized);
    }
    if env.ledger().timestamp() >= config.deadline {
        return Err(Error::CampaignEnded);
    }
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let previous = get_donation(env, campaign_id, &donor);
    if previous == 0 {
        // Balances only return to zero through refunds, which need an expired
        // deadline, so a zero balance here always means a first contribution.
        push_donor(env, campaign_id, &donor);
        state.donor_count = state.donor_count.checked_add(1).ok_or(Error::Overflow)?;
    }

    let balance = previous.checked_add(amount).ok_or(Error::Overflow)?;
    state.total_donated = state
        .total_donated
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    if state.total_donated >= config.goal_settlement {
        state.goal_reached = true;
    }

    set_donation(env, campaign_id, &donor, balance);
    save_campaign_state(env, campaign_id, &state);

    settlement::collect(env, &donor, amount)?;

    events::emit_donation_received(
        env,
        DonationReceived {
            campaign_id,
            donor,
            amount,
            display_amount: config.to_display(amount),
            total_donated: state.total_donated,
        },
    );

    Ok(())
}
