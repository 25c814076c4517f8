//! Per-campaign reentrancy lock.
//!
//! Every mutating entry point that touches an existing campaign holds a
//! [`CampaignLock`] from before its first read until it returns, which spans
//! the outbound token transfer. A nested entry into any mutating operation on
//! the same campaign while the lock is held fails with [`Error::Reentrant`].
//!
//! The lock lives in temporary storage, so an invocation that fails is rolled
//! back together with the lock it set.

use soroban_sdk::Env;

use crate::errors::Error;
use crate::storage::DataKey;

pub struct CampaignLock<'a> {
    env: &'a Env,
    campaign_id: u64,
}

impl<'a> CampaignLock<'a> {
    pub fn acquire(env: &'a Env, campaign_id: u64) -> Result<Self, Error> {
        let key = DataKey::Lock(campaign_id);
        if env.storage().temporary().has(&key) {
            return Err(Error::Reentrant);
        }
        env.storage().temporary().set(&key, &true);
        Ok(CampaignLock { env, campaign_id })
    }
}

impl Drop for CampaignLock<'_> {
    fn drop(&mut self) {
        self.env
            .storage()
            .temporary()
            .remove(&DataKey::Lock(self.campaign_id));
    }
}
