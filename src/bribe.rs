multiversx_sc::imports!();

use crate::checkpoints::WEEK;
use crate::errors::*;
use crate::types::Checkpoint;

/// Bound on epochs settled by one claim; later epochs need another call.
pub const MAX_CLAIM_EPOCHS: u64 = 52;

/// Distinct tokens a pool accepts through `notifyBribeReward`.
pub const MAX_BRIBE_TOKENS: usize = 8;

// ============================================================
// Bribe
//
// Deposits always land in the bucket of the epoch after the
// current one. Voter balances and the pool total are epoch
// checkpoints written by the gauge factory; the total is the
// pool's vote weight, so it cannot drift from it. An epoch pays
// out once it has ended.
//
// Each balance checkpoint remembers the gauge generation it was
// written under. A deprecation opens a new generation from the
// next epoch on, and older balances stop counting from there.
// ============================================================

#[multiversx_sc::module]
pub trait BribeModule:
    crate::registry::RegistryModule
    + crate::checkpoints::CheckpointsModule
    + crate::pair::PairModule
    + crate::config::ConfigModule
    + crate::events::EventsModule
{
    // ========================================================
    // ENDPOINT: notifyBribeReward
    // Anyone can bribe a live pool with one of its pair tokens
    // or a whitelisted token, up to MAX_BRIBE_TOKENS per pool.
    // ========================================================

    #[payable("*")]
    #[endpoint(notifyBribeReward)]
    fn notify_bribe_reward(&self, pool: u64) -> u64 {
        self.require_live_gauge(pool);

        let caller = self.blockchain().get_caller();
        let payment = self.call_value().single_esdt();
        let token = payment.token_identifier.clone();
        let amount = payment.amount.clone();
        require!(payment.token_nonce == 0, ERR_INVALID_TOKEN);
        require!(amount > 0u64, ERR_INVALID_AMOUNT);
        self.require_bribe_token(pool, &token);

        let epoch = self.add_bribe_reward(pool, &token, &amount);
        self.bribe_notified_event(pool, &caller, &token, epoch, &amount);
        epoch
    }

    // ========================================================
    // ENDPOINT: claimBribes
    // Settles every finished epoch from the caller's cursor, up
    // to MAX_CLAIM_EPOCHS, across all reward tokens of the pool.
    // ========================================================

    #[endpoint(claimBribes)]
    fn claim_bribes(&self, pool: u64) -> MultiValueEncoded<EsdtTokenPayment> {
        let caller = self.blockchain().get_caller();
        let mut result = MultiValueEncoded::new();

        let (start, end) = match self.claim_window(pool, &caller) {
            Some(window) => window,
            None => return result,
        };

        let mut payments = ManagedVec::new();
        for token in self.bribe_reward_tokens(pool).iter() {
            let mut amount = BigUint::zero();
            let mut epoch = start;
            while epoch < end {
                amount += self.bribe_earned_in_epoch(pool, &caller, &token, epoch);
                epoch += WEEK;
            }
            if amount > 0u64 {
                self.bribe_claimed_event(pool, &caller, &token, &amount);
                let payment = EsdtTokenPayment::new(token, 0, amount);
                result.push(payment.clone());
                payments.push(payment);
            }
        }

        self.bribe_cursor(pool, &caller).set(end);

        if !payments.is_empty() {
            self.send().direct_multi(&caller, &payments);
        }
        result
    }

    // ========================================================
    // ENDPOINTS: reward token whitelist
    // ========================================================

    #[endpoint(allowBribeToken)]
    fn allow_bribe_token(&self, token: TokenIdentifier) {
        self.require_owner_or_admin();
        require!(token.is_valid_esdt_identifier(), ERR_INVALID_TOKEN);
        self.bribe_token_whitelist().insert(token.clone());
        self.bribe_token_allowed_event(&token, true);
    }

    /// Already booked rewards in `token` stay claimable.
    #[endpoint(disallowBribeToken)]
    fn disallow_bribe_token(&self, token: TokenIdentifier) {
        self.require_owner_or_admin();
        self.bribe_token_whitelist().swap_remove(&token);
        self.bribe_token_allowed_event(&token, false);
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    fn require_bribe_token(&self, pool: u64, token: &TokenIdentifier) {
        let pair = self.require_pair(pool);
        require!(
            pair.side_of(token).is_some() || self.bribe_token_whitelist().contains(token),
            ERR_BRIBE_TOKEN_NOT_ALLOWED
        );
        let tokens = self.bribe_reward_tokens(pool);
        require!(
            tokens.contains(token) || tokens.len() < MAX_BRIBE_TOKENS,
            ERR_TOO_MANY_BRIBE_TOKENS
        );
    }

    /// Books `amount` for the next epoch and returns that epoch.
    fn add_bribe_reward(&self, pool: u64, token: &TokenIdentifier, amount: &BigUint) -> u64 {
        let epoch = self.current_epoch() + WEEK;
        self.bribe_reward_tokens(pool).insert(token.clone());
        self.rewards_per_epoch(pool, token, epoch)
            .update(|rewards| *rewards += amount);
        epoch
    }

    /// Voter weight on `pool` from the next epoch on.
    fn bribe_set_balance(&self, pool: u64, account: &ManagedAddress, value: &BigUint) {
        let epoch = self.current_epoch() + WEEK;
        let generation = self.gauge_info(pool).get().generation;
        self.write_checkpoint(self.bribe_balance_history(pool, account), epoch, value);
        self.bribe_balance_generation(pool, account, epoch).set(generation);
    }

    /// Pool weight from the next epoch on; also the bribe total supply.
    fn bribe_set_total(&self, pool: u64, value: &BigUint) {
        let epoch = self.current_epoch() + WEEK;
        self.write_checkpoint(self.pool_weight_history(pool), epoch, value);
    }

    /// Balances written before `generation` stop counting next epoch.
    fn bribe_start_generation(&self, pool: u64, generation: u64) {
        let epoch = self.current_epoch() + WEEK;
        self.generation_start(pool, generation).set(epoch);
    }

    /// `account`'s balance at `epoch`, zero if it was written under a
    /// generation that had ended by then.
    fn bribe_balance_in_effect(&self, pool: u64, account: &ManagedAddress, epoch: u64) -> BigUint {
        let entry = match self.checkpoint_entry_at(&self.bribe_balance_history(pool, account), epoch) {
            Some(entry) => entry,
            None => return BigUint::zero(),
        };
        let generation = self.bribe_balance_generation(pool, account, entry.epoch).get();
        let next_start = self.generation_start(pool, generation + 1);
        if !next_start.is_empty() && next_start.get() <= epoch {
            return BigUint::zero();
        }
        entry.value
    }

    /// Half-open range of finished epochs not yet claimed, capped.
    fn claim_window(&self, pool: u64, account: &ManagedAddress) -> Option<(u64, u64)> {
        let first = self.first_checkpoint_epoch(&self.bribe_balance_history(pool, account))?;
        let cursor = self.bribe_cursor(pool, account).get();
        let start = core::cmp::max(first, cursor);
        let current = self.current_epoch();
        if start >= current {
            return None;
        }
        let end = core::cmp::min(current, start + MAX_CLAIM_EPOCHS * WEEK);
        Some((start, end))
    }

    fn bribe_earned_in_epoch(
        &self,
        pool: u64,
        account: &ManagedAddress,
        token: &TokenIdentifier,
        epoch: u64,
    ) -> BigUint {
        if epoch >= self.current_epoch() {
            return BigUint::zero();
        }
        let rewards = self.rewards_per_epoch(pool, token, epoch).get();
        if rewards == 0u64 {
            return BigUint::zero();
        }
        let total = self.checkpoint_at(&self.pool_weight_history(pool), epoch);
        if total == 0u64 {
            return BigUint::zero();
        }
        let balance = self.bribe_balance_in_effect(pool, account, epoch);
        rewards * balance / total
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(bribeEarnedAt)]
    fn bribe_earned_at(&self, pool: u64, account: ManagedAddress, token: TokenIdentifier, epoch: u64) -> BigUint {
        self.bribe_earned_in_epoch(pool, &account, &token, epoch)
    }

    /// Everything claimable now, ignoring the per-call epoch cap.
    #[view(bribeEarned)]
    fn bribe_earned(&self, pool: u64, account: ManagedAddress, token: TokenIdentifier) -> BigUint {
        let mut amount = BigUint::zero();
        let first = match self.first_checkpoint_epoch(&self.bribe_balance_history(pool, &account)) {
            Some(epoch) => epoch,
            None => return amount,
        };
        let mut epoch = core::cmp::max(first, self.bribe_cursor(pool, &account).get());
        let current = self.current_epoch();
        while epoch < current {
            amount += self.bribe_earned_in_epoch(pool, &account, &token, epoch);
            epoch += WEEK;
        }
        amount
    }

    /// Balance as of the next epoch, where the latest write lands.
    #[view(bribeBalanceOf)]
    fn bribe_balance_of(&self, pool: u64, account: ManagedAddress) -> BigUint {
        let epoch = self.current_epoch() + WEEK;
        self.bribe_balance_in_effect(pool, &account, epoch)
    }

    #[view(bribeBalanceAt)]
    fn bribe_balance_at(&self, pool: u64, account: ManagedAddress, epoch: u64) -> BigUint {
        self.bribe_balance_in_effect(pool, &account, epoch)
    }

    #[view(bribeTotalSupply)]
    fn bribe_total_supply(&self, pool: u64) -> BigUint {
        self.latest_checkpoint(&self.pool_weight_history(pool))
    }

    #[view(bribeTotalSupplyAt)]
    fn bribe_total_supply_at(&self, pool: u64, epoch: u64) -> BigUint {
        self.checkpoint_at(&self.pool_weight_history(pool), epoch)
    }

    #[view(getBribeRewardTokens)]
    fn get_bribe_reward_tokens(&self, pool: u64) -> MultiValueEncoded<TokenIdentifier> {
        let mut result = MultiValueEncoded::new();
        for token in self.bribe_reward_tokens(pool).iter() {
            result.push(token);
        }
        result
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("bribeBalanceHistory")]
    fn bribe_balance_history(&self, pool: u64, account: &ManagedAddress) -> VecMapper<Checkpoint<Self::Api>>;

    #[storage_mapper("bribeBalanceGeneration")]
    fn bribe_balance_generation(&self, pool: u64, account: &ManagedAddress, epoch: u64) -> SingleValueMapper<u64>;

    /// First epoch in which `generation` of the pool's gauge counts.
    #[view(getGenerationStart)]
    #[storage_mapper("generationStart")]
    fn generation_start(&self, pool: u64, generation: u64) -> SingleValueMapper<u64>;

    #[storage_mapper("poolWeightHistory")]
    fn pool_weight_history(&self, pool: u64) -> VecMapper<Checkpoint<Self::Api>>;

    #[storage_mapper("bribeRewardTokens")]
    fn bribe_reward_tokens(&self, pool: u64) -> UnorderedSetMapper<TokenIdentifier>;

    #[view(getBribeTokenWhitelist)]
    #[storage_mapper("bribeTokenWhitelist")]
    fn bribe_token_whitelist(&self) -> UnorderedSetMapper<TokenIdentifier>;

    #[view(getRewardsPerEpoch)]
    #[storage_mapper("rewardsPerEpoch")]
    fn rewards_per_epoch(&self, pool: u64, token: &TokenIdentifier, epoch: u64) -> SingleValueMapper<BigUint>;

    #[view(getBribeCursor)]
    #[storage_mapper("bribeCursor")]
    fn bribe_cursor(&self, pool: u64, account: &ManagedAddress) -> SingleValueMapper<u64>;
}
