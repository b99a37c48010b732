multiversx_sc::imports!();

use crate::checkpoints::WEEK;
use crate::errors::*;
use crate::types::{Checkpoint, DistributionBatch, GaugeInfo, RewardState};

// ============================================================
// GaugeFactory
//
// Tallies ve-weighted votes per pool and pushes each epoch's
// emission into the gauges.
//
// A vote cast during epoch E takes effect from E + WEEK: voter
// balances, pool weights and the total weight are all
// checkpointed there. The batch staged for epoch E is therefore
// split by weights that can no longer move, whatever order the
// distribute calls run in.
// ============================================================

#[multiversx_sc::module]
pub trait GaugeFactoryModule:
    crate::gauge::GaugeModule
    + crate::bribe::BribeModule
    + crate::registry::RegistryModule
    + crate::voting_escrow::VotingEscrowModule
    + crate::checkpoints::CheckpointsModule
    + crate::fees::FeesModule
    + crate::pair::PairModule
    + crate::config::ConfigModule
    + crate::events::EventsModule
{
    // ========================================================
    // ENDPOINT: voteFor
    // Entry point for an external vote proxy contract.
    // ========================================================

    #[endpoint(voteFor)]
    fn vote_for(&self, account: ManagedAddress, pools: ManagedVec<u64>, weights: ManagedVec<BigUint>) -> BigUint {
        self.require_not_paused();
        let caller = self.blockchain().get_caller();
        require!(
            !self.voter().is_empty() && self.voter().get() == caller,
            ERR_UNAUTHORIZED
        );
        self.apply_vote(&account, &pools, &weights)
    }

    // ========================================================
    // ENDPOINT: poke
    // Re-applies the account's current pool ratios at its present
    // ve balance, so decayed votes stop overstating its weight.
    // Does not count as the account's vote for the epoch.
    // ========================================================

    #[endpoint(poke)]
    fn poke(&self, account: ManagedAddress) -> BigUint {
        self.require_not_paused();
        let caller = self.blockchain().get_caller();
        if caller != account {
            self.require_owner_or_admin();
        }

        let now = self.blockchain().get_block_timestamp();
        let last_poked = self.last_poked(&account);
        if !last_poked.is_empty() {
            require!(now >= last_poked.get() + self.poke_delay().get(), ERR_POKE_TOO_SOON);
        }
        last_poked.set(now);

        let mut pools = ManagedVec::new();
        let mut weights = ManagedVec::new();
        let mut weight_sum = BigUint::zero();
        for pool in self.voted_pools(&account).iter() {
            let info = self.gauge_info(pool).get();
            if !info.alive || info.generation != self.vote_generation(&account, pool).get() {
                continue;
            }
            let votes = self.votes(&account, pool).get();
            weight_sum += &votes;
            pools.push(pool);
            weights.push(votes);
        }

        self.clear_votes(&account);

        let ve_balance = self.ve_balance_at(&account, now);
        let used = if weight_sum == 0u64 || ve_balance == 0u64 {
            BigUint::zero()
        } else {
            self.allocate_votes(&account, &pools, &weights, &weight_sum, &ve_balance)
        };

        self.poked_event(&account, self.current_epoch(), &used);
        used
    }

    /// Minimum seconds between two pokes of the same account.
    #[endpoint(setPokeDelay)]
    fn set_poke_delay(&self, delay: u64) {
        self.require_owner_or_admin();
        self.poke_delay().set(delay);
        self.poke_delay_set_event(delay);
    }

    // ========================================================
    // ENDPOINTS: emission
    // ========================================================

    #[payable("*")]
    #[endpoint(fundEmission)]
    fn fund_emission(&self) {
        let caller = self.blockchain().get_caller();
        require!(
            caller == self.owner().get() || (!self.minter().is_empty() && caller == self.minter().get()),
            ERR_UNAUTHORIZED
        );

        let payment = self.call_value().single_esdt();
        require!(
            payment.token_identifier == self.emission_token().get() && payment.token_nonce == 0,
            ERR_INVALID_TOKEN
        );
        require!(payment.amount > 0u64, ERR_INVALID_AMOUNT);

        self.pending_emission()
            .update(|pending| *pending += &payment.amount);
        self.emission_funded_event(&caller, &payment.amount);
    }

    /// Stages pending emission plus last batch's undistributed rest
    /// for the current epoch. Once per epoch.
    #[endpoint(preDistribute)]
    fn pre_distribute(&self) -> BigUint {
        let epoch = self.current_epoch();

        let mut amount = self.pending_emission().take();
        if !self.distribution_batch().is_empty() {
            let previous = self.distribution_batch().get();
            require!(previous.epoch < epoch, ERR_ALREADY_STAGED);
            amount += &previous.amount - &previous.paid;
        }

        let total_weight = self.checkpoint_at(&self.total_weight_history(), epoch);
        self.distribution_batch().set(&DistributionBatch {
            epoch,
            amount: amount.clone(),
            total_weight: total_weight.clone(),
            paid: BigUint::zero(),
        });

        self.emission_staged_event(epoch, &amount, &total_weight);
        amount
    }

    /// Pays the staged batch into pools `[start, end)` of the pool
    /// list. Pools already served for the batch epoch are skipped,
    /// so repeated or overlapping ranges pay nothing twice.
    #[endpoint(distribute)]
    fn distribute(&self, start: usize, end: usize) -> BigUint {
        require!(!self.distribution_batch().is_empty(), ERR_NOT_STAGED);
        let mut batch = self.distribution_batch().get();
        let mut distributed = BigUint::zero();
        if batch.total_weight == 0u64 {
            return distributed;
        }

        let end = core::cmp::min(end, self.pools().len());
        for index in start..end {
            let pool = self.pools().get(index + 1);
            if self.last_distributed_epoch(pool).get() == batch.epoch {
                continue;
            }
            self.last_distributed_epoch(pool).set(batch.epoch);

            let info = self.gauge_info(pool).get();
            if !info.alive {
                continue;
            }
            let weight = self.checkpoint_at(&self.pool_weight_history(pool), batch.epoch);
            if weight == 0u64 {
                continue;
            }

            let mut share = &batch.amount * &weight / &batch.total_weight;
            if info.max_rewards > 0u64 && share > info.max_rewards {
                share = info.max_rewards.clone();
            }
            if share == 0u64 {
                continue;
            }

            self.notify_gauge_reward(pool, &share);
            self.gauge_reward_notified_event(pool, batch.epoch, &share);
            distributed += &share;
        }

        batch.paid += &distributed;
        self.distribution_batch().set(&batch);
        distributed
    }

    // ========================================================
    // ENDPOINTS: gauge administration
    // ========================================================

    /// `initial_allocation` is the per-epoch emission cap, zero for none.
    #[endpoint(addGauge)]
    fn add_gauge(&self, pool: u64, initial_allocation: BigUint) {
        self.require_owner_or_admin();
        self.require_pair(pool);
        require!(self.gauge_info(pool).is_empty(), ERR_GAUGE_EXISTS);

        let now = self.blockchain().get_block_timestamp();
        self.gauge_info(pool).set(&GaugeInfo {
            pool,
            alive: true,
            max_rewards: initial_allocation.clone(),
            created_at: now,
            generation: 0,
        });
        self.reward_state(pool).set(&RewardState {
            reward_rate: BigUint::zero(),
            period_finish: 0,
            last_update_time: now,
            reward_per_token_stored: BigUint::zero(),
        });
        self.pools().push(&pool);

        self.gauge_added_event(pool, &initial_allocation);
    }

    #[endpoint(setGaugeAllocation)]
    fn set_gauge_allocation(&self, pool: u64, max_rewards: BigUint) {
        self.require_owner_or_admin();
        let mut info = self.require_gauge(pool);
        info.max_rewards = max_rewards.clone();
        self.gauge_info(pool).set(&info);
        self.gauge_allocation_set_event(pool, &max_rewards);
    }

    /// Drops the pool's weight from the tally. Votes cast before this
    /// point stop counting, even after a resurrection.
    #[endpoint(deprecateGauge)]
    fn deprecate_gauge(&self, pool: u64) {
        self.require_owner_or_admin();
        let mut info = self.require_live_gauge(pool);

        let removed = self.weights(pool).take();
        let total = self.total_weight().get() - &removed;
        self.set_total_weight(&total);
        self.bribe_set_total(pool, &BigUint::zero());

        info.alive = false;
        info.generation += 1;
        self.gauge_info(pool).set(&info);
        self.bribe_start_generation(pool, info.generation);

        self.gauge_deprecated_event(pool, &removed);
    }

    #[endpoint(resurrectGauge)]
    fn resurrect_gauge(&self, pool: u64) {
        self.require_owner_or_admin();
        let mut info = self.require_gauge(pool);
        require!(!info.alive, ERR_GAUGE_ALIVE);
        info.alive = true;
        self.gauge_info(pool).set(&info);
        self.gauge_resurrected_event(pool);
    }

    // ========================================================
    // INTERNAL: voting
    // ========================================================

    /// Replaces `voter`'s allocation. Weights are relative; each live
    /// pool receives `weight * ve / Σ weights`. Returns the ve used.
    fn apply_vote(
        &self,
        voter: &ManagedAddress,
        pools: &ManagedVec<u64>,
        weights: &ManagedVec<BigUint>,
    ) -> BigUint {
        require!(pools.len() == weights.len(), ERR_LENGTH_MISMATCH);
        require!(!pools.is_empty(), ERR_INVALID_AMOUNT);
        self.require_vote_open(voter);

        self.clear_votes(voter);

        let now = self.blockchain().get_block_timestamp();
        let ve_balance = self.ve_balance_at(voter, now);
        require!(ve_balance > 0u64, ERR_NO_VOTING_POWER);

        let mut weight_sum = BigUint::zero();
        for (index, pool) in pools.iter().enumerate() {
            for earlier in pools.iter().take(index) {
                require!(earlier != pool, ERR_DUPLICATE_POOL);
            }
            let info = self.require_gauge(pool);
            if info.alive {
                weight_sum += &*weights.get(index);
            }
        }
        require!(weight_sum > 0u64, ERR_INVALID_AMOUNT);

        let used = self.allocate_votes(voter, pools, weights, &weight_sum, &ve_balance);
        self.last_voted(voter).set(self.current_epoch());
        used
    }

    /// Gives each live pool `weight * ve_balance / weight_sum` votes from
    /// the next epoch on. Expects `voter`'s previous votes cleared.
    fn allocate_votes(
        &self,
        voter: &ManagedAddress,
        pools: &ManagedVec<u64>,
        weights: &ManagedVec<BigUint>,
        weight_sum: &BigUint,
        ve_balance: &BigUint,
    ) -> BigUint {
        let epoch = self.current_epoch();
        let mut used = BigUint::zero();
        for (index, pool) in pools.iter().enumerate() {
            let info = self.gauge_info(pool).get();
            if !info.alive {
                continue;
            }
            let votes = &*weights.get(index) * ve_balance / weight_sum;
            if votes == 0u64 {
                continue;
            }

            let pool_weight = self.weights(pool).get() + &votes;
            self.weights(pool).set(&pool_weight);
            self.bribe_set_total(pool, &pool_weight);
            self.bribe_set_balance(pool, voter, &votes);

            self.votes(voter, pool).set(&votes);
            self.vote_generation(voter, pool).set(info.generation);
            self.voted_pools(voter).push(&pool);
            used += &votes;

            self.vote_event(voter, pool, epoch + WEEK, &votes);
        }

        let total = self.total_weight().get() + &used;
        self.set_total_weight(&total);
        self.used_weight(voter).set(&used);
        used
    }

    fn reset_votes(&self, voter: &ManagedAddress) {
        self.require_not_paused();
        self.require_vote_open(voter);
        self.clear_votes(voter);
        let epoch = self.current_epoch();
        self.last_voted(voter).set(epoch);
        self.votes_reset_event(voter, epoch);
    }

    fn require_vote_open(&self, voter: &ManagedAddress) {
        let epoch = self.current_epoch();
        require!(
            self.last_voted(voter).is_empty() || self.last_voted(voter).get() < epoch,
            ERR_ALREADY_VOTED
        );
    }

    /// Takes back `voter`'s current allocation. Votes on a gauge that
    /// was deprecated since they were cast were already removed.
    fn clear_votes(&self, voter: &ManagedAddress) {
        let mut removed = BigUint::zero();
        for pool in self.voted_pools(voter).iter() {
            let votes = self.votes(voter, pool).take();
            let generation = self.vote_generation(voter, pool).take();
            let info = self.gauge_info(pool).get();

            if info.alive && info.generation == generation {
                let pool_weight = self.weights(pool).get() - &votes;
                self.weights(pool).set(&pool_weight);
                self.bribe_set_total(pool, &pool_weight);
                removed += &votes;
            }
            self.bribe_set_balance(pool, voter, &BigUint::zero());
        }

        self.voted_pools(voter).clear();
        self.used_weight(voter).clear();
        if removed > 0u64 {
            let total = self.total_weight().get() - &removed;
            self.set_total_weight(&total);
        }
    }

    fn set_total_weight(&self, total: &BigUint) {
        self.total_weight().set(total);
        let epoch = self.current_epoch() + WEEK;
        self.write_checkpoint(self.total_weight_history(), epoch, total);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getWeightAt)]
    fn get_weight_at(&self, pool: u64, epoch: u64) -> BigUint {
        self.checkpoint_at(&self.pool_weight_history(pool), epoch)
    }

    #[view(getTotalWeightAt)]
    fn get_total_weight_at(&self, epoch: u64) -> BigUint {
        self.checkpoint_at(&self.total_weight_history(), epoch)
    }

    #[view(getVotedPools)]
    fn get_voted_pools(&self, voter: ManagedAddress) -> MultiValueEncoded<u64> {
        let mut result = MultiValueEncoded::new();
        for pool in self.voted_pools(&voter).iter() {
            result.push(pool);
        }
        result
    }

    #[view(getDistributionBatch)]
    fn get_distribution_batch(&self) -> OptionalValue<DistributionBatch<Self::Api>> {
        if self.distribution_batch().is_empty() {
            return OptionalValue::None;
        }
        OptionalValue::Some(self.distribution_batch().get())
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[view(getWeight)]
    #[storage_mapper("weights")]
    fn weights(&self, pool: u64) -> SingleValueMapper<BigUint>;

    #[view(getTotalWeight)]
    #[storage_mapper("totalWeight")]
    fn total_weight(&self) -> SingleValueMapper<BigUint>;

    #[storage_mapper("totalWeightHistory")]
    fn total_weight_history(&self) -> VecMapper<Checkpoint<Self::Api>>;

    #[view(getVotes)]
    #[storage_mapper("votes")]
    fn votes(&self, voter: &ManagedAddress, pool: u64) -> SingleValueMapper<BigUint>;

    #[storage_mapper("voteGeneration")]
    fn vote_generation(&self, voter: &ManagedAddress, pool: u64) -> SingleValueMapper<u64>;

    #[storage_mapper("votedPools")]
    fn voted_pools(&self, voter: &ManagedAddress) -> VecMapper<u64>;

    #[view(getUsedWeight)]
    #[storage_mapper("usedWeight")]
    fn used_weight(&self, voter: &ManagedAddress) -> SingleValueMapper<BigUint>;

    #[view(getLastVoted)]
    #[storage_mapper("lastVoted")]
    fn last_voted(&self, voter: &ManagedAddress) -> SingleValueMapper<u64>;

    #[view(getPokeDelay)]
    #[storage_mapper("pokeDelay")]
    fn poke_delay(&self) -> SingleValueMapper<u64>;

    #[view(getLastPoked)]
    #[storage_mapper("lastPoked")]
    fn last_poked(&self, account: &ManagedAddress) -> SingleValueMapper<u64>;

    #[view(getPendingEmission)]
    #[storage_mapper("pendingEmission")]
    fn pending_emission(&self) -> SingleValueMapper<BigUint>;

    #[storage_mapper("distributionBatch")]
    fn distribution_batch(&self) -> SingleValueMapper<DistributionBatch<Self::Api>>;

    #[view(getLastDistributedEpoch)]
    #[storage_mapper("lastDistributedEpoch")]
    fn last_distributed_epoch(&self, pool: u64) -> SingleValueMapper<u64>;
}
