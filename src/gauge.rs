multiversx_sc::imports!();

use crate::amm_math::precision;
use crate::checkpoints::WEEK;
use crate::errors::*;
use crate::types::{Pair, RewardState};

pub const REWARDS_DURATION: u64 = WEEK;

/// Share of a stake that counts without any ve balance
pub const BOOST_BASE_BPS: u64 = 4_000;

// ============================================================
// Gauge
//
// Per-pool staking vault. Staked LP sits in the ledger under the
// contract's own address, which makes the gauge an LP holder of
// its pair and lets it claim that pair's fees for voters.
//
// Emission streams Synthetix-style over REWARDS_DURATION and is
// shared by derived (boosted) balances:
//   derived = min(bal * 40% + supply * ve / veTotal * 60%, bal)
// ============================================================

#[multiversx_sc::module]
pub trait GaugeModule:
    crate::bribe::BribeModule
    + crate::registry::RegistryModule
    + crate::voting_escrow::VotingEscrowModule
    + crate::checkpoints::CheckpointsModule
    + crate::fees::FeesModule
    + crate::pair::PairModule
    + crate::config::ConfigModule
    + crate::events::EventsModule
{
    // ========================================================
    // ENDPOINTS: staking
    // ========================================================

    #[endpoint(deposit)]
    fn deposit(&self, pool: u64, amount: BigUint) {
        let caller = self.blockchain().get_caller();
        self.stake(pool, &caller, &caller, &amount);
    }

    /// Stakes the caller's LP on behalf of `account`.
    #[endpoint(depositFor)]
    fn deposit_for(&self, pool: u64, amount: BigUint, account: ManagedAddress) {
        require!(!account.is_zero(), ERR_INVALID_ADDRESS);
        let caller = self.blockchain().get_caller();
        self.stake(pool, &caller, &account, &amount);
    }

    /// Open on deprecated gauges too.
    #[endpoint(withdraw)]
    fn withdraw(&self, pool: u64, amount: BigUint) {
        let caller = self.blockchain().get_caller();
        self.unstake(pool, &caller, &amount);
    }

    #[endpoint(withdrawAll)]
    fn withdraw_all(&self, pool: u64) -> BigUint {
        let caller = self.blockchain().get_caller();
        let amount = self.gauge_balance(pool, &caller).get();
        self.unstake(pool, &caller, &amount);
        amount
    }

    #[endpoint(getReward)]
    fn get_reward(&self, pool: u64, opt_referrer: OptionalValue<ManagedAddress>) -> BigUint {
        self.require_gauge(pool);
        let caller = self.blockchain().get_caller();
        self.pay_reward(pool, &caller, opt_referrer.into_option())
    }

    /// withdrawAll followed by getReward.
    #[endpoint(exit)]
    fn exit(&self, pool: u64) -> MultiValue2<BigUint, BigUint> {
        let caller = self.blockchain().get_caller();
        let amount = self.gauge_balance(pool, &caller).get();
        if amount > 0u64 {
            self.unstake(pool, &caller, &amount);
        }
        let reward = self.pay_reward(pool, &caller, None);
        (amount, reward).into()
    }

    /// Re-derives `account`'s boost, e.g. after its lock decayed.
    #[endpoint(kick)]
    fn kick(&self, pool: u64, account: ManagedAddress) {
        self.require_gauge(pool);
        self.update_reward(pool, Some(&account));
        self.update_derived_balance(pool, &account);
    }

    // ========================================================
    // ENDPOINT: claimVotingFees
    // Pulls the gauge's LP fee share out of the custodian. The
    // maker and the pair's protocol address take their cuts,
    // the rest becomes next epoch's bribes. A cut with no
    // receiver is retained in unallocatedFees.
    // ========================================================

    #[endpoint(claimVotingFees)]
    fn claim_voting_fees(&self, pool: u64) -> MultiValue2<BigUint, BigUint> {
        self.require_live_gauge(pool);
        let pair = self.require_pair(pool);
        let holder = self.blockchain().get_sc_address();

        let (amount0, amount1) = self.take_claimable_fees(&pair, &holder);
        self.flush_skims(&pair);

        self.split_voting_fees(pool, &pair, 0, &amount0);
        self.split_voting_fees(pool, &pair, 1, &amount1);

        (amount0, amount1).into()
    }

    // ========================================================
    // INTERNAL: stake movements
    // ========================================================

    fn stake(&self, pool: u64, from: &ManagedAddress, account: &ManagedAddress, amount: &BigUint) {
        self.require_not_paused();
        self.require_live_gauge(pool);
        require!(*amount > 0u64, ERR_INVALID_AMOUNT);

        self.update_reward(pool, Some(account));

        let vault = self.blockchain().get_sc_address();
        self.move_lp(pool, from, &vault, amount);
        self.gauge_balance(pool, account).update(|balance| *balance += amount);
        self.gauge_total_supply(pool).update(|supply| *supply += amount);
        self.staked_pools(account).insert(pool);

        self.update_derived_balance(pool, account);

        self.staked_event(pool, from, account, amount);
    }

    fn unstake(&self, pool: u64, account: &ManagedAddress, amount: &BigUint) {
        self.require_gauge(pool);
        require!(*amount > 0u64, ERR_INVALID_AMOUNT);
        let balance = self.gauge_balance(pool, account).get();
        require!(*amount <= balance, ERR_INSUFFICIENT_BALANCE);

        self.update_reward(pool, Some(account));

        let remaining = balance - amount;
        self.gauge_balance(pool, account).set(&remaining);
        self.gauge_total_supply(pool).update(|supply| *supply -= amount);
        if remaining == 0u64 {
            self.staked_pools(account).swap_remove(&pool);
        }

        self.update_derived_balance(pool, account);

        let vault = self.blockchain().get_sc_address();
        self.move_lp(pool, &vault, account, amount);

        self.unstaked_event(pool, account, amount);
    }

    fn pay_reward(
        &self,
        pool: u64,
        account: &ManagedAddress,
        referrer: Option<ManagedAddress>,
    ) -> BigUint {
        self.update_reward(pool, Some(account));
        let mut reward = self.gauge_rewards(pool, account).take();

        if reward > 0u64 {
            let token = self.emission_token().get();
            if let Some(receiver) = self.referral_receiver(referrer) {
                let cut = self.mul_bps(&reward, self.referral_fee_bps().get());
                if cut > 0u64 {
                    reward -= &cut;
                    self.send().direct_esdt(&receiver, &token, 0, &cut);
                    self.referral_paid_event(pool, &receiver, &cut);
                }
            }

            if reward > 0u64 {
                self.send().direct_esdt(account, &token, 0, &reward);
            }
            self.reward_paid_event(pool, account, &reward);
        }

        self.update_derived_balance(pool, account);
        reward
    }

    /// Explicit referrer first, then the main receiver.
    fn referral_receiver(&self, referrer: Option<ManagedAddress>) -> Option<ManagedAddress> {
        if let Some(address) = referrer {
            if !address.is_zero() {
                return Some(address);
            }
        }
        if self.main_ref_fee_receiver().is_empty() {
            return None;
        }
        let main = self.main_ref_fee_receiver().get();
        if main.is_zero() {
            None
        } else {
            Some(main)
        }
    }

    fn split_voting_fees(&self, pool: u64, pair: &Pair<Self::Api>, side: u8, amount: &BigUint) {
        if *amount == 0u64 {
            return;
        }
        let token = pair.token(side);

        let maker_cut = self.mul_bps(amount, self.gauge_maker_fee_bps().get());
        let protocol_cut = self.mul_bps(amount, self.gauge_protocol_fee_bps().get());
        let bribe_amount = amount - &maker_cut - &protocol_cut;

        if maker_cut > 0u64 {
            let maker = if self.maker().is_empty() {
                ManagedAddress::zero()
            } else {
                self.maker().get()
            };
            if maker.is_zero() {
                self.unallocated_fees(token).update(|fees| *fees += &maker_cut);
            } else {
                self.send().direct_esdt(&maker, token, 0, &maker_cut);
            }
        }

        if protocol_cut > 0u64 {
            if pair.protocol_address.is_zero() {
                self.unallocated_fees(token).update(|fees| *fees += &protocol_cut);
            } else {
                self.send()
                    .direct_esdt(&pair.protocol_address, token, 0, &protocol_cut);
            }
        }

        if bribe_amount > 0u64 {
            self.add_bribe_reward(pool, token, &bribe_amount);
        }

        self.voting_fees_claimed_event(pool, token, &maker_cut, &protocol_cut, &bribe_amount);
    }

    // ========================================================
    // INTERNAL: reward accounting
    // ========================================================

    fn reward_state_of(&self, pool: u64) -> RewardState<Self::Api> {
        if self.reward_state(pool).is_empty() {
            RewardState {
                reward_rate: BigUint::zero(),
                period_finish: 0,
                last_update_time: 0,
                reward_per_token_stored: BigUint::zero(),
            }
        } else {
            self.reward_state(pool).get()
        }
    }

    fn last_time_applicable(&self, state: &RewardState<Self::Api>) -> u64 {
        core::cmp::min(self.blockchain().get_block_timestamp(), state.period_finish)
    }

    fn current_reward_per_token(&self, pool: u64, state: &RewardState<Self::Api>) -> BigUint {
        let derived_supply = self.gauge_derived_supply(pool).get();
        let applicable = self.last_time_applicable(state);
        if derived_supply == 0u64 || applicable <= state.last_update_time {
            return state.reward_per_token_stored.clone();
        }
        let elapsed = applicable - state.last_update_time;
        &state.reward_per_token_stored + &(&state.reward_rate * elapsed / &derived_supply)
    }

    fn earned_by(&self, pool: u64, account: &ManagedAddress, reward_per_token: &BigUint) -> BigUint {
        let derived = self.gauge_derived_balance(pool, account).get();
        let paid = self.user_reward_per_token_paid(pool, account).get();
        let stored = self.gauge_rewards(pool, account).get();
        if *reward_per_token <= paid {
            return stored;
        }
        derived * &(reward_per_token - &paid) / precision::<Self::Api>() + stored
    }

    /// Checkpoints the stream and, if given, `account`'s accrued reward.
    /// Runs before any change to balances or derived balances.
    fn update_reward(&self, pool: u64, account: Option<&ManagedAddress>) {
        let mut state = self.reward_state_of(pool);
        let reward_per_token = self.current_reward_per_token(pool, &state);
        state.last_update_time = self.last_time_applicable(&state);
        state.reward_per_token_stored = reward_per_token.clone();
        self.reward_state(pool).set(&state);

        if let Some(account) = account {
            let earned = self.earned_by(pool, account, &reward_per_token);
            self.gauge_rewards(pool, account).set(&earned);
            self.user_reward_per_token_paid(pool, account)
                .set(&reward_per_token);
        }
    }

    /// Streams `amount` of emission over the next REWARDS_DURATION,
    /// folding in whatever the running period has not paid out yet.
    fn notify_gauge_reward(&self, pool: u64, amount: &BigUint) {
        self.update_reward(pool, None);

        let now = self.blockchain().get_block_timestamp();
        let mut state = self.reward_state_of(pool);
        let scaled = amount * &precision::<Self::Api>();
        state.reward_rate = if now >= state.period_finish {
            scaled / REWARDS_DURATION
        } else {
            let leftover = &state.reward_rate * (state.period_finish - now);
            (scaled + leftover) / REWARDS_DURATION
        };
        state.last_update_time = now;
        state.period_finish = now + REWARDS_DURATION;
        self.reward_state(pool).set(&state);
    }

    // ========================================================
    // INTERNAL: boost
    // ========================================================

    fn derived_balance(&self, pool: u64, account: &ManagedAddress) -> BigUint {
        let balance = self.gauge_balance(pool, account).get();
        if balance == 0u64 {
            return balance;
        }
        let mut derived = self.mul_bps(&balance, BOOST_BASE_BPS);

        let ve_total = self.ve_supply_now();
        if ve_total > 0u64 {
            let now = self.blockchain().get_block_timestamp();
            let ve_balance = self.ve_balance_at(account, now);
            let adjusted = self.gauge_total_supply(pool).get() * ve_balance / ve_total;
            derived += self.mul_bps(&adjusted, crate::config::BPS_DENOMINATOR - BOOST_BASE_BPS);
        }

        self.min_biguint(&derived, &balance)
    }

    fn update_derived_balance(&self, pool: u64, account: &ManagedAddress) {
        let previous = self.gauge_derived_balance(pool, account).get();
        let next = self.derived_balance(pool, account);
        self.gauge_derived_supply(pool)
            .update(|supply| *supply = &*supply - &previous + &next);
        self.gauge_derived_balance(pool, account).set(&next);
    }

    /// Re-derives `account`'s boost in every gauge it stakes in.
    fn refresh_boosts(&self, account: &ManagedAddress) {
        for pool in self.staked_pools(account).iter() {
            self.update_reward(pool, Some(account));
            self.update_derived_balance(pool, account);
        }
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(earned)]
    fn earned(&self, pool: u64, account: ManagedAddress) -> BigUint {
        let state = self.reward_state_of(pool);
        let reward_per_token = self.current_reward_per_token(pool, &state);
        self.earned_by(pool, &account, &reward_per_token)
    }

    #[view(rewardPerToken)]
    fn reward_per_token(&self, pool: u64) -> BigUint {
        let state = self.reward_state_of(pool);
        self.current_reward_per_token(pool, &state)
    }

    #[view(lastTimeRewardApplicable)]
    fn last_time_reward_applicable(&self, pool: u64) -> u64 {
        let state = self.reward_state_of(pool);
        self.last_time_applicable(&state)
    }

    /// Scaled by 1e18
    #[view(getRewardRate)]
    fn get_reward_rate(&self, pool: u64) -> BigUint {
        self.reward_state_of(pool).reward_rate
    }

    #[view(getPeriodFinish)]
    fn get_period_finish(&self, pool: u64) -> u64 {
        self.reward_state_of(pool).period_finish
    }

    #[view(getStakedPools)]
    fn get_staked_pools(&self, account: ManagedAddress) -> MultiValueEncoded<u64> {
        let mut result = MultiValueEncoded::new();
        for pool in self.staked_pools(&account).iter() {
            result.push(pool);
        }
        result
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("rewardState")]
    fn reward_state(&self, pool: u64) -> SingleValueMapper<RewardState<Self::Api>>;

    #[view(getGaugeTotalSupply)]
    #[storage_mapper("gaugeTotalSupply")]
    fn gauge_total_supply(&self, pool: u64) -> SingleValueMapper<BigUint>;

    #[view(getDerivedSupply)]
    #[storage_mapper("gaugeDerivedSupply")]
    fn gauge_derived_supply(&self, pool: u64) -> SingleValueMapper<BigUint>;

    #[view(getGaugeBalance)]
    #[storage_mapper("gaugeBalance")]
    fn gauge_balance(&self, pool: u64, account: &ManagedAddress) -> SingleValueMapper<BigUint>;

    #[view(getDerivedBalance)]
    #[storage_mapper("gaugeDerivedBalance")]
    fn gauge_derived_balance(&self, pool: u64, account: &ManagedAddress) -> SingleValueMapper<BigUint>;

    #[storage_mapper("userRewardPerTokenPaid")]
    fn user_reward_per_token_paid(&self, pool: u64, account: &ManagedAddress) -> SingleValueMapper<BigUint>;

    #[storage_mapper("gaugeRewards")]
    fn gauge_rewards(&self, pool: u64, account: &ManagedAddress) -> SingleValueMapper<BigUint>;

    #[storage_mapper("stakedPools")]
    fn staked_pools(&self, account: &ManagedAddress) -> UnorderedSetMapper<u64>;

    #[view(getUnallocatedFees)]
    #[storage_mapper("unallocatedFees")]
    fn unallocated_fees(&self, token: &TokenIdentifier) -> SingleValueMapper<BigUint>;
}
