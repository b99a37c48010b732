multiversx_sc::imports!();

#[multiversx_sc::module]
pub trait EventsModule {
    // ── Pairs ──

    #[event("pairCreated")]
    fn pair_created_event(
        &self,
        #[indexed] pair_id: u64,
        #[indexed] token0: &TokenIdentifier,
        #[indexed] token1: &TokenIdentifier,
        #[indexed] stable: bool,
        fee: u64,
    );

    #[event("liquidityAdded")]
    fn liquidity_added_event(
        &self,
        #[indexed] pair_id: u64,
        #[indexed] to: &ManagedAddress,
        #[indexed] amount0: &BigUint,
        #[indexed] amount1: &BigUint,
        liquidity: &BigUint,
    );

    #[event("liquidityRemoved")]
    fn liquidity_removed_event(
        &self,
        #[indexed] pair_id: u64,
        #[indexed] to: &ManagedAddress,
        #[indexed] amount0: &BigUint,
        #[indexed] amount1: &BigUint,
        liquidity: &BigUint,
    );

    #[event("swap")]
    fn swap_event(
        &self,
        #[indexed] pair_id: u64,
        #[indexed] caller: &ManagedAddress,
        #[indexed] token_in: &TokenIdentifier,
        #[indexed] amount_in: &BigUint,
        #[indexed] to: &ManagedAddress,
        amount_out: &BigUint,
    );

    #[event("feeSet")]
    fn fee_set_event(&self, #[indexed] pair_id: u64, fee: u64);

    #[event("protocolAddressSet")]
    fn protocol_address_set_event(&self, #[indexed] pair_id: u64, address: &ManagedAddress);

    // ── Fees custodian ──

    #[event("feesClaimed")]
    fn fees_claimed_event(
        &self,
        #[indexed] pair_id: u64,
        #[indexed] account: &ManagedAddress,
        #[indexed] amount0: &BigUint,
        amount1: &BigUint,
    );

    #[event("skimPaid")]
    fn skim_paid_event(
        &self,
        #[indexed] pair_id: u64,
        #[indexed] receiver: &ManagedAddress,
        #[indexed] token: &TokenIdentifier,
        amount: &BigUint,
    );

    // ── Voting escrow ──

    #[event("lockCreated")]
    fn lock_created_event(
        &self,
        #[indexed] account: &ManagedAddress,
        #[indexed] amount: &BigUint,
        unlock_time: u64,
    );

    #[event("lockIncreased")]
    fn lock_increased_event(
        &self,
        #[indexed] account: &ManagedAddress,
        #[indexed] added: &BigUint,
        total: &BigUint,
    );

    #[event("lockExtended")]
    fn lock_extended_event(&self, #[indexed] account: &ManagedAddress, unlock_time: u64);

    #[event("lockWithdrawn")]
    fn lock_withdrawn_event(&self, #[indexed] account: &ManagedAddress, amount: &BigUint);

    // ── Gauge factory ──

    #[event("gaugeAdded")]
    fn gauge_added_event(&self, #[indexed] pool: u64, max_rewards: &BigUint);

    #[event("gaugeAllocationSet")]
    fn gauge_allocation_set_event(&self, #[indexed] pool: u64, max_rewards: &BigUint);

    #[event("gaugeDeprecated")]
    fn gauge_deprecated_event(&self, #[indexed] pool: u64, removed_weight: &BigUint);

    #[event("gaugeResurrected")]
    fn gauge_resurrected_event(&self, #[indexed] pool: u64);

    #[event("vote")]
    fn vote_event(
        &self,
        #[indexed] voter: &ManagedAddress,
        #[indexed] pool: u64,
        #[indexed] epoch: u64,
        weight: &BigUint,
    );

    #[event("poked")]
    fn poked_event(&self, #[indexed] account: &ManagedAddress, #[indexed] epoch: u64, used_weight: &BigUint);

    #[event("pokeDelaySet")]
    fn poke_delay_set_event(&self, delay: u64);

    #[event("votesReset")]
    fn votes_reset_event(&self, #[indexed] voter: &ManagedAddress, epoch: u64);

    #[event("emissionFunded")]
    fn emission_funded_event(&self, #[indexed] from: &ManagedAddress, amount: &BigUint);

    #[event("emissionStaged")]
    fn emission_staged_event(
        &self,
        #[indexed] epoch: u64,
        #[indexed] amount: &BigUint,
        total_weight: &BigUint,
    );

    #[event("gaugeRewardNotified")]
    fn gauge_reward_notified_event(
        &self,
        #[indexed] pool: u64,
        #[indexed] epoch: u64,
        amount: &BigUint,
    );

    // ── Gauges ──

    #[event("staked")]
    fn staked_event(
        &self,
        #[indexed] pool: u64,
        #[indexed] from: &ManagedAddress,
        #[indexed] account: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("unstaked")]
    fn unstaked_event(
        &self,
        #[indexed] pool: u64,
        #[indexed] account: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("rewardPaid")]
    fn reward_paid_event(
        &self,
        #[indexed] pool: u64,
        #[indexed] account: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("referralPaid")]
    fn referral_paid_event(
        &self,
        #[indexed] pool: u64,
        #[indexed] referrer: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("votingFeesClaimed")]
    fn voting_fees_claimed_event(
        &self,
        #[indexed] pool: u64,
        #[indexed] token: &TokenIdentifier,
        #[indexed] maker_cut: &BigUint,
        #[indexed] protocol_cut: &BigUint,
        bribe_amount: &BigUint,
    );

    // ── Bribes ──

    #[event("bribeNotified")]
    fn bribe_notified_event(
        &self,
        #[indexed] pool: u64,
        #[indexed] from: &ManagedAddress,
        #[indexed] token: &TokenIdentifier,
        #[indexed] epoch: u64,
        amount: &BigUint,
    );

    #[event("bribeClaimed")]
    fn bribe_claimed_event(
        &self,
        #[indexed] pool: u64,
        #[indexed] account: &ManagedAddress,
        #[indexed] token: &TokenIdentifier,
        amount: &BigUint,
    );

    #[event("bribeTokenAllowed")]
    fn bribe_token_allowed_event(&self, #[indexed] token: &TokenIdentifier, allowed: bool);

    // ── Administration ──

    #[event("ownershipTransferred")]
    fn ownership_transferred_event(
        &self,
        #[indexed] previous_owner: &ManagedAddress,
        #[indexed] new_owner: &ManagedAddress,
    );

    #[event("adminsSet")]
    fn admins_set_event(
        &self,
        #[indexed] maker: &ManagedAddress,
        #[indexed] fee_manager: &ManagedAddress,
        #[indexed] admin: &ManagedAddress,
    );

    #[event("paused")]
    fn paused_event(&self, #[indexed] paused: bool);
}
