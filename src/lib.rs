#![no_std]

multiversx_sc::imports!();

pub mod amm_math;
pub mod bribe;
pub mod checkpoints;
pub mod config;
pub mod errors;
pub mod events;
pub mod fees;
pub mod gauge;
pub mod gauge_factory;
pub mod pair;
pub mod registry;
pub mod trading;
pub mod types;
pub mod vote_proxy;
pub mod voting_escrow;

use errors::*;

// ============================================================
// Contract
//
// Pairs, the fee custodian, the vote escrow, gauges, bribes and
// the gauge factory share one contract. Pool ids are pair ids.
// ============================================================

#[multiversx_sc::contract]
pub trait VeDex:
    config::ConfigModule
    + events::EventsModule
    + pair::PairModule
    + fees::FeesModule
    + trading::TradingModule
    + checkpoints::CheckpointsModule
    + voting_escrow::VotingEscrowModule
    + registry::RegistryModule
    + bribe::BribeModule
    + gauge::GaugeModule
    + gauge_factory::GaugeFactoryModule
    + vote_proxy::VoteProxyModule
{
    // ========================================================
    // Init / Upgrade
    // ========================================================

    /// `emission_token` is both the gauge reward and the token locked
    /// for voting power. `maker` may be the zero address.
    #[init]
    fn init(
        &self,
        emission_token: TokenIdentifier,
        maker: ManagedAddress,
        fee_manager: ManagedAddress,
        admin: ManagedAddress,
    ) {
        self.init_config(emission_token, maker, fee_manager, admin);
    }

    #[upgrade]
    fn upgrade(&self) {}

    // ========================================================
    // ENDPOINTS: vote escrow
    // Every lock change re-derives the holder's gauge boosts.
    // ========================================================

    #[payable("*")]
    #[endpoint(createLock)]
    fn create_lock(&self, unlock_time: u64) -> u64 {
        self.require_not_paused();
        let caller = self.blockchain().get_caller();
        let amount = self.require_emission_payment();

        let unlock_time = self.lock_tokens(&caller, &amount, unlock_time);
        self.refresh_boosts(&caller);
        unlock_time
    }

    #[payable("*")]
    #[endpoint(increaseAmount)]
    fn increase_amount(&self) {
        self.require_not_paused();
        let caller = self.blockchain().get_caller();
        let amount = self.require_emission_payment();

        self.add_to_lock(&caller, &amount);
        self.refresh_boosts(&caller);
    }

    #[endpoint(increaseUnlockTime)]
    fn increase_unlock_time(&self, unlock_time: u64) -> u64 {
        let caller = self.blockchain().get_caller();
        let unlock_time = self.extend_lock(&caller, unlock_time);
        self.refresh_boosts(&caller);
        unlock_time
    }

    #[endpoint(withdrawLock)]
    fn withdraw_lock(&self) -> BigUint {
        let caller = self.blockchain().get_caller();
        let amount = self.release_lock(&caller);
        self.refresh_boosts(&caller);

        let token = self.emission_token().get();
        self.send().direct_esdt(&caller, &token, 0, &amount);
        amount
    }

    fn require_emission_payment(&self) -> BigUint {
        let payment = self.call_value().single_esdt();
        require!(
            payment.token_identifier == self.emission_token().get() && payment.token_nonce == 0,
            ERR_INVALID_TOKEN
        );
        require!(payment.amount > 0u64, ERR_INVALID_AMOUNT);
        payment.amount.clone()
    }
}
