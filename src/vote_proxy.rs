multiversx_sc::imports!();

/// User-facing voting endpoints. Tally state lives in the gauge factory.
#[multiversx_sc::module]
pub trait VoteProxyModule:
    crate::gauge_factory::GaugeFactoryModule
    + crate::gauge::GaugeModule
    + crate::bribe::BribeModule
    + crate::registry::RegistryModule
    + crate::voting_escrow::VotingEscrowModule
    + crate::checkpoints::CheckpointsModule
    + crate::fees::FeesModule
    + crate::pair::PairModule
    + crate::config::ConfigModule
    + crate::events::EventsModule
{
    /// Once per epoch; takes effect from the next epoch.
    #[endpoint(vote)]
    fn vote(&self, pools: ManagedVec<u64>, weights: ManagedVec<BigUint>) -> BigUint {
        self.require_not_paused();
        let caller = self.blockchain().get_caller();
        self.apply_vote(&caller, &pools, &weights)
    }

    #[endpoint(reset)]
    fn reset(&self) {
        let caller = self.blockchain().get_caller();
        self.reset_votes(&caller);
    }
}
