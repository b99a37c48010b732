multiversx_sc::imports!();

use crate::errors::*;
use crate::types::GaugeInfo;

/// Pool → gauge registry. Pools keep their insertion order; deprecated
/// pools stay in the list.
#[multiversx_sc::module]
pub trait RegistryModule {
    fn require_gauge(&self, pool: u64) -> GaugeInfo<Self::Api> {
        require!(!self.gauge_info(pool).is_empty(), ERR_GAUGE_NOT_FOUND);
        self.gauge_info(pool).get()
    }

    fn require_live_gauge(&self, pool: u64) -> GaugeInfo<Self::Api> {
        let info = self.require_gauge(pool);
        require!(info.alive, ERR_GAUGE_DEPRECATED);
        info
    }

    #[view(getGaugeInfo)]
    fn get_gauge_info(&self, pool: u64) -> OptionalValue<GaugeInfo<Self::Api>> {
        if self.gauge_info(pool).is_empty() {
            return OptionalValue::None;
        }
        OptionalValue::Some(self.gauge_info(pool).get())
    }

    #[view(getPoolsLength)]
    fn get_pools_length(&self) -> usize {
        self.pools().len()
    }

    /// `from` is zero-based, matching the `distribute` range.
    #[view(getPools)]
    fn get_pools(&self, from: usize, count: usize) -> MultiValueEncoded<u64> {
        let mut result = MultiValueEncoded::new();
        let total = self.pools().len();
        let end = core::cmp::min(from.saturating_add(count), total);
        for index in from..end {
            result.push(self.pools().get(index + 1));
        }
        result
    }

    #[storage_mapper("pools")]
    fn pools(&self) -> VecMapper<u64>;

    #[storage_mapper("gaugeInfo")]
    fn gauge_info(&self, pool: u64) -> SingleValueMapper<GaugeInfo<Self::Api>>;
}
