multiversx_sc::imports!();
multiversx_sc::derive_imports!();

// ============================================================
// Pair: one AMM pool for a (token0, token1, stable) triple
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Pair<M: ManagedTypeApi> {
    pub id: u64,
    /// Lower of the two identifiers in byte order.
    pub token0: TokenIdentifier<M>,
    pub token1: TokenIdentifier<M>,
    /// true: x³y + y³x = k, false: x * y = k
    pub stable: bool,
    pub decimals0: u32,
    pub decimals1: u32,
    /// Fee divisor, fee = amount_in / fee
    pub fee: u64,
    pub reserve0: BigUint<M>,
    pub reserve1: BigUint<M>,
    /// LP shares outstanding, including the locked minimum
    pub total_supply: BigUint<M>,
    pub reserve0_cumulative_last: BigUint<M>,
    pub reserve1_cumulative_last: BigUint<M>,
    pub block_timestamp_last: u64,
    /// Zero address when no protocol skim is configured
    pub protocol_address: ManagedAddress<M>,
    pub created_at: u64,
}

impl<M: ManagedTypeApi> Pair<M> {
    /// 0 for token0, 1 for token1, None for anything else.
    pub fn side_of(&self, token: &TokenIdentifier<M>) -> Option<u8> {
        if *token == self.token0 {
            Some(0)
        } else if *token == self.token1 {
            Some(1)
        } else {
            None
        }
    }

    pub fn token(&self, side: u8) -> &TokenIdentifier<M> {
        if side == 0 {
            &self.token0
        } else {
            &self.token1
        }
    }

    pub fn reserve(&self, side: u8) -> &BigUint<M> {
        if side == 0 {
            &self.reserve0
        } else {
            &self.reserve1
        }
    }

    pub fn decimals(&self, side: u8) -> u32 {
        if side == 0 {
            self.decimals0
        } else {
            self.decimals1
        }
    }
}

/// TWAP sample, written at most once per observation period.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Observation<M: ManagedTypeApi> {
    pub timestamp: u64,
    pub reserve0_cumulative: BigUint<M>,
    pub reserve1_cumulative: BigUint<M>,
}

// ============================================================
// Voting escrow
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct LockedBalance<M: ManagedTypeApi> {
    pub amount: BigUint<M>,
    /// Always a week boundary
    pub unlock_time: u64,
}

/// Aggregate ve curve. Bias and slope are scaled by 1e18 so the
/// integer slope does not drop the remainder of amount / MAX_LOCK.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct SupplyPoint<M: ManagedTypeApi> {
    pub bias: BigUint<M>,
    pub slope: BigUint<M>,
    pub timestamp: u64,
}

// ============================================================
// Epoch checkpoints, shared by Bribe balances and pool weights
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Checkpoint<M: ManagedTypeApi> {
    pub epoch: u64,
    pub value: BigUint<M>,
}

// ============================================================
// Gauges
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct GaugeInfo<M: ManagedTypeApi> {
    pub pool: u64,
    pub alive: bool,
    /// Per-epoch emission cap, zero means uncapped
    pub max_rewards: BigUint<M>,
    pub created_at: u64,
    /// Bumped on every deprecation; votes cast under an older
    /// generation no longer count toward the pool weight.
    pub generation: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct RewardState<M: ManagedTypeApi> {
    /// Emission per second, scaled by 1e18
    pub reward_rate: BigUint<M>,
    pub period_finish: u64,
    pub last_update_time: u64,
    /// Scaled by 1e18
    pub reward_per_token_stored: BigUint<M>,
}

// ============================================================
// Distribution
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct DistributionBatch<M: ManagedTypeApi> {
    pub epoch: u64,
    pub amount: BigUint<M>,
    pub total_weight: BigUint<M>,
    pub paid: BigUint<M>,
}
