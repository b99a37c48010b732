multiversx_sc::imports!();

use crate::amm_math;
use crate::config::MIN_FEE_DIVISOR;
use crate::errors::*;
use crate::types::{Observation, Pair};

/// Minimum spacing between two TWAP observations: 30 minutes
pub const PERIOD_SIZE: u64 = 1_800;

/// Stable-curve normalisation works in 18-decimal fixed point
const MAX_DECIMALS: u32 = 18;

// ============================================================
// Pair registry, reserves and price oracle
// ============================================================

#[multiversx_sc::module]
pub trait PairModule: crate::config::ConfigModule + crate::events::EventsModule {
    // ========================================================
    // ENDPOINT: createPair
    // One pair per (tokenA, tokenB, stable). Fee starts at the
    // base rate for the curve type.
    // ========================================================

    #[endpoint(createPair)]
    fn create_pair(
        &self,
        token_a: TokenIdentifier,
        token_b: TokenIdentifier,
        stable: bool,
        decimals_a: u32,
        decimals_b: u32,
    ) -> u64 {
        self.require_not_paused();
        require!(
            token_a.is_valid_esdt_identifier() && token_b.is_valid_esdt_identifier(),
            ERR_INVALID_TOKEN
        );
        require!(token_a != token_b, ERR_IDENTICAL_TOKENS);
        require!(
            decimals_a <= MAX_DECIMALS && decimals_b <= MAX_DECIMALS,
            ERR_INVALID_DECIMALS
        );

        let a_first = self.token_precedes(&token_a, &token_b);
        let (token0, token1, decimals0, decimals1) = if a_first {
            (token_a, token_b, decimals_a, decimals_b)
        } else {
            (token_b, token_a, decimals_b, decimals_a)
        };
        require!(
            self.pair_id_by_tokens(&token0, &token1, stable).is_empty(),
            ERR_PAIR_EXISTS
        );

        let pair_id = self.pair_count().get() + 1;
        let now = self.blockchain().get_block_timestamp();
        let fee = if stable {
            self.base_stable_fee().get()
        } else {
            self.base_variable_fee().get()
        };

        let pair = Pair {
            id: pair_id,
            token0: token0.clone(),
            token1: token1.clone(),
            stable,
            decimals0,
            decimals1,
            fee,
            reserve0: BigUint::zero(),
            reserve1: BigUint::zero(),
            total_supply: BigUint::zero(),
            reserve0_cumulative_last: BigUint::zero(),
            reserve1_cumulative_last: BigUint::zero(),
            block_timestamp_last: now,
            protocol_address: ManagedAddress::zero(),
            created_at: now,
        };

        self.pairs(pair_id).set(&pair);
        self.pair_count().set(pair_id);
        self.pair_id_by_tokens(&token0, &token1, stable).set(pair_id);
        self.observations(pair_id).push(&Observation {
            timestamp: now,
            reserve0_cumulative: BigUint::zero(),
            reserve1_cumulative: BigUint::zero(),
        });

        self.pair_created_event(pair_id, &token0, &token1, stable, fee);

        pair_id
    }

    /// Fee manager only. Only this pair changes; base fees are untouched.
    #[endpoint(setFee)]
    fn set_fee(&self, pair_id: u64, fee: u64) {
        require!(
            self.blockchain().get_caller() == self.fee_manager().get(),
            ERR_UNAUTHORIZED
        );
        require!(fee >= MIN_FEE_DIVISOR, ERR_INVALID_FEE);

        let mut pair = self.require_pair(pair_id);
        pair.fee = fee;
        self.pairs(pair_id).set(&pair);

        self.fee_set_event(pair_id, fee);
    }

    /// Zero address disables the protocol skim for this pair.
    #[endpoint(setProtocolAddress)]
    fn set_protocol_address(&self, pair_id: u64, address: ManagedAddress) {
        self.require_owner();

        let mut pair = self.require_pair(pair_id);
        pair.protocol_address = address.clone();
        self.pairs(pair_id).set(&pair);

        self.protocol_address_set_event(pair_id, &address);
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    fn require_pair(&self, pair_id: u64) -> Pair<Self::Api> {
        require!(!self.pairs(pair_id).is_empty(), ERR_PAIR_NOT_FOUND);
        self.pairs(pair_id).get()
    }

    /// Byte order of two valid identifiers; both fit the buffers.
    fn token_precedes(&self, a: &TokenIdentifier, b: &TokenIdentifier) -> bool {
        let mut buffer_a = [0u8; 32];
        let mut buffer_b = [0u8; 32];
        let bytes_a = a.as_managed_buffer().load_to_byte_array(&mut buffer_a);
        let bytes_b = b.as_managed_buffer().load_to_byte_array(&mut buffer_b);
        bytes_a < bytes_b
    }

    /// Accumulates time-weighted reserves with the values that were in
    /// force since the last update, then stores the new reserves.
    fn sync_reserves(
        &self,
        pair: &mut Pair<Self::Api>,
        reserve0: BigUint,
        reserve1: BigUint,
    ) {
        let now = self.blockchain().get_block_timestamp();
        let elapsed = now - pair.block_timestamp_last;
        if elapsed > 0 && pair.reserve0 > 0u64 && pair.reserve1 > 0u64 {
            pair.reserve0_cumulative_last += &pair.reserve0 * elapsed;
            pair.reserve1_cumulative_last += &pair.reserve1 * elapsed;
        }

        let observations = self.observations(pair.id);
        let last = observations.get(observations.len());
        if now - last.timestamp > PERIOD_SIZE {
            self.observations(pair.id).push(&Observation {
                timestamp: now,
                reserve0_cumulative: pair.reserve0_cumulative_last.clone(),
                reserve1_cumulative: pair.reserve1_cumulative_last.clone(),
            });
        }

        pair.reserve0 = reserve0;
        pair.reserve1 = reserve1;
        pair.block_timestamp_last = now;
        self.pairs(pair.id).set(&*pair);
    }

    /// Swap output after the pair's input fee. Zero when the stable
    /// solver does not converge.
    fn amount_out_after_fee(
        &self,
        pair: &Pair<Self::Api>,
        side_in: u8,
        amount_in: &BigUint,
    ) -> BigUint {
        let fee = amount_in / pair.fee;
        let net_in = amount_in - &fee;
        let side_out = 1 - side_in;
        amm_math::get_amount_out(
            &net_in,
            pair.reserve(side_in),
            pair.reserve(side_out),
            pair.stable,
            pair.decimals(side_in),
            pair.decimals(side_out),
        )
        .unwrap_or_else(BigUint::zero)
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getPair)]
    fn get_pair(&self, pair_id: u64) -> OptionalValue<Pair<Self::Api>> {
        if self.pairs(pair_id).is_empty() {
            return OptionalValue::None;
        }
        OptionalValue::Some(self.pairs(pair_id).get())
    }

    /// Zero when no pair exists for the triple.
    #[view(getPairId)]
    fn get_pair_id(&self, token_a: TokenIdentifier, token_b: TokenIdentifier, stable: bool) -> u64 {
        if !token_a.is_valid_esdt_identifier() || !token_b.is_valid_esdt_identifier() {
            return 0;
        }
        let (token0, token1) = if self.token_precedes(&token_a, &token_b) {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        let mapper = self.pair_id_by_tokens(&token0, &token1, stable);
        if mapper.is_empty() {
            0
        } else {
            mapper.get()
        }
    }

    #[view(getReserves)]
    fn get_reserves(&self, pair_id: u64) -> MultiValue3<BigUint, BigUint, u64> {
        let pair = self.require_pair(pair_id);
        (pair.reserve0, pair.reserve1, pair.block_timestamp_last).into()
    }

    #[view(getAmountOut)]
    fn get_amount_out(&self, pair_id: u64, token_in: TokenIdentifier, amount_in: BigUint) -> BigUint {
        let pair = self.require_pair(pair_id);
        let side_in = match pair.side_of(&token_in) {
            Some(side) => side,
            None => sc_panic!(ERR_INVALID_TOKEN),
        };
        self.amount_out_after_fee(&pair, side_in, &amount_in)
    }

    #[view(getLpBalance)]
    fn get_lp_balance(&self, pair_id: u64, account: ManagedAddress) -> BigUint {
        self.lp_balance(pair_id, &account).get()
    }

    /// Cumulative reserves as they would read if synced now.
    #[view(currentCumulativePrices)]
    fn current_cumulative_prices(&self, pair_id: u64) -> MultiValue3<BigUint, BigUint, u64> {
        let pair = self.require_pair(pair_id);
        let now = self.blockchain().get_block_timestamp();
        let mut reserve0_cumulative = pair.reserve0_cumulative_last.clone();
        let mut reserve1_cumulative = pair.reserve1_cumulative_last.clone();
        if now > pair.block_timestamp_last {
            let elapsed = now - pair.block_timestamp_last;
            reserve0_cumulative += &pair.reserve0 * elapsed;
            reserve1_cumulative += &pair.reserve1 * elapsed;
        }
        (reserve0_cumulative, reserve1_cumulative, now).into()
    }

    #[view(getObservationCount)]
    fn get_observation_count(&self, pair_id: u64) -> usize {
        self.observations(pair_id).len()
    }

    /// TWAP quote: average of the fee-less outputs computed from the mean
    /// reserves of each of the last `granularity` observation windows.
    #[view(quote)]
    fn quote(&self, pair_id: u64, token_in: TokenIdentifier, amount_in: BigUint, granularity: usize) -> BigUint {
        let pair = self.require_pair(pair_id);
        let side_in = match pair.side_of(&token_in) {
            Some(side) => side,
            None => sc_panic!(ERR_INVALID_TOKEN),
        };
        let observations = self.observations(pair_id);
        let count = observations.len();
        require!(granularity > 0 && count > granularity, ERR_NOT_ENOUGH_OBSERVATIONS);

        let mut sum = BigUint::zero();
        let first = count - granularity;
        for index in first..count {
            let start = observations.get(index);
            let end = observations.get(index + 1);
            let elapsed = end.timestamp - start.timestamp;
            let reserve0 = (&end.reserve0_cumulative - &start.reserve0_cumulative) / elapsed;
            let reserve1 = (&end.reserve1_cumulative - &start.reserve1_cumulative) / elapsed;
            let (reserve_in, reserve_out) = if side_in == 0 {
                (reserve0, reserve1)
            } else {
                (reserve1, reserve0)
            };
            let out = amm_math::get_amount_out(
                &amount_in,
                &reserve_in,
                &reserve_out,
                pair.stable,
                pair.decimals(side_in),
                pair.decimals(1 - side_in),
            )
            .unwrap_or_else(BigUint::zero);
            sum += out;
        }
        sum / granularity as u64
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[view(getPairCount)]
    #[storage_mapper("pairCount")]
    fn pair_count(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("pairs")]
    fn pairs(&self, pair_id: u64) -> SingleValueMapper<Pair<Self::Api>>;

    #[storage_mapper("pairIdByTokens")]
    fn pair_id_by_tokens(
        &self,
        token0: &TokenIdentifier,
        token1: &TokenIdentifier,
        stable: bool,
    ) -> SingleValueMapper<u64>;

    #[storage_mapper("lpBalance")]
    fn lp_balance(&self, pair_id: u64, account: &ManagedAddress) -> SingleValueMapper<BigUint>;

    #[storage_mapper("observations")]
    fn observations(&self, pair_id: u64) -> VecMapper<Observation<Self::Api>>;
}
