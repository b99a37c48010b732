multiversx_sc::imports!();

use crate::amm_math::{self, MINIMUM_LIQUIDITY};
use crate::errors::*;

// ============================================================
// Liquidity and swaps
// ============================================================

#[multiversx_sc::module]
pub trait TradingModule:
    crate::fees::FeesModule
    + crate::pair::PairModule
    + crate::config::ConfigModule
    + crate::events::EventsModule
{
    // ========================================================
    // ENDPOINT: addLiquidity
    // Both pair tokens in one multi-transfer. The first mint
    // locks MINIMUM_LIQUIDITY on the zero address; later mints
    // use the reserve ratio and refund the excess side.
    // ========================================================

    #[payable("*")]
    #[endpoint(addLiquidity)]
    fn add_liquidity(
        &self,
        pair_id: u64,
        liquidity_min: BigUint,
        deadline: u64,
        opt_to: OptionalValue<ManagedAddress>,
    ) -> BigUint {
        self.require_not_paused();
        self.require_deadline(deadline);

        let caller = self.blockchain().get_caller();
        let to = opt_to.into_option().unwrap_or_else(|| caller.clone());
        let mut pair = self.require_pair(pair_id);

        let payments = self.call_value().all_esdt_transfers().clone_value();
        require!(payments.len() == 2, ERR_INVALID_PAYMENT);
        let mut desired = [BigUint::zero(), BigUint::zero()];
        for payment in payments.iter() {
            require!(payment.token_nonce == 0, ERR_INVALID_TOKEN);
            let side = match pair.side_of(&payment.token_identifier) {
                Some(side) => side,
                None => sc_panic!(ERR_INVALID_TOKEN),
            };
            require!(desired[side as usize] == 0u64, ERR_INVALID_PAYMENT);
            desired[side as usize] = payment.amount.clone();
        }
        let [desired0, desired1] = desired;
        require!(desired0 > 0u64 && desired1 > 0u64, ERR_INVALID_AMOUNT);

        let (used0, used1, liquidity) = if pair.total_supply == 0u64 {
            let root = (&desired0 * &desired1).sqrt();
            require!(root > MINIMUM_LIQUIDITY, ERR_INSUFFICIENT_LIQUIDITY);
            let zero_address = ManagedAddress::zero();
            self.mint_lp(&mut pair, &zero_address, &BigUint::from(MINIMUM_LIQUIDITY));
            (desired0.clone(), desired1.clone(), root - &BigUint::from(MINIMUM_LIQUIDITY))
        } else {
            let optimal1 = amm_math::quote_optimal(&desired0, &pair.reserve0, &pair.reserve1);
            let (used0, used1) = if optimal1 <= desired1 {
                (desired0.clone(), optimal1)
            } else {
                let optimal0 = amm_math::quote_optimal(&desired1, &pair.reserve1, &pair.reserve0);
                (optimal0, desired1.clone())
            };
            let by0 = &used0 * &pair.total_supply / &pair.reserve0;
            let by1 = &used1 * &pair.total_supply / &pair.reserve1;
            let liquidity = self.min_biguint(&by0, &by1);
            (used0, used1, liquidity)
        };

        require!(liquidity > 0u64, ERR_INSUFFICIENT_LIQUIDITY);
        require!(liquidity >= liquidity_min, ERR_SLIPPAGE);

        self.mint_lp(&mut pair, &to, &liquidity);
        let reserve0 = &pair.reserve0 + &used0;
        let reserve1 = &pair.reserve1 + &used1;
        self.sync_reserves(&mut pair, reserve0, reserve1);

        let refund0 = &desired0 - &used0;
        let refund1 = &desired1 - &used1;
        if refund0 > 0u64 {
            self.send().direct_esdt(&caller, &pair.token0, 0, &refund0);
        }
        if refund1 > 0u64 {
            self.send().direct_esdt(&caller, &pair.token1, 0, &refund1);
        }

        self.liquidity_added_event(pair_id, &to, &used0, &used1, &liquidity);

        liquidity
    }

    // ========================================================
    // ENDPOINT: removeLiquidity
    // Burns the caller's LP shares for a proportional cut of
    // both reserves.
    // ========================================================

    #[endpoint(removeLiquidity)]
    fn remove_liquidity(
        &self,
        pair_id: u64,
        liquidity: BigUint,
        amount0_min: BigUint,
        amount1_min: BigUint,
        deadline: u64,
        opt_to: OptionalValue<ManagedAddress>,
    ) -> MultiValue2<BigUint, BigUint> {
        self.require_deadline(deadline);
        require!(liquidity > 0u64, ERR_INVALID_AMOUNT);

        let caller = self.blockchain().get_caller();
        let to = opt_to.into_option().unwrap_or_else(|| caller.clone());
        let mut pair = self.require_pair(pair_id);

        let amount0 = &liquidity * &pair.reserve0 / &pair.total_supply;
        let amount1 = &liquidity * &pair.reserve1 / &pair.total_supply;
        require!(amount0 > 0u64 && amount1 > 0u64, ERR_INSUFFICIENT_LIQUIDITY);
        require!(amount0 >= amount0_min && amount1 >= amount1_min, ERR_SLIPPAGE);

        self.burn_lp(&mut pair, &caller, &liquidity);
        let reserve0 = &pair.reserve0 - &amount0;
        let reserve1 = &pair.reserve1 - &amount1;
        self.sync_reserves(&mut pair, reserve0, reserve1);

        self.send().direct_esdt(&to, &pair.token0, 0, &amount0);
        self.send().direct_esdt(&to, &pair.token1, 0, &amount1);

        self.liquidity_removed_event(pair_id, &to, &amount0, &amount1, &liquidity);

        (amount0, amount1).into()
    }

    // ========================================================
    // ENDPOINT: swap
    // Fee is cut from the input before the curve sees it and
    // goes to the custodian. Reserves only take the net input.
    // ========================================================

    #[payable("*")]
    #[endpoint(swap)]
    fn swap(
        &self,
        pair_id: u64,
        amount_out_min: BigUint,
        deadline: u64,
        opt_to: OptionalValue<ManagedAddress>,
    ) -> BigUint {
        self.require_not_paused();
        self.require_deadline(deadline);

        let caller = self.blockchain().get_caller();
        let to = opt_to.into_option().unwrap_or_else(|| caller.clone());
        let mut pair = self.require_pair(pair_id);

        let payment = self.call_value().single_esdt();
        let token_in = payment.token_identifier.clone();
        let amount_in = payment.amount.clone();
        require!(payment.token_nonce == 0, ERR_INVALID_TOKEN);
        let side_in = match pair.side_of(&token_in) {
            Some(side) => side,
            None => sc_panic!(ERR_INVALID_TOKEN),
        };
        let side_out = 1 - side_in;
        require!(amount_in > 0u64, ERR_INVALID_AMOUNT);
        require!(
            pair.reserve0 > 0u64 && pair.reserve1 > 0u64,
            ERR_INSUFFICIENT_LIQUIDITY
        );

        let fee = &amount_in / pair.fee;
        let net_in = &amount_in - &fee;
        let reserve_in = pair.reserve(side_in).clone();
        let reserve_out = pair.reserve(side_out).clone();

        let amount_out = match amm_math::get_amount_out(
            &net_in,
            &reserve_in,
            &reserve_out,
            pair.stable,
            pair.decimals(side_in),
            pair.decimals(side_out),
        ) {
            Some(out) => out,
            None => sc_panic!(ERR_NO_CONVERGENCE),
        };
        require!(
            amount_out > 0u64 && amount_out < reserve_out,
            ERR_INSUFFICIENT_LIQUIDITY
        );
        require!(amount_out >= amount_out_min, ERR_SLIPPAGE);

        let new_in = &reserve_in + &net_in;
        let new_out = &reserve_out - &amount_out;
        let (reserve0, reserve1) = if side_in == 0 {
            (new_in, new_out)
        } else {
            (new_out, new_in)
        };

        let k_before = amm_math::k_value(
            &pair.reserve0,
            &pair.reserve1,
            pair.stable,
            pair.decimals0,
            pair.decimals1,
        );
        let k_after = amm_math::k_value(&reserve0, &reserve1, pair.stable, pair.decimals0, pair.decimals1);
        require!(k_after >= k_before, ERR_K);

        self.accrue_swap_fee(&pair, side_in, &fee);
        self.sync_reserves(&mut pair, reserve0, reserve1);

        let token_out = pair.token(side_out).clone();
        self.send().direct_esdt(&to, &token_out, 0, &amount_out);

        self.swap_event(pair_id, &caller, &token_in, &amount_in, &to, &amount_out);

        amount_out
    }
}
