multiversx_sc::imports!();

use crate::amm_math::precision;
use crate::errors::*;
use crate::types::Pair;

// ============================================================
// Fees custodian
//
// Swap fees never enter the reserves. Each fee is split into a
// maker skim, a protocol skim and the LP part; the LP part is
// spread over LP shares through a per-side fee index so every
// holder's claim is balance * (index - index at last settle).
// ============================================================

#[multiversx_sc::module]
pub trait FeesModule:
    crate::pair::PairModule + crate::config::ConfigModule + crate::events::EventsModule
{
    // ========================================================
    // ENDPOINT: claimFees
    // Pays the caller's LP fee share and flushes the pending
    // maker/protocol skims in the same call.
    // ========================================================

    #[endpoint(claimFees)]
    fn claim_fees(&self, pair_id: u64) -> MultiValue2<BigUint, BigUint> {
        let caller = self.blockchain().get_caller();
        let pair = self.require_pair(pair_id);

        let (amount0, amount1) = self.take_claimable_fees(&pair, &caller);
        self.flush_skims(&pair);

        if amount0 > 0u64 {
            self.send().direct_esdt(&caller, &pair.token0, 0, &amount0);
        }
        if amount1 > 0u64 {
            self.send().direct_esdt(&caller, &pair.token1, 0, &amount1);
        }

        self.fees_claimed_event(pair_id, &caller, &amount0, &amount1);

        (amount0, amount1).into()
    }

    // ========================================================
    // INTERNAL: fee intake
    // ========================================================

    fn accrue_swap_fee(&self, pair: &Pair<Self::Api>, side: u8, fee: &BigUint) {
        if *fee == 0u64 {
            return;
        }

        let maker_part = self.mul_bps(fee, self.maker_fee_share_bps().get());
        let protocol_part = self.mul_bps(fee, self.protocol_fee_share_bps().get());
        let lp_part = fee - &maker_part - &protocol_part;

        self.pending_maker_fees(pair.id, side)
            .update(|pending| *pending += &maker_part);
        self.pending_protocol_fees(pair.id, side)
            .update(|pending| *pending += &protocol_part);
        self.fee_reserve(pair.id, side).update(|reserve| *reserve += fee);

        // With no LP supply the LP part has no owner and stays escrowed.
        if pair.total_supply > 0u64 {
            let delta = lp_part * precision::<Self::Api>() / &pair.total_supply;
            self.fee_index(pair.id, side).update(|index| *index += delta);
        }
    }

    // ========================================================
    // INTERNAL: holder settlement
    // ========================================================

    /// Moves fee growth since the holder's last settle into `claimable`.
    /// Must run before any change to the holder's LP balance.
    fn settle_fee_growth(&self, pair_id: u64, account: &ManagedAddress) {
        let balance = self.lp_balance(pair_id, account).get();
        for side in 0u8..2 {
            let index = self.fee_index(pair_id, side).get();
            let supply_index = self.supply_index(pair_id, account, side).get();
            if balance > 0u64 && index > supply_index {
                let delta = &index - &supply_index;
                let share = &balance * &delta / precision::<Self::Api>();
                self.claimable_fees(pair_id, account, side)
                    .update(|claimable| *claimable += share);
            }
            self.supply_index(pair_id, account, side).set(index);
        }
    }

    fn take_claimable_fees(
        &self,
        pair: &Pair<Self::Api>,
        account: &ManagedAddress,
    ) -> (BigUint, BigUint) {
        self.settle_fee_growth(pair.id, account);

        let amount0 = self.claimable_fees(pair.id, account, 0).take();
        let amount1 = self.claimable_fees(pair.id, account, 1).take();
        self.fee_reserve(pair.id, 0).update(|reserve| *reserve -= &amount0);
        self.fee_reserve(pair.id, 1).update(|reserve| *reserve -= &amount1);

        (amount0, amount1)
    }

    /// Pays out pending skims. A missing maker or protocol address skips
    /// that share; it stays escrowed until an address is configured.
    fn flush_skims(&self, pair: &Pair<Self::Api>) {
        let maker = if self.maker().is_empty() {
            ManagedAddress::zero()
        } else {
            self.maker().get()
        };

        for side in 0u8..2 {
            let token = pair.token(side);

            if !maker.is_zero() {
                let amount = self.pending_maker_fees(pair.id, side).take();
                if amount > 0u64 {
                    self.fee_reserve(pair.id, side).update(|reserve| *reserve -= &amount);
                    self.send().direct_esdt(&maker, token, 0, &amount);
                    self.skim_paid_event(pair.id, &maker, token, &amount);
                }
            }

            if !pair.protocol_address.is_zero() {
                let amount = self.pending_protocol_fees(pair.id, side).take();
                if amount > 0u64 {
                    self.fee_reserve(pair.id, side).update(|reserve| *reserve -= &amount);
                    self.send()
                        .direct_esdt(&pair.protocol_address, token, 0, &amount);
                    self.skim_paid_event(pair.id, &pair.protocol_address, token, &amount);
                }
            }
        }
    }

    // ========================================================
    // INTERNAL: LP ledger
    // Every balance change settles fee growth first.
    // ========================================================

    fn mint_lp(&self, pair: &mut Pair<Self::Api>, to: &ManagedAddress, amount: &BigUint) {
        self.settle_fee_growth(pair.id, to);
        self.lp_balance(pair.id, to).update(|balance| *balance += amount);
        pair.total_supply += amount;
    }

    fn burn_lp(&self, pair: &mut Pair<Self::Api>, from: &ManagedAddress, amount: &BigUint) {
        let balance = self.lp_balance(pair.id, from).get();
        require!(*amount <= balance, ERR_INSUFFICIENT_BALANCE);
        self.settle_fee_growth(pair.id, from);
        self.lp_balance(pair.id, from).set(balance - amount);
        pair.total_supply -= amount;
    }

    fn move_lp(&self, pair_id: u64, from: &ManagedAddress, to: &ManagedAddress, amount: &BigUint) {
        let balance = self.lp_balance(pair_id, from).get();
        require!(*amount <= balance, ERR_INSUFFICIENT_BALANCE);
        self.settle_fee_growth(pair_id, from);
        self.settle_fee_growth(pair_id, to);
        self.lp_balance(pair_id, from).set(balance - amount);
        self.lp_balance(pair_id, to).update(|balance| *balance += amount);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    /// Claimable now, including growth not yet settled.
    #[view(getClaimableFees)]
    fn get_claimable_fees(&self, pair_id: u64, account: ManagedAddress) -> MultiValue2<BigUint, BigUint> {
        let balance = self.lp_balance(pair_id, &account).get();
        let mut amounts = [BigUint::zero(), BigUint::zero()];
        for side in 0u8..2 {
            let index = self.fee_index(pair_id, side).get();
            let supply_index = self.supply_index(pair_id, &account, side).get();
            let mut claimable = self.claimable_fees(pair_id, &account, side).get();
            if index > supply_index {
                claimable += &balance * &(&index - &supply_index) / precision::<Self::Api>();
            }
            amounts[side as usize] = claimable;
        }
        let [amount0, amount1] = amounts;
        (amount0, amount1).into()
    }

    #[view(getFeeReserves)]
    fn get_fee_reserves(&self, pair_id: u64) -> MultiValue2<BigUint, BigUint> {
        (self.fee_reserve(pair_id, 0).get(), self.fee_reserve(pair_id, 1).get()).into()
    }

    /// (maker0, maker1, protocol0, protocol1)
    #[view(getPendingSkims)]
    fn get_pending_skims(&self, pair_id: u64) -> MultiValue4<BigUint, BigUint, BigUint, BigUint> {
        (
            self.pending_maker_fees(pair_id, 0).get(),
            self.pending_maker_fees(pair_id, 1).get(),
            self.pending_protocol_fees(pair_id, 0).get(),
            self.pending_protocol_fees(pair_id, 1).get(),
        )
            .into()
    }

    #[view(getFeeIndex)]
    fn get_fee_index(&self, pair_id: u64) -> MultiValue2<BigUint, BigUint> {
        (self.fee_index(pair_id, 0).get(), self.fee_index(pair_id, 1).get()).into()
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("feeIndex")]
    fn fee_index(&self, pair_id: u64, side: u8) -> SingleValueMapper<BigUint>;

    #[storage_mapper("supplyIndex")]
    fn supply_index(&self, pair_id: u64, account: &ManagedAddress, side: u8) -> SingleValueMapper<BigUint>;

    #[storage_mapper("claimableFees")]
    fn claimable_fees(&self, pair_id: u64, account: &ManagedAddress, side: u8) -> SingleValueMapper<BigUint>;

    #[storage_mapper("feeReserve")]
    fn fee_reserve(&self, pair_id: u64, side: u8) -> SingleValueMapper<BigUint>;

    #[storage_mapper("pendingMakerFees")]
    fn pending_maker_fees(&self, pair_id: u64, side: u8) -> SingleValueMapper<BigUint>;

    #[storage_mapper("pendingProtocolFees")]
    fn pending_protocol_fees(&self, pair_id: u64, side: u8) -> SingleValueMapper<BigUint>;
}
