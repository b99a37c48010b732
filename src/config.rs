multiversx_sc::imports!();

use crate::errors::*;

pub const BPS_DENOMINATOR: u64 = 10_000;

/// 1 / 333 ≈ 0.3%
pub const DEFAULT_VARIABLE_FEE: u64 = 333;

/// 1 / 2500 = 0.04%
pub const DEFAULT_STABLE_FEE: u64 = 2_500;

/// Fee divisors below this would charge more than 5% per swap
pub const MIN_FEE_DIVISOR: u64 = 20;

pub const DEFAULT_MAKER_FEE_SHARE_BPS: u64 = 1_000;
pub const DEFAULT_PROTOCOL_FEE_SHARE_BPS: u64 = 1_000;
pub const DEFAULT_GAUGE_MAKER_FEE_BPS: u64 = 2_000;
pub const DEFAULT_GAUGE_PROTOCOL_FEE_BPS: u64 = 1_000;

/// Roles, pause switch and fee parameters. Every setter is owner-gated
/// except `acceptOwner`.
#[multiversx_sc::module]
pub trait ConfigModule: crate::events::EventsModule {
    fn init_config(
        &self,
        emission_token: TokenIdentifier,
        maker: ManagedAddress,
        fee_manager: ManagedAddress,
        admin: ManagedAddress,
    ) {
        require!(emission_token.is_valid_esdt_identifier(), ERR_INVALID_TOKEN);
        require!(!fee_manager.is_zero(), ERR_INVALID_ADDRESS);
        require!(!admin.is_zero(), ERR_INVALID_ADDRESS);

        let caller = self.blockchain().get_caller();
        self.owner().set(&caller);
        self.emission_token().set(&emission_token);
        self.maker().set(&maker);
        self.fee_manager().set(&fee_manager);
        self.admin().set(&admin);
        self.paused().set(false);

        self.base_variable_fee().set(DEFAULT_VARIABLE_FEE);
        self.base_stable_fee().set(DEFAULT_STABLE_FEE);
        self.maker_fee_share_bps().set(DEFAULT_MAKER_FEE_SHARE_BPS);
        self.protocol_fee_share_bps().set(DEFAULT_PROTOCOL_FEE_SHARE_BPS);
        self.gauge_maker_fee_bps().set(DEFAULT_GAUGE_MAKER_FEE_BPS);
        self.gauge_protocol_fee_bps().set(DEFAULT_GAUGE_PROTOCOL_FEE_BPS);
        self.referral_fee_bps().set(0u64);
    }

    // ── Ownership ──

    #[endpoint(setOwner)]
    fn set_owner(&self, new_owner: ManagedAddress) {
        self.require_owner();
        require!(!new_owner.is_zero(), ERR_INVALID_ADDRESS);
        self.pending_owner().set(&new_owner);
    }

    #[endpoint(acceptOwner)]
    fn accept_owner(&self) {
        let caller = self.blockchain().get_caller();
        require!(
            !self.pending_owner().is_empty() && self.pending_owner().get() == caller,
            ERR_UNAUTHORIZED
        );
        let previous = self.owner().get();
        self.owner().set(&caller);
        self.pending_owner().clear();
        self.ownership_transferred_event(&previous, &caller);
    }

    // ── Roles ──

    #[endpoint(setAdmins)]
    fn set_admins(&self, maker: ManagedAddress, fee_manager: ManagedAddress, admin: ManagedAddress) {
        self.require_owner();
        require!(!fee_manager.is_zero(), ERR_INVALID_ADDRESS);
        require!(!admin.is_zero(), ERR_INVALID_ADDRESS);
        self.maker().set(&maker);
        self.fee_manager().set(&fee_manager);
        self.admin().set(&admin);
        self.admins_set_event(&maker, &fee_manager, &admin);
    }

    /// External vote proxy contract allowed to call `voteFor`.
    #[endpoint(setVoter)]
    fn set_voter(&self, voter: ManagedAddress) {
        self.require_owner();
        self.voter().set(&voter);
    }

    #[endpoint(setMinter)]
    fn set_minter(&self, minter: ManagedAddress) {
        self.require_owner();
        self.minter().set(&minter);
    }

    #[endpoint(setPaused)]
    fn set_paused(&self, paused: bool) {
        self.require_owner();
        self.paused().set(paused);
        self.paused_event(paused);
    }

    // ── Fees ──

    #[endpoint(setBaseVariableFee)]
    fn set_base_variable_fee(&self, fee: u64) {
        self.require_owner();
        require!(fee >= MIN_FEE_DIVISOR, ERR_INVALID_FEE);
        self.base_variable_fee().set(fee);
    }

    #[endpoint(setBaseStableFee)]
    fn set_base_stable_fee(&self, fee: u64) {
        self.require_owner();
        require!(fee >= MIN_FEE_DIVISOR, ERR_INVALID_FEE);
        self.base_stable_fee().set(fee);
    }

    /// Shares of every swap fee skimmed for the maker and the pair's
    /// protocol address; LPs keep the rest.
    #[endpoint(setFeeShares)]
    fn set_fee_shares(&self, maker_bps: u64, protocol_bps: u64) {
        self.require_owner();
        require!(maker_bps + protocol_bps <= BPS_DENOMINATOR, ERR_INVALID_BPS);
        self.maker_fee_share_bps().set(maker_bps);
        self.protocol_fee_share_bps().set(protocol_bps);
    }

    /// Split applied to fees a gauge claims before the rest becomes bribes.
    #[endpoint(setGaugeFeeShares)]
    fn set_gauge_fee_shares(&self, maker_bps: u64, protocol_bps: u64) {
        self.require_owner();
        require!(maker_bps + protocol_bps <= BPS_DENOMINATOR, ERR_INVALID_BPS);
        self.gauge_maker_fee_bps().set(maker_bps);
        self.gauge_protocol_fee_bps().set(protocol_bps);
    }

    #[endpoint(setReferral)]
    fn set_referral(&self, main_receiver: ManagedAddress, fee_bps: u64) {
        self.require_owner();
        require!(fee_bps <= BPS_DENOMINATOR, ERR_INVALID_BPS);
        self.main_ref_fee_receiver().set(&main_receiver);
        self.referral_fee_bps().set(fee_bps);
    }

    // ── Guards ──

    fn require_owner(&self) {
        require!(self.blockchain().get_caller() == self.owner().get(), ERR_UNAUTHORIZED);
    }

    fn require_owner_or_admin(&self) {
        let caller = self.blockchain().get_caller();
        require!(
            caller == self.owner().get() || caller == self.admin().get(),
            ERR_UNAUTHORIZED
        );
    }

    fn require_not_paused(&self) {
        require!(!self.paused().get(), ERR_PAUSED);
    }

    fn require_deadline(&self, deadline: u64) {
        require!(
            self.blockchain().get_block_timestamp() <= deadline,
            ERR_DEADLINE
        );
    }

    fn mul_bps(&self, amount: &BigUint, bps: u64) -> BigUint {
        amount * bps / BPS_DENOMINATOR
    }

    fn min_biguint(&self, a: &BigUint, b: &BigUint) -> BigUint {
        if a < b {
            a.clone()
        } else {
            b.clone()
        }
    }

    // ── Views ──

    #[view(getOwner)]
    fn get_owner(&self) -> ManagedAddress {
        self.owner().get()
    }

    #[view(getBaseFees)]
    fn get_base_fees(&self) -> MultiValue2<u64, u64> {
        (self.base_variable_fee().get(), self.base_stable_fee().get()).into()
    }

    #[view(getFeeShares)]
    fn get_fee_shares(&self) -> MultiValue2<u64, u64> {
        (
            self.maker_fee_share_bps().get(),
            self.protocol_fee_share_bps().get(),
        )
            .into()
    }

    #[view(getGaugeFeeShares)]
    fn get_gauge_fee_shares(&self) -> MultiValue2<u64, u64> {
        (
            self.gauge_maker_fee_bps().get(),
            self.gauge_protocol_fee_bps().get(),
        )
            .into()
    }

    #[view(getReferralConfig)]
    fn get_referral_config(&self) -> MultiValue2<ManagedAddress, u64> {
        let receiver = if self.main_ref_fee_receiver().is_empty() {
            ManagedAddress::zero()
        } else {
            self.main_ref_fee_receiver().get()
        };
        (receiver, self.referral_fee_bps().get()).into()
    }

    // ── Storage ──

    #[storage_mapper("owner")]
    fn owner(&self) -> SingleValueMapper<ManagedAddress>;

    #[view(getPendingOwner)]
    #[storage_mapper("pendingOwner")]
    fn pending_owner(&self) -> SingleValueMapper<ManagedAddress>;

    #[view(getAdmin)]
    #[storage_mapper("admin")]
    fn admin(&self) -> SingleValueMapper<ManagedAddress>;

    #[view(getFeeManager)]
    #[storage_mapper("feeManager")]
    fn fee_manager(&self) -> SingleValueMapper<ManagedAddress>;

    #[view(getMaker)]
    #[storage_mapper("maker")]
    fn maker(&self) -> SingleValueMapper<ManagedAddress>;

    #[view(getVoter)]
    #[storage_mapper("voter")]
    fn voter(&self) -> SingleValueMapper<ManagedAddress>;

    #[view(getMinter)]
    #[storage_mapper("minter")]
    fn minter(&self) -> SingleValueMapper<ManagedAddress>;

    #[view(isPaused)]
    #[storage_mapper("paused")]
    fn paused(&self) -> SingleValueMapper<bool>;

    #[view(getEmissionToken)]
    #[storage_mapper("emissionToken")]
    fn emission_token(&self) -> SingleValueMapper<TokenIdentifier>;

    #[storage_mapper("baseVariableFee")]
    fn base_variable_fee(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("baseStableFee")]
    fn base_stable_fee(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("makerFeeShareBps")]
    fn maker_fee_share_bps(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("protocolFeeShareBps")]
    fn protocol_fee_share_bps(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("gaugeMakerFeeBps")]
    fn gauge_maker_fee_bps(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("gaugeProtocolFeeBps")]
    fn gauge_protocol_fee_bps(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("mainRefFeeReceiver")]
    fn main_ref_fee_receiver(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("referralFeeBps")]
    fn referral_fee_bps(&self) -> SingleValueMapper<u64>;
}
