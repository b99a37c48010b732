multiversx_sc::imports!();

use crate::amm_math::precision;
use crate::checkpoints::{epoch_start, WEEK};
use crate::errors::*;
use crate::types::{LockedBalance, SupplyPoint};

/// Four years
pub const MAX_LOCK_DURATION: u64 = 4 * 365 * 86_400;

/// Bound on the weekly walk of the supply curve
const MAX_SUPPLY_WEEKS: usize = 255;

// ============================================================
// VotingEscrow
//
// One lock per holder. Voting power is read from the lock and
// the block time; nothing decays in storage. The aggregate
// curve is a (bias, slope) point plus per-week slope changes,
// scaled by 1e18.
// ============================================================

#[multiversx_sc::module]
pub trait VotingEscrowModule:
    crate::config::ConfigModule + crate::events::EventsModule + crate::checkpoints::CheckpointsModule
{
    // ========================================================
    // INTERNAL: lock lifecycle
    // ========================================================

    fn lock_tokens(&self, account: &ManagedAddress, amount: &BigUint, unlock_time: u64) -> u64 {
        require!(*amount > 0u64, ERR_INVALID_AMOUNT);
        let now = self.blockchain().get_block_timestamp();
        let previous = self.lock_of(account);
        require!(previous.amount == 0u64, ERR_LOCK_EXISTS);

        let unlock_time = self.validate_unlock_time(unlock_time, now);
        let lock = LockedBalance {
            amount: amount.clone(),
            unlock_time,
        };

        self.checkpoint_supply(&previous, &lock);
        self.locks(account).set(&lock);
        self.total_locked().update(|total| *total += amount);

        self.lock_created_event(account, amount, unlock_time);
        unlock_time
    }

    fn add_to_lock(&self, account: &ManagedAddress, amount: &BigUint) {
        require!(*amount > 0u64, ERR_INVALID_AMOUNT);
        let now = self.blockchain().get_block_timestamp();
        let previous = self.lock_of(account);
        require!(previous.amount > 0u64, ERR_NO_LOCK);
        require!(previous.unlock_time > now, ERR_LOCK_EXPIRED);

        let lock = LockedBalance {
            amount: &previous.amount + amount,
            unlock_time: previous.unlock_time,
        };

        self.checkpoint_supply(&previous, &lock);
        self.locks(account).set(&lock);
        self.total_locked().update(|total| *total += amount);

        self.lock_increased_event(account, amount, &lock.amount);
    }

    fn extend_lock(&self, account: &ManagedAddress, unlock_time: u64) -> u64 {
        let now = self.blockchain().get_block_timestamp();
        let previous = self.lock_of(account);
        require!(previous.amount > 0u64, ERR_NO_LOCK);
        require!(previous.unlock_time > now, ERR_LOCK_EXPIRED);

        let unlock_time = self.validate_unlock_time(unlock_time, now);
        require!(unlock_time > previous.unlock_time, ERR_INVALID_UNLOCK_TIME);

        let lock = LockedBalance {
            amount: previous.amount.clone(),
            unlock_time,
        };

        self.checkpoint_supply(&previous, &lock);
        self.locks(account).set(&lock);

        self.lock_extended_event(account, unlock_time);
        unlock_time
    }

    /// Clears an expired lock and returns its amount; the caller pays out.
    fn release_lock(&self, account: &ManagedAddress) -> BigUint {
        let now = self.blockchain().get_block_timestamp();
        let previous = self.lock_of(account);
        require!(previous.amount > 0u64, ERR_NO_LOCK);
        require!(now >= previous.unlock_time, ERR_LOCK_NOT_EXPIRED);

        // Expired locks already left the aggregate curve through slope changes.
        self.advance_supply_point(now);
        self.locks(account).clear();
        self.total_locked().update(|total| *total -= &previous.amount);

        self.lock_withdrawn_event(account, &previous.amount);
        previous.amount
    }

    fn validate_unlock_time(&self, unlock_time: u64, now: u64) -> u64 {
        let rounded = epoch_start(unlock_time);
        require!(
            rounded > now && rounded <= now + MAX_LOCK_DURATION,
            ERR_INVALID_UNLOCK_TIME
        );
        rounded
    }

    fn lock_of(&self, account: &ManagedAddress) -> LockedBalance<Self::Api> {
        if self.locks(account).is_empty() {
            LockedBalance {
                amount: BigUint::zero(),
                unlock_time: 0,
            }
        } else {
            self.locks(account).get()
        }
    }

    // ========================================================
    // INTERNAL: voting power
    // ========================================================

    /// amount * (unlock - t) / MAX_LOCK_DURATION, zero from unlock on.
    fn ve_balance_at(&self, account: &ManagedAddress, timestamp: u64) -> BigUint {
        let lock = self.lock_of(account);
        if lock.amount == 0u64 || timestamp >= lock.unlock_time {
            return BigUint::zero();
        }
        lock.amount * (lock.unlock_time - timestamp) / MAX_LOCK_DURATION
    }

    fn ve_supply_now(&self) -> BigUint {
        let now = self.blockchain().get_block_timestamp();
        let point = self.advanced_point(&self.stored_supply_point(now), now);
        point.bias / precision::<Self::Api>()
    }

    fn lock_slope(&self, amount: &BigUint) -> BigUint {
        amount * &precision::<Self::Api>() / MAX_LOCK_DURATION
    }

    fn stored_supply_point(&self, now: u64) -> SupplyPoint<Self::Api> {
        if self.supply_point().is_empty() {
            SupplyPoint {
                bias: BigUint::zero(),
                slope: BigUint::zero(),
                timestamp: now,
            }
        } else {
            self.supply_point().get()
        }
    }

    /// Walks the curve week by week from `point` to `timestamp`,
    /// applying slope changes at each week boundary reached.
    fn advanced_point(&self, point: &SupplyPoint<Self::Api>, timestamp: u64) -> SupplyPoint<Self::Api> {
        if timestamp <= point.timestamp {
            return point.clone();
        }

        let mut bias = point.bias.clone();
        let mut slope = point.slope.clone();
        let mut last = point.timestamp;
        let mut week = epoch_start(last);

        for _ in 0..MAX_SUPPLY_WEEKS {
            week += WEEK;
            let step_end = if week > timestamp { timestamp } else { week };

            let decay = &slope * (step_end - last);
            bias = if decay >= bias {
                BigUint::zero()
            } else {
                bias - decay
            };

            if step_end == week {
                let change = self.slope_changes(week).get();
                slope = if change >= slope {
                    BigUint::zero()
                } else {
                    slope - change
                };
            }

            last = step_end;
            if last == timestamp {
                break;
            }
        }

        SupplyPoint {
            bias,
            slope,
            timestamp: last,
        }
    }

    fn advance_supply_point(&self, now: u64) -> SupplyPoint<Self::Api> {
        let point = self.advanced_point(&self.stored_supply_point(now), now);
        self.supply_point().set(&point);
        point
    }

    /// Replaces `previous` with `next` in the aggregate curve.
    fn checkpoint_supply(&self, previous: &LockedBalance<Self::Api>, next: &LockedBalance<Self::Api>) {
        let now = self.blockchain().get_block_timestamp();
        let mut point = self.advance_supply_point(now);

        if previous.amount > 0u64 && previous.unlock_time > now {
            let slope = self.lock_slope(&previous.amount);
            let bias = &slope * (previous.unlock_time - now);
            point.bias = if bias >= point.bias {
                BigUint::zero()
            } else {
                &point.bias - &bias
            };
            point.slope = if slope >= point.slope {
                BigUint::zero()
            } else {
                &point.slope - &slope
            };
            self.slope_changes(previous.unlock_time).update(|change| {
                *change = if slope >= *change {
                    BigUint::zero()
                } else {
                    &*change - &slope
                };
            });
        }

        if next.amount > 0u64 && next.unlock_time > now {
            let slope = self.lock_slope(&next.amount);
            point.bias += &slope * (next.unlock_time - now);
            point.slope += &slope;
            self.slope_changes(next.unlock_time)
                .update(|change| *change += &slope);
        }

        point.timestamp = now;
        self.supply_point().set(&point);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(veBalanceOf)]
    fn ve_balance_of(&self, account: ManagedAddress) -> BigUint {
        let now = self.blockchain().get_block_timestamp();
        self.ve_balance_at(&account, now)
    }

    #[view(veBalanceOfAt)]
    fn ve_balance_of_at(&self, account: ManagedAddress, timestamp: u64) -> BigUint {
        self.ve_balance_at(&account, timestamp)
    }

    #[view(veTotalSupply)]
    fn ve_total_supply(&self) -> BigUint {
        self.ve_supply_now()
    }

    /// Only defined from the last stored checkpoint onward.
    #[view(veTotalSupplyAt)]
    fn ve_total_supply_at(&self, timestamp: u64) -> BigUint {
        let now = self.blockchain().get_block_timestamp();
        let point = self.stored_supply_point(now);
        require!(timestamp >= point.timestamp, ERR_INVALID_UNLOCK_TIME);
        self.advanced_point(&point, timestamp).bias / precision::<Self::Api>()
    }

    #[view(getLock)]
    fn get_lock(&self, account: ManagedAddress) -> LockedBalance<Self::Api> {
        self.lock_of(&account)
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("locks")]
    fn locks(&self, account: &ManagedAddress) -> SingleValueMapper<LockedBalance<Self::Api>>;

    #[view(getTotalLocked)]
    #[storage_mapper("totalLocked")]
    fn total_locked(&self) -> SingleValueMapper<BigUint>;

    #[storage_mapper("supplyPoint")]
    fn supply_point(&self) -> SingleValueMapper<SupplyPoint<Self::Api>>;

    #[storage_mapper("slopeChanges")]
    fn slope_changes(&self, week: u64) -> SingleValueMapper<BigUint>;
}
