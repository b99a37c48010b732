multiversx_sc::imports!();

use crate::types::Checkpoint;

pub const WEEK: u64 = 604_800;

/// Start of the week containing `timestamp`.
pub fn epoch_start(timestamp: u64) -> u64 {
    timestamp / WEEK * WEEK
}

/// Append-only (epoch, value) histories. A write for the epoch of the
/// last entry overwrites it; anything else appends, so history before
/// the last entry is never rewritten.
#[multiversx_sc::module]
pub trait CheckpointsModule {
    fn write_checkpoint(&self, mut history: VecMapper<Checkpoint<Self::Api>>, epoch: u64, value: &BigUint) {
        let len = history.len();
        if len > 0 {
            let last = history.get(len);
            if last.epoch == epoch {
                history.set(
                    len,
                    &Checkpoint {
                        epoch,
                        value: value.clone(),
                    },
                );
                return;
            }
        }
        history.push(&Checkpoint {
            epoch,
            value: value.clone(),
        });
    }

    /// Value of the latest checkpoint at or before `epoch`, zero if none.
    fn checkpoint_at(&self, history: &VecMapper<Checkpoint<Self::Api>>, epoch: u64) -> BigUint {
        match self.checkpoint_entry_at(history, epoch) {
            Some(entry) => entry.value,
            None => BigUint::zero(),
        }
    }

    /// Latest checkpoint at or before `epoch`.
    fn checkpoint_entry_at(
        &self,
        history: &VecMapper<Checkpoint<Self::Api>>,
        epoch: u64,
    ) -> Option<Checkpoint<Self::Api>> {
        let len = history.len();
        if len == 0 {
            return None;
        }

        let last = history.get(len);
        if last.epoch <= epoch {
            return Some(last);
        }
        if history.get(1).epoch > epoch {
            return None;
        }

        // Invariant: entry `low` is at or before `epoch`, `high` is after it.
        let mut low = 1usize;
        let mut high = len;
        while high - low > 1 {
            let mid = low + (high - low) / 2;
            if history.get(mid).epoch <= epoch {
                low = mid;
            } else {
                high = mid;
            }
        }
        Some(history.get(low))
    }

    fn latest_checkpoint(&self, history: &VecMapper<Checkpoint<Self::Api>>) -> BigUint {
        let len = history.len();
        if len == 0 {
            BigUint::zero()
        } else {
            history.get(len).value
        }
    }

    /// Epoch of the first checkpoint, if any.
    fn first_checkpoint_epoch(&self, history: &VecMapper<Checkpoint<Self::Api>>) -> Option<u64> {
        if history.is_empty() {
            None
        } else {
            Some(history.get(1).epoch)
        }
    }

    #[view(getEpoch)]
    fn get_epoch(&self) -> u64 {
        self.current_epoch()
    }

    fn current_epoch(&self) -> u64 {
        epoch_start(self.blockchain().get_block_timestamp())
    }
}
