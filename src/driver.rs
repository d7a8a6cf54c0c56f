//! Hierarchical full sort and top-K over a buffer of sorted blocks.

use tracing::{debug, trace};

use crate::error::MergeError;
use crate::exhaustion::MAX_RUNS;
use crate::merge::Merger;
use crate::order::Comparator;
use crate::schedule::Schedule;

/// Drives a [`Merger`] over a [`Schedule`].
///
/// The merger's maximum arity is the fan-in of every round. Merged groups go through a scratch
/// buffer of at most K elements and are copied back, so no merge ever writes over input it has
/// not read yet.
#[derive(Debug, Clone, Copy)]
pub struct BlockSorter<C> {
    merger: Merger<C>,
}

impl<C> BlockSorter<C> {
    pub fn new(merger: Merger<C>) -> Self {
        Self { merger }
    }

    pub fn merger(&self) -> &Merger<C> {
        &self.merger
    }

    /// Sorts `buffer[..total_len]`, which must consist of sorted blocks of `block_len` (the last
    /// one may be shorter).
    pub fn sort_blocks<T: Copy>(
        &self,
        buffer: &mut [T],
        block_len: usize,
        total_len: usize,
    ) -> Result<(), MergeError>
    where
        C: Comparator<T>,
    {
        self.top_k_in_place(buffer, block_len, total_len, total_len)?;
        Ok(())
    }

    /// The first `min(k, total_len)` elements of `buffer[..total_len]` in sorted order.
    ///
    /// The buffer is used as workspace and is left partially merged.
    pub fn top_k<T: Copy>(
        &self,
        buffer: &mut [T],
        block_len: usize,
        total_len: usize,
        k: usize,
    ) -> Result<Vec<T>, MergeError>
    where
        C: Comparator<T>,
    {
        let len = self.top_k_in_place(buffer, block_len, total_len, k)?;
        Ok(buffer[..len].to_vec())
    }

    /// Like [`top_k`](Self::top_k) but leaves the result at the front of `buffer` and returns
    /// its length. A `k` above `total_len` is clamped; `k == 0` does nothing.
    pub fn top_k_in_place<T: Copy>(
        &self,
        buffer: &mut [T],
        block_len: usize,
        total_len: usize,
        k: usize,
    ) -> Result<usize, MergeError>
    where
        C: Comparator<T>,
    {
        if total_len > buffer.len() {
            return Err(MergeError::BufferTooShort {
                total_len,
                buffer_len: buffer.len(),
            });
        }
        let schedule = Schedule::plan(total_len, block_len, k, self.merger.max_arity())?;
        if schedule.k() < k {
            debug!(requested = k, clamped = schedule.k(), "k exceeds input length");
        }
        if schedule.k() == 0 {
            return Ok(0);
        }
        self.execute(&schedule, &mut buffer[..total_len])?;
        Ok(schedule.output_len())
    }

    fn execute<T: Copy>(&self, schedule: &Schedule, data: &mut [T]) -> Result<(), MergeError>
    where
        C: Comparator<T>,
    {
        let fan_in = self.merger.max_arity().get();
        // Every merge output is clamped to K, so a K-sized scratch holds any of them.
        let mut scratch = data[..schedule.k()].to_vec();

        for round in schedule.rounds() {
            debug!(
                round = round.round,
                block_len = round.block_len,
                groups = round.groups,
                capacity = round.capacity,
                "merge round"
            );
            for group in 0..round.groups {
                let base = group * round.merged_len;
                let runs: [&[T]; MAX_RUNS] = std::array::from_fn(|j| {
                    if j < fan_in {
                        let start = base + j * round.block_len;
                        &data[start..start + round.run_len]
                    } else {
                        &[][..]
                    }
                });
                let dst = &mut scratch[..round.capacity];
                let stats = self.merger.merge_into(&runs[..fan_in], dst, false)?;
                debug_assert_eq!(stats.produced, round.capacity);
                data[base..base + stats.produced].copy_from_slice(&scratch[..stats.produced]);
            }
        }

        if !schedule.folds().is_empty() {
            debug!(tail = ?schedule.tail_blocks(), "folding remainder");
        }
        for step in schedule.folds() {
            let acc = &data[..step.acc_len];
            let block = &data[step.offset..step.offset + step.run_len];
            let dst = &mut scratch[..step.capacity];
            let stats = self.merger.merge_into(&[acc, block], dst, true)?;
            if let Some(consumed) = stats.consumed {
                trace!(
                    offset = step.offset,
                    from_acc = consumed[0],
                    from_block = consumed[1],
                    dropped = step.acc_len + step.run_len - consumed.total(),
                    "fold"
                );
            }
            data[..stats.produced].copy_from_slice(&scratch[..stats.produced]);
        }
        Ok(())
    }
}
