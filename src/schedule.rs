//! Block merge planning.
//!
//! A buffer made of sorted base blocks is merged in rounds. Each round combines every complete
//! group of `fan_in` adjacent blocks into one block `fan_in` times longer. Whatever a round cannot
//! group is left in place, so once no complete group remains the buffer holds blocks of strictly
//! decreasing size from front to back. Those are folded into the front block two at a time.
//!
//! For top-K every merge is clamped to K, so a block of length `L` only carries `min(L, K)` valid
//! elements at its front.

use crate::error::MergeError;
use crate::merge::MergeArity;

/// One pass of fan-in merges over the front of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub round: usize,
    /// Length of the blocks going in.
    pub block_len: usize,
    /// Length of the blocks coming out, `block_len * fan_in`.
    pub merged_len: usize,
    /// Complete groups merged this round, starting at offset 0.
    pub groups: usize,
    /// Valid elements read from each input block.
    pub run_len: usize,
    /// Output capacity of each merge.
    pub capacity: usize,
}

/// A 2-way merge of the accumulator at offset 0 with the next tail block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldStep {
    pub offset: usize,
    pub block_len: usize,
    /// Valid elements read from the block.
    pub run_len: usize,
    /// Valid elements in the accumulator before the fold.
    pub acc_len: usize,
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    total_len: usize,
    k: usize,
    rounds: Vec<Round>,
    tail: Vec<usize>,
    folds: Vec<FoldStep>,
}

impl Schedule {
    /// Plans a top-K over `total_len` elements in sorted blocks of `block_len`. `k` is clamped to
    /// `total_len`; pass `total_len` for a full sort.
    pub fn plan(
        total_len: usize,
        block_len: usize,
        k: usize,
        fan_in: MergeArity,
    ) -> Result<Self, MergeError> {
        if block_len == 0 {
            return Err(MergeError::ZeroBlockLen);
        }
        let k = k.min(total_len);
        let fan_in = fan_in.get();

        let mut rounds = Vec::new();
        let mut levels = vec![block_len];
        let mut len = block_len;
        loop {
            let Some(merged_len) = len.checked_mul(fan_in).filter(|&m| m <= total_len) else {
                break;
            };
            rounds.push(Round {
                round: rounds.len(),
                block_len: len,
                merged_len,
                groups: total_len / merged_len,
                run_len: len.min(k),
                capacity: merged_len.min(k),
            });
            len = merged_len;
            levels.push(len);
        }

        let mut tail = Vec::new();
        let mut rest = total_len;
        for &level in levels.iter().rev() {
            let count = rest / level;
            tail.extend(std::iter::repeat_n(level, count));
            rest -= count * level;
        }
        // Partial base block.
        if rest > 0 {
            tail.push(rest);
        }

        let mut folds = Vec::new();
        if let Some((&first, others)) = tail.split_first() {
            let mut offset = first;
            let mut acc_len = first.min(k);
            for &block_len in others {
                let run_len = block_len.min(k);
                let capacity = (acc_len + run_len).min(k);
                folds.push(FoldStep {
                    offset,
                    block_len,
                    run_len,
                    acc_len,
                    capacity,
                });
                acc_len = capacity;
                offset += block_len;
            }
        }

        Ok(Self {
            total_len,
            k,
            rounds,
            tail,
            folds,
        })
    }

    pub fn total_len(&self) -> usize {
        self.total_len
    }

    /// K after clamping.
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Block lengths left after the last round, front to back.
    pub fn tail_blocks(&self) -> &[usize] {
        &self.tail
    }

    pub fn folds(&self) -> &[FoldStep] {
        &self.folds
    }

    /// Length of the sorted result at the front of the buffer.
    pub fn output_len(&self) -> usize {
        self.k
    }
}
