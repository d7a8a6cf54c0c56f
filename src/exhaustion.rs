//! Consumption tracking.
//!
//! A tracked merge reports how many elements it took from each input. The engine keeps nothing
//! between calls; [`ResumeCursor`] is the caller-side bookkeeping that turns those counts into the
//! next call's starting offsets.

use std::ops::Index;

use crate::error::MergeError;

/// Most inputs a single merge call accepts.
pub const MAX_RUNS: usize = 4;

/// Elements consumed from each input run by one merge call. Unused slots are 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Consumed {
    counts: [usize; MAX_RUNS],
    runs: usize,
}

impl Consumed {
    pub(crate) fn new(counts: [usize; MAX_RUNS], runs: usize) -> Self {
        debug_assert!(runs <= MAX_RUNS);
        debug_assert!(counts[runs..].iter().all(|&c| c == 0));
        Self { counts, runs }
    }

    /// Number of inputs the merge was called with.
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.counts[..self.runs]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl Index<usize> for Consumed {
    type Output = usize;

    fn index(&self, run: usize) -> &usize {
        &self.counts[run]
    }
}

/// Read offsets into a fixed set of runs, advanced by the counts of successive merges.
///
/// Offsets only ever grow. A [`Consumed`] that would push any offset past the end of its run is
/// rejected as a whole, leaving the cursor untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeCursor {
    offsets: [usize; MAX_RUNS],
    lens: [usize; MAX_RUNS],
    runs: usize,
}

impl ResumeCursor {
    pub fn new<T>(runs: &[&[T]]) -> Result<Self, MergeError> {
        let lens: Vec<usize> = runs.iter().map(|run| run.len()).collect();
        Self::from_lens(&lens)
    }

    pub fn from_lens(lens: &[usize]) -> Result<Self, MergeError> {
        if lens.len() > MAX_RUNS {
            return Err(MergeError::InvalidArity {
                got: lens.len(),
                max: MAX_RUNS,
            });
        }
        let mut fixed = [0; MAX_RUNS];
        fixed[..lens.len()].copy_from_slice(lens);
        Ok(Self {
            offsets: [0; MAX_RUNS],
            lens: fixed,
            runs: lens.len(),
        })
    }

    pub fn advance(&mut self, consumed: &Consumed) -> Result<(), MergeError> {
        for run in 0..MAX_RUNS {
            let remaining = self.remaining_len(run);
            if consumed[run] > remaining {
                return Err(MergeError::ConsumedPastEnd {
                    run,
                    consumed: consumed[run],
                    remaining,
                });
            }
        }
        for run in 0..MAX_RUNS {
            self.offsets[run] += consumed[run];
        }
        Ok(())
    }

    pub fn offset(&self, run: usize) -> usize {
        self.offsets[run]
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets[..self.runs]
    }

    /// Offset of `run` in units of `stride`, for callers addressing raw storage.
    pub fn element_offset(&self, run: usize, stride: usize) -> usize {
        self.offsets[run] * stride
    }

    pub fn remaining_len(&self, run: usize) -> usize {
        self.lens[run] - self.offsets[run]
    }

    pub fn is_exhausted(&self, run: usize) -> bool {
        self.remaining_len(run) == 0
    }

    pub fn all_exhausted(&self) -> bool {
        (0..self.runs).all(|run| self.is_exhausted(run))
    }

    pub fn consumed_total(&self) -> usize {
        self.offsets.iter().sum()
    }

    /// The unconsumed tail of each run. `runs` must be the slices the cursor was built from.
    pub fn remaining<'a, T>(&self, runs: &[&'a [T]]) -> Vec<&'a [T]> {
        debug_assert_eq!(runs.len(), self.runs);
        runs.iter()
            .zip(self.offsets)
            .map(|(run, offset)| run.get(offset..).unwrap_or(&[]))
            .collect()
    }
}
