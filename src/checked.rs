//! Input-verifying wrapper around [`Merger`].
//!
//! The plain merger trusts that its inputs are sorted. This wrapper checks every run first and
//! refuses to merge a run that is out of order. It costs a full pass over the inputs, so it is
//! meant for tests and debugging, never for the hot path.

use crate::error::MergeError;
use crate::merge::{MergeResult, MergeStats, Merger};
use crate::order::Comparator;

/// Index of the first element that precedes its predecessor, if any.
pub fn first_unsorted<T, C: Comparator<T>>(cmp: &C, run: &[T]) -> Option<usize> {
    run.windows(2)
        .position(|pair| cmp.precedes(&pair[1], &pair[0]))
        .map(|i| i + 1)
}

#[derive(Debug, Clone, Copy)]
pub struct CheckedMerger<C> {
    inner: Merger<C>,
}

impl<C> CheckedMerger<C> {
    pub fn new(inner: Merger<C>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Merger<C> {
        &self.inner
    }

    fn verify<T>(&self, runs: &[&[T]]) -> Result<(), MergeError>
    where
        C: Comparator<T>,
    {
        for (run, data) in runs.iter().enumerate() {
            if let Some(index) = first_unsorted(self.inner.comparator(), data) {
                return Err(MergeError::UnsortedRun { run, index });
            }
        }
        Ok(())
    }

    pub fn merge<T: Copy>(
        &self,
        runs: &[&[T]],
        capacity: usize,
        track: bool,
    ) -> Result<MergeResult<T>, MergeError>
    where
        C: Comparator<T>,
    {
        self.verify(runs)?;
        self.inner.merge(runs, capacity, track)
    }

    pub fn merge_into<T: Copy>(
        &self,
        runs: &[&[T]],
        dst: &mut [T],
        track: bool,
    ) -> Result<MergeStats, MergeError>
    where
        C: Comparator<T>,
    {
        self.verify(runs)?;
        self.inner.merge_into(runs, dst, track)
    }

    pub fn merge_until_exhausted<T: Copy>(
        &self,
        runs: &[&[T]],
        capacity: usize,
    ) -> Result<MergeResult<T>, MergeError>
    where
        C: Comparator<T>,
    {
        self.verify(runs)?;
        self.inner.merge_until_exhausted(runs, capacity)
    }
}
