//! The bounded merge operator.
//!
//! Merges 2 to 4 sorted runs into one sorted run, stopping at a caller-given capacity, and reports
//! how far into each run it got so the merge can be resumed later.

use serde::{Deserialize, Serialize};

use crate::error::MergeError;
use crate::exhaustion::{Consumed, MAX_RUNS, ResumeCursor};
use crate::order::Comparator;

/// Number of runs merged by one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum MergeArity {
    Two,
    Three,
    #[default]
    Four,
}

impl MergeArity {
    pub fn get(self) -> usize {
        match self {
            MergeArity::Two => 2,
            MergeArity::Three => 3,
            MergeArity::Four => 4,
        }
    }
}

impl TryFrom<usize> for MergeArity {
    type Error = MergeError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            2 => Ok(MergeArity::Two),
            3 => Ok(MergeArity::Three),
            4 => Ok(MergeArity::Four),
            got => Err(MergeError::InvalidArity { got, max: MAX_RUNS }),
        }
    }
}

impl From<MergeArity> for usize {
    fn from(arity: MergeArity) -> usize {
        arity.get()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult<T> {
    pub output: Vec<T>,
    /// Present when the call asked for tracking.
    pub consumed: Option<Consumed>,
}

/// Outcome of [`Merger::merge_into`]; the merged elements are in the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub produced: usize,
    pub consumed: Option<Consumed>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Capacity,
    /// Also stop once any input that started non-empty runs dry.
    FirstExhausted,
}

/// A merge operator bound to one comparator and a maximum arity.
///
/// Inputs must already be sorted under the comparator. That is not checked here: an unsorted run
/// produces a mis-ordered (but memory-safe) output. Wrap the merger in
/// [`CheckedMerger`](crate::checked::CheckedMerger) to verify inputs while debugging.
#[derive(Debug, Clone, Copy)]
pub struct Merger<C> {
    cmp: C,
    max_arity: MergeArity,
}

impl<C> Merger<C> {
    pub fn new(cmp: C) -> Self {
        Self {
            cmp,
            max_arity: MergeArity::Four,
        }
    }

    pub fn with_max_arity(mut self, max_arity: MergeArity) -> Self {
        self.max_arity = max_arity;
        self
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    pub fn max_arity(&self) -> MergeArity {
        self.max_arity
    }

    fn check(&self, runs: usize, capacity: usize) -> Result<(), MergeError> {
        if runs < 2 || runs > self.max_arity.get() {
            return Err(MergeError::InvalidArity {
                got: runs,
                max: self.max_arity.get(),
            });
        }
        if capacity == 0 {
            return Err(MergeError::ZeroCapacity);
        }
        Ok(())
    }

    /// Merges `runs` into a fresh vector of at most `capacity` elements.
    ///
    /// Equal elements from different runs come out lowest run first. With `track` set the
    /// result carries per-run consumed counts; they sum to the output length.
    pub fn merge<T: Copy>(
        &self,
        runs: &[&[T]],
        capacity: usize,
        track: bool,
    ) -> Result<MergeResult<T>, MergeError>
    where
        C: Comparator<T>,
    {
        self.check(runs.len(), capacity)?;
        let total: usize = runs.iter().map(|run| run.len()).sum();
        let mut output = Vec::with_capacity(capacity.min(total));
        let counts = self.dispatch(runs, capacity, Stop::Capacity, |x| output.push(x));
        Ok(MergeResult {
            output,
            consumed: track.then(|| Consumed::new(counts, runs.len())),
        })
    }

    /// Merges into `dst`, whose length is the capacity. Only the first `produced` elements of
    /// `dst` are written.
    pub fn merge_into<T: Copy>(
        &self,
        runs: &[&[T]],
        dst: &mut [T],
        track: bool,
    ) -> Result<MergeStats, MergeError>
    where
        C: Comparator<T>,
    {
        self.check(runs.len(), dst.len())?;
        let mut produced = 0;
        let counts = self.dispatch(runs, dst.len(), Stop::Capacity, |x| {
            dst[produced] = x;
            produced += 1;
        });
        Ok(MergeStats {
            produced,
            consumed: track.then(|| Consumed::new(counts, runs.len())),
        })
    }

    /// Like [`merge`](Self::merge) with tracking, but also suspends as soon as one input that
    /// started non-empty has been used up, so the caller can refill it before resuming.
    /// Inputs that are empty from the start never cause a suspension.
    pub fn merge_until_exhausted<T: Copy>(
        &self,
        runs: &[&[T]],
        capacity: usize,
    ) -> Result<MergeResult<T>, MergeError>
    where
        C: Comparator<T>,
    {
        self.check(runs.len(), capacity)?;
        let mut output = Vec::new();
        let counts = self.dispatch(runs, capacity, Stop::FirstExhausted, |x| output.push(x));
        Ok(MergeResult {
            output,
            consumed: Some(Consumed::new(counts, runs.len())),
        })
    }

    /// Produces the complete merge of `runs` in pieces of at most `chunk` elements, resuming
    /// each piece from the previous piece's consumed counts.
    pub fn stream<'m, 'a, T: Copy>(
        &'m self,
        runs: &[&'a [T]],
        chunk: usize,
    ) -> Result<ChunkedMerge<'m, 'a, T, C>, MergeError>
    where
        C: Comparator<T>,
    {
        self.check(runs.len(), chunk)?;
        Ok(ChunkedMerge {
            merger: self,
            runs: runs.to_vec(),
            cursor: ResumeCursor::new(runs)?,
            chunk,
        })
    }

    fn dispatch<T: Copy>(
        &self,
        runs: &[&[T]],
        capacity: usize,
        stop: Stop,
        emit: impl FnMut(T),
    ) -> [usize; MAX_RUNS]
    where
        C: Comparator<T>,
    {
        match runs.len() {
            2 => merge_n::<T, C, 2>(&self.cmp, runs, capacity, stop, emit),
            3 => merge_n::<T, C, 3>(&self.cmp, runs, capacity, stop, emit),
            4 => merge_n::<T, C, 4>(&self.cmp, runs, capacity, stop, emit),
            _ => unreachable!("arity is checked before dispatch"),
        }
    }
}

#[inline(always)]
fn merge_n<T: Copy, C: Comparator<T>, const N: usize>(
    cmp: &C,
    runs: &[&[T]],
    capacity: usize,
    stop: Stop,
    mut emit: impl FnMut(T),
) -> [usize; MAX_RUNS] {
    let srcs: [&[T]; N] = std::array::from_fn(|i| runs[i]);
    let mut cursors = [0usize; N];

    for _ in 0..capacity {
        // Scan heads in input order, replacing the winner only on strict precedence, so ties go
        // to the lowest input index.
        let mut winner: Option<usize> = None;
        for i in 0..N {
            let Some(head) = srcs[i].get(cursors[i]) else {
                continue;
            };
            match winner {
                Some(w) if !cmp.precedes(head, &srcs[w][cursors[w]]) => {}
                _ => winner = Some(i),
            }
        }
        let Some(w) = winner else {
            break;
        };

        emit(srcs[w][cursors[w]]);
        cursors[w] += 1;
        if stop == Stop::FirstExhausted && cursors[w] == srcs[w].len() {
            break;
        }
    }

    let mut consumed = [0; MAX_RUNS];
    consumed[..N].copy_from_slice(&cursors);
    consumed
}

/// Iterator returned by [`Merger::stream`].
pub struct ChunkedMerge<'m, 'a, T, C> {
    merger: &'m Merger<C>,
    runs: Vec<&'a [T]>,
    cursor: ResumeCursor,
    chunk: usize,
}

impl<T, C> ChunkedMerge<'_, '_, T, C> {
    /// Offsets reached so far.
    pub fn cursor(&self) -> &ResumeCursor {
        &self.cursor
    }
}

impl<T: Copy, C: Comparator<T>> Iterator for ChunkedMerge<'_, '_, T, C> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.cursor.all_exhausted() {
            return None;
        }
        let rest = self.cursor.remaining(&self.runs);
        // Arity and chunk size were validated when the stream was built.
        let result = self.merger.merge(&rest, self.chunk, true).ok()?;
        self.cursor.advance(&result.consumed?).ok()?;
        Some(result.output)
    }
}
