//! Single-list block merge: one buffer, many sorted blocks, fewer and longer blocks out.

use tracing::debug;

use crate::error::MergeError;
use crate::exhaustion::MAX_RUNS;
use crate::merge::Merger;
use crate::order::Comparator;

/// Merges every group of up to `fan_in` adjacent blocks of `block_len` into one block, where
/// `fan_in` is the merger's maximum arity. A short final group is merged at whatever arity it
/// has; a lone final block is left as it is. Returns the new block length.
///
/// Every block is drained completely, so merges run untracked.
pub fn merge_round<T: Copy, C: Comparator<T>>(
    merger: &Merger<C>,
    data: &mut [T],
    block_len: usize,
) -> Result<usize, MergeError> {
    if block_len == 0 {
        return Err(MergeError::ZeroBlockLen);
    }
    let group_len = block_len.saturating_mul(merger.max_arity().get());
    if block_len >= data.len() {
        return Ok(group_len);
    }
    debug!(block_len, groups = data.len().div_ceil(group_len), "block merge round");

    let mut scratch = data[..group_len.min(data.len())].to_vec();
    for group in data.chunks_mut(group_len) {
        let mut runs: [&[T]; MAX_RUNS] = [&[][..]; MAX_RUNS];
        let mut count = 0;
        for (slot, block) in runs.iter_mut().zip(group.chunks(block_len)) {
            *slot = block;
            count += 1;
        }
        if count < 2 {
            continue;
        }
        let dst = &mut scratch[..group.len()];
        merger.merge_into(&runs[..count], dst, false)?;
        group.copy_from_slice(dst);
    }
    Ok(group_len)
}

/// Repeats [`merge_round`] until the whole buffer is one sorted block.
pub fn sort_by_rounds<T: Copy, C: Comparator<T>>(
    merger: &Merger<C>,
    data: &mut [T],
    block_len: usize,
) -> Result<(), MergeError> {
    if block_len == 0 {
        return Err(MergeError::ZeroBlockLen);
    }
    let mut len = block_len;
    while len < data.len() {
        len = merge_round(merger, data, len)?;
    }
    Ok(())
}
