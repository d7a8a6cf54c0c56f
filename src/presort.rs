//! Base block preparation.
//!
//! The merge engine starts from a buffer of small sorted blocks. These helpers build one from raw
//! values: tag each value with its position, then sort every block on its own.

use crate::error::MergeError;
use crate::order::{Comparator, Scored};

/// Sorts each `block_len` chunk of `data` independently. The sort is stable, so equal values keep
/// their original order inside a block.
pub fn presort_blocks<T, C: Comparator<T>>(
    data: &mut [T],
    block_len: usize,
    cmp: &C,
) -> Result<(), MergeError> {
    if block_len == 0 {
        return Err(MergeError::ZeroBlockLen);
    }
    for block in data.chunks_mut(block_len) {
        block.sort_by(|a, b| cmp.compare(a, b));
    }
    Ok(())
}

/// Pairs every value with its index.
pub fn with_indices<V: Copy>(values: &[V]) -> Result<Vec<Scored<V>>, MergeError> {
    if values.len() > 1 && u32::try_from(values.len() - 1).is_err() {
        return Err(MergeError::IndexOverflow { len: values.len() });
    }
    Ok(values
        .iter()
        .enumerate()
        .map(|(i, &value)| Scored::new(value, i as u32))
        .collect())
}

/// Splits records back into parallel value and index vectors.
pub fn split_scored<V: Copy>(scored: &[Scored<V>]) -> (Vec<V>, Vec<u32>) {
    scored.iter().map(|s| (s.value, s.index)).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::SortOrder;

    #[test]
    fn sorts_each_block_alone() {
        let mut data = [3, 1, 2, 9, 7, 8, 5];
        presort_blocks(&mut data, 3, &SortOrder::Descending).unwrap();
        assert_eq!(data, [3, 2, 1, 9, 8, 7, 5]);
    }

    #[test]
    fn indices_round_trip() {
        let mut scored = with_indices(&[0.5f32, 2.0, 1.0, 2.0]).unwrap();
        presort_blocks(&mut scored, 4, &SortOrder::Descending).unwrap();
        let (values, indices) = split_scored(&scored);
        assert_eq!(values, vec![2.0, 2.0, 1.0, 0.5]);
        assert_eq!(indices, vec![1, 3, 2, 0]);
    }
}
