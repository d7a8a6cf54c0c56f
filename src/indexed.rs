//! Top-K over raw values, reporting where each winner came from.
//!
//! This is the full pipeline: tag values with their indices, sort base blocks, run the block
//! top-K, and split the winners back into values and indices. Rows of a matrix are independent,
//! so [`top_k_rows`] runs one pipeline per row on the rayon pool.

use rayon::prelude::*;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::MergeError;
use crate::order::SortKey;
use crate::presort::{presort_blocks, split_scored, with_indices};

#[derive(Debug, Clone, PartialEq)]
pub struct TopK<V> {
    pub values: Vec<V>,
    /// Position of each value in the input row.
    pub indices: Vec<u32>,
}

pub fn top_k_indexed<V: SortKey>(
    config: &EngineConfig,
    values: &[V],
    k: usize,
) -> Result<TopK<V>, MergeError> {
    config.validate()?;
    let mut scored = with_indices(values)?;
    presort_blocks(&mut scored, config.base_block, &config.order)?;
    let total_len = scored.len();
    let len = config
        .sorter()
        .top_k_in_place(&mut scored, config.base_block, total_len, k)?;
    let (values, indices) = split_scored(&scored[..len]);
    Ok(TopK { values, indices })
}

/// Top-K of every `row_len` row of `data`, rows processed in parallel.
pub fn top_k_rows<V: SortKey + Send + Sync>(
    config: &EngineConfig,
    data: &[V],
    row_len: usize,
    k: usize,
) -> Result<Vec<TopK<V>>, MergeError> {
    if row_len == 0 || data.len() % row_len != 0 {
        return Err(MergeError::RaggedRows {
            len: data.len(),
            row_len,
        });
    }
    debug!(rows = data.len() / row_len, row_len, k, "row top-k");
    data.par_chunks(row_len)
        .map(|row| top_k_indexed(config, row, k))
        .collect()
}
