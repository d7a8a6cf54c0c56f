//! Bounded k-way merge and top-K selection over pre-sorted runs.
//!
//! The core is [`Merger`]: it merges 2 to 4 sorted runs into one, stops at a capacity, and reports
//! how many elements it consumed from each run so a later call can pick up where it stopped.
//! [`BlockSorter`] builds a full sort or a top-K on top of it for a buffer made of many small
//! sorted blocks, merging them four at a time and clamping every merge to K.
//!
//! ```
//! use bounded_merge::{Merger, SortOrder};
//!
//! let merger = Merger::new(SortOrder::Descending);
//! let result = merger.merge(&[&[5, 3][..], &[4, 2], &[6, 1]], 4, true).unwrap();
//! assert_eq!(result.output, vec![6, 5, 4, 3]);
//! assert_eq!(result.consumed.unwrap().as_slice(), &[2, 1, 1]);
//! ```
//!
//! Everything here is synchronous and keeps no state between calls. Independent partitions can be
//! processed concurrently; [`indexed::top_k_rows`] does that for the rows of a matrix.

pub mod block_merge;
pub mod checked;
pub mod config;
pub mod driver;
pub mod error;
pub mod exhaustion;
pub mod indexed;
pub mod merge;
pub mod order;
pub mod presort;
pub mod schedule;

pub use checked::CheckedMerger;
pub use config::EngineConfig;
pub use driver::BlockSorter;
pub use error::{ConfigError, MergeError};
pub use exhaustion::{Consumed, MAX_RUNS, ResumeCursor};
pub use indexed::TopK;
pub use merge::{ChunkedMerge, MergeArity, MergeResult, MergeStats, Merger};
pub use order::{Comparator, Scored, SortKey, SortOrder};
pub use schedule::Schedule;
