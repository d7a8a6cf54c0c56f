//! Element ordering.
//!
//! Every merge is driven by a [`Comparator`], fixed once per call site. The engine never looks at
//! element values any other way, so anything with a total order can be merged.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use half::f16;
use serde::{Deserialize, Serialize};

/// A type with a total order usable as a merge key.
pub trait SortKey: Copy {
    fn key_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! impl_ord_key {
    ($($t:ty),*) => {
        $(
            impl SortKey for $t {
                #[inline(always)]
                fn key_cmp(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

// Floats use the IEEE 754 totalOrder predicate: -0.0 sorts below +0.0 and NaNs sort at the ends.
macro_rules! impl_float_key {
    ($($t:ty),*) => {
        $(
            impl SortKey for $t {
                #[inline(always)]
                fn key_cmp(&self, other: &Self) -> Ordering {
                    self.total_cmp(other)
                }
            }
        )*
    };
}

impl_ord_key!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
impl_float_key!(f32, f64, f16);

/// Decides which of two heads leaves a merge first.
pub trait Comparator<T> {
    /// `Less` means `a` is emitted before `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Strictly before. Equal elements never precede each other, which is what keeps merges
    /// stable.
    #[inline(always)]
    fn precedes(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

impl<T, C: Comparator<T> + ?Sized> Comparator<T> for &C {
    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (**self).compare(a, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first. Top-K selects the K largest elements.
    #[default]
    Descending,
}

impl<T: SortKey> Comparator<T> for SortOrder {
    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        match self {
            SortOrder::Ascending => a.key_cmp(b),
            SortOrder::Descending => b.key_cmp(a),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("ascending"),
            SortOrder::Descending => f.write_str("descending"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(SortOrder::Ascending),
            "descending" | "desc" => Ok(SortOrder::Descending),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// A value tagged with its position in the source data.
///
/// Ordered by `value` alone. The index rides along as payload so a top-K result can report where
/// each winner came from; equal values keep their relative order because every merge is stable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scored<V> {
    pub value: V,
    pub index: u32,
}

impl<V> Scored<V> {
    pub fn new(value: V, index: u32) -> Self {
        Self { value, index }
    }
}

impl<V: SortKey> SortKey for Scored<V> {
    #[inline(always)]
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.value.key_cmp(&other.value)
    }
}
