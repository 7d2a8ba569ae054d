//! Parallel min/max reduction over voxel buffers.
//!
//! The buffer is split into contiguous chunks, each chunk produces a local
//! [`ValueRange`], and the partial ranges are merged with
//! [`ValueRange::combine`]. `combine` is associative and commutative (NaN
//! samples never reach it), so rayon may merge partials in any order and the
//! result is the same as a linear scan.

use glam::Vec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::voxel::Voxel;

/// Number of voxels scanned per parallel task.
pub const DEFAULT_CHUNK_LEN: usize = 1 << 16;

/// Minimum and maximum scalar value of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// The identity of [`ValueRange::combine`]: contains no values.
    pub const EMPTY: ValueRange = ValueRange {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Creates a range from explicit bounds.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if no value has been included.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Extends the range by one sample. NaN samples are ignored.
    pub fn include(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Merges two partial ranges.
    #[must_use]
    pub fn combine(self, other: ValueRange) -> ValueRange {
        ValueRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Sequential range of a slice.
    pub fn of_slice<T: Voxel>(values: &[T]) -> ValueRange {
        let mut range = ValueRange::EMPTY;
        for &v in values {
            range.include(v.to_f64());
        }
        range
    }

    /// Returns the range as `(min, max)` in single precision.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.min as f32, self.max as f32)
    }

    /// Returns true if both bounds are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<Vec2> for ValueRange {
    fn from(v: Vec2) -> Self {
        Self::new(f64::from(v.x), f64::from(v.y))
    }
}

/// Computes the value range of `values` with the default partitioning.
pub fn compute_value_range<T: Voxel>(values: &[T]) -> ValueRange {
    compute_value_range_chunked(values, DEFAULT_CHUNK_LEN)
}

/// Computes the value range of `values`, scanning `chunk_len` voxels per task.
///
/// The result does not depend on `chunk_len`.
pub fn compute_value_range_chunked<T: Voxel>(values: &[T], chunk_len: usize) -> ValueRange {
    values
        .par_chunks(chunk_len.max(1))
        .map(ValueRange::of_slice)
        .reduce(|| ValueRange::EMPTY, ValueRange::combine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn linear_scan(values: &[f32]) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            min = min.min(f64::from(v));
            max = max.max(f64::from(v));
        }
        (min, max)
    }

    #[test]
    fn test_empty_slice() {
        let range = compute_value_range::<f32>(&[]);
        assert!(range.is_empty());
        assert_eq!(range, ValueRange::EMPTY);
    }

    #[test]
    fn test_integer_types() {
        let bytes: Vec<u8> = vec![7, 3, 250, 9];
        assert_eq!(compute_value_range(&bytes), ValueRange::new(3.0, 250.0));

        let shorts: Vec<u16> = (100..2000).collect();
        assert_eq!(compute_value_range_chunked(&shorts, 7), ValueRange::new(100.0, 1999.0));
    }

    #[test]
    fn test_nan_is_ignored() {
        let values = vec![f64::NAN, 2.0, f64::NAN, -1.0];
        for chunk_len in 1..=4 {
            assert_eq!(
                compute_value_range_chunked(&values, chunk_len),
                ValueRange::new(-1.0, 2.0)
            );
        }
    }

    #[test]
    fn test_combine_order() {
        let a = ValueRange::new(0.0, 1.0);
        let b = ValueRange::new(-3.0, 0.5);
        let c = ValueRange::new(2.0, 4.0);
        assert_eq!(a.combine(b).combine(c), c.combine(a.combine(b)));
        assert_eq!(a.combine(ValueRange::EMPTY), a);
    }

    #[test]
    fn test_as_vec2() {
        assert_eq!(ValueRange::new(0.0, 3.0).as_vec2(), Vec2::new(0.0, 3.0));
    }

    proptest! {
        #[test]
        fn prop_partition_does_not_change_range(
            values in prop::collection::vec(-1.0e6_f32..1.0e6, 1..2000),
            chunk_len in 1_usize..512,
        ) {
            let (min, max) = linear_scan(&values);
            let chunked = compute_value_range_chunked(&values, chunk_len);
            prop_assert_eq!(chunked, ValueRange::new(min, max));
            prop_assert_eq!(chunked, compute_value_range(&values));
        }

        #[test]
        fn prop_reversed_merge_order(
            values in prop::collection::vec(any::<u16>(), 1..500),
            chunk_len in 1_usize..64,
        ) {
            let forward = values
                .chunks(chunk_len)
                .map(ValueRange::of_slice)
                .fold(ValueRange::EMPTY, ValueRange::combine);
            let backward = values
                .chunks(chunk_len)
                .rev()
                .map(ValueRange::of_slice)
                .fold(ValueRange::EMPTY, ValueRange::combine);
            prop_assert_eq!(forward, backward);
            prop_assert_eq!(forward, compute_value_range_chunked(&values, chunk_len));
        }
    }
}
