//! Arc-length sampling tables for parametric curves.

use crate::Point;
use arrayvec::ArrayVec;

/// Number of chords used when sampling a curve.
pub const DEFAULT_SAMPLE_STEPS: usize = 50;

const TABLE_CAPACITY: usize = DEFAULT_SAMPLE_STEPS + 1;

/// Cumulative chord lengths of a curve, sampled at evenly spaced parameter values.
///
/// `lengths[i]` is the length of the polyline going through the samples `0..=i`,
/// `times[i]` is the curve parameter of sample `i`. Both are monotonic.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcLengthTable {
    lengths: ArrayVec<f64, TABLE_CAPACITY>,
    times: ArrayVec<f64, TABLE_CAPACITY>,
}

impl ArcLengthTable {
    /// Samples `curve` with `steps` chords.
    ///
    /// `steps` is clamped to `1..=DEFAULT_SAMPLE_STEPS`.
    pub fn sample<F>(steps: usize, curve: F) -> Self
    where
        F: Fn(f64) -> Point,
    {
        let steps = steps.max(1).min(DEFAULT_SAMPLE_STEPS);
        let mut table = ArcLengthTable::default();

        let mut prev = curve(0.0);
        let mut length = 0.0;
        table.lengths.push(0.0);
        table.times.push(0.0);
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let p = curve(t);
            length += (p - prev).length();
            table.lengths.push(length);
            table.times.push(t);
            prev = p;
        }

        table
    }

    #[inline]
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[inline]
    pub fn total_length(&self) -> f64 {
        self.lengths.last().cloned().unwrap_or(0.0)
    }

    /// Curve parameter at which the sampled length reaches `fraction` of the total length.
    ///
    /// Interpolates linearly between samples. Used for approximately constant speed
    /// traversal of a curve.
    pub fn time_at_fraction(&self, fraction: f64) -> f64 {
        let total = self.total_length();
        if fraction <= 0.0 || total <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }

        let target = fraction * total;
        let idx = self.lengths.partition_point(|l| *l < target);
        if idx == 0 {
            return self.times[0];
        }
        let (l0, l1) = (self.lengths[idx - 1], self.lengths[idx]);
        let (t0, t1) = (self.times[idx - 1], self.times[idx]);
        if l1 <= l0 {
            return t1;
        }

        t0 + (t1 - t0) * (target - l0) / (l1 - l0)
    }
}

#[cfg(test)]
use crate::point;

#[test]
fn straight_line_table() {
    let table = ArcLengthTable::sample(DEFAULT_SAMPLE_STEPS, |t| point(10.0 * t, 0.0));
    assert_eq!(table.lengths().len(), DEFAULT_SAMPLE_STEPS + 1);
    assert_eq!(table.times().len(), DEFAULT_SAMPLE_STEPS + 1);
    assert_eq!(table.times()[0], 0.0);
    assert_eq!(table.times()[DEFAULT_SAMPLE_STEPS], 1.0);
    assert!((table.total_length() - 10.0).abs() < 1e-9);

    for w in table.lengths().windows(2) {
        assert!(w[0] <= w[1]);
    }

    assert!((table.time_at_fraction(0.25) - 0.25).abs() < 1e-9);
    assert_eq!(table.time_at_fraction(-1.0), 0.0);
    assert_eq!(table.time_at_fraction(2.0), 1.0);
}

#[test]
fn step_count_is_clamped() {
    let table = ArcLengthTable::sample(1000, |t| point(t, t));
    assert_eq!(table.lengths().len(), DEFAULT_SAMPLE_STEPS + 1);

    let table = ArcLengthTable::sample(0, |t| point(t, 0.0));
    assert_eq!(table.lengths(), &[0.0, 1.0]);
}

#[test]
fn degenerate_curve() {
    let table = ArcLengthTable::sample(10, |_| point(3.0, 3.0));
    assert_eq!(table.total_length(), 0.0);
    assert_eq!(table.time_at_fraction(0.5), 0.0);
}
