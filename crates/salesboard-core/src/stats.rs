//! Descriptive statistics over a numeric column.
//!
//! Conventions:
//! - median: mean of the two middle values for even-sized samples;
//! - quantiles: linear interpolation at position `(n - 1) * q` of the
//!   ascending sort;
//! - mode: most frequent value, ties resolved to the smallest value;
//! - variance: sample variance with divisor `n - 1`.
//!
//! Every function returns `None` when the sample is too small for the
//! statistic to be defined.

use serde::{Deserialize, Serialize};

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(sum(values) / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    let sorted = sorted(values);
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

/// Most frequent value; the smallest one wins a tie.
pub fn mode(values: &[f64]) -> Option<f64> {
    let sorted = sorted(values);
    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|v| **v == value).count().max(1);
        if best.is_none_or(|(_, count)| run > count) {
            best = Some((value, run));
        }
        i += run;
    }
    best.map(|(value, _)| value)
}

/// Sample variance (divisor `n - 1`); undefined for fewer than two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let squared: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some(squared / (values.len() - 1) as f64)
}

pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Quantile `q` in `[0, 1]` with linear interpolation between ranked values.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let sorted = sorted(values);
    Some(quantile_sorted(&sorted, q))
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Summary of one numeric column over a non-empty sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesStatistics {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// `None` for a single-value sample.
    pub variance: Option<f64>,
    /// `None` for a single-value sample.
    pub std_dev: Option<f64>,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

impl SalesStatistics {
    /// Compute every statistic at once; `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = sorted(values);
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let variance = sample_variance(values);

        Some(Self {
            count: values.len(),
            sum: sum(values),
            mean: mean(values)?,
            median: median(values)?,
            mode: mode(values)?,
            min,
            max,
            range: max - min,
            variance,
            std_dev: sample_std_dev(values),
            q1,
            q3,
            iqr: q3 - q1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn round2(v: f64) -> f64 {
        (v * 100.0).round() / 100.0
    }

    #[test]
    fn test_reference_fixture() {
        let stats = SalesStatistics::from_values(&[100.0, 200.0, 300.0, 400.0]).unwrap();
        assert_eq!(round2(stats.mean), 250.00);
        assert_eq!(round2(stats.median), 250.00);
        assert_eq!(round2(stats.range), 300.00);
        assert_eq!(round2(stats.variance.unwrap()), 16666.67);
        assert_eq!(round2(stats.std_dev.unwrap()), 129.10);
        assert_eq!(round2(stats.q1), 175.00);
        assert_eq!(round2(stats.q3), 325.00);
        assert_eq!(round2(stats.iqr), 150.00);
        assert_eq!(stats.min, 100.0);
        assert_eq!(stats.max, 400.0);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.sum, 1000.0);
    }

    #[test]
    fn test_identities_hold() {
        let values = [12.5, 3.0, 99.9, 47.25, 3.0, 18.0, 250.0];
        let stats = SalesStatistics::from_values(&values).unwrap();
        assert!((stats.range - (stats.max - stats.min)).abs() < EPS);
        assert!((stats.iqr - (stats.q3 - stats.q1)).abs() < EPS);
        assert!((stats.std_dev.unwrap() - stats.variance.unwrap().sqrt()).abs() < EPS);
    }

    #[test]
    fn test_sample_std_dev() {
        assert_eq!(sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), Some((32.0f64 / 7.0).sqrt()));
        assert_eq!(sample_std_dev(&[3.0]), None);
    }

    #[test]
    fn test_mode_unambiguous() {
        assert_eq!(mode(&[5.0, 7.0, 7.0, 1.0, 7.0, 5.0]), Some(7.0));
    }

    #[test]
    fn test_mode_tie_prefers_smallest() {
        assert_eq!(mode(&[9.0, 4.0, 9.0, 4.0, 6.0]), Some(4.0));
        // All unique: every value ties at one occurrence.
        assert_eq!(mode(&[30.0, 10.0, 20.0]), Some(10.0));
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_quantile_bounds() {
        let values = [10.0, 20.0, 30.0];
        assert_eq!(quantile(&values, 0.0), Some(10.0));
        assert_eq!(quantile(&values, 1.0), Some(30.0));
        assert_eq!(quantile(&values, 0.5), Some(20.0));
        assert_eq!(quantile(&values, 1.5), None);
    }

    #[test]
    fn test_empty_sample_is_undefined() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(mode(&[]), None);
        assert_eq!(sample_variance(&[]), None);
        assert_eq!(quantile(&[], 0.25), None);
        assert!(SalesStatistics::from_values(&[]).is_none());
    }

    #[test]
    fn test_single_value_has_no_variance() {
        let stats = SalesStatistics::from_values(&[42.0]).unwrap();
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.mode, 42.0);
        assert_eq!(stats.range, 0.0);
        assert_eq!(stats.iqr, 0.0);
        assert!(stats.variance.is_none());
        assert!(stats.std_dev.is_none());
    }
}
