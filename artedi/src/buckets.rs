//! Histogram bucket boundary generators.

use crate::error::BucketError;

/// Every boundary the 1.x dynamic histograms could emit.
///
/// Pass a slice of these to a fixed-bucket histogram (see [`artedi1_buckets`])
/// to keep series compatible with dashboards built against 1.x output.
pub const POSSIBLE_ARTEDI1_BUCKETS: [f64; 80] = [
    0.0001, 0.0002, 0.0003, 0.0004, 0.0005, 0.0006, 0.0007, 0.0008, 0.0009, //
    0.001, 0.002, 0.003, 0.004, 0.005, 0.006, 0.007, 0.008, 0.009, //
    0.01, 0.02, 0.03, 0.04, 0.05, 0.06, 0.07, 0.08, 0.09, //
    0.18, 0.27, 0.36, 0.45, 0.54, 0.63, 0.72, 0.81, //
    1.62, 2.43, 3.24, 4.05, 4.86, 5.67, 6.48, 7.29, 8.1, //
    25.0, 42.0, 59.0, 76.0, //
    228.0, 380.0, 532.0, 684.0, //
    2052.0, 3420.0, 4788.0, 6156.0, //
    18468.0, 30780.0, 43092.0, 55404.0, //
    166212.0, 277020.0, 387828.0, 498636.0, //
    1495908.0, 2493180.0, 3490452.0, 4487724.0, //
    13463172.0, 22438620.0, 31414068.0, 40389516.0, //
    121168548.0, 201947580.0, 282726612.0, 363505644.0, //
    1090516932.0, 1817528220.0, 2544539508.0, 3271550796.0,
];

/// Checks that `buckets` is non-empty, positive, finite and strictly
/// increasing.
pub fn validate_buckets(buckets: &[f64]) -> Result<(), BucketError> {
    if buckets.is_empty() {
        return Err(BucketError::Empty);
    }
    for &value in buckets {
        if !(value.is_finite() && value > 0.0) {
            return Err(BucketError::NotPositive { value });
        }
    }
    for pair in buckets.windows(2) {
        if pair[0] >= pair[1] {
            return Err(BucketError::NotIncreasing {
                previous: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

/// Four decimal places below 10, integers from 10 upward.
fn fix_decimals(value: f64) -> f64 {
    if value < 10.0 {
        (value * 10_000.0).round() / 10_000.0
    } else {
        value.ceil()
    }
}

fn invalid(reason: impl Into<String>) -> BucketError {
    BucketError::InvalidArgument {
        reason: reason.into(),
    }
}

/// `count` buckets starting at `min`, each `width` apart.
pub fn linear_buckets(min: f64, width: f64, count: usize) -> Result<Vec<f64>, BucketError> {
    if !(width > 0.0) {
        return Err(invalid("width must be > 0"));
    }
    if count == 0 {
        return Err(invalid("count must be > 0"));
    }
    if !(min > 0.0) {
        return Err(invalid(format!(
            "min must be > 0, you probably want min={width}"
        )));
    }

    Ok((0..count)
        .map(|i| fix_decimals(min + width * i as f64))
        .collect())
}

/// `count` buckets starting at `min`, each `factor` times the previous one.
pub fn exponential_buckets(min: f64, factor: f64, count: usize) -> Result<Vec<f64>, BucketError> {
    if !(min > 0.0) {
        return Err(invalid("min must be > 0"));
    }
    if !(factor > 1.0) {
        return Err(invalid("factor must be > 1"));
    }
    if count == 0 {
        return Err(invalid("count must be > 0"));
    }

    let mut buckets = Vec::with_capacity(count);
    let mut n = min;
    for _ in 0..count {
        buckets.push(fix_decimals(n));
        n *= factor;
    }
    Ok(buckets)
}

/// Log-linear buckets: for each magnitude `base^low_power ..=
/// base^(high_power + 1)`, `buckets_per_magnitude` linear steps.
///
/// Steps already covered at a finer resolution by the previous magnitude are
/// skipped.
pub fn log_linear_buckets(
    base: f64,
    low_power: i32,
    high_power: i32,
    buckets_per_magnitude: u32,
) -> Result<Vec<f64>, BucketError> {
    if low_power >= high_power {
        return Err(invalid("low_power must be < high_power"));
    }
    if high_power == i32::MAX {
        return Err(invalid("high_power must be < i32::MAX"));
    }
    if !(base > 0.0) {
        return Err(invalid("base must be positive"));
    }
    if buckets_per_magnitude == 0 {
        return Err(invalid("buckets_per_magnitude must be positive"));
    }

    let mut buckets = Vec::new();
    let mut previous_last = 0.0;
    for exponent in low_power..=high_power {
        let last = base.powi(exponent + 1);
        let step = last / f64::from(buckets_per_magnitude);

        for index in 1..buckets_per_magnitude {
            let value = fix_decimals(f64::from(index) * step);
            if value > previous_last {
                buckets.push(value);
            }
        }
        let last = fix_decimals(last);
        buckets.push(last);
        previous_last = last;
    }
    Ok(buckets)
}

/// The run of [`POSSIBLE_ARTEDI1_BUCKETS`] covering `min..=max`.
///
/// The result starts at the first boundary `>= min` and ends one boundary
/// past the last one `<= max`, so `max` itself always lands in a finite
/// bucket. `None` selects the smallest or largest possible bucket.
pub fn artedi1_buckets(min: Option<f64>, max: Option<f64>) -> Result<Vec<f64>, BucketError> {
    let all = &POSSIBLE_ARTEDI1_BUCKETS;
    let min_min = all[0];
    let max_min = all[all.len() - 2];
    let max_max = all[all.len() - 1];

    let min = min.unwrap_or(min_min);
    let max = max.unwrap_or(max_max);

    if !(min < max) {
        return Err(invalid("min must be < max"));
    }
    if min > max_min {
        return Err(invalid(format!("min must be <= {max_min}")));
    }
    if max > max_max {
        return Err(invalid(format!("max must be <= {max_max}")));
    }

    let begin = all.iter().position(|&b| b >= min).unwrap_or(0);
    let end = if max == max_max {
        all.len() - 1
    } else {
        all.iter().rposition(|&b| b <= max).map_or(0, |i| i + 1)
    };

    Ok(all[begin..=end.max(begin)].to_vec())
}

/// Linear points generated per order of magnitude by the dynamic scheme.
pub(crate) const LINEAR_STEPS: usize = 5;

/// Orders examined by the dynamic scheme before giving up. Observations
/// beyond the last order are counted only in `+Inf`.
const MAX_ORDER: u32 = 10;

/// Returns the boundaries of the dynamic order of magnitude `value` falls
/// into, or `None` if it is past the largest order.
///
/// Each order starts where the previous one ended and spans ten times its
/// starting point in `steps` linear steps, so consecutive orders share one
/// boundary: `[1, 3, 5, 7, 9]`, `[9, 27, 45, 63, 81]`, `[81, 243, ...]`.
pub(crate) fn log_linear_order(value: f64, steps: usize) -> Option<Vec<f64>> {
    let steps = steps as f64;
    let mut start = 1.0_f64;

    for _ in 0..=MAX_ORDER {
        let end = start * 10.0;
        let width = if end > steps { end / steps } else { 1.0 };

        let mut order = Vec::new();
        let mut boundary = start;
        while boundary <= end {
            order.push(boundary);
            boundary += width;
        }
        start = boundary - width;

        if order.last().is_some_and(|&last| value <= last) {
            return Some(order);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate() {
        assert!(validate_buckets(&[0.005, 0.01, 1.0, 10.0]).is_ok());
        assert_eq!(validate_buckets(&[]), Err(BucketError::Empty));
        assert_eq!(
            validate_buckets(&[1.0, 5.0, 10.0, 100.0, 50.0, 1000.0]),
            Err(BucketError::NotIncreasing {
                previous: 100.0,
                next: 50.0
            })
        );
        assert_eq!(
            validate_buckets(&[1.0, 1.0]),
            Err(BucketError::NotIncreasing {
                previous: 1.0,
                next: 1.0
            })
        );
        assert_eq!(
            validate_buckets(&[0.0, 1.0]),
            Err(BucketError::NotPositive { value: 0.0 })
        );
        assert_eq!(
            validate_buckets(&[1.0, f64::INFINITY]),
            Err(BucketError::NotPositive {
                value: f64::INFINITY
            })
        );
    }

    #[test]
    fn linear() {
        assert_eq!(
            linear_buckets(1.0, 1.0, 5).unwrap(),
            vec![1.0, 2.0, 3.0, 4.0, 5.0]
        );
        assert_eq!(
            linear_buckets(0.1, 0.1, 3).unwrap(),
            vec![0.1, 0.2, 0.3]
        );
        assert!(linear_buckets(0.0, 1.0, 5).is_err());
        assert!(linear_buckets(1.0, 0.0, 5).is_err());
        assert!(linear_buckets(1.0, 1.0, 0).is_err());
    }

    #[test]
    fn exponential() {
        assert_eq!(
            exponential_buckets(1.0, 2.0, 5).unwrap(),
            vec![1.0, 2.0, 4.0, 8.0, 16.0]
        );
        assert_eq!(
            exponential_buckets(0.001, 10.0, 3).unwrap(),
            vec![0.001, 0.01, 0.1]
        );
        assert!(exponential_buckets(1.0, 1.0, 5).is_err());
        assert!(exponential_buckets(-1.0, 2.0, 5).is_err());
    }

    #[test]
    fn log_linear() {
        assert_eq!(
            log_linear_buckets(10.0, -1, 0, 5).unwrap(),
            vec![0.2, 0.4, 0.6, 0.8, 1.0, 2.0, 4.0, 6.0, 8.0, 10.0]
        );
        assert_eq!(
            log_linear_buckets(10.0, 0, 2, 4).unwrap(),
            vec![2.5, 5.0, 7.5, 10.0, 25.0, 50.0, 75.0, 100.0, 250.0, 500.0, 750.0, 1000.0]
        );
        assert!(log_linear_buckets(10.0, 2, 2, 5).is_err());
        assert!(log_linear_buckets(10.0, 0, 2, 0).is_err());
        assert!(matches!(
            log_linear_buckets(10.0, i32::MAX - 1, i32::MAX, 5),
            Err(BucketError::InvalidArgument { .. })
        ));

        let buckets = log_linear_buckets(10.0, -3, 3, 10).unwrap();
        assert!(validate_buckets(&buckets).is_ok());
    }

    #[test]
    fn artedi1() {
        assert_eq!(
            artedi1_buckets(None, None).unwrap(),
            POSSIBLE_ARTEDI1_BUCKETS.to_vec()
        );
        assert_eq!(
            artedi1_buckets(Some(1.0), Some(100.0)).unwrap(),
            vec![
                1.62, 2.43, 3.24, 4.05, 4.86, 5.67, 6.48, 7.29, 8.1, 25.0, 42.0, 59.0, 76.0, 228.0
            ]
        );
        assert_eq!(
            artedi1_buckets(Some(4788.0), None).unwrap().first(),
            Some(&4788.0)
        );
        assert!(artedi1_buckets(Some(100.0), Some(1.0)).is_err());
        assert!(artedi1_buckets(Some(3271550796.0), None).is_err());
        assert!(artedi1_buckets(None, Some(1e12)).is_err());
        assert!(validate_buckets(&POSSIBLE_ARTEDI1_BUCKETS).is_ok());
    }

    #[test]
    fn dynamic_orders_overlap_at_their_edges() {
        assert_eq!(
            log_linear_order(0.0, LINEAR_STEPS).unwrap(),
            vec![1.0, 3.0, 5.0, 7.0, 9.0]
        );
        assert_eq!(
            log_linear_order(9.0, LINEAR_STEPS).unwrap(),
            vec![1.0, 3.0, 5.0, 7.0, 9.0]
        );
        assert_eq!(
            log_linear_order(10.0, LINEAR_STEPS).unwrap(),
            vec![9.0, 27.0, 45.0, 63.0, 81.0]
        );
        assert_eq!(
            log_linear_order(99.0, LINEAR_STEPS).unwrap(),
            vec![81.0, 243.0, 405.0, 567.0, 729.0]
        );
        assert_eq!(
            log_linear_order(6157.0, LINEAR_STEPS).unwrap(),
            vec![729.0, 2187.0, 3645.0, 5103.0, 6561.0]
        );
    }

    #[test]
    fn dynamic_orders_stop_at_the_ceiling() {
        let last = log_linear_order(1e10, LINEAR_STEPS).unwrap();
        assert_eq!(last.last(), Some(&31381059609.0));
        assert!(log_linear_order(31381059609.0, LINEAR_STEPS).is_some());
        assert!(log_linear_order(31381059610.0, LINEAR_STEPS).is_none());
    }
}
