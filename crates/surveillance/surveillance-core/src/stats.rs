//! Order statistics over plain value slices.

/// Percentile `p` (0–100) of already sorted values, interpolating linearly
/// between the order statistics around rank `p/100 · (n - 1)`.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let frac = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Percentile `p` (0–100) of unsorted values.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, p)
}

/// First and third quartiles.
pub fn quartiles(values: &[f64]) -> Option<(f64, f64)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some((percentile_sorted(&sorted, 25.0)?, percentile_sorted(&sorted, 75.0)?))
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_percentile_single() {
        assert_eq!(percentile(&[42.0], 25.0), Some(42.0));
        assert_eq!(percentile(&[42.0], 75.0), Some(42.0));
    }

    #[test]
    fn test_percentile_median_even() {
        let median = percentile(&[4.0, 1.0, 3.0, 2.0], 50.0).unwrap();
        assert!((median - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_percentile_out_of_range() {
        assert_eq!(percentile(&[1.0, 2.0], 101.0), None);
        assert_eq!(percentile(&[1.0, 2.0], -1.0), None);
    }

    #[test]
    fn test_percentile_extremes() {
        let values = [30.0, 10.0, 20.0];
        assert_eq!(percentile(&values, 0.0), Some(10.0));
        assert_eq!(percentile(&values, 100.0), Some(30.0));
    }

    #[test]
    fn test_quartiles_interpolate() {
        let (q1, q3) = quartiles(&[2.0, 3.0, 2.5, 50.0]).unwrap();
        assert!((q1 - 2.375).abs() < 1e-10);
        assert!((q3 - 14.75).abs() < 1e-10);
    }

    #[test]
    fn test_quartiles_exact_ranks() {
        // n = 5: ranks 1.0 and 3.0 land on order statistics
        let (q1, q3) = quartiles(&[5.0, 1.0, 4.0, 2.0, 3.0]).unwrap();
        assert_eq!(q1, 2.0);
        assert_eq!(q3, 4.0);
    }

    #[test]
    fn test_quartiles_do_not_reorder_input() {
        let values = vec![3.0, 1.0, 2.0];
        let _ = quartiles(&values);
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[10.0, 30.0]), Some(20.0));
    }
}
