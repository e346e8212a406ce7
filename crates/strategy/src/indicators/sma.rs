/// Simple moving average over the trailing `period` values.
///
/// `values` must be oldest first. Returns `None` if `period` is zero or there
/// are fewer than `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_returns_none_when_insufficient_data() {
        assert!(sma(&[1.0, 2.0], 3).is_none());
        assert!(sma(&[], 1).is_none());
    }

    #[test]
    fn sma_rejects_zero_period() {
        assert!(sma(&[1.0, 2.0], 0).is_none());
    }

    #[test]
    fn sma_uses_only_the_trailing_window() {
        // Leading 100.0 falls outside the 3-value window
        let value = sma(&[100.0, 1.0, 2.0, 3.0], 3).unwrap();
        assert!((value - 2.0).abs() < 1e-12, "Expected 2.0, got {value}");
    }

    #[test]
    fn sma_of_full_slice_is_plain_mean() {
        let value = sma(&[2.0, 4.0, 6.0, 8.0], 4).unwrap();
        assert!((value - 5.0).abs() < 1e-12);
    }
}
