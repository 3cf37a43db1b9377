//! Period-over-period returns.

/// One-period simple returns, `close[i] / close[i - 1] - 1`.
///
/// The result has one element fewer than `closes`; element `k` is the
/// return ending at index `k + 1`.
pub fn simple_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_returns() {
        let returns = simple_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.10).abs() < 1e-12);
        assert!((returns[1] + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_simple_returns_short_input() {
        assert!(simple_returns(&[]).is_empty());
        assert!(simple_returns(&[100.0]).is_empty());
    }
}
