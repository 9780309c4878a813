// Numeric helpers shared by the blending and prior layers.

/// Guard against division by zero when every raw score ties.
pub const NORM_EPSILON: f32 = 1e-8;

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Min-max normalize a score vector into [0, 1]. A degenerate range
/// (max == min) collapses to all zeros via the epsilon guard.
pub fn min_max_normalize(scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }

    let min = scores.iter().copied().fold(f32::INFINITY, f32::min);
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    scores
        .iter()
        .map(|&s| (s - min) / (max - min + NORM_EPSILON))
        .collect()
}

/// Scale raw weights by the maximum so the strongest item maps to 1.0.
/// All-zero (or empty) input stays all zeros.
pub fn max_normalize(weights: &[f32]) -> Vec<f32> {
    let max = weights.iter().copied().fold(0.0_f32, f32::max);
    if max <= 0.0 {
        return vec![0.0; weights.len()];
    }
    weights.iter().map(|&w| w / max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_min_max_normalize() {
        let normalized = min_max_normalize(&[0.1, 0.9, 0.5]);
        assert!(normalized[0].abs() < 1e-6);
        assert!((normalized[1] - 1.0).abs() < 1e-6);
        assert!((normalized[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_min_max_normalize_degenerate_range() {
        // All-equal scores must not divide by zero
        let normalized = min_max_normalize(&[0.7, 0.7, 0.7]);
        assert!(normalized.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_max_normalize() {
        let normalized = max_normalize(&[10.0, 5.0, 0.0]);
        assert_eq!(normalized, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_max_normalize_all_zero() {
        assert_eq!(max_normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert!(max_normalize(&[]).is_empty());
    }
}
