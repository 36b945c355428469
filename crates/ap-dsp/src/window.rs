//! Window functions

use std::f64::consts::PI;

/// Symmetric Hamming window of length `n`
///
/// `w[i] = 0.54 - 0.46 * cos(2πi / (n - 1))`; a single-point window is `[1.0]`.
pub fn hamming(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denom = (n - 1) as f64;
            (0..n)
                .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / denom).cos())
                .collect()
        }
    }
}

/// Multiply `coeffs` in place by a Hamming window of the same length
pub fn apply_hamming(coeffs: &mut [f64]) {
    let window = hamming(coeffs.len());
    for (c, w) in coeffs.iter_mut().zip(window) {
        *c *= w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hamming_shape() {
        let w = hamming(101);
        assert_eq!(w.len(), 101);
        assert!((w[0] - 0.08).abs() < 1e-12);
        assert!((w[100] - 0.08).abs() < 1e-12);
        assert!((w[50] - 1.0).abs() < 1e-12);
        for i in 0..50 {
            assert!((w[i] - w[100 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(hamming(0).is_empty());
        assert_eq!(hamming(1), vec![1.0]);
    }

    #[test]
    fn test_apply_hamming() {
        let mut c = vec![1.0; 5];
        apply_hamming(&mut c);
        assert_eq!(c, hamming(5));
    }
}
