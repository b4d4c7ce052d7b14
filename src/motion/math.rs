//! `const` numeric helpers for build-time ramp derivation.

/// Square root by Newton–Raphson iteration, usable in `const` context.
///
/// Returns 0 for non-positive (and NaN) input.
pub(crate) const fn sqrt(x: f64) -> f64 {
    if !(x > 0.0) {
        return 0.0;
    }

    let mut curr = if x > 1.0 { x / 2.0 } else { 1.0 };
    let mut i = 0;
    // Bounded: the iteration can oscillate between two neighbours in the last ulp.
    while i < 128 {
        let next = 0.5 * (curr + x / curr);
        if next == curr {
            break;
        }
        curr = next;
        i += 1;
    }
    curr
}

/// Largest power of two not exceeding `value` (`value` must be >= 1).
pub(crate) const fn floor_pow2(value: u32) -> u32 {
    1 << (31 - value.leading_zeros())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_matches_std() {
        for x in [1e-9, 0.25, 1.0, 2.0, 3.0, 10.0, 12345.678, 4.0e12] {
            let expected = f64::sqrt(x);
            assert!((sqrt(x) - expected).abs() <= expected * 1e-12, "sqrt({})", x);
        }
    }

    #[test]
    fn test_sqrt_degenerate_input() {
        assert_eq!(sqrt(0.0), 0.0);
        assert_eq!(sqrt(-4.0), 0.0);
        assert_eq!(sqrt(f64::NAN), 0.0);
    }

    #[test]
    fn test_sqrt_is_const() {
        const ROOT: f64 = sqrt(16.0);
        assert_eq!(ROOT, 4.0);
    }

    #[test]
    fn test_floor_pow2() {
        assert_eq!(floor_pow2(1), 1);
        assert_eq!(floor_pow2(5), 4);
        assert_eq!(floor_pow2(8), 8);
        assert_eq!(floor_pow2(127), 64);
        assert_eq!(floor_pow2(128), 128);
    }
}
