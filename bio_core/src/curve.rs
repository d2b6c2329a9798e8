//! Bateman pharmacokinetic curve.
//!
//! A single oral dose with first-order absorption `ka` and elimination `ke`:
//!
//! ```text
//! C(t) = ka / (ka - ke) * (e^(-ke*t) - e^(-ka*t))
//! tmax = ln(ka / ke) / (ka - ke)
//! ```
//!
//! Levels are normalized by `C(tmax)` so every curve peaks at exactly 1.0.

/// Peak time used when `ka > ke > 0` does not hold
pub const FALLBACK_TMAX_HOURS: f64 = 1.0;

/// Un-normalized Bateman value at `t` hours after intake.
///
/// Zero for `t <= 0` and for the degenerate `ka == ke` case.
pub fn bateman_raw(t: f64, ka: f64, ke: f64) -> f64 {
    if t <= 0.0 || ka == ke {
        return 0.0;
    }
    (ka / (ka - ke)) * ((-ke * t).exp() - (-ka * t).exp())
}

/// Time of peak concentration in hours.
pub fn bateman_tmax(ka: f64, ke: f64) -> f64 {
    if ka <= ke || ka <= 0.0 || ke <= 0.0 {
        return FALLBACK_TMAX_HOURS;
    }
    (ka / ke).ln() / (ka - ke)
}

/// Bateman value divided by its own peak, never negative.
pub fn normalized_level(hours_since_intake: f64, ka: f64, ke: f64) -> f64 {
    if hours_since_intake <= 0.0 {
        return 0.0;
    }
    let c_max = bateman_raw(bateman_tmax(ka, ke), ka, ke);
    if c_max <= 0.0 {
        return 0.0;
    }
    (bateman_raw(hours_since_intake, ka, ke) / c_max).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE_PAIRS: [(f64, f64); 5] = [
        (0.78, 0.088),
        (1.72, 0.28),
        (1.2, 0.28),
        (2.5, 0.16),
        (10.0, 0.01),
    ];

    #[test]
    fn test_peak_is_exactly_one() {
        for (ka, ke) in RATE_PAIRS {
            let tmax = bateman_tmax(ka, ke);
            let level = normalized_level(tmax, ka, ke);
            assert!((level - 1.0).abs() < 1e-12, "ka={} ke={} level={}", ka, ke, level);
        }
    }

    #[test]
    fn test_zero_at_or_before_intake() {
        for (ka, ke) in RATE_PAIRS {
            for t in [0.0, -0.001, -1.0, -48.0] {
                assert_eq!(normalized_level(t, ka, ke), 0.0);
            }
        }
        // Also for degenerate parameters
        assert_eq!(normalized_level(0.0, 0.2, 0.5), 0.0);
        assert_eq!(normalized_level(-3.0, 0.3, 0.3), 0.0);
    }

    #[test]
    fn test_single_peak_shape() {
        let (ka, ke) = (0.78, 0.088);
        let tmax = bateman_tmax(ka, ke);

        // Rising before tmax, falling after
        let mut prev = 0.0;
        let mut t = 0.25;
        while t < tmax {
            let level = normalized_level(t, ka, ke);
            assert!(level > prev);
            prev = level;
            t += 0.25;
        }
        let mut prev = 1.0;
        let mut t = tmax + 0.25;
        while t < 72.0 {
            let level = normalized_level(t, ka, ke);
            assert!(level < prev);
            assert!(level >= 0.0);
            prev = level;
            t += 0.25;
        }
        assert!(normalized_level(200.0, ka, ke) < 1e-6);
    }

    #[test]
    fn test_tmax_matches_closed_form() {
        let tmax = bateman_tmax(0.78, 0.088);
        let expected = (0.78f64 / 0.088).ln() / (0.78 - 0.088);
        assert_eq!(tmax, expected);
        assert!(tmax > 3.0 && tmax < 3.3);
    }

    #[test]
    fn test_equal_rates_do_not_divide_by_zero() {
        assert_eq!(bateman_raw(2.0, 0.5, 0.5), 0.0);
        assert_eq!(bateman_tmax(0.5, 0.5), FALLBACK_TMAX_HOURS);
        assert_eq!(normalized_level(2.0, 0.5, 0.5), 0.0);
    }

    #[test]
    fn test_inverted_rates_stay_finite() {
        // ka < ke: tmax falls back, values stay finite and non-negative
        assert_eq!(bateman_tmax(0.1, 0.5), FALLBACK_TMAX_HOURS);
        for t in [0.5, 1.0, 4.0, 24.0] {
            let level = normalized_level(t, 0.1, 0.5);
            assert!(level.is_finite());
            assert!(level >= 0.0);
        }
        // Non-positive rates
        assert_eq!(bateman_tmax(0.0, -1.0), FALLBACK_TMAX_HOURS);
        assert!(normalized_level(2.0, -0.5, -1.0).is_finite());
    }
}
