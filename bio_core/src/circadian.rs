//! Circadian baseline for cognitive performance.
//!
//! Peaks 09:00-12:00 and 15:00-17:00, troughs after lunch (13:00-14:30) and
//! overnight (22:00-06:00).

/// Hard overnight floor
pub const CIRCADIAN_FLOOR: f64 = 15.0;

/// Baseline score (15-60) for a fractional hour of day in `[0, 24)`.
pub fn baseline(hour: f64) -> f64 {
    if hour < 6.0 {
        CIRCADIAN_FLOOR
    } else if hour < 7.0 {
        15.0 + (hour - 6.0) * 20.0
    } else if hour < 9.0 {
        35.0 + (hour - 7.0) * 12.5
    } else if hour < 12.0 {
        60.0
    } else if hour < 13.0 {
        60.0 - (hour - 12.0) * 10.0
    } else if hour < 14.5 {
        50.0 - (hour - 13.0) * 10.0
    } else if hour < 15.0 {
        35.0 + (hour - 14.5) * 30.0
    } else if hour < 17.0 {
        50.0
    } else if hour < 20.0 {
        50.0 - (hour - 17.0) * 8.0
    } else if hour < 22.0 {
        26.0 - (hour - 20.0) * 5.0
    } else {
        (16.0 - (hour - 22.0) * 0.5).max(CIRCADIAN_FLOOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(hour: f64, expected: f64) {
        let actual = baseline(hour);
        assert!(
            (actual - expected).abs() < 1e-9,
            "baseline({}) = {}, expected {}",
            hour,
            actual,
            expected
        );
    }

    #[test]
    fn test_segment_boundaries() {
        let table = [
            (0.0, 15.0),
            (5.99, 15.0),
            (6.0, 15.0),
            (7.0, 35.0),
            (9.0, 60.0),
            (12.0, 60.0),
            (13.0, 50.0),
            (14.5, 35.0),
            (15.0, 50.0),
            (17.0, 50.0),
            (20.0, 26.0),
            (22.0, 16.0),
        ];
        for (hour, expected) in table {
            assert_close(hour, expected);
        }
    }

    #[test]
    fn test_segment_midpoints() {
        assert_close(6.5, 25.0);
        assert_close(8.0, 47.5);
        assert_close(10.5, 60.0);
        assert_close(12.5, 55.0);
        assert_close(13.75, 42.5);
        assert_close(14.75, 42.5);
        assert_close(16.0, 50.0);
        assert_close(18.5, 38.0);
        assert_close(21.0, 21.0);
        assert_close(23.0, 15.5);
    }

    #[test]
    fn test_continuous_at_boundaries() {
        for boundary in [6.0, 7.0, 9.0, 12.0, 13.0, 14.5, 15.0, 17.0, 20.0, 22.0] {
            let left = baseline(boundary - 1e-9);
            let right = baseline(boundary);
            assert!((left - right).abs() < 1e-6, "jump at {}", boundary);
        }
    }

    #[test]
    fn test_range_and_floor() {
        let mut hour = 0.0;
        while hour < 24.0 {
            let value = baseline(hour);
            assert!((CIRCADIAN_FLOOR..=60.0).contains(&value), "{} -> {}", hour, value);
            hour += 0.05;
        }
        assert_close(23.99, 15.005);
    }
}
