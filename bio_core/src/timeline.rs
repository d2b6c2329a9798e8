//! Day-curve generation.
//!
//! Samples the composer on a fixed grid from 00:00 through the last step
//! before midnight. With the default 15-minute interval that is 96 samples.

use crate::{BioEngine, DayCurve, Error, IntakeEvent, Result, ScoreSample};
use chrono::{Duration, NaiveDate, NaiveDateTime};

pub const DEFAULT_INTERVAL_MINUTES: u32 = 15;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Lazy, restartable iterator over one day's score samples
///
/// Call `BioEngine::day_samples` again for a fresh pass. Each item is
/// computed independently of the others.
#[derive(Clone, Debug)]
pub struct DaySamples<'a> {
    engine: &'a BioEngine,
    intakes: &'a [IntakeEvent],
    sleep_duration_min: Option<f64>,
    sleep_confidence: Option<f64>,
    start: NaiveDateTime,
    interval_minutes: u32,
    next_offset: u32,
}

impl<'a> DaySamples<'a> {
    fn remaining(&self) -> usize {
        if self.next_offset >= MINUTES_PER_DAY {
            return 0;
        }
        (MINUTES_PER_DAY - self.next_offset).div_ceil(self.interval_minutes) as usize
    }
}

impl<'a> Iterator for DaySamples<'a> {
    type Item = ScoreSample;

    fn next(&mut self) -> Option<ScoreSample> {
        if self.next_offset >= MINUTES_PER_DAY {
            return None;
        }
        let target = self.start + Duration::minutes(i64::from(self.next_offset));
        self.next_offset = self.next_offset.saturating_add(self.interval_minutes);

        Some(self.engine.compose(
            target,
            self.intakes,
            self.sleep_duration_min,
            self.sleep_confidence,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for DaySamples<'a> {}

/// 00:00:00 local wall clock on `date`
pub fn start_of_day(date: NaiveDate) -> Result<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::Other(format!("No midnight on {}", date)))
}

impl BioEngine {
    /// Lazily sample `date` every `interval_minutes` starting at 00:00
    pub fn day_samples<'a>(
        &'a self,
        date: NaiveDate,
        intakes: &'a [IntakeEvent],
        sleep_duration_min: Option<f64>,
        sleep_confidence: Option<f64>,
        interval_minutes: u32,
    ) -> Result<DaySamples<'a>> {
        if interval_minutes == 0 {
            return Err(Error::Validation(
                "Sampling interval must be at least one minute".into(),
            ));
        }

        Ok(DaySamples {
            engine: self,
            intakes,
            sleep_duration_min,
            sleep_confidence,
            start: start_of_day(date)?,
            interval_minutes,
            next_offset: 0,
        })
    }

    /// Score samples for a full calendar day in increasing time order
    pub fn generate_day(
        &self,
        date: NaiveDate,
        intakes: &[IntakeEvent],
        sleep_duration_min: Option<f64>,
        sleep_confidence: Option<f64>,
        interval_minutes: u32,
    ) -> Result<DayCurve> {
        let curve: DayCurve = self
            .day_samples(date, intakes, sleep_duration_min, sleep_confidence, interval_minutes)?
            .collect();

        tracing::debug!(
            "Generated {} samples for {} at {} min interval",
            curve.len(),
            date,
            interval_minutes
        );
        Ok(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Phase, Substance};
    use chrono::Timelike;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn test_default_interval_yields_96_samples() {
        let engine = BioEngine::default();
        let curve = engine
            .generate_day(day(), &[], None, None, DEFAULT_INTERVAL_MINUTES)
            .unwrap();

        assert_eq!(curve.len(), 96);
        let first = curve.first().unwrap().timestamp;
        let last = curve.last().unwrap().timestamp;
        assert_eq!(first, day().and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(last, day().and_hms_opt(23, 45, 0).unwrap());
        assert!(curve.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(curve.iter().all(|s| s.timestamp.date() == day()));
    }

    #[test]
    fn test_other_intervals() {
        let engine = BioEngine::default();
        let hourly = engine.generate_day(day(), &[], None, None, 60).unwrap();
        assert_eq!(hourly.len(), 24);

        // 7 does not divide 1440: 0, 7, ..., 1435
        let odd = engine.generate_day(day(), &[], None, None, 7).unwrap();
        assert_eq!(odd.len(), 206);
        let last = odd.last().unwrap().timestamp;
        assert_eq!((last.hour(), last.minute()), (23, 55));

        let whole_day = engine.generate_day(day(), &[], None, None, 2000).unwrap();
        assert_eq!(whole_day.len(), 1);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let engine = BioEngine::default();
        let result = engine.generate_day(day(), &[], None, None, 0);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_size_hint_is_exact() {
        let engine = BioEngine::default();
        let mut samples = engine.day_samples(day(), &[], None, None, 15).unwrap();
        assert_eq!(samples.len(), 96);
        samples.next();
        samples.next();
        assert_eq!(samples.len(), 94);
    }

    #[test]
    fn test_huge_interval_len_is_one() {
        let engine = BioEngine::default();
        let mut samples = engine
            .day_samples(day(), &[], None, None, u32::MAX - 100)
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert!(samples.next().is_some());
        assert_eq!(samples.len(), 0);
        assert!(samples.next().is_none());

        let curve = engine.generate_day(day(), &[], None, None, u32::MAX).unwrap();
        assert_eq!(curve.len(), 1);
    }

    #[test]
    fn test_lazy_matches_eager_and_compose() {
        let engine = BioEngine::default();
        let intakes = vec![
            IntakeEvent::new(Substance::Elvanse, day().and_hms_opt(7, 30, 0).unwrap(), None),
            IntakeEvent::new(Substance::Mate, day().and_hms_opt(14, 0, 0).unwrap(), Some(76.0)),
        ];

        let eager = engine
            .generate_day(day(), &intakes, Some(420.0), Some(90.0), 30)
            .unwrap();
        let lazy: Vec<_> = engine
            .day_samples(day(), &intakes, Some(420.0), Some(90.0), 30)
            .unwrap()
            .collect();
        assert_eq!(eager, lazy);

        let noon = engine.compose(day().and_hms_opt(12, 0, 0).unwrap(), &intakes, Some(420.0), Some(90.0));
        assert_eq!(eager[24], noon);
    }

    #[test]
    fn test_day_shape_without_intakes() {
        let engine = BioEngine::default();
        let curve = engine.generate_day(day(), &[], None, None, 15).unwrap();

        assert_eq!(curve[0].phase, Phase::Sleep);
        assert_eq!(curve[24].phase, Phase::Waking); // 06:00
        assert_eq!(curve[40].phase, Phase::Baseline); // 10:00
        assert_eq!(curve[40].score, 60.0);
        assert_eq!(curve[54].phase, Phase::MiddayDip); // 13:30
        assert_eq!(curve[84].phase, Phase::WindDown); // 21:00
    }
}
