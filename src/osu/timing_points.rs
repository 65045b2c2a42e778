//! `[TimingPoints]` section built from BPM segments and scroll velocity effects.

use std::fmt;

use crate::{
    malody::{BeatError, EffectEvent},
    timing::TimeMapper,
};

use super::truncate_ms;

/// Beat length of an inherited point meaning the normal scroll speed.
const BASE_SV_BEAT_LENGTH: f64 = -100.0;

/// Beat length written for a zero scroll speed, which cannot be expressed as a ratio.
pub const STOP_SV_BEAT_LENGTH: f64 = -1e308;

/// Record of the `[TimingPoints]` section.
///
/// The fields not stored here are written as `meter = 4`, `sampleSet = 1`, `sampleIndex = 0`,
/// `volume = 0` and `effects = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingPoint {
    /// Start time in milliseconds.
    pub time_ms: f64,
    /// For an uninherited point, the length of one beat in milliseconds. For an inherited point,
    /// a negative inverse scroll speed in percent.
    pub beat_length: f64,
    /// Whether the point changes the BPM rather than the scroll speed.
    pub uninherited: bool,
}

impl TimingPoint {
    /// Creates a BPM point.
    #[must_use]
    pub const fn uninherited(time_ms: f64, beat_length: f64) -> Self {
        Self {
            time_ms,
            beat_length,
            uninherited: true,
        }
    }

    /// Creates a scroll speed point for the multiplier `scroll`.
    ///
    /// The direction of the scroll is dropped, and zero becomes [`STOP_SV_BEAT_LENGTH`].
    #[must_use]
    pub fn scroll(time_ms: f64, scroll: f64) -> Self {
        let beat_length = if scroll == 0.0 {
            STOP_SV_BEAT_LENGTH
        } else {
            BASE_SV_BEAT_LENGTH / scroll.abs()
        };
        Self {
            time_ms,
            beat_length,
            uninherited: false,
        }
    }

    /// Start time truncated into whole milliseconds, as written.
    #[must_use]
    pub fn time(&self) -> i64 {
        truncate_ms(self.time_ms)
    }
}

impl fmt::Display for TimingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},4,1,0,0,{},0",
            self.time(),
            self.beat_length,
            u8::from(self.uninherited)
        )
    }
}

/// Builds the timing points of a chart.
///
/// One uninherited point is made for every BPM segment of `mapper`, then one inherited point for
/// every effect having `scroll`. A scroll point is timed against the segment before the one
/// covering it ([`crate::timing::SegmentIndex::locate_governing`]).
///
/// If `sort` is set, the points are stably sorted by their written time, so a BPM point stays
/// before a scroll point at the same millisecond.
///
/// # Errors
///
/// Returns [`BeatError`] if an effect has a malformed beat.
pub fn build_timing_points(
    mapper: &TimeMapper,
    effects: &[EffectEvent],
    sort: bool,
) -> Result<Vec<TimingPoint>, BeatError> {
    let mut points: Vec<_> = (0..mapper.len())
        .filter_map(|index| {
            Some(TimingPoint::uninherited(
                mapper.boundary_time(index)?,
                mapper.ms_per_beat(index)?,
            ))
        })
        .collect();

    for effect in effects {
        let Some(scroll) = effect.scroll else {
            continue;
        };
        let beat = effect.beat.position()?;
        let segment = mapper.index().locate_governing(beat);
        points.push(TimingPoint::scroll(
            mapper.time_in_segment(beat, segment),
            scroll,
        ));
    }

    if sort {
        points.sort_by_key(TimingPoint::time);
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::malody::{Beat, TimingSegment};
    use pretty_assertions::assert_eq;

    fn mapper() -> TimeMapper {
        TimeMapper::new(
            &[
                TimingSegment {
                    beat: Beat::start_of(0),
                    bpm: 120.0,
                },
                TimingSegment {
                    beat: Beat::start_of(4),
                    bpm: 60.0,
                },
            ],
            0.0,
        )
        .unwrap()
    }

    fn effect(beat: Beat, scroll: Option<f64>) -> EffectEvent {
        EffectEvent { beat, scroll }
    }

    fn lines(points: &[TimingPoint]) -> Vec<String> {
        points.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn one_point_per_segment() {
        let points = build_timing_points(&mapper(), &[], true).unwrap();
        assert_eq!(lines(&points), ["0,500,4,1,0,0,1,0", "2000,1000,4,1,0,0,1,0"]);
    }

    #[test]
    fn scroll_points_follow() {
        let effects = [
            effect(Beat::new(1, 1, 2), Some(2.0)),
            effect(Beat::start_of(2), None),
            effect(Beat::start_of(3), Some(-0.5)),
        ];
        let points = build_timing_points(&mapper(), &effects, false).unwrap();
        assert_eq!(
            lines(&points),
            [
                "0,500,4,1,0,0,1,0",
                "2000,1000,4,1,0,0,1,0",
                "750,-50,4,1,0,0,0,0",
                "1500,-200,4,1,0,0,0,0",
            ]
        );
    }

    #[test]
    fn sorting_keeps_bpm_first() {
        let effects = [
            effect(Beat::start_of(4), Some(1.0)),
            effect(Beat::start_of(1), Some(1.0)),
        ];
        let points = build_timing_points(&mapper(), &effects, true).unwrap();
        assert_eq!(
            lines(&points),
            [
                "0,500,4,1,0,0,1,0",
                "500,-100,4,1,0,0,0,0",
                "2000,1000,4,1,0,0,1,0",
                "2000,-100,4,1,0,0,0,0",
            ]
        );
    }

    #[test]
    fn scroll_is_timed_against_previous_segment() {
        // Beat 5 is covered by the second segment, but timed with the first tempo.
        let effects = [effect(Beat::start_of(5), Some(1.0))];
        let points = build_timing_points(&mapper(), &effects, false).unwrap();
        assert_eq!(points.last().map(TimingPoint::time), Some(2500));
    }

    #[test]
    fn zero_scroll_uses_sentinel() {
        let point = TimingPoint::scroll(100.0, 0.0);
        assert_eq!(point.beat_length, STOP_SV_BEAT_LENGTH);
        assert!(!point.uninherited);
        assert!(point.to_string().starts_with("100,-1"));
    }

    #[test]
    fn malformed_effect_beat() {
        let effects = [effect(Beat::new(1, 1, 0), Some(1.0))];
        assert!(matches!(
            build_timing_points(&mapper(), &effects, true),
            Err(BeatError::DivisionByZero(_))
        ));
    }

    #[test]
    fn effect_without_scroll_is_ignored_even_if_malformed() {
        let effects = [effect(Beat::new(1, 1, 0), None)];
        assert_eq!(build_timing_points(&mapper(), &effects, true).unwrap().len(), 2);
    }
}
