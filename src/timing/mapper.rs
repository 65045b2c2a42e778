//! Beat to millisecond mapping over the timing segments of a chart.

use crate::malody::{BeatPosition, TimingSegment};

use super::{SegmentIndex, TimingError, ms_per_beat};

/// Precomputed timing of one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SegmentTiming {
    start: BeatPosition,
    start_ms: f64,
    ms_per_beat: f64,
}

/// Maps beat positions of a chart into absolute milliseconds.
///
/// It is immutable after construction, so it can be shared between threads for reading.
///
/// # Example
///
/// ```
/// use malody2osu::{
///     malody::{Beat, TimingSegment},
///     timing::TimeMapper,
/// };
///
/// let segments = [
///     TimingSegment { beat: Beat::start_of(0), bpm: 120.0 },
///     TimingSegment { beat: Beat::start_of(4), bpm: 60.0 },
/// ];
/// let mapper = TimeMapper::new(&segments, 0.0).unwrap();
/// let beat = Beat::start_of(5).position().unwrap();
/// assert_eq!(mapper.time_at(beat), 3000.0);
/// ```
#[derive(Debug, Clone)]
pub struct TimeMapper {
    index: SegmentIndex,
    segments: Vec<SegmentTiming>,
}

impl TimeMapper {
    /// Creates a new mapper from the timing list of a chart and the global offset.
    ///
    /// The time of beat zero is `offset_ms`, and the start time of every segment is accumulated
    /// from the previous segment's BPM.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError`] if the list is empty, unordered, has a malformed beat or has a
    /// non-positive BPM.
    pub fn new(segments: &[TimingSegment], offset_ms: f64) -> Result<Self, TimingError> {
        let index = SegmentIndex::new(segments)?;
        let lengths = segments
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                ms_per_beat(segment.bpm).ok_or(TimingError::InvalidBpm {
                    index,
                    bpm: segment.bpm,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut timings = Vec::with_capacity(lengths.len());
        let mut current_ms = offset_ms;
        let mut prev_start = BeatPosition::from_integer(0);
        let mut prev_length = lengths.first().copied().ok_or(TimingError::Empty)?;
        for (&start, &length) in index.positions().iter().zip(&lengths) {
            current_ms += start.beats_since(prev_start) * prev_length;
            timings.push(SegmentTiming {
                start,
                start_ms: current_ms,
                ms_per_beat: length,
            });
            prev_start = start;
            prev_length = length;
        }
        log::debug!(
            "built time mapper: {} segments, offset {offset_ms} ms, last segment at {current_ms} ms",
            timings.len()
        );

        Ok(Self {
            index,
            segments: timings,
        })
    }

    /// The index of segment start positions.
    #[must_use]
    pub const fn index(&self) -> &SegmentIndex {
        &self.index
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`, a mapper has at least one segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Start time in milliseconds of the segment at `index`.
    #[must_use]
    pub fn boundary_time(&self, index: usize) -> Option<f64> {
        self.segments.get(index).map(|timing| timing.start_ms)
    }

    /// Length of one beat in milliseconds in the segment at `index`.
    #[must_use]
    pub fn ms_per_beat(&self, index: usize) -> Option<f64> {
        self.segments.get(index).map(|timing| timing.ms_per_beat)
    }

    /// Absolute time in milliseconds of `beat`.
    #[must_use]
    pub fn time_at(&self, beat: BeatPosition) -> f64 {
        self.time_in_segment(beat, self.index.locate(beat))
    }

    /// Absolute time in milliseconds of `beat`, interpolated from the segment at `index` instead
    /// of the segment covering `beat`. An out of range `index` is clamped to the last segment.
    #[must_use]
    pub fn time_in_segment(&self, beat: BeatPosition, index: usize) -> f64 {
        // `segments` is never empty, so the fallback is unreachable.
        self.segments
            .get(index)
            .or_else(|| self.segments.last())
            .map_or(f64::NAN, |timing| {
                timing.start_ms + beat.beats_since(timing.start) * timing.ms_per_beat
            })
    }
}
