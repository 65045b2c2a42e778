//! Conversion from beat positions into absolute milliseconds.
//!
//! The timeline of a chart is split into segments by BPM change points. Inside a segment one beat
//! always takes `60000 / bpm` milliseconds, so the time of a beat is found by locating its segment
//! and interpolating from the start time of that segment:
//!
//! ```text
//! time(beat) = boundary[k] + (beat - beat[k]) * 60000 / bpm[k]
//! ```
//!
//! where `k` is the last segment starting at or before `beat`. The boundary times are accumulated
//! once on construction of [`TimeMapper`], and `k` is found by a binary search in
//! [`SegmentIndex`], so a query takes `O(log n)` for `n` segments.

use thiserror::Error;

use crate::malody::BeatError;

pub mod mapper;
pub mod segment_index;

pub use self::{mapper::TimeMapper, segment_index::SegmentIndex};

/// Milliseconds in a minute, for converting BPM into the length of one beat.
pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Length of one beat in milliseconds, or `None` if `bpm` is not a positive finite number.
#[must_use]
pub fn ms_per_beat(bpm: f64) -> Option<f64> {
    if !(bpm.is_finite() && bpm > 0.0) {
        return None;
    }
    Some(MS_PER_MINUTE / bpm).filter(|ms| ms.is_finite())
}

/// Errors on building the timing of a chart. All of them mean malformed timing data.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum TimingError {
    /// There were no BPM segments.
    #[error("timing list is empty")]
    Empty,
    /// A segment had zero, negative or non-finite BPM.
    #[error("timing segment {index} has invalid bpm {bpm}")]
    InvalidBpm {
        /// Index of the segment in the source list.
        index: usize,
        /// The BPM value.
        bpm: f64,
    },
    /// A segment started before the previous one.
    #[error("timing segment {index} is placed before the previous segment")]
    Unordered {
        /// Index of the segment in the source list.
        index: usize,
    },
    /// A segment had a malformed beat.
    #[error("timing segment has malformed beat: {0}")]
    Beat(#[from] BeatError),
}
