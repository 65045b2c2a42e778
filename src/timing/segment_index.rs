//! Lookup of the timing segment which covers a beat.

use itertools::Itertools;

use crate::malody::{BeatPosition, TimingSegment};

use super::TimingError;

/// Sorted start positions of timing segments.
///
/// It is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentIndex {
    positions: Vec<BeatPosition>,
}

impl SegmentIndex {
    /// Creates an index from the timing list of a chart.
    ///
    /// # Errors
    ///
    /// - [`TimingError::Empty`] if `segments` is empty.
    /// - [`TimingError::Beat`] if a beat is malformed.
    /// - [`TimingError::Unordered`] if the beats are not in ascending order.
    pub fn new(segments: &[TimingSegment]) -> Result<Self, TimingError> {
        let positions = segments
            .iter()
            .map(|segment| segment.beat.position())
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_positions(positions)
    }

    /// Creates an index from already evaluated start positions.
    ///
    /// # Errors
    ///
    /// - [`TimingError::Empty`] if `positions` is empty.
    /// - [`TimingError::Unordered`] if `positions` is not in ascending order.
    pub fn from_positions(positions: Vec<BeatPosition>) -> Result<Self, TimingError> {
        if positions.is_empty() {
            return Err(TimingError::Empty);
        }
        if let Some((index, _)) = positions
            .iter()
            .tuple_windows()
            .find_position(|(prev, next)| next < prev)
        {
            return Err(TimingError::Unordered { index: index + 1 });
        }
        Ok(Self { positions })
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always `false`, for symmetry with [`SegmentIndex::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Start positions of the segments.
    #[must_use]
    pub fn positions(&self) -> &[BeatPosition] {
        &self.positions
    }

    /// Start position of the segment at `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<BeatPosition> {
        self.positions.get(index).copied()
    }

    /// Number of segments starting at or before `beat`.
    #[must_use]
    pub fn insertion_point(&self, beat: BeatPosition) -> usize {
        self.positions.partition_point(|&start| start <= beat)
    }

    /// Index of the last segment starting at or before `beat`.
    ///
    /// A beat before every segment is covered by the first segment.
    #[must_use]
    pub fn locate(&self, beat: BeatPosition) -> usize {
        self.insertion_point(beat).saturating_sub(1)
    }

    /// Index of the segment one before [`SegmentIndex::locate`], clamped to the first segment.
    ///
    /// Scroll velocity changes are timed against this segment.
    #[must_use]
    pub fn locate_governing(&self, beat: BeatPosition) -> usize {
        self.insertion_point(beat).saturating_sub(2)
    }
}
