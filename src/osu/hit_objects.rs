//! `[HitObjects]` section built from playable notes.

use std::{fmt, num::NonZeroU32};

use crate::{
    malody::{BeatError, Note},
    timing::TimeMapper,
};

use super::{PLAYFIELD_WIDTH, truncate_ms};

/// Y coordinate of every mania hit object. It is ignored by the game.
pub const MANIA_Y: u32 = 192;

/// Center x coordinate of the lane `column` among `key_count` lanes.
///
/// It is `floor(512 * (2 * column + 1) / (2 * key_count))`.
#[must_use]
pub fn column_x(column: u32, key_count: NonZeroU32) -> u32 {
    let numerator = u64::from(PLAYFIELD_WIDTH) * (2 * u64::from(column) + 1);
    let denominator = 2 * u64::from(key_count.get());
    u32::try_from(numerator / denominator).unwrap_or(u32::MAX)
}

/// Kind of a hit object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitObjectKind {
    /// Short note to be hit once.
    Note,
    /// Long note to be held until `end_ms`.
    Hold {
        /// End time in milliseconds.
        end_ms: f64,
    },
}

/// Record of the `[HitObjects]` section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitObject {
    /// X coordinate, which selects the lane.
    pub x: u32,
    /// Start time in milliseconds.
    pub time_ms: f64,
    /// Short or long note.
    pub kind: HitObjectKind,
}

impl HitObject {
    /// Start time truncated into whole milliseconds, as written.
    #[must_use]
    pub fn time(&self) -> i64 {
        truncate_ms(self.time_ms)
    }
}

impl fmt::Display for HitObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            HitObjectKind::Note => {
                write!(f, "{},{MANIA_Y},{},1,0,0:0:0:0:", self.x, self.time())
            }
            HitObjectKind::Hold { end_ms } => write!(
                f,
                "{},{MANIA_Y},{},128,0,{}:0:0:0:0:",
                self.x,
                self.time(),
                truncate_ms(end_ms)
            ),
        }
    }
}

/// Builds the hit objects of the playable notes.
///
/// `notes` must not contain the sound anchor. A note with `endbeat` becomes a hold. If `sort` is
/// set, the objects are stably sorted by their written start time, otherwise the order of
/// `notes` is kept.
///
/// # Errors
///
/// Returns [`BeatError`] if a note has a malformed beat.
pub fn build_hit_objects(
    notes: &[Note],
    mapper: &TimeMapper,
    key_count: NonZeroU32,
    sort: bool,
) -> Result<Vec<HitObject>, BeatError> {
    let mut objects = Vec::with_capacity(notes.len());
    for note in notes {
        if note.column >= key_count.get() {
            log::warn!(
                "note at {} is in column {} out of {} keys",
                note.beat,
                note.column,
                key_count
            );
        }
        let time_ms = mapper.time_at(note.beat.position()?);
        let kind = match note.endbeat {
            Some(endbeat) => HitObjectKind::Hold {
                end_ms: mapper.time_at(endbeat.position()?),
            },
            None => HitObjectKind::Note,
        };
        objects.push(HitObject {
            x: column_x(note.column, key_count),
            time_ms,
            kind,
        });
    }
    if sort {
        objects.sort_by_key(HitObject::time);
    }
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::malody::{Beat, TimingSegment};
    use pretty_assertions::assert_eq;

    const FOUR: NonZeroU32 = NonZeroU32::new(4).unwrap();

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
            -20.0,
        )
        .unwrap()
    }

    #[test]
    fn lanes_are_centered() {
        assert_eq!(column_x(0, FOUR), 64);
        assert_eq!(column_x(1, FOUR), 192);
        assert_eq!(column_x(2, FOUR), 320);
        assert_eq!(column_x(3, FOUR), 448);
        let seven = NonZeroU32::new(7).unwrap();
        assert_eq!(column_x(0, seven), 36);
        assert_eq!(column_x(6, seven), 475);
    }

    #[test]
    fn builds_notes_and_holds() {
        let notes = [
            Note::tap(Beat::start_of(1), 0),
            Note::hold(Beat::start_of(3), Beat::start_of(5), 3),
        ];
        let objects = build_hit_objects(&notes, &mapper(), FOUR, true).unwrap();
        let lines: Vec<_> = objects.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            ["64,192,480,1,0,0:0:0:0:", "448,192,1480,128,0,2980:0:0:0:0:"]
        );
    }

    #[test]
    fn sorts_by_time_when_asked() {
        let notes = [
            Note::tap(Beat::start_of(2), 1),
            Note::tap(Beat::start_of(1), 0),
            Note::tap(Beat::start_of(1), 2),
        ];
        let sorted = build_hit_objects(&notes, &mapper(), FOUR, true).unwrap();
        assert_eq!(
            sorted.iter().map(|object| object.x).collect::<Vec<_>>(),
            [64, 320, 192]
        );
        let kept = build_hit_objects(&notes, &mapper(), FOUR, false).unwrap();
        assert_eq!(
            kept.iter().map(|object| object.x).collect::<Vec<_>>(),
            [192, 64, 320]
        );
    }

    #[test]
    fn malformed_end_beat() {
        let notes = [Note::hold(Beat::start_of(1), Beat::new(2, 1, 0), 0)];
        assert!(matches!(
            build_hit_objects(&notes, &mapper(), FOUR, true),
            Err(BeatError::DivisionByZero(_))
        ));
    }
}
