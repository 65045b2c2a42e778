//! Extraction of the sound anchor note.
//!
//! Malody has no header field for the audio file. The file name and the global offset are
//! carried by a non-playable [`Note`] of [`SOUND_ANCHOR_TYPE`], placed at the start or the end of
//! the note list.

use super::Note;

/// Value of [`Note::kind`] which marks the sound anchor.
pub const SOUND_ANCHOR_TYPE: i64 = 1;

/// Sign applied to the anchor offset to get the offset of the osu! timeline.
///
/// A positive Malody offset delays the audio against the chart, while osu! places the chart
/// against the audio, so the direction is opposite.
pub const AUDIO_OFFSET_SIGN: f64 = -1.0;

/// Audio information taken from the sound anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundAnchor {
    /// Audio file name.
    pub sound_file: String,
    /// Offset of the first timing segment in milliseconds, already converted for osu!.
    pub offset_ms: f64,
}

/// Splits the sound anchor from the notes.
///
/// Only the first and the last notes (in the source order, not the beat order) are inspected,
/// and the first one is preferred. Returns the anchor and the remaining playable notes, or `None`
/// if neither end is an anchor.
#[must_use]
pub fn extract_sound_anchor(mut notes: Vec<Note>) -> Option<(SoundAnchor, Vec<Note>)> {
    let index = if notes.first().is_some_and(Note::is_sound_anchor) {
        0
    } else if notes.last().is_some_and(Note::is_sound_anchor) {
        notes.len() - 1
    } else {
        return None;
    };
    let anchor = notes.remove(index);
    let sound_file = anchor.sound.unwrap_or_default();
    if sound_file.is_empty() {
        log::warn!("sound anchor at {} has no audio file name", anchor.beat);
    }
    let sound = SoundAnchor {
        sound_file,
        offset_ms: AUDIO_OFFSET_SIGN * anchor.offset.unwrap_or(0.0),
    };
    Some((sound, notes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::malody::Beat;

    fn anchor_note(offset: Option<f64>) -> Note {
        Note {
            beat: Beat::start_of(0),
            column: 0,
            endbeat: None,
            kind: Some(SOUND_ANCHOR_TYPE),
            sound: Some("audio.ogg".into()),
            offset,
        }
    }

    #[test]
    fn takes_anchor_at_end() {
        let notes = vec![
            Note::tap(Beat::start_of(1), 0),
            Note::tap(Beat::start_of(2), 1),
            anchor_note(Some(120.0)),
        ];
        let (anchor, rest) = extract_sound_anchor(notes).unwrap();
        assert_eq!(
            anchor,
            SoundAnchor {
                sound_file: "audio.ogg".into(),
                offset_ms: -120.0,
            }
        );
        assert_eq!(
            rest,
            vec![
                Note::tap(Beat::start_of(1), 0),
                Note::tap(Beat::start_of(2), 1)
            ]
        );
    }

    #[test]
    fn takes_anchor_at_start() {
        let notes = vec![anchor_note(Some(-35.5)), Note::tap(Beat::start_of(1), 3)];
        let (anchor, rest) = extract_sound_anchor(notes).unwrap();
        assert_eq!(anchor.offset_ms, 35.5);
        assert_eq!(rest, vec![Note::tap(Beat::start_of(1), 3)]);
    }

    #[test]
    fn missing_offset_is_zero() {
        let (anchor, rest) = extract_sound_anchor(vec![anchor_note(None)]).unwrap();
        assert_eq!(anchor.offset_ms, 0.0);
        assert!(rest.is_empty());
    }

    #[test]
    fn anchor_in_middle_is_ignored() {
        let notes = vec![
            Note::tap(Beat::start_of(1), 0),
            anchor_note(None),
            Note::tap(Beat::start_of(2), 1),
        ];
        assert!(extract_sound_anchor(notes).is_none());
        assert!(extract_sound_anchor(Vec::new()).is_none());
    }
}
