//! The [Malody](https://malody.mugzone.net/) chart format (`.mc`) definition.
//!
//! A `.mc` file is a JSON document. Every position in it is a [`Beat`], a rational number of
//! beats from the start of the chart written as `[measure, numerator, denominator]`. Timing is
//! given separately by a list of [`TimingSegment`]s, so the absolute time of a note can only be
//! found together with the BPMs before it (see [`crate::timing`]).
//!
//! # Sound Anchor
//!
//! The audio file of a chart is not written in [`Meta`]. Instead one special [`Note`] with
//! `"type": 1` carries the file name and the global offset. It is placed either at the start or
//! at the end of the note list and is not playable. See [`anchor`] for its extraction.
//!
//! # Example
//!
//! ```json
//! {
//!   "meta": {
//!     "creator": "someone",
//!     "background": "bg.jpg",
//!     "version": "4K Hard",
//!     "preview": 32000,
//!     "mode": 0,
//!     "song": { "title": "Song", "artist": "Artist" },
//!     "mode_ext": { "column": 4 }
//!   },
//!   "time": [{ "beat": [0, 0, 1], "bpm": 174.0 }],
//!   "effect": [{ "beat": [16, 0, 1], "scroll": 2.0 }],
//!   "note": [
//!     { "beat": [0, 0, 1], "column": 0 },
//!     { "beat": [0, 1, 2], "endbeat": [1, 0, 1], "column": 2 },
//!     { "beat": [0, 0, 1], "sound": "song.ogg", "vol": 100, "offset": 120, "type": 1 }
//!   ]
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod anchor;
pub mod beat;

pub use self::beat::{Beat, BeatError, BeatPosition};

/// Top-level object of the `.mc` format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McChart {
    /// Chart metadata.
    pub meta: Meta,
    /// Notes in the order of the source file. It includes the sound anchor note.
    #[serde(rename = "note", default)]
    pub notes: Vec<Note>,
    /// BPM change points, which must be ordered by their beats.
    #[serde(default)]
    pub time: Vec<TimingSegment>,
    /// Effect events. Only the scroll velocity changes are used.
    #[serde(rename = "effect", default)]
    pub effects: Vec<EffectEvent>,
}

/// Metadata of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Author of the chart.
    pub creator: String,
    /// Difficulty name of the chart, e.g. `"4K Another"`.
    pub version: String,
    /// Background image file name, relative to the chart file.
    #[serde(default)]
    pub background: Option<String>,
    /// Start time of the music preview in milliseconds.
    #[serde(default)]
    pub preview: Option<i64>,
    /// Game mode of the chart.
    pub mode: ChartMode,
    /// Song information.
    pub song: Song,
    /// Mode specific settings.
    #[serde(default)]
    pub mode_ext: ModeExt,
}

/// Song information of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Title, usually romanized.
    pub title: String,
    /// Artist, usually romanized.
    pub artist: String,
    /// Title in its original language if it differs from `title`.
    #[serde(default)]
    pub titleorg: Option<String>,
    /// Artist in its original language if it differs from `artist`.
    #[serde(default)]
    pub artistorg: Option<String>,
}

impl Song {
    /// Title in its original language, falling back to `title`.
    #[must_use]
    pub fn title_unicode(&self) -> &str {
        self.titleorg
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(&self.title)
    }

    /// Artist in its original language, falling back to `artist`.
    #[must_use]
    pub fn artist_unicode(&self) -> &str {
        self.artistorg
            .as_deref()
            .filter(|artist| !artist.is_empty())
            .unwrap_or(&self.artist)
    }
}

/// Mode specific settings of a chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeExt {
    /// Number of lanes. Only meaningful in [`ChartMode::Key`].
    #[serde(default)]
    pub column: Option<u32>,
}

/// Game mode of a Malody chart, stored as a number in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ChartMode {
    /// `0`, vertical scrolling keys. This is the only mode converted into osu!mania.
    Key,
    /// `1`, unused by the game.
    Step,
    /// `2`, DJ turntable.
    Dj,
    /// `3`, catching fruits.
    Catch,
    /// `4`, 4x4 pad.
    Pad,
    /// `5`, drums.
    Taiko,
    /// `6`, ring.
    Ring,
    /// `7`, horizontal slide.
    Slide,
    /// `8`, live.
    Live,
    /// `9`, cube.
    Cube,
    /// Mode number unknown to this crate.
    Unknown(i64),
}

impl From<i64> for ChartMode {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::Key,
            1 => Self::Step,
            2 => Self::Dj,
            3 => Self::Catch,
            4 => Self::Pad,
            5 => Self::Taiko,
            6 => Self::Ring,
            7 => Self::Slide,
            8 => Self::Live,
            9 => Self::Cube,
            other => Self::Unknown(other),
        }
    }
}

impl From<ChartMode> for i64 {
    fn from(value: ChartMode) -> Self {
        match value {
            ChartMode::Key => 0,
            ChartMode::Step => 1,
            ChartMode::Dj => 2,
            ChartMode::Catch => 3,
            ChartMode::Pad => 4,
            ChartMode::Taiko => 5,
            ChartMode::Ring => 6,
            ChartMode::Slide => 7,
            ChartMode::Live => 8,
            ChartMode::Cube => 9,
            ChartMode::Unknown(other) => other,
        }
    }
}

impl fmt::Display for ChartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Key => "key",
            Self::Step => "step",
            Self::Dj => "dj",
            Self::Catch => "catch",
            Self::Pad => "pad",
            Self::Taiko => "taiko",
            Self::Ring => "ring",
            Self::Slide => "slide",
            Self::Live => "live",
            Self::Cube => "cube",
            Self::Unknown(other) => return write!(f, "unknown mode {other}"),
        };
        write!(f, "{name} (mode {})", i64::from(*self))
    }
}

/// A note of the chart, or the sound anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Position to be placed.
    pub beat: Beat,
    /// Lane index from the left, starting at zero.
    #[serde(default)]
    pub column: u32,
    /// End position. The note is a long note if this is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endbeat: Option<Beat>,
    /// Kind of the note. [`anchor::SOUND_ANCHOR_TYPE`] marks the sound anchor.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<i64>,
    /// Audio file name, only on the sound anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// Audio offset in milliseconds, only on the sound anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
}

impl Note {
    /// Creates a playable short note.
    #[must_use]
    pub const fn tap(beat: Beat, column: u32) -> Self {
        Self {
            beat,
            column,
            endbeat: None,
            kind: None,
            sound: None,
            offset: None,
        }
    }

    /// Creates a playable long note.
    #[must_use]
    pub const fn hold(beat: Beat, endbeat: Beat, column: u32) -> Self {
        Self {
            beat,
            column,
            endbeat: Some(endbeat),
            kind: None,
            sound: None,
            offset: None,
        }
    }

    /// Checks whether this note is the sound anchor.
    #[must_use]
    pub fn is_sound_anchor(&self) -> bool {
        self.kind == Some(anchor::SOUND_ANCHOR_TYPE)
    }
}

/// BPM change point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingSegment {
    /// Position where the BPM starts.
    pub beat: Beat,
    /// Beats per minute, which must be positive.
    pub bpm: f64,
}

/// Effect event. It changes the scroll velocity if `scroll` is present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectEvent {
    /// Position of the event.
    pub beat: Beat,
    /// Scroll speed multiplier. Zero stops the notes visually.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<f64>,
}

/// Errors on parsing the `.mc` source text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum McParseError {
    /// The source is not valid JSON or does not match the chart structure.
    #[error("invalid chart at `{path}`: {source}")]
    Json {
        /// Path to the value where the error occurred, such as `meta.song.title`.
        path: String,
        /// The error from the JSON deserializer.
        source: serde_json::Error,
    },
    /// The chart object is followed by non-whitespace characters.
    #[error("trailing characters after chart: {0}")]
    Trailing(#[source] serde_json::Error),
}

impl McParseError {
    /// Gets the underlying JSON error.
    #[must_use]
    pub const fn json_error(&self) -> &serde_json::Error {
        match self {
            Self::Json { source, .. } | Self::Trailing(source) => source,
        }
    }

    /// Gets the one-based line and column where the error occurred.
    #[must_use]
    pub fn line_column(&self) -> (usize, usize) {
        let error = self.json_error();
        (error.line(), error.column())
    }
}

/// Strips a UTF-8 byte order mark, which some chart editors prepend.
#[must_use]
pub fn strip_bom(source: &str) -> &str {
    source.strip_prefix('\u{feff}').unwrap_or(source)
}

/// Parses a `.mc` chart from its source text.
///
/// # Errors
///
/// Returns [`McParseError`] if the text is not a JSON object of the chart structure.
pub fn parse_mc(source: &str) -> Result<McChart, McParseError> {
    let mut de = serde_json::Deserializer::from_str(strip_bom(source));
    let chart = serde_path_to_error::deserialize(&mut de).map_err(|err| McParseError::Json {
        path: err.path().to_string(),
        source: err.into_inner(),
    })?;
    de.end().map_err(McParseError::Trailing)?;
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "meta": {
            "creator": "c",
            "version": "v",
            "mode": 0,
            "song": { "title": "t", "artist": "a" },
            "mode_ext": { "column": 7 }
        },
        "time": [{ "beat": [0, 0, 1], "bpm": 150 }],
        "note": [{ "beat": [1, 1, 4], "column": 6, "endbeat": [2, 0, 1] }]
    }"#;

    #[test]
    fn parses_minimal_chart() {
        let chart = parse_mc(MINIMAL).unwrap();
        assert_eq!(chart.meta.mode, ChartMode::Key);
        assert_eq!(chart.meta.mode_ext.column, Some(7));
        assert_eq!(chart.meta.background, None);
        assert_eq!(chart.time.len(), 1);
        assert_eq!(chart.time[0].bpm, 150.0);
        assert!(chart.effects.is_empty());
        assert_eq!(
            chart.notes,
            vec![Note::hold(Beat::new(1, 1, 4), Beat::new(2, 0, 1), 6)]
        );
    }

    #[test]
    fn parses_with_bom() {
        let source = format!("\u{feff}{MINIMAL}");
        assert!(parse_mc(&source).is_ok());
    }

    #[test]
    fn reports_path_of_schema_error() {
        let source = r#"{
            "meta": {
                "creator": "c",
                "version": "v",
                "mode": 0,
                "song": { "title": 42, "artist": "a" }
            }
        }"#;
        let Err(McParseError::Json { path, .. }) = parse_mc(source) else {
            panic!("expected a JSON error");
        };
        assert_eq!(path, "meta.song.title");
    }

    #[test]
    fn rejects_trailing_characters() {
        let source = format!("{MINIMAL} ]");
        assert!(matches!(parse_mc(&source), Err(McParseError::Trailing(_))));
    }

    #[test]
    fn unknown_mode_is_kept() {
        assert_eq!(ChartMode::from(3), ChartMode::Catch);
        assert_eq!(ChartMode::from(42), ChartMode::Unknown(42));
        assert_eq!(i64::from(ChartMode::Unknown(42)), 42);
        assert_eq!(ChartMode::Catch.to_string(), "catch (mode 3)");
    }

    #[test]
    fn unicode_names_fall_back() {
        let song = Song {
            title: "Yoru".into(),
            artist: "Someone".into(),
            titleorg: Some("夜".into()),
            artistorg: Some(String::new()),
        };
        assert_eq!(song.title_unicode(), "夜");
        assert_eq!(song.artist_unicode(), "Someone");
    }
}
