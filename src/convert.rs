//! Conversion of one Malody chart into one osu!mania beatmap.
//!
//! The conversion is a single pass with no side effects: either the whole [`OsuBeatmap`] is
//! produced, or a [`ConvertError`] tells why the chart was skipped. Writing the result is left to
//! [`crate::batch`].

use std::num::NonZeroU32;

use thiserror::Error;

use crate::{
    malody::{BeatError, ChartMode, McChart, Meta, anchor::extract_sound_anchor},
    osu::{
        DifficultyDefaults, HeaderInfo, OsuBeatmap, header::build_header,
        hit_objects::build_hit_objects, timing_points::build_timing_points,
    },
    timing::{TimeMapper, TimingError},
};

/// Characters removed from output file names, as they are not allowed on some file systems.
pub const ILLEGAL_FILE_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Options of the conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertConfig {
    /// Sort the timing points by time. Otherwise all BPM points come before all scroll points.
    pub sort_timing_points: bool,
    /// Sort the hit objects by time. Otherwise they keep the order of the source notes.
    pub sort_hit_objects: bool,
    /// Difficulty values written into `[Difficulty]`.
    pub difficulty: DifficultyDefaults,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            sort_timing_points: true,
            sort_hit_objects: true,
            difficulty: DifficultyDefaults::default(),
        }
    }
}

impl ConvertConfig {
    /// Keeps the source order of both the timing points and the hit objects.
    #[must_use]
    pub const fn keep_source_order(mut self) -> Self {
        self.sort_timing_points = false;
        self.sort_hit_objects = false;
        self
    }
}

/// The default [`ConvertConfig`], which sorts the outputs by time.
#[must_use]
pub fn default_config() -> ConvertConfig {
    ConvertConfig::default()
}

/// Errors on converting a chart. The chart must be skipped on any of them.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The chart is not a key mode chart.
    #[error("unsupported chart mode: {0}")]
    UnsupportedMode(ChartMode),
    /// The key count was missing or zero.
    #[error("invalid key count: {0:?}")]
    InvalidKeyCount(Option<u32>),
    /// Neither the first nor the last note was the sound anchor.
    #[error("no sound anchor note at either end of the notes")]
    MissingSoundAnchor,
    /// The timing list was malformed.
    #[error("malformed timing data: {0}")]
    Timing(#[from] TimingError),
    /// A note or an effect had a malformed beat.
    #[error("malformed beat: {0}")]
    Beat(#[from] BeatError),
}

/// A converted beatmap with the name of the file to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOutput {
    /// File name, without directories.
    pub file_name: String,
    /// The beatmap.
    pub beatmap: OsuBeatmap,
}

/// Removes [`ILLEGAL_FILE_NAME_CHARS`] from `name`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !ILLEGAL_FILE_NAME_CHARS.contains(c))
        .collect()
}

/// Output file name of a chart, `"{artist} - {title} [{version}].osu"` sanitized.
#[must_use]
pub fn output_file_name(meta: &Meta) -> String {
    sanitize_file_name(&format!(
        "{} - {} [{}].osu",
        meta.song.artist, meta.song.title, meta.version
    ))
}

/// Converts a chart into a beatmap.
///
/// # Errors
///
/// - [`ConvertError::UnsupportedMode`] if the chart is not a key mode chart.
/// - [`ConvertError::InvalidKeyCount`] if `meta.mode_ext.column` is missing or zero.
/// - [`ConvertError::MissingSoundAnchor`] if no sound anchor is found.
/// - [`ConvertError::Timing`] if the timing list is malformed.
/// - [`ConvertError::Beat`] if a note or an effect has a malformed beat.
pub fn convert_chart(
    chart: McChart,
    config: &ConvertConfig,
) -> Result<ConvertOutput, ConvertError> {
    let McChart {
        meta,
        notes,
        time,
        effects,
    } = chart;
    if meta.mode != ChartMode::Key {
        return Err(ConvertError::UnsupportedMode(meta.mode));
    }
    let key_count = meta
        .mode_ext
        .column
        .and_then(NonZeroU32::new)
        .ok_or(ConvertError::InvalidKeyCount(meta.mode_ext.column))?;

    let (anchor, notes) = extract_sound_anchor(notes).ok_or(ConvertError::MissingSoundAnchor)?;
    let mapper = TimeMapper::new(&time, anchor.offset_ms)?;

    let timing_points = build_timing_points(&mapper, &effects, config.sort_timing_points)?;
    let hit_objects = build_hit_objects(&notes, &mapper, key_count, config.sort_hit_objects)?;
    log::debug!(
        "{} - {} [{}]: {} timing points, {} hit objects",
        meta.song.artist,
        meta.song.title,
        meta.version,
        timing_points.len(),
        hit_objects.len()
    );

    let file_name = output_file_name(&meta);
    let info = HeaderInfo {
        title_unicode: meta.song.title_unicode().to_string(),
        artist_unicode: meta.song.artist_unicode().to_string(),
        title: meta.song.title,
        artist: meta.song.artist,
        creator: meta.creator,
        version: meta.version,
        background: meta.background,
        key_count: key_count.get(),
        preview_ms: meta.preview.unwrap_or(0),
        audio_filename: anchor.sound_file,
    };
    let header = build_header(&info, &config.difficulty);

    Ok(ConvertOutput {
        file_name,
        beatmap: OsuBeatmap {
            header,
            timing_points,
            hit_objects,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_file_name() {
        assert_eq!(
            sanitize_file_name(r#"A/B\C: *What?* "x" <y> | z.osu"#),
            "ABC What x y  z.osu"
        );
    }

    #[test]
    fn keep_source_order_disables_sorting() {
        let config = default_config().keep_source_order();
        assert!(!config.sort_timing_points);
        assert!(!config.sort_hit_objects);
        assert_eq!(config.difficulty, DifficultyDefaults::default());
    }
}
