//! Header sections of a beatmap, from `[General]` through `[Events]`.

use super::FORMAT_VERSION_LINE;

/// Chart metadata written into the header sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Romanized title.
    pub title: String,
    /// Title in its original language.
    pub title_unicode: String,
    /// Romanized artist.
    pub artist: String,
    /// Artist in its original language.
    pub artist_unicode: String,
    /// Author of the chart.
    pub creator: String,
    /// Difficulty name.
    pub version: String,
    /// Background image file name.
    pub background: Option<String>,
    /// Number of lanes, written as `CircleSize`.
    pub key_count: u32,
    /// Start time of the music preview in milliseconds.
    pub preview_ms: i64,
    /// Audio file name.
    pub audio_filename: String,
}

/// Difficulty values which have no counterpart in the source chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyDefaults {
    /// `HPDrainRate`.
    pub hp_drain_rate: f64,
    /// `OverallDifficulty`.
    pub overall_difficulty: f64,
    /// `ApproachRate`, unused by mania.
    pub approach_rate: f64,
    /// `SliderMultiplier`.
    pub slider_multiplier: f64,
    /// `SliderTickRate`.
    pub slider_tick_rate: f64,
}

impl Default for DifficultyDefaults {
    fn default() -> Self {
        Self {
            hp_drain_rate: 8.0,
            overall_difficulty: 8.0,
            approach_rate: 5.0,
            slider_multiplier: 1.4,
            slider_tick_rate: 1.0,
        }
    }
}

/// Builds the lines of the header sections.
///
/// The last line belongs to `[Events]`; no blank line follows it.
#[must_use]
pub fn build_header(info: &HeaderInfo, difficulty: &DifficultyDefaults) -> Vec<String> {
    let mut lines = vec![
        FORMAT_VERSION_LINE.to_string(),
        String::new(),
        "[General]".into(),
        format!("AudioFilename: {}", info.audio_filename),
        "AudioLeadIn: 0".into(),
        format!("PreviewTime: {}", info.preview_ms),
        "Countdown: 0".into(),
        "SampleSet: Soft".into(),
        "StackLeniency: 0.7".into(),
        "Mode: 3".into(),
        "LetterboxInBreaks: 0".into(),
        "SpecialStyle: 0".into(),
        "WidescreenStoryboard: 0".into(),
        String::new(),
        "[Editor]".into(),
        "DistanceSpacing: 1.2".into(),
        "BeatDivisor: 4".into(),
        "GridSize: 8".into(),
        "TimelineZoom: 2.4".into(),
        String::new(),
        "[Metadata]".into(),
        format!("Title:{}", info.title),
        format!("TitleUnicode:{}", info.title_unicode),
        format!("Artist:{}", info.artist),
        format!("ArtistUnicode:{}", info.artist_unicode),
        format!("Creator:{}", info.creator),
        format!("Version:{}", info.version),
        "Source:Malody".into(),
        "Tags:Malody Convert".into(),
        "BeatmapID:0".into(),
        "BeatmapSetID:-1".into(),
        String::new(),
        "[Difficulty]".into(),
        format!("HPDrainRate:{}", difficulty.hp_drain_rate),
        format!("CircleSize:{}", info.key_count),
        format!("OverallDifficulty:{}", difficulty.overall_difficulty),
        format!("ApproachRate:{}", difficulty.approach_rate),
        format!("SliderMultiplier:{}", difficulty.slider_multiplier),
        format!("SliderTickRate:{}", difficulty.slider_tick_rate),
        String::new(),
        "[Events]".into(),
        "//Background and Video events".into(),
    ];
    if let Some(background) = info.background.as_deref().filter(|bg| !bg.is_empty()) {
        lines.push(format!("0,0,\"{background}\",0,0"));
    }
    lines
}
