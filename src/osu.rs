//! The [osu! file format](https://osu.ppy.sh/wiki/en/Client/File_formats/osu_%28file_format%29)
//! (`.osu`) output, restricted to the mania mode.
//!
//! A beatmap is a text file of sections. The header sections (`[General]` through `[Events]`)
//! are plain `key: value` lines built by [`header`]. The `[TimingPoints]` and `[HitObjects]`
//! sections are comma separated records built by [`timing_points`] and [`hit_objects`].
//!
//! All the times are kept as `f64` milliseconds until they are written, where they are truncated
//! toward zero.

use std::fmt;

pub mod header;
pub mod hit_objects;
pub mod timing_points;

pub use self::{
    header::{DifficultyDefaults, HeaderInfo},
    hit_objects::{HitObject, HitObjectKind},
    timing_points::TimingPoint,
};

/// First line of every output file.
pub const FORMAT_VERSION_LINE: &str = "osu file format v14";

/// Width of the osu! playfield, which mania lanes are spread over.
pub const PLAYFIELD_WIDTH: u32 = 512;

/// Truncates milliseconds toward zero for writing.
#[must_use]
pub fn truncate_ms(time_ms: f64) -> i64 {
    time_ms.trunc() as i64
}

/// A whole osu!mania beatmap ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct OsuBeatmap {
    /// Lines from the format version through the `[Events]` section.
    pub header: Vec<String>,
    /// Records of the `[TimingPoints]` section.
    pub timing_points: Vec<TimingPoint>,
    /// Records of the `[HitObjects]` section.
    pub hit_objects: Vec<HitObject>,
}

impl OsuBeatmap {
    /// Renders the beatmap into the text of a `.osu` file.
    ///
    /// Sections are separated by a blank line, lines end with `\n` and the text ends with a
    /// newline.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OsuBeatmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.header {
            writeln!(f, "{line}")?;
        }
        f.write_str("\n[TimingPoints]\n")?;
        for point in &self.timing_points {
            writeln!(f, "{point}")?;
        }
        f.write_str("\n[HitObjects]\n")?;
        for object in &self.hit_objects {
            writeln!(f, "{object}")?;
        }
        Ok(())
    }
}
