//! Prelude module for the converter.
//!
//! This module re-exports the commonly used types and functions, so that
//! `use malody2osu::prelude::*;` is enough to convert charts.

// Re-export diagnostics
#[cfg(feature = "diagnostics")]
#[cfg_attr(docsrs, doc(cfg(feature = "diagnostics")))]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_parse_error, render_parse_error};

// Re-export the conversion pipeline
pub use crate::{
    batch::{BatchReport, ChartError, collect_inputs, convert_batch, convert_file},
    convert::{ConvertConfig, ConvertError, ConvertOutput, convert_chart, default_config},
    malody::{
        Beat, BeatError, BeatPosition, ChartMode, EffectEvent, McChart, McParseError, Meta, Note,
        Song, TimingSegment,
        anchor::{SoundAnchor, extract_sound_anchor},
        parse_mc,
    },
    osu::{
        DifficultyDefaults, HeaderInfo, OsuBeatmap,
        hit_objects::{HitObject, HitObjectKind},
        timing_points::TimingPoint,
    },
    timing::{SegmentIndex, TimeMapper, TimingError},
};
