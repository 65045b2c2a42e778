//! Converter from [Malody](https://malody.mugzone.net/) key-mode charts into osu!mania beatmaps.
//!
//! A Malody chart (`.mc`) is a JSON document whose notes and effects are placed in beats
//! (`[measure, numerator, denominator]`) over a list of BPM segments. An osu! beatmap (`.osu`)
//! is a section-based text file whose timing points and hit objects are placed in absolute
//! milliseconds. Most of the work here is the mapping between the two timelines.
//!
//! The crate is split into these modules:
//!
//! - [`malody`] provides the chart model, beat arithmetic and the sound anchor extraction.
//! - [`timing`] provides the timing segment index and the beat to millisecond mapper.
//! - [`osu`] provides the output model and the section builders.
//! - [`convert`] glues them into one conversion of a chart.
//! - [`batch`] discovers input files and writes the outputs atomically.
//! - `diagnostics` renders parse errors with `ariadne` (feature `diagnostics`).
//!
//! # Example
//!
//! ```
//! use malody2osu::{convert::{convert_chart, default_config}, malody::parse_mc};
//!
//! let source = r#"{
//!     "meta": {
//!         "creator": "someone",
//!         "version": "4K Easy",
//!         "mode": 0,
//!         "song": { "title": "Song", "artist": "Artist" },
//!         "mode_ext": { "column": 4 }
//!     },
//!     "time": [{ "beat": [0, 0, 1], "bpm": 120.0 }],
//!     "note": [
//!         { "beat": [0, 0, 1], "sound": "song.ogg", "offset": 0, "type": 1 },
//!         { "beat": [1, 0, 1], "column": 0 }
//!     ]
//! }"#;
//! let chart = parse_mc(source).unwrap();
//! let output = convert_chart(chart, &default_config()).unwrap();
//! assert_eq!(output.file_name, "Artist - Song [4K Easy].osu");
//! assert!(output.beatmap.render().contains("64,192,500,1,0,0:0:0:0:"));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod batch;
pub mod convert;
#[cfg(feature = "diagnostics")]
#[cfg_attr(docsrs, doc(cfg(feature = "diagnostics")))]
pub mod diagnostics;
pub mod malody;
pub mod osu;
pub mod prelude;
pub mod timing;
