//! Rendering of chart parse errors.

#![cfg(feature = "diagnostics")]

use malody2osu::{
    diagnostics::{SimpleSource, ToAriadne, emit_parse_error, render_parse_error},
    malody::parse_mc,
};

const BROKEN: &str = include_str!("files/broken.mc");

#[test]
fn simple_source_drops_bom() {
    let source = SimpleSource::new("chart.mc", "\u{feff}{}");
    assert_eq!(source.text(), "{}");
    assert_eq!(source.name(), "chart.mc");
}

#[test]
fn report_points_at_bad_field() {
    let err = parse_mc(BROKEN).unwrap_err();
    // `"mode": "key"` is on the fourth line.
    assert_eq!(err.line_column().0, 4);
    let rendered = render_parse_error("broken.mc", BROKEN, &err);
    assert!(rendered.contains("broken.mc"), "{rendered}");
    assert!(rendered.contains("meta.mode"), "{rendered}");
    assert!(rendered.contains("\"key\""), "{rendered}");
}

#[test]
fn trailing_characters_are_reported() {
    let source = "{\"meta\": {\"creator\": \"a\", \"version\": \"b\", \"mode\": 0, \"song\": {\"title\": \"t\", \"artist\": \"a\"}}} x";
    let err = parse_mc(source).unwrap_err();
    let report = err.to_report(&SimpleSource::new("trailing.mc", source));
    let mut out = Vec::new();
    report
        .write(("trailing.mc".to_string(), ariadne::Source::from(source)), &mut out)
        .unwrap();
    assert!(String::from_utf8_lossy(&out).contains("trailing characters"));
}

#[test]
fn emit_does_not_panic() {
    let err = parse_mc(BROKEN).unwrap_err();
    emit_parse_error("broken.mc", BROKEN, &err);
}
