//! Test diagnostics module functionality

#![cfg(feature = "diagnostics")]

use mania2invaxion::{
    chart::Chart,
    diagnostics::{SimpleSource, ToAriadne, chart_parse_report, emit_chart_parse_error},
};

#[test]
fn test_simple_source_creation() {
    let source_text = "0:\n1,120;\n\n1:\n3,1;\n\n";
    let source = SimpleSource::new("song.txt", source_text);

    assert_eq!(source.text(), source_text);
    assert_eq!(source.name(), "song.txt");
}

#[test]
fn test_report_of_parse_error() {
    let source = "0:\n1,120;\n\n1:\n11,0021;\n\n";
    let err = Chart::parse(source).expect_err("unknown node code");

    let mut rendered = Vec::new();
    chart_parse_report("song.txt", source, &err)
        .write(
            ("song.txt".to_string(), ariadne::Source::from(source)),
            &mut rendered,
        )
        .expect("write to Vec");
    let rendered = String::from_utf8_lossy(&rendered);
    assert!(rendered.contains("invalid chart text"), "{rendered}");
    assert!(rendered.contains("unknown node code `21`"), "{rendered}");
}

#[test]
fn test_report_of_empty_range() {
    // Nothing to point at in an empty source, but a report is still built.
    let err = Chart::parse("").expect_err("no preamble");
    let _report = err.to_report(&SimpleSource::new("empty.txt", ""));
}

#[test]
fn test_emit_parse_error() {
    let source = "0:\n1,fast;\n\n";
    let err = Chart::parse(source).expect_err("invalid tempo");
    emit_chart_parse_error("song.txt", source, &err);
}
