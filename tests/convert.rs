//! Tests for converting beatmaps into chart text.

use mania2invaxion::prelude::*;
use pretty_assertions::assert_eq;

/// A beatmap at 120 bpm starting at 0 ms, with 16 nodes per bar.
fn beatmap(key_count: u32, hit_events: Vec<HitEvent>) -> Beatmap {
    Beatmap {
        key_count,
        beat_divisor: 4,
        tempo_points: vec![TempoPoint::new(0, 500.0)],
        hit_events,
    }
}

/// Node codes of a track with `nodes` nodes and the given notes.
fn track_with(nodes: usize, notes: &[(usize, NoteAction)]) -> String {
    (0..nodes)
        .map(|node| {
            notes
                .iter()
                .find(|(at, _)| *at == node)
                .map_or(EMPTY_NODE_CODE, |(_, action)| action.code())
        })
        .collect()
}

/// Lane records of the chart text, without the preamble and control records.
fn lane_records(text: &str) -> Vec<&str> {
    text.lines()
        .skip(2)
        .filter(|line| line.contains(','))
        .filter(|line| !line.starts_with(CONTROL_RECORD))
        .collect()
}

#[test]
fn test_single_tap() {
    let output = convert(&beatmap(4, vec![HitEvent::tap(64, 500)])).expect("valid beatmap");
    assert_eq!(
        output.chart_text,
        format!(
            "0:\n1,120;\n\n1:\n3,1,\n11,{};\n\n",
            track_with(16, &[(5, NoteAction::Tap)])
        )
    );
    assert_eq!(output.audio_fill_ms, 125);
    assert_eq!(output.warnings, vec![]);
}

#[test]
fn test_empty_beatmap_has_header() {
    let output = convert(&beatmap(4, vec![])).expect("valid beatmap");
    assert_eq!(output.chart_text, "0:\n1,120;\n\n1:\n3,1;\n\n");
    assert_eq!(output.audio_fill_ms, 125);
}

#[test]
fn test_hold_across_bars() {
    let output =
        convert(&beatmap(4, vec![HitEvent::hold(448, 1500, 2500)])).expect("valid beatmap");
    assert_eq!(
        output.chart_text,
        format!(
            "0:\n1,120;\n\n1:\n3,1,\n16,{};\n\n2:\n16,{};\n\n",
            track_with(16, &[(13, NoteAction::HoldStart)]),
            track_with(16, &[(5, NoteAction::HoldEnd)]),
        )
    );
}

#[test]
fn test_hold_start_before_end() {
    let output = convert(&beatmap(
        8,
        vec![HitEvent::hold(32, 0, 250), HitEvent::hold(480, 250, 500)],
    ))
    .expect("valid beatmap");
    let first = format!(
        "27,{},",
        track_with(16, &[(1, NoteAction::HoldStart), (3, NoteAction::HoldEnd)])
    );
    let second = format!(
        "29,{};",
        track_with(16, &[(3, NoteAction::HoldStart), (5, NoteAction::HoldEnd)])
    );
    assert_eq!(lane_records(&output.chart_text), vec![first, second]);
}

#[test]
fn test_offset_grid_six_keys() {
    let beatmap = Beatmap {
        key_count: 6,
        beat_divisor: 4,
        tempo_points: vec![TempoPoint::new(1000, 500.0)],
        hit_events: vec![HitEvent::tap(0, 1000), HitEvent::tap(511, 2000)],
    };
    let output = convert(&beatmap).expect("valid beatmap");
    assert_eq!(
        output.chart_text,
        format!(
            "0:\n1,120;\n\n1:\n3,1,\n27,{};\n\n2:\n29,{};\n\n",
            track_with(16, &[(9, NoteAction::Tap)]),
            track_with(16, &[(1, NoteAction::Tap)]),
        )
    );
    assert_eq!(output.audio_fill_ms, 125);
}

#[test]
fn test_lanes_and_bars_are_sorted() {
    let output = convert(&beatmap(
        4,
        vec![
            HitEvent::tap(192, 2000),
            HitEvent::tap(448, 0),
            HitEvent::tap(64, 0),
        ],
    ))
    .expect("valid beatmap");
    let tap = track_with(16, &[(1, NoteAction::Tap)]);
    assert_eq!(
        output.chart_text,
        format!("0:\n1,120;\n\n1:\n3,1,\n11,{tap},\n16,{tap};\n\n2:\n12,{tap};\n\n")
    );
}

#[test]
fn test_node_width_follows_divisor() {
    for (beat_divisor, nodes) in [(1, 4), (3, 12), (8, 32)] {
        let beatmap = Beatmap {
            beat_divisor,
            ..beatmap(4, vec![HitEvent::tap(64, 0), HitEvent::tap(320, 4000)])
        };
        let output = convert(&beatmap).expect("valid beatmap");
        let records = lane_records(&output.chart_text);
        assert_eq!(records.len(), 2, "divisor {beat_divisor}");
        for record in records {
            let codes = record
                .split_once(',')
                .map(|(_, codes)| codes.trim_end_matches([',', ';']))
                .unwrap_or_default();
            assert_eq!(codes.len(), nodes * 2, "divisor {beat_divisor}: {record}");
        }
    }
}

#[test]
fn test_deterministic() {
    let beatmap = beatmap(
        8,
        (0..64)
            .map(|i| HitEvent::tap((i % 8) * 64 + 32, i * 137))
            .collect(),
    );
    let first = convert(&beatmap).expect("valid beatmap");
    let second = convert(&beatmap).expect("valid beatmap");
    assert_eq!(first, second);
}

#[test]
fn test_collision_reported() {
    let output = convert(&beatmap(
        4,
        vec![HitEvent::tap(64, 500), HitEvent::tap(100, 510)],
    ))
    .expect("valid beatmap");
    assert_eq!(
        lane_records(&output.chart_text),
        vec![format!("11,{};", track_with(16, &[(5, NoteAction::Tap)]))]
    );
    assert_eq!(
        output.warnings,
        vec![ConvertWarning::NodeCollision {
            lane: LaneId(11),
            action: NoteAction::Tap,
            pos: ChartPos::new(0, 5),
        }]
    );
}

#[test]
fn test_missing_tempo_point() {
    let beatmap = Beatmap {
        key_count: 4,
        beat_divisor: 4,
        tempo_points: vec![],
        hit_events: vec![HitEvent::tap(64, 0)],
    };
    let err = convert(&beatmap).expect_err("no tempo point");
    assert_eq!(err, ConvertError::InvalidBeatmap(InvalidBeatmap::NoTempoPoint));
    assert_eq!(
        err.to_string(),
        "invalid beatmap: beatmap has no tempo point"
    );
}

#[test]
fn test_zero_divisor() {
    let beatmap = Beatmap {
        beat_divisor: 0,
        ..beatmap(4, vec![])
    };
    assert_eq!(
        convert(&beatmap),
        Err(ConvertError::InvalidBeatmap(InvalidBeatmap::ZeroBeatDivisor))
    );
}

#[test]
fn test_text_reads_back_as_chart() {
    let beatmap = beatmap(
        6,
        vec![
            HitEvent::tap(40, 0),
            HitEvent::hold(200, 750, 3250),
            HitEvent::tap(500, 6000),
        ],
    );
    let transcoder = Transcoder::new(&beatmap).expect("valid beatmap");
    let ChartOutput { chart, warnings } = transcoder.chart();
    assert_eq!(warnings, vec![]);
    let text = transcoder.convert().chart_text;
    assert_eq!(Chart::parse(&text).expect("valid chart"), chart);
}

#[test]
fn test_empty_chart_reads_back() {
    let beatmap = beatmap(4, vec![]);
    let transcoder = Transcoder::new(&beatmap).expect("valid beatmap");
    let ChartOutput { chart, .. } = transcoder.chart();
    assert_eq!(chart.nodes_per_bar(), 16);
    let parsed = Chart::parse(&chart.to_string()).expect("valid chart");
    // The text has no track, so the node count cannot be read back.
    assert_eq!(parsed.nodes_per_bar(), 0);
    assert_eq!(parsed, chart);
}

#[test]
fn test_lane_out_of_range_keeps_other_notes() {
    let output = convert(&beatmap(
        4,
        vec![
            HitEvent::tap(64, 0),
            HitEvent::tap(192, 0),
            HitEvent::tap(512, 0),
        ],
    ))
    .expect("valid beatmap");
    let tap = track_with(16, &[(1, NoteAction::Tap)]);
    assert_eq!(
        output.chart_text,
        format!("0:\n1,120;\n\n1:\n3,1,\n11,{tap},\n12,{tap};\n\n")
    );
    assert_eq!(
        output.warnings,
        vec![ConvertWarning::LaneOutOfRange {
            lane_x: 512,
            key_mode: KeyMode::Four,
        }]
    );
}

#[test]
fn test_negative_offset_reports_unaddressable_node() {
    let beatmap = Beatmap {
        tempo_points: vec![TempoPoint::new(-1000, 500.0)],
        ..beatmap(4, vec![HitEvent::hold(448, 1500, 2500)])
    };
    let output = convert(&beatmap).expect("valid beatmap");
    assert_eq!(
        output.chart_text,
        format!(
            "0:\n1,120;\n\n1:\n3,1;\n\n2:\n16,{};\n\n",
            track_with(16, &[(5, NoteAction::HoldEnd)])
        )
    );
    assert_eq!(
        output.warnings,
        vec![ConvertWarning::Unplaced {
            lane: LaneId(16),
            action: NoteAction::HoldStart,
            time_ms: 1500,
            reason: OffGrid::NegativeNode { bar: 1, node: -3 },
        }]
    );
}
