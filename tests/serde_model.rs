//! Tests for the `serde` feature.

use mania2invaxion::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_beatmap_from_json() {
    let json = r#"{
        "key_count": 4,
        "beat_divisor": 4,
        "tempo_points": [{ "offset_ms": 0, "ms_per_beat": 500.0 }],
        "hit_events": [
            { "lane_x": 64, "start_ms": 500 },
            { "lane_x": 192, "start_ms": 1000, "end_ms": 1500 }
        ]
    }"#;
    let beatmap: Beatmap = serde_json::from_str(json).expect("valid beatmap json");
    assert_eq!(
        beatmap,
        Beatmap {
            key_count: 4,
            beat_divisor: 4,
            tempo_points: vec![TempoPoint::new(0, 500.0)],
            hit_events: vec![HitEvent::tap(64, 500), HitEvent::hold(192, 1000, 1500)],
        }
    );
}

#[test]
fn test_output_to_json() {
    let beatmap = Beatmap {
        key_count: 5,
        beat_divisor: 1,
        tempo_points: vec![TempoPoint::new(0, 1000.0)],
        hit_events: vec![],
    };
    let output = convert(&beatmap).expect("valid beatmap");
    let value = serde_json::to_value(&output).expect("serializable output");
    assert_eq!(
        value,
        serde_json::json!({
            "chart_text": "0:\n1,60;\n\n1:\n3,1;\n\n",
            "audio_fill_ms": 1000,
            "warnings": [{ "UnsupportedKeyCount": 5 }],
        })
    );
}
