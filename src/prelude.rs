//! Prelude module for this crate.
//!
//! This module re-exports all public types for convenient access.
//! You can use `use mania2invaxion::prelude::*;` to import them at once.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{ToAriadne, emit_chart_parse_error};

pub use crate::{
    beatmap::{Beatmap, HitEvent, InvalidBeatmap, TempoPoint},
    chart::{
        Bar, Chart, EMPTY_NODE_CODE, NoteAction, QuantizedEvent, Track,
        parse::{ChartParseError, ChartParseErrorKind},
        unparse::{BPM_RECORD_KEY, CONTROL_RECORD},
    },
    convert::{
        ChartOutput, ConvertError, ConvertOutput, ConvertWarning, QuantizeOutput, Transcoder,
        convert,
    },
    diagnostics::SimpleSource,
    grid::{BEATS_PER_BAR, ChartPos, Grid, OffGrid},
    lane::{KeyMode, LaneId, SOURCE_WIDTH},
};
