//! Quantization grid of the target chart.
//!
//! The target chart has no notion of time: a bar is split into `beat_divisor * 4` nodes of
//! equal length, and the first tempo point of the source beatmap fixes that length for the
//! whole chart. Times are snapped to the nearest node, then shifted by a fixed number of
//! nodes ("fill") so that the chart can start before the first beat of the song.

use num::Integer;
use thiserror::Error;

use crate::beatmap::{InvalidBeatmap, TempoPoint};

/// Beats in one bar of the target chart.
pub const BEATS_PER_BAR: u32 = 4;

/// Address of a node in the target chart.
///
/// Ordered by bar, then by node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartPos {
    /// Bar index, starting with 0.
    pub bar: u32,
    /// Node index within the bar, in `0..nodes_per_bar`.
    pub node: u32,
}

impl ChartPos {
    /// Creates a new position.
    #[must_use]
    pub const fn new(bar: u32, node: u32) -> Self {
        Self { bar, node }
    }
}

/// Why a time has no node on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum OffGrid {
    /// The shifted position is before bar 0.
    #[error("it is before the start of the chart")]
    BeforeChartStart,
    /// A negative fill left the node index below zero in a later bar. The shift never
    /// borrows from the bar, so the node cannot be written.
    #[error("node {node} of bar {bar} cannot be addressed")]
    NegativeNode {
        /// Bar index after the shift.
        bar: u32,
        /// Node index after the shift, below zero.
        node: i64,
    },
    /// The position does not fit in the chart address space.
    #[error("it is too far from the start of the chart")]
    TooFar,
}

/// Grid parameters derived from the first tempo point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    offset_ms: i64,
    ms_per_divisor: f64,
    nodes_per_bar: u32,
    bpm: i64,
    fill_node: i64,
    fill_remainder_ms: f64,
}

impl Grid {
    /// Derives the grid from a tempo point and the beat divisor of the beatmap.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBeatmap::InvalidBeatLength`] if the beat length is not a positive
    /// finite number, and [`InvalidBeatmap::ZeroBeatDivisor`] if `beat_divisor` is zero.
    pub fn new(tempo: &TempoPoint, beat_divisor: u32) -> Result<Self, InvalidBeatmap> {
        if !(tempo.ms_per_beat.is_finite() && tempo.ms_per_beat > 0.0) {
            return Err(InvalidBeatmap::InvalidBeatLength(tempo.ms_per_beat));
        }
        if beat_divisor == 0 {
            return Err(InvalidBeatmap::ZeroBeatDivisor);
        }

        let ms_per_divisor = tempo.ms_per_beat / f64::from(beat_divisor);
        let offset = tempo.offset_ms as f64;

        // Truncating division and remainder, so that a negative offset behaves like the
        // game's own converter.
        let mut fill_node = (offset / ms_per_divisor).trunc() as i64;
        let fill_remainder_ms = ms_per_divisor - offset % ms_per_divisor;
        if fill_remainder_ms > 0.0 {
            fill_node += 1;
        }

        Ok(Self {
            offset_ms: tempo.offset_ms,
            ms_per_divisor,
            nodes_per_bar: beat_divisor.saturating_mul(BEATS_PER_BAR),
            bpm: (60_000.0 / tempo.ms_per_beat).trunc() as i64,
            fill_node,
            fill_remainder_ms,
        })
    }

    /// Time of the first beat, in milliseconds. Event times are measured from here.
    #[must_use]
    pub const fn offset_ms(&self) -> i64 {
        self.offset_ms
    }

    /// Length of one node in milliseconds.
    #[must_use]
    pub const fn ms_per_divisor(&self) -> f64 {
        self.ms_per_divisor
    }

    /// Number of nodes in every bar.
    #[must_use]
    pub const fn nodes_per_bar(&self) -> u32 {
        self.nodes_per_bar
    }

    /// Tempo declared in the chart preamble, truncated to an integer.
    #[must_use]
    pub const fn bpm(&self) -> i64 {
        self.bpm
    }

    /// Number of nodes every event is shifted by.
    #[must_use]
    pub const fn fill_node(&self) -> i64 {
        self.fill_node
    }

    /// Milliseconds of silence the player must insert before the audio, so that the audio
    /// lines up with the shifted nodes.
    #[must_use]
    pub fn audio_fill_ms(&self) -> i64 {
        self.fill_remainder_ms.round_ties_even() as i64
    }

    /// Snaps a time, relative to [`Grid::offset_ms`], onto the node grid.
    ///
    /// # Errors
    ///
    /// Returns the reason when the shifted position has no node in the chart.
    pub fn calc_index(&self, time_ms: i64) -> Result<ChartPos, OffGrid> {
        let nodes_per_bar = i64::from(self.nodes_per_bar);
        let divisor_units = (time_ms as f64 / self.ms_per_divisor).round_ties_even() as i64;
        let (mut bar, mut node) = divisor_units.div_rem(&nodes_per_bar);

        node = node.checked_add(self.fill_node).ok_or(OffGrid::TooFar)?;
        bar = bar
            .checked_add(node / nodes_per_bar)
            .ok_or(OffGrid::TooFar)?;
        node %= nodes_per_bar;

        if bar < 0 || (bar == 0 && node < 0) {
            return Err(OffGrid::BeforeChartStart);
        }
        let bar = u32::try_from(bar).map_err(|_| OffGrid::TooFar)?;
        let node = u32::try_from(node).map_err(|_| OffGrid::NegativeNode { bar, node })?;
        Ok(ChartPos { bar, node })
    }
}
