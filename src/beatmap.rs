//! Source beatmap model.
//!
//! These types are the boundary to the source format parser: it fills a [`Beatmap`] and
//! hands it to [`crate::convert`]. Nothing here is modified by the conversion.

use thiserror::Error;

use crate::lane::KeyMode;

/// Reasons a beatmap cannot be placed on a chart grid.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum InvalidBeatmap {
    /// The beatmap has no timing point, so there is no tempo to build the grid from.
    #[error("beatmap has no tempo point")]
    NoTempoPoint,
    /// The beat length of the first timing point is not a positive finite number.
    #[error("beat length must be a positive finite number of milliseconds, got {0}")]
    InvalidBeatLength(f64),
    /// The beat divisor is zero.
    #[error("beat divisor must be at least 1")]
    ZeroBeatDivisor,
}

/// A timing point of the source beatmap.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoPoint {
    /// Time of the first beat governed by this point, in milliseconds.
    pub offset_ms: i64,
    /// Length of one beat in milliseconds.
    pub ms_per_beat: f64,
}

impl TempoPoint {
    /// Creates a new tempo point.
    #[must_use]
    pub const fn new(offset_ms: i64, ms_per_beat: f64) -> Self {
        Self {
            offset_ms,
            ms_per_beat,
        }
    }
}

/// A note of the source beatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitEvent {
    /// Horizontal coordinate in `0..512`, which selects the column.
    pub lane_x: i64,
    /// Hit time in milliseconds.
    pub start_ms: i64,
    /// Release time in milliseconds. Only long notes have this.
    #[cfg_attr(feature = "serde", serde(default))]
    pub end_ms: Option<i64>,
}

impl HitEvent {
    /// Creates a single note.
    #[must_use]
    pub const fn tap(lane_x: i64, start_ms: i64) -> Self {
        Self {
            lane_x,
            start_ms,
            end_ms: None,
        }
    }

    /// Creates a long note held from `start_ms` to `end_ms`.
    #[must_use]
    pub const fn hold(lane_x: i64, start_ms: i64, end_ms: i64) -> Self {
        Self {
            lane_x,
            start_ms,
            end_ms: Some(end_ms),
        }
    }
}

/// A parsed source beatmap.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Beatmap {
    /// Declared number of keys. Expected to be 4, 6 or 8.
    pub key_count: u32,
    /// Subdivisions per beat used by the editor grid.
    pub beat_divisor: u32,
    /// Timing points in file order. Only the first one is used for conversion.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tempo_points: Vec<TempoPoint>,
    /// Notes in file order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hit_events: Vec<HitEvent>,
}

impl Beatmap {
    /// The key mode declared by this beatmap, if it is supported.
    #[must_use]
    pub const fn key_mode(&self) -> Option<KeyMode> {
        KeyMode::from_key_count(self.key_count)
    }

    /// The timing point that fixes the grid of the whole chart.
    #[must_use]
    pub fn first_tempo_point(&self) -> Option<&TempoPoint> {
        self.tempo_points.first()
    }
}
