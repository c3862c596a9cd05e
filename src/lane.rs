//! Key modes of the source beatmap and the lane table of the target chart.
//!
//! The source format places every note on a horizontal coordinate in `0..512`, split into
//! equally wide columns. The target chart addresses its tracks by fixed numeric ids instead,
//! so each column is looked up in a constant table row chosen by the [`KeyMode`].

use std::fmt;

/// Width of the source column space. Note coordinates are expected in `0..SOURCE_WIDTH`.
pub const SOURCE_WIDTH: i64 = 512;

/// Lane ids for 4-key charts, from left to right.
const LANES_4K: [LaneId; 4] = [LaneId(11), LaneId(12), LaneId(15), LaneId(16)];
/// Lane ids for 6-key charts, from left to right.
const LANES_6K: [LaneId; 6] = [
    LaneId(27),
    LaneId(11),
    LaneId(12),
    LaneId(15),
    LaneId(16),
    LaneId(29),
];
/// Lane ids for 8-key charts, from left to right.
const LANES_8K: [LaneId; 8] = [
    LaneId(27),
    LaneId(11),
    LaneId(12),
    LaneId(13),
    LaneId(14),
    LaneId(15),
    LaneId(16),
    LaneId(29),
];

/// Identifier of a track in the target chart, such as `11` or `29`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneId(pub u8);

impl LaneId {
    /// Gets the numeric id.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Layout of the source beatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyMode {
    /// 4 keys. Also used for every unsupported key count.
    #[default]
    Four,
    /// 6 keys.
    Six,
    /// 8 keys.
    Eight,
}

impl KeyMode {
    /// Picks the mode for the key count declared by a beatmap.
    ///
    /// Returns `None` for counts other than 4, 6 and 8. Callers that follow the target game's
    /// behavior fall back to [`KeyMode::Four`] in that case.
    #[must_use]
    pub const fn from_key_count(key_count: u32) -> Option<Self> {
        match key_count {
            4 => Some(Self::Four),
            6 => Some(Self::Six),
            8 => Some(Self::Eight),
            _ => None,
        }
    }

    /// Number of columns in this mode.
    #[must_use]
    pub const fn lane_count(self) -> usize {
        self.lanes().len()
    }

    /// Width of one column in source coordinates.
    #[must_use]
    pub const fn column_width(self) -> i64 {
        SOURCE_WIDTH / self.lane_count() as i64
    }

    /// The target lane ids of this mode, ordered by source column.
    #[must_use]
    pub const fn lanes(self) -> &'static [LaneId] {
        match self {
            Self::Four => &LANES_4K,
            Self::Six => &LANES_6K,
            Self::Eight => &LANES_8K,
        }
    }

    /// Maps a source coordinate to its target lane.
    ///
    /// Returns `None` when the coordinate is outside `0..SOURCE_WIDTH`.
    #[must_use]
    pub fn lane_for(self, lane_x: i64) -> Option<LaneId> {
        if !(0..SOURCE_WIDTH).contains(&lane_x) {
            return None;
        }
        let column = (lane_x / self.column_width()) as usize;
        // 512 is not a multiple of 6, so the rightmost 6K column is two coordinates wider.
        self.lanes()
            .get(column.min(self.lane_count() - 1))
            .copied()
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K", self.lane_count())
    }
}
