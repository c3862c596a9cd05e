//! The bar/track/node chart structure of the target game.
//!
//! A [`Chart`] is sparse: it only holds bars and tracks that contain notes, except bar 0
//! which is always present so that the chart header is always emitted.
//!
//! - `unparse` renders a [`Chart`] as chart text, through [`std::fmt::Display`].
//! - `parse` reads chart text back into a [`Chart`].

pub mod parse;
pub mod unparse;

use std::collections::BTreeMap;

use crate::{grid::ChartPos, lane::LaneId};

/// Code of a node without a note.
pub const EMPTY_NODE_CODE: &str = "00";

/// What happens at a node of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteAction {
    /// A single note.
    Tap,
    /// Start of a long note.
    HoldStart,
    /// End of a long note.
    HoldEnd,
}

impl NoteAction {
    /// Two digit code of this action in chart text.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Tap => "11",
            Self::HoldStart => "31",
            Self::HoldEnd => "41",
        }
    }

    /// Reads an action from its code. [`EMPTY_NODE_CODE`] and unknown codes give `None`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "11" => Some(Self::Tap),
            "31" => Some(Self::HoldStart),
            "41" => Some(Self::HoldEnd),
            _ => None,
        }
    }
}

/// A note placed on the chart grid, before it is put into a [`Chart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantizedEvent {
    /// Target track.
    pub lane: LaneId,
    /// What to place.
    pub action: NoteAction,
    /// Where to place it.
    pub pos: ChartPos,
}

/// Nodes of one track in one bar, keyed by node index.
pub type Track = BTreeMap<u32, NoteAction>;

/// One bar of a [`Chart`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bar {
    tracks: BTreeMap<LaneId, Track>,
}

impl Bar {
    /// Tracks having at least one note, in ascending lane order.
    pub fn tracks(&self) -> impl Iterator<Item = (LaneId, &Track)> {
        self.tracks.iter().map(|(&lane, track)| (lane, track))
    }

    /// The track of `lane`, if it has any note in this bar.
    #[must_use]
    pub fn track(&self, lane: LaneId) -> Option<&Track> {
        self.tracks.get(&lane)
    }

    /// Whether this bar has no note.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// A chart of the target game.
///
/// Two charts are equal when they render the same text. The node count only shows through
/// tracks, so it is ignored while neither chart has a note.
#[derive(Debug, Clone)]
pub struct Chart {
    bpm: i64,
    nodes_per_bar: u32,
    bars: BTreeMap<u32, Bar>,
}

impl Chart {
    /// Creates a chart having only an empty bar 0.
    #[must_use]
    pub fn new(bpm: i64, nodes_per_bar: u32) -> Self {
        Self {
            bpm,
            nodes_per_bar,
            bars: BTreeMap::from([(0, Bar::default())]),
        }
    }

    /// Tempo written in the preamble.
    #[must_use]
    pub const fn bpm(&self) -> i64 {
        self.bpm
    }

    /// Number of nodes in every track of every bar.
    #[must_use]
    pub const fn nodes_per_bar(&self) -> u32 {
        self.nodes_per_bar
    }

    /// Bars in ascending order. Bar 0 is always the first item.
    pub fn bars(&self) -> impl Iterator<Item = (u32, &Bar)> {
        self.bars.iter().map(|(&index, bar)| (index, bar))
    }

    /// The bar at `index`, if it exists.
    #[must_use]
    pub fn bar(&self, index: u32) -> Option<&Bar> {
        self.bars.get(&index)
    }

    /// The action at `pos` of `lane`.
    #[must_use]
    pub fn get(&self, lane: LaneId, pos: ChartPos) -> Option<NoteAction> {
        self.bar(pos.bar)?.track(lane)?.get(&pos.node).copied()
    }

    /// Places an event.
    ///
    /// The first event placed on a node wins. Returns `false` and leaves the chart unchanged
    /// if the node is already taken, or if it is outside `0..nodes_per_bar`.
    pub fn insert(&mut self, event: QuantizedEvent) -> bool {
        let QuantizedEvent { lane, action, pos } = event;
        if pos.node >= self.nodes_per_bar {
            return false;
        }
        let track = self
            .bars
            .entry(pos.bar)
            .or_default()
            .tracks
            .entry(lane)
            .or_default();
        if track.contains_key(&pos.node) {
            return false;
        }
        track.insert(pos.node, action);
        true
    }

    /// All placed events, ordered by bar, lane and node.
    pub fn events(&self) -> impl Iterator<Item = QuantizedEvent> + '_ {
        self.bars().flat_map(|(bar, content)| {
            content.tracks().flat_map(move |(lane, track)| {
                track.iter().map(move |(&node, &action)| QuantizedEvent {
                    lane,
                    action,
                    pos: ChartPos::new(bar, node),
                })
            })
        })
    }
}

impl PartialEq for Chart {
    fn eq(&self, other: &Self) -> bool {
        self.bpm == other.bpm
            && self.bars == other.bars
            && (self.nodes_per_bar == other.nodes_per_bar || self.bars.values().all(Bar::is_empty))
    }
}

impl Eq for Chart {}

impl Extend<QuantizedEvent> for Chart {
    fn extend<T: IntoIterator<Item = QuantizedEvent>>(&mut self, iter: T) {
        for event in iter {
            self.insert(event);
        }
    }
}
