//! Conversion from a source [`Beatmap`] into target chart text.
//!
//! The conversion runs in stages, each of them available on [`Transcoder`]:
//!
//! 1. [`Transcoder::new`] checks the beatmap and derives the [`Grid`] from its first tempo
//!    point.
//! 2. [`Transcoder::quantize`] maps every note to a lane and snaps it onto the grid.
//! 3. [`Transcoder::chart`] assembles the quantized events into a [`Chart`].
//! 4. [`Transcoder::convert`] renders the chart as text.
//!
//! Problems that do not stop the conversion are reported as [`ConvertWarning`]s. They never
//! change the produced chart.

use thiserror::Error;

use crate::{
    beatmap::{Beatmap, HitEvent, InvalidBeatmap},
    chart::{Chart, NoteAction, QuantizedEvent},
    grid::{ChartPos, Grid, OffGrid},
    lane::{KeyMode, LaneId},
};

/// An error that stops the conversion.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The beatmap has no usable grid.
    #[error("invalid beatmap: {0}")]
    InvalidBeatmap(#[from] InvalidBeatmap),
}

/// A problem found during conversion. The affected note is left out, or a default is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ConvertWarning {
    /// The key count is not 4, 6 or 8, and the 4K lanes were used.
    #[error("key count {0} is not supported, using 4K lanes")]
    UnsupportedKeyCount(u32),
    /// A note is outside the columns of the key mode, and was dropped.
    #[error("note at x = {lane_x} is outside the {key_mode} columns")]
    LaneOutOfRange {
        /// Source coordinate of the note.
        lane_x: i64,
        /// Key mode used to pick the lane.
        key_mode: KeyMode,
    },
    /// A note has no node on the grid, and was dropped.
    #[error("{action:?} on lane {lane} at {time_ms} ms was dropped: {reason}")]
    Unplaced {
        /// Target lane of the note.
        lane: LaneId,
        /// The part of the note that was dropped.
        action: NoteAction,
        /// Source time of the note.
        time_ms: i64,
        /// Why the note has no node.
        reason: OffGrid,
    },
    /// A note landed on a node already taken on the same lane, and was dropped.
    #[error("{action:?} on lane {lane} collides at bar {} node {}", .pos.bar, .pos.node)]
    NodeCollision {
        /// Lane of the collision.
        lane: LaneId,
        /// The dropped action.
        action: NoteAction,
        /// Position of the collision.
        pos: ChartPos,
    },
}

/// Output of [`Transcoder::quantize`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct QuantizeOutput {
    /// Events in the order of the source notes. The start of a long note comes right before
    /// its end.
    pub events: Vec<QuantizedEvent>,
    /// Warnings that occurred during quantization.
    pub warnings: Vec<ConvertWarning>,
}

/// Output of [`Transcoder::chart`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ChartOutput {
    /// The assembled chart.
    pub chart: Chart,
    /// Warnings that occurred during quantization and assembly.
    pub warnings: Vec<ConvertWarning>,
}

/// Output of the conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct ConvertOutput {
    /// The chart text to hand to the game.
    pub chart_text: String,
    /// Milliseconds of silence to put before the audio, so that it lines up with the chart.
    pub audio_fill_ms: i64,
    /// Warnings that occurred during the conversion.
    pub warnings: Vec<ConvertWarning>,
}

/// Converts one beatmap.
#[derive(Debug, Clone)]
pub struct Transcoder<'a> {
    beatmap: &'a Beatmap,
    key_mode: KeyMode,
    grid: Grid,
}

impl<'a> Transcoder<'a> {
    /// Prepares the conversion of `beatmap`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidBeatmap`] if the beatmap has no tempo point, or if its
    /// first tempo point and beat divisor do not make a grid.
    pub fn new(beatmap: &'a Beatmap) -> Result<Self, ConvertError> {
        let tempo = beatmap
            .first_tempo_point()
            .ok_or(InvalidBeatmap::NoTempoPoint)?;
        let grid = Grid::new(tempo, beatmap.beat_divisor)?;
        let key_mode = beatmap.key_mode().unwrap_or_default();
        log::debug!(
            "{key_mode} beatmap with {} notes: {} bpm, {} nodes per bar, {} ms per node, {} fill nodes",
            beatmap.hit_events.len(),
            grid.bpm(),
            grid.nodes_per_bar(),
            grid.ms_per_divisor(),
            grid.fill_node(),
        );
        Ok(Self {
            beatmap,
            key_mode,
            grid,
        })
    }

    /// The grid all notes are snapped onto.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The key mode lanes are picked by.
    #[must_use]
    pub const fn key_mode(&self) -> KeyMode {
        self.key_mode
    }

    fn place(
        &self,
        lane: LaneId,
        action: NoteAction,
        time_ms: i64,
    ) -> Result<QuantizedEvent, ConvertWarning> {
        self.grid
            .calc_index(time_ms.saturating_sub(self.grid.offset_ms()))
            .map(|pos| QuantizedEvent { lane, action, pos })
            .map_err(|reason| ConvertWarning::Unplaced {
                lane,
                action,
                time_ms,
                reason,
            })
    }

    /// Places one note on the grid. A long note gives its start and its end, each snapped
    /// on its own.
    fn quantize_event(&self, event: &HitEvent) -> Vec<Result<QuantizedEvent, ConvertWarning>> {
        let Some(lane) = self.key_mode.lane_for(event.lane_x) else {
            return vec![Err(ConvertWarning::LaneOutOfRange {
                lane_x: event.lane_x,
                key_mode: self.key_mode,
            })];
        };
        match event.end_ms {
            None => vec![self.place(lane, NoteAction::Tap, event.start_ms)],
            Some(end_ms) => vec![
                self.place(lane, NoteAction::HoldStart, event.start_ms),
                self.place(lane, NoteAction::HoldEnd, end_ms),
            ],
        }
    }

    /// Maps every note to a lane and snaps it onto the grid.
    pub fn quantize(&self) -> QuantizeOutput {
        let mut warnings = Vec::new();
        if self.beatmap.key_mode().is_none() {
            warnings.push(ConvertWarning::UnsupportedKeyCount(self.beatmap.key_count));
        }
        let mut events = Vec::with_capacity(self.beatmap.hit_events.len());
        for placed in self
            .beatmap
            .hit_events
            .iter()
            .flat_map(|event| self.quantize_event(event))
        {
            match placed {
                Ok(placed) => events.push(placed),
                Err(warning) => warnings.push(warning),
            }
        }
        QuantizeOutput { events, warnings }
    }

    /// Assembles the quantized notes into a chart. The first note on a node wins.
    pub fn chart(&self) -> ChartOutput {
        let QuantizeOutput { events, warnings } = self.quantize();
        let empty = Chart::new(self.grid.bpm(), self.grid.nodes_per_bar());
        let (chart, warnings) =
            events
                .into_iter()
                .fold((empty, warnings), |(mut chart, mut warnings), event| {
                    if !chart.insert(event) {
                        warnings.push(ConvertWarning::NodeCollision {
                            lane: event.lane,
                            action: event.action,
                            pos: event.pos,
                        });
                    }
                    (chart, warnings)
                });
        ChartOutput { chart, warnings }
    }

    /// Runs the whole conversion.
    pub fn convert(&self) -> ConvertOutput {
        let ChartOutput { chart, warnings } = self.chart();
        for warning in &warnings {
            log::warn!("{warning}");
        }
        ConvertOutput {
            chart_text: chart.to_string(),
            audio_fill_ms: self.grid.audio_fill_ms(),
            warnings,
        }
    }
}

/// Converts a beatmap into chart text.
///
/// # Example
///
/// ```
/// use mania2invaxion::{
///     beatmap::{Beatmap, HitEvent, TempoPoint},
///     convert::convert,
/// };
///
/// let beatmap = Beatmap {
///     key_count: 4,
///     beat_divisor: 4,
///     tempo_points: vec![TempoPoint::new(0, 500.0)],
///     hit_events: vec![HitEvent::tap(64, 500)],
/// };
/// let output = convert(&beatmap).expect("beatmap has a tempo point");
/// assert_eq!(
///     output.chart_text,
///     "0:\n1,120;\n\n1:\n3,1,\n11,00000000001100000000000000000000;\n\n"
/// );
/// assert_eq!(output.audio_fill_ms, 125);
/// ```
///
/// # Errors
///
/// See [`Transcoder::new`].
pub fn convert(beatmap: &Beatmap) -> Result<ConvertOutput, ConvertError> {
    Ok(Transcoder::new(beatmap)?.convert())
}
