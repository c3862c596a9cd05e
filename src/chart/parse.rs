//! Reads chart text back into a [`Chart`].
//!
//! The reader accepts what [`super::unparse`] writes, plus `\r\n` line ends and blank lines
//! between records. Every error carries the byte range of the text it complains about.

use std::ops::Range;

use thiserror::Error;

use super::{Chart, EMPTY_NODE_CODE, NoteAction, QuantizedEvent};
use crate::{
    chart::unparse::{BPM_RECORD_KEY, CONTROL_RECORD},
    grid::ChartPos,
    lane::LaneId,
};

/// Kinds of [`ChartParseError`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum ChartParseErrorKind {
    /// The text does not start with the `0:` block declaring the tempo.
    #[error("expected the `0:` tempo block at the start of the chart")]
    MissingPreamble,
    /// A block does not start with `<number>:`.
    #[error("expected a block label like `1:`, found `{0}`")]
    InvalidLabel(String),
    /// Block labels must increase.
    #[error("block {found} must come after block {previous}")]
    LabelNotIncreasing {
        /// Label of the block before.
        previous: u32,
        /// Label of the offending block.
        found: u32,
    },
    /// A record is not `<key>,<value>`, or the key is unknown in this block.
    #[error("invalid record `{0}`")]
    InvalidRecord(String),
    /// The tempo is not an integer.
    #[error("invalid tempo `{0}`")]
    InvalidBpm(String),
    /// A track record has a lane id out of range.
    #[error("invalid lane `{0}`")]
    InvalidLane(String),
    /// Node codes are two digits each.
    #[error("node codes must have an even number of digits, found {0}")]
    OddNodeDigits(usize),
    /// A node code is not one of `00`, `11`, `31` and `41`.
    #[error("unknown node code `{0}`")]
    InvalidNodeCode(String),
    /// All tracks of a chart have the same number of nodes.
    #[error("expected {expected} nodes in the track, found {found}")]
    NodeCountMismatch {
        /// Node count of the first track in the chart.
        expected: u32,
        /// Node count of the offending track.
        found: u32,
    },
    /// The text ends inside a block.
    #[error("block is not closed by `;`")]
    UnterminatedBlock,
}

/// An error occurred while reading chart text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{kind} at {}..{}", .range.start, .range.end)]
pub struct ChartParseError {
    /// What went wrong.
    pub kind: ChartParseErrorKind,
    /// Byte range of the offending text in the source.
    pub range: Range<usize>,
}

impl ChartParseError {
    const fn new(kind: ChartParseErrorKind, range: Range<usize>) -> Self {
        Self { kind, range }
    }
}

/// A trimmed piece of the source and where it is.
#[derive(Debug, Clone)]
struct Spanned<'a> {
    text: &'a str,
    range: Range<usize>,
}

impl<'a> Spanned<'a> {
    fn trimmed(raw: &'a str, start: usize) -> Self {
        let text = raw.trim();
        let lead = raw.len() - raw.trim_start().len();
        Self {
            text,
            range: start + lead..start + lead + text.len(),
        }
    }

    /// A sub-slice of this piece, `at` bytes from its start.
    fn slice(&self, text: &'a str, at: usize) -> Self {
        let start = self.range.start + at;
        Self {
            text,
            range: start..start + text.len(),
        }
    }

    fn error(&self, kind: ChartParseErrorKind) -> ChartParseError {
        ChartParseError::new(kind, self.range.clone())
    }
}

/// A `<label>:` line followed by its records, up to `;`.
#[derive(Debug)]
struct Block<'a> {
    label_line: Spanned<'a>,
    label: u32,
    records: Vec<Spanned<'a>>,
}

/// Splits the source into blocks.
struct Blocks<'a> {
    source: &'a str,
    index: usize,
}

impl<'a> Blocks<'a> {
    const fn new(source: &'a str) -> Self {
        Self { source, index: 0 }
    }
}

fn parse_block(body: &str, start: usize) -> Result<Block<'_>, ChartParseError> {
    let mut offset = start;
    let mut lines = body
        .split('\n')
        .map(|raw| {
            let line = Spanned::trimmed(raw, offset);
            offset += raw.len() + 1;
            line
        })
        .filter(|line| !line.text.is_empty());

    let label_line = lines.next().ok_or_else(|| {
        ChartParseError::new(
            ChartParseErrorKind::InvalidLabel(String::new()),
            start..start + body.len(),
        )
    })?;
    let label = label_line
        .text
        .strip_suffix(':')
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| {
            label_line.error(ChartParseErrorKind::InvalidLabel(
                label_line.text.to_owned(),
            ))
        })?;

    Ok(Block {
        label_line,
        label,
        records: lines
            .map(|line| {
                let text = line.text.strip_suffix(',').unwrap_or(line.text);
                line.slice(text, 0)
            })
            .collect(),
    })
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Result<Block<'a>, ChartParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.source.get(self.index..)?;
        if rest.trim().is_empty() {
            return None;
        }
        let start = self.index;
        let Some(end) = rest.find(';') else {
            self.index = self.source.len();
            let tail = Spanned::trimmed(rest, start);
            return Some(Err(tail.error(ChartParseErrorKind::UnterminatedBlock)));
        };
        self.index += end + 1;
        Some(parse_block(&rest[..end], start))
    }
}

/// A `<key>,<value>` record.
fn split_record<'a>(record: &Spanned<'a>) -> Result<(Spanned<'a>, Spanned<'a>), ChartParseError> {
    let (key, value) = record.text.split_once(',').ok_or_else(|| {
        record.error(ChartParseErrorKind::InvalidRecord(record.text.to_owned()))
    })?;
    Ok((record.slice(key, 0), record.slice(value, key.len() + 1)))
}

fn parse_preamble(block: &Block<'_>) -> Result<i64, ChartParseError> {
    if block.label != 0 {
        return Err(block.label_line.error(ChartParseErrorKind::MissingPreamble));
    }
    let mut bpm = None;
    for record in &block.records {
        let (key, value) = split_record(record)?;
        if key.text != BPM_RECORD_KEY || bpm.is_some() {
            return Err(record.error(ChartParseErrorKind::InvalidRecord(record.text.to_owned())));
        }
        bpm = Some(
            value
                .text
                .parse()
                .map_err(|_| value.error(ChartParseErrorKind::InvalidBpm(value.text.to_owned())))?,
        );
    }
    bpm.ok_or_else(|| block.label_line.error(ChartParseErrorKind::MissingPreamble))
}

/// Node count of the chart, fixed by the first track record.
#[derive(Debug, Default)]
struct NodeWidth(Option<u32>);

impl NodeWidth {
    fn check(&mut self, value: &Spanned<'_>) -> Result<u32, ChartParseError> {
        if value.text.len() % 2 != 0 {
            return Err(value.error(ChartParseErrorKind::OddNodeDigits(value.text.len())));
        }
        let found = u32::try_from(value.text.len() / 2).map_err(|_| {
            value.error(ChartParseErrorKind::NodeCountMismatch {
                expected: self.0.unwrap_or_default(),
                found: u32::MAX,
            })
        })?;
        match self.0 {
            Some(expected) if expected != found => {
                Err(value.error(ChartParseErrorKind::NodeCountMismatch { expected, found }))
            }
            Some(_) => Ok(found),
            None => {
                self.0 = Some(found);
                Ok(found)
            }
        }
    }
}

fn parse_track(
    bar: u32,
    lane: &Spanned<'_>,
    codes: &Spanned<'_>,
    width: &mut NodeWidth,
    events: &mut Vec<QuantizedEvent>,
) -> Result<(), ChartParseError> {
    let lane_id = lane
        .text
        .parse()
        .map(LaneId)
        .map_err(|_| lane.error(ChartParseErrorKind::InvalidLane(lane.text.to_owned())))?;
    let node_count = width.check(codes)?;
    for node in 0..node_count {
        let at = node as usize * 2;
        let Some(code) = codes.text.get(at..at + 2) else {
            // Not on a char boundary, so not two ASCII digits either.
            return Err(codes.error(ChartParseErrorKind::InvalidNodeCode(codes.text.to_owned())));
        };
        if code == EMPTY_NODE_CODE {
            continue;
        }
        let action = NoteAction::from_code(code).ok_or_else(|| {
            codes
                .slice(code, at)
                .error(ChartParseErrorKind::InvalidNodeCode(code.to_owned()))
        })?;
        events.push(QuantizedEvent {
            lane: lane_id,
            action,
            pos: ChartPos::new(bar, node),
        });
    }
    Ok(())
}

impl Chart {
    /// Reads chart text.
    ///
    /// The node count per bar is taken from the first track record, and is `0` when the text
    /// has no track at all. Notes on an already taken node are ignored, as in
    /// [`Chart::insert`].
    ///
    /// # Errors
    ///
    /// Returns the first syntax error found in `source`.
    pub fn parse(source: &str) -> Result<Self, ChartParseError> {
        let mut blocks = Blocks::new(source);
        let preamble = blocks.next().transpose()?.ok_or_else(|| {
            ChartParseError::new(ChartParseErrorKind::MissingPreamble, 0..source.len())
        })?;
        let bpm = parse_preamble(&preamble)?;

        let mut width = NodeWidth::default();
        let mut events = Vec::new();
        let mut previous = preamble.label;
        for block in blocks {
            let block = block?;
            if block.label <= previous {
                return Err(block
                    .label_line
                    .error(ChartParseErrorKind::LabelNotIncreasing {
                        previous,
                        found: block.label,
                    }));
            }
            previous = block.label;
            let bar = block.label - 1;

            for record in &block.records {
                if record.text == CONTROL_RECORD {
                    continue;
                }
                let (lane, codes) = split_record(record)?;
                parse_track(bar, &lane, &codes, &mut width, &mut events)?;
            }
        }

        let mut chart = Self::new(bpm, width.0.unwrap_or_default());
        chart.extend(events);
        Ok(chart)
    }
}
