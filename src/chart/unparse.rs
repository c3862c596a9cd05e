//! Renders a [`Chart`] as chart text.
//!
//! ```text
//! 0:
//! 1,<bpm>;
//!
//! 1:
//! 3,1,
//! <lane>,<node codes>,
//! <lane>,<node codes>;
//!
//! 2:
//! <lane>,<node codes>;
//!
//! ```
//!
//! Block `0` declares the tempo, and bar `N` is written as block `N + 1`. The first bar
//! block also carries the `3,1` control record. Records are separated by `,` and a line
//! feed, and the last record of a block is closed by `;` instead. The game reads this
//! byte by byte, so the layout must not change.

use std::fmt;

use itertools::Itertools;

use super::{Chart, EMPTY_NODE_CODE, Track};

/// Control record written at the top of bar 0.
pub const CONTROL_RECORD: &str = "3,1";

/// Key of the tempo record in the preamble.
pub const BPM_RECORD_KEY: &str = "1";

impl Chart {
    /// Concatenated node codes of a track, one code for every node of the bar.
    #[must_use]
    pub fn node_codes(&self, track: &Track) -> String {
        (0..self.nodes_per_bar)
            .map(|node| track.get(&node).map_or(EMPTY_NODE_CODE, |action| action.code()))
            .collect()
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0:\n{BPM_RECORD_KEY},{};\n\n", self.bpm)?;
        for (index, bar) in self.bars() {
            writeln!(f, "{}:", u64::from(index) + 1)?;
            let control = (index == 0).then(|| CONTROL_RECORD.to_owned());
            let tracks = bar
                .tracks()
                .map(|(lane, track)| format!("{lane},{}", self.node_codes(track)));
            write!(f, "{};\n\n", control.into_iter().chain(tracks).format(",\n"))?;
        }
        Ok(())
    }
}
