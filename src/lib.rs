//! Converter from 4/6/8-key mania beatmaps into the bar/track/node chart text of INVAXION.
//!
//! # Usage
//!
//! A source format parser fills a [`beatmap::Beatmap`], then [`convert::convert`] turns it
//! into chart text and the audio offset the game needs to play it:
//!
//! ```
//! use mania2invaxion::prelude::*;
//!
//! let beatmap = Beatmap {
//!     key_count: 4,
//!     beat_divisor: 4,
//!     tempo_points: vec![TempoPoint::new(0, 500.0)],
//!     hit_events: vec![HitEvent::tap(64, 0), HitEvent::hold(448, 500, 1000)],
//! };
//! let ConvertOutput {
//!     chart_text,
//!     audio_fill_ms,
//!     warnings,
//! } = convert(&beatmap).expect("beatmap has a tempo point");
//! assert!(chart_text.starts_with("0:\n1,120;\n\n1:\n3,1,\n"));
//! assert_eq!(audio_fill_ms, 125);
//! assert!(warnings.is_empty());
//! ```
//!
//! # Features
//!
//! - For supporting [serde](https://crates.io/crates/serde), enable feature `serde`. The
//!   beatmap model, chart positions and the conversion output become (de)serializable.
//! - `diagnostics` (default) renders chart text errors with
//!   [ariadne](https://crates.io/crates/ariadne).
//!
//! # Conversion policy
//!
//! The produced text must match what the game accepts byte for byte, so a few rules of the
//! game's own converter are kept as they are:
//!
//! - Only the first tempo point is used. Tempo changes are not followed.
//! - Notes are always shifted by at least one node, even if the first beat is at 0 ms.
//! - A key count other than 4, 6 or 8 is converted as 4 keys.
//! - When two notes land on the same node of a lane, the first one wins.
//!
//! Anything the conversion drops or replaces is reported in [`convert::ConvertOutput::warnings`].

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod beatmap;
pub mod chart;
pub mod convert;
pub mod diagnostics;
pub mod grid;
pub mod lane;
pub mod prelude;
