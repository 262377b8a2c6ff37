#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::cargo)]
#![warn(
    clippy::nursery,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::module_name_repetitions, clippy::significant_drop_tightening)]

//! Decodes Retrosheet play-by-play notation into structured event records.
//!
//! The decoder itself lives in [`event_file::play`] and its siblings and performs no I/O.
//! The remaining modules read event, roster and team files and map them to output rows.

pub mod event_file;
pub mod util;

pub use event_file::event_detail::EventDetail;
