//! # lyx-html
//!
//! A converter from the LyX document format to HTML.
//!
//! The conversion runs in three phases: the line grammar in [`lyx::parsing`] builds a
//! tree of containers, the [`lyx::assembling`] stages number, group and link them,
//! and [`lyx::formats::html`] serializes the result.
//!
//! ## Testing
//!
//! Helpers for building LyX sources in tests live in the [testing module](lyx::testing).

pub mod lyx;
