//! Markdown parsing for the mdcanvas compiler.
//!
//! This crate turns raw markdown into the typed inputs the layout engine
//! consumes:
//! - [`classify`]: separates diagram-description regions (fenced or
//!   heuristically inferred) from prose
//! - [`parse_blocks`]: converts prose into an ordered sequence of [`Block`]s
//! - [`segment_inlines`]: splits a block's text into text/image [`Segment`]s
//!
//! The classifier is a greedy line scanner with one line of lookahead, not a
//! grammar: text that merely resembles diagram syntax can be misclassified.
//! No input ever fails to parse; unclassifiable lines fall through to prose.

mod block;
mod classify;
mod inline;

pub use block::{Block, parse_blocks};
pub use classify::{Classified, DiagramRegion, classify};
pub use inline::{Segment, segment_inlines};
