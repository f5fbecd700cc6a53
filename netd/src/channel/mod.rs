//! Channel layer for pattern matching and live interactive sessions.
//!
//! This module handles reading device output up to a recognizable boundary
//! (prompt, error signature or pager) under a request-wide deadline.

mod buffer;
mod patterns;
mod session;

pub use buffer::PatternBuffer;
pub use patterns::{PatternSet, SetMatch, matches, matches_any};
pub use session::{Boundary, LiveSession};
