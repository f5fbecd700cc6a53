//! Accumulating output buffer with tail-search for boundary patterns.
//!
//! Device output arrives in arbitrary chunks. Every chunk is fed through a
//! VT parser (so escape sequences split across reads are still removed) and
//! appended to the buffer; after each append the caller tests the buffer
//! against the active pattern sets.
//!
//! Prompts are only searched in the last `search_depth` bytes, since a prompt
//! is recognized at the tail of fresh output. Error signatures can appear
//! anywhere, so they are searched over the bytes not yet scanned plus an
//! overlap of `search_depth` bytes, which catches a signature split between
//! two reads without rescanning large outputs from the start.

use std::fmt;
use std::ops::Range;

use bytes::{BufMut, Bytes, BytesMut};
use vte::{Parser, Perform};

use super::patterns::{PatternSet, SetMatch};

/// Buffer for accumulating output and searching it for boundary patterns.
pub struct PatternBuffer {
    /// Cleaned output accumulated since the last boundary.
    buffer: BytesMut,

    /// VT parser; keeps state between chunks.
    parser: Parser,

    /// How many bytes from the end to search for prompts.
    search_depth: usize,

    /// Length of the buffer at the last error-signature scan.
    scanned: usize,
}

impl PatternBuffer {
    /// Create a new pattern buffer searching `search_depth` bytes back.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            parser: Parser::new(),
            search_depth,
            scanned: 0,
        }
    }

    /// Extend the buffer with raw device output, dropping escape sequences.
    pub fn extend(&mut self, data: &[u8]) {
        let mut printer = Printer(&mut self.buffer);
        self.parser.advance(&mut printer, data);
    }

    /// Search the tail of the buffer for any pattern of `set`.
    ///
    /// Returns the match range relative to the start of the full buffer.
    pub fn search_tail(&self, set: &PatternSet) -> Option<Range<usize>> {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        set.find_at(&self.buffer, start).map(|m| m.range)
    }

    /// Search the bytes appended since the previous call for any pattern of
    /// `set`, including an overlap of `search_depth` already-scanned bytes.
    pub fn search_new(&mut self, set: &PatternSet) -> Option<SetMatch> {
        let start = self.scanned.saturating_sub(self.search_depth);
        self.scanned = self.buffer.len();
        set.find_at(&self.buffer, start)
    }

    /// Cut `range` out of the buffer, keeping what follows it.
    pub fn remove(&mut self, range: Range<usize>) {
        let tail = self.buffer.split_off(range.end);
        self.buffer.truncate(range.start);
        self.buffer.unsplit(tail);
        self.scanned = self.scanned.min(range.start);
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> Bytes {
        self.scanned = 0;
        self.buffer.split().freeze()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("len", &self.buffer.len())
            .field("search_depth", &self.search_depth)
            .field("scanned", &self.scanned)
            .finish()
    }
}

/// Keeps printable text and line control characters.
struct Printer<'a>(&'a mut BytesMut);

impl Perform for Printer<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.0.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.0.put_u8(byte);
        }
    }
}
