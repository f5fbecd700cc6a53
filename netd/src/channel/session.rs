//! Live interactive session bounded by one request-wide deadline.

use std::ops::Range;
use std::time::Duration;

use bytes::Bytes;
use log::{debug, trace};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::{Instant, timeout_at};

use super::buffer::PatternBuffer;
use super::patterns::PatternSet;
use crate::error::{ChannelError, Result};
use crate::platform::Pager;
use crate::transport::Shell;

/// Why a boundary read stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Boundary {
    /// A boundary pattern matched at the tail of the output.
    Prompt {
        /// Everything read since the previous boundary.
        data: Bytes,
        /// Where the matched prompt sits inside `data`.
        prompt: Range<usize>,
    },

    /// An error signature matched.
    Error {
        /// Everything read since the previous boundary.
        data: Bytes,
        /// Source of the signature that matched.
        pattern: String,
    },
}

/// An open shell plus the state of one execution: accumulated output and
/// the deadline every blocking operation is measured against.
pub struct LiveSession {
    shell: Shell,
    buffer: PatternBuffer,
    chunk: Vec<u8>,
    deadline: Instant,
    budget: Duration,
}

impl LiveSession {
    /// Wrap `shell`. `budget` is the whole request's timeout and is only
    /// used to report errors; `deadline` is what reads are bounded by.
    pub fn new(
        shell: Shell,
        deadline: Instant,
        budget: Duration,
        search_depth: usize,
        chunk_size: usize,
    ) -> Self {
        Self {
            shell,
            buffer: PatternBuffer::new(search_depth),
            chunk: vec![0; chunk_size.max(1)],
            deadline,
            budget,
        }
    }

    /// Time left before the deadline.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Write `input` followed by `line_break`.
    pub async fn send(&mut self, input: &str, line_break: &str, hidden: bool) -> Result<()> {
        if hidden {
            debug!("send: <hidden>");
        } else {
            debug!("send: {:?}", input);
        }
        let mut bytes = Vec::with_capacity(input.len() + line_break.len());
        bytes.extend_from_slice(input.as_bytes());
        bytes.extend_from_slice(line_break.as_bytes());
        self.write(&bytes).await
    }

    /// Read until a pattern of `boundary` matches the tail of the output, or
    /// a pattern of `errors` matches anywhere in it.
    ///
    /// Error signatures are tested first, so output carrying both a
    /// diagnostic and the next prompt is classified as an error. A pager
    /// prompt is cut out of the output and answered with its reply.
    pub async fn read_until(
        &mut self,
        boundary: &PatternSet,
        errors: Option<&PatternSet>,
        pager: Option<&Pager>,
    ) -> Result<Boundary> {
        loop {
            let n = self.read_chunk().await?;
            self.buffer.extend(&self.chunk[..n]);
            trace!("read {} bytes, buffered {}", n, self.buffer.len());

            if let Some(errors) = errors {
                if let Some(m) = self.buffer.search_new(errors) {
                    let pattern = errors.pattern_str(m.index).unwrap_or_default().to_string();
                    debug!("error signature matched: {:?}", pattern);
                    return Ok(Boundary::Error {
                        data: self.buffer.take(),
                        pattern,
                    });
                }
            }

            if let Some(prompt) = self.buffer.search_tail(boundary) {
                return Ok(Boundary::Prompt {
                    data: self.buffer.take(),
                    prompt,
                });
            }

            if let Some(pager) = pager {
                if let Some(range) = self.buffer.search_tail(&pager.pattern) {
                    trace!("pager at {:?}", range);
                    self.buffer.remove(range);
                    self.write(pager.reply.as_bytes()).await?;
                }
            }
        }
    }

    /// Shut the shell down.
    pub async fn close(self) {
        if let Err(e) = self.shell.close().await {
            debug!("shell close failed: {}", e);
        }
    }

    fn check_deadline(&self) -> Result<()> {
        if Instant::now() >= self.deadline {
            return Err(ChannelError::Timeout(self.budget).into());
        }
        Ok(())
    }

    async fn read_chunk(&mut self) -> Result<usize> {
        self.check_deadline()?;
        let n = timeout_at(self.deadline, self.shell.reader().read(&mut self.chunk))
            .await
            .map_err(|_| ChannelError::Timeout(self.budget))?
            .map_err(ChannelError::Io)?;
        if n == 0 {
            return Err(ChannelError::Closed.into());
        }
        Ok(n)
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_deadline()?;
        let (deadline, budget) = (self.deadline, self.budget);
        let writer = self.shell.writer();
        timeout_at(deadline, async {
            writer.write_all(bytes).await?;
            writer.flush().await
        })
        .await
        .map_err(|_| ChannelError::Timeout(budget))?
        .map_err(ChannelError::Io)?;
        Ok(())
    }
}

impl std::fmt::Debug for LiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSession")
            .field("buffer", &self.buffer)
            .field("remaining", &self.remaining())
            .finish()
    }
}
