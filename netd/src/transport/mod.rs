//! Transport collaborators.
//!
//! The session executor never speaks SSH or Telnet itself. It asks a
//! [`Connector`] for a [`Connection`], asks the connection for an
//! interactive [`Shell`] shaped by the operator's [`ShellRequest`], and
//! closes both when the request ends.

pub mod config;
mod ssh;

#[cfg(test)]
pub(crate) mod mock;

use std::future::Future;
use std::io;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

pub use config::{AuthMethod, HostKeyVerification, Protocol, SshOptions, Target};
pub use ssh::{SshConnection, SshConnector};

use crate::error::Result;

/// Opens connections to devices.
pub trait Connector: Send + Sync {
    type Connection: Connection;

    /// Connect to `target` and authenticate.
    fn connect(&self, target: &Target) -> impl Future<Output = Result<Self::Connection>> + Send;
}

/// A live, authenticated connection to one device.
pub trait Connection: Send {
    /// Open the interactive shell described by `request`.
    fn open_shell(
        &mut self,
        request: &ShellRequest,
    ) -> impl Future<Output = Result<Shell>> + Send;

    /// Close the connection. Consumes it, so it can only happen once.
    fn close(self) -> impl Future<Output = Result<()>> + Send;
}

/// How an operator wants its interactive shell set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellRequest {
    /// Plain shell, no terminal allocated.
    Plain,

    /// Shell on a pseudo-terminal.
    Pty { term: String, width: u32, height: u32 },
}

impl ShellRequest {
    pub fn pty(width: u32, height: u32) -> Self {
        ShellRequest::Pty {
            term: "vt100".to_string(),
            width,
            height,
        }
    }
}

impl Default for ShellRequest {
    fn default() -> Self {
        Self::pty(511, 24)
    }
}

/// Readable and writable halves of an interactive shell.
pub struct Shell {
    reader: Box<dyn AsyncRead + Send + Unpin>,
    writer: Box<dyn AsyncWrite + Send + Unpin>,
}

impl Shell {
    pub fn new(
        reader: impl AsyncRead + Send + Unpin + 'static,
        writer: impl AsyncWrite + Send + Unpin + 'static,
    ) -> Self {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
        }
    }

    /// Build a shell from one bidirectional stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        Self::new(reader, writer)
    }

    pub(crate) fn reader(&mut self) -> &mut (dyn AsyncRead + Send + Unpin) {
        &mut *self.reader
    }

    pub(crate) fn writer(&mut self) -> &mut (dyn AsyncWrite + Send + Unpin) {
        &mut *self.writer
    }

    /// Shut down the write side, signalling end of input to the device.
    pub async fn close(mut self) -> io::Result<()> {
        self.writer.shutdown().await
    }
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell").finish_non_exhaustive()
    }
}
