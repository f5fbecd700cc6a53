//! Scripted connector for executor tests.

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use tokio::io::AsyncWrite;
use tokio_test::io::Mock;

use super::{Connection, Connector, Shell, ShellRequest, Target};
use crate::error::{ChannelError, Result, TransportError};

/// Hands out one scripted [`Mock`] stream per connection.
#[derive(Default)]
pub(crate) struct MockConnector {
    scripts: Mutex<VecDeque<Mock>>,
    refuse_connect: bool,
    refuse_shell: bool,
    hang_connect: bool,
    stall_shell_close: bool,
    connects: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    shell_requests: Arc<Mutex<Vec<ShellRequest>>>,
}

impl MockConnector {
    pub(crate) fn new(scripts: impl IntoIterator<Item = Mock>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            ..Default::default()
        }
    }

    pub(crate) fn refusing_connect() -> Self {
        Self {
            refuse_connect: true,
            ..Default::default()
        }
    }

    pub(crate) fn refusing_shell() -> Self {
        Self {
            refuse_shell: true,
            ..Default::default()
        }
    }

    /// A connector whose connect never completes.
    pub(crate) fn hanging_connect() -> Self {
        Self {
            hang_connect: true,
            ..Default::default()
        }
    }

    /// Shells from this connector never finish shutting down.
    pub(crate) fn stalling_shell_close(mut self) -> Self {
        self.stall_shell_close = true;
        self
    }

    pub(crate) fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn shell_requests(&self) -> Vec<ShellRequest> {
        self.shell_requests.lock().unwrap().clone()
    }
}

impl Connector for MockConnector {
    type Connection = MockConnection;

    async fn connect(&self, target: &Target) -> Result<MockConnection> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.hang_connect {
            std::future::pending::<()>().await;
        }
        if self.refuse_connect {
            return Err(TransportError::ConnectionFailed {
                host: target.host.clone(),
                port: target.port,
                source: std::io::ErrorKind::ConnectionRefused.into(),
            }
            .into());
        }
        let script = if self.refuse_shell {
            None
        } else {
            self.scripts.lock().unwrap().pop_front()
        };
        Ok(MockConnection {
            script,
            stall_shell_close: self.stall_shell_close,
            closes: self.closes.clone(),
            shell_requests: self.shell_requests.clone(),
        })
    }
}

pub(crate) struct MockConnection {
    script: Option<Mock>,
    stall_shell_close: bool,
    closes: Arc<AtomicUsize>,
    shell_requests: Arc<Mutex<Vec<ShellRequest>>>,
}

impl Connection for MockConnection {
    async fn open_shell(&mut self, request: &ShellRequest) -> Result<Shell> {
        self.shell_requests.lock().unwrap().push(request.clone());
        let script = self
            .script
            .take()
            .ok_or_else(|| ChannelError::ShellRequestFailed("rejected by mock".into()))?;
        if self.stall_shell_close {
            let (reader, writer) = tokio::io::split(script);
            return Ok(Shell::new(reader, StallingShutdown(writer)));
        }
        Ok(Shell::from_stream(script))
    }

    async fn close(self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Writer whose shutdown never completes, like a device that stopped
/// acknowledging the channel close.
struct StallingShutdown<W>(W);

impl<W: AsyncWrite + Unpin> AsyncWrite for StallingShutdown<W> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.0).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.0).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Pending
    }
}
