//! # netd
//!
//! Async driver for the interactive command shells of multi-vendor network
//! and security devices.
//!
//! Each vendor is described by an [`Operator`]: prompt patterns per mode,
//! the literal steps moving between modes, the signatures of a rejected
//! command. One [`Executor`] drives every vendor with the same algorithm:
//! connect, reach the requested mode, run the commands, report what
//! happened, close.
//!
//! ## Features
//!
//! - Async SSH sessions via russh, behind a [`Connector`] trait
//! - Built-in operators for Cisco, Juniper, Palo Alto, Huawei, H3C, DPtech,
//!   Fortinet, Hillstone and Topsec devices
//! - Efficient pattern buffer matching (tail search for prompts)
//! - One deadline for the whole request, teardown on every path
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netd::{Executor, Registry, SessionRequest, SshConnector};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netd::Error> {
//!     let registry = Registry::with_builtin_vendors()?;
//!     let operator = registry.resolve("cisco", "asa")?;
//!
//!     let request = SessionRequest::builder("192.168.1.1")
//!         .username("admin")
//!         .password("secret")
//!         .enable_password("secret")
//!         .mode("login_enable")
//!         .command("show version")
//!         .build()?;
//!
//!     let executor = Executor::new(SshConnector::default());
//!     let result = executor.run(&operator, &request).await;
//!     for output in &result.outputs {
//!         println!("{}", output);
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod handler;
pub mod platform;
pub mod protocol;
pub mod transport;

// Re-export main types for convenience
pub use driver::{CommandOutput, Executor, ExecutorConfig, SessionRequest, SessionResult};
pub use error::Error;
pub use handler::CliHandler;
pub use platform::{Operator, Registry, Step};
pub use protocol::{CliRequest, CliResponse, RetCode};
pub use transport::{Connection, Connector, Protocol, ShellRequest, SshConnector};
