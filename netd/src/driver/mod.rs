//! Session execution.
//!
//! The driver layer turns a [`SessionRequest`] and an operator into a
//! [`SessionResult`]: it owns the connection for the duration of the
//! request, walks the operator's mode graph and runs the commands.

mod executor;
mod request;
mod response;

pub use executor::{Executor, ExecutorConfig};
pub use request::{SessionRequest, SessionRequestBuilder};
pub use response::{CommandOutput, Failure, SessionResult, Stage};
