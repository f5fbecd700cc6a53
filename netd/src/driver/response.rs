//! Results of a session execution.

use std::fmt;
use std::time::Duration;

use crate::error::Error;
use crate::protocol::RetCode;

/// Captured output of one caller command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// The command as supplied by the caller.
    pub command: String,

    /// The command output (normalized - command echo and trailing prompt removed).
    pub output: String,

    /// The raw output before normalization.
    pub raw_output: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,

    /// Error signature that matched, if the device rejected the command.
    pub failure: Option<String>,
}

impl CommandOutput {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.output)
    }
}

/// Where in the execution a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Operator lookup and request checks, before any I/O.
    Prepare,
    Connect,
    Shell,
    /// Reading the login banner up to the start mode's prompt.
    Banner,
    Transition,
    Command,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Prepare => "prepare",
            Stage::Connect => "connect",
            Stage::Shell => "shell",
            Stage::Banner => "banner",
            Stage::Transition => "transition",
            Stage::Command => "command",
        };
        f.write_str(name)
    }
}

/// Why an execution stopped early.
#[derive(Debug)]
pub struct Failure {
    pub stage: Stage,

    /// Index of the caller command being run, for [`Stage::Command`].
    pub command: Option<usize>,

    pub error: Error,
}

impl Failure {
    pub(crate) fn new(stage: Stage, error: impl Into<Error>) -> Self {
        Self {
            stage,
            command: None,
            error: error.into(),
        }
    }

    pub(crate) fn command(index: usize, error: impl Into<Error>) -> Self {
        Self {
            stage: Stage::Command,
            command: Some(index),
            error: error.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command {
            Some(index) => write!(f, "{} {}: {}", self.stage, index, self.error),
            None => write!(f, "{}: {}", self.stage, self.error),
        }
    }
}

/// Outcome of one execution.
///
/// `outputs` is aligned with the request's commands and stops at the
/// command that failed. A command rejected by the device is included, with
/// its diagnostic text; a command interrupted by a timeout or a closed
/// stream is not.
#[derive(Debug)]
pub struct SessionResult {
    pub outputs: Vec<CommandOutput>,
    pub failure: Option<Failure>,
    pub elapsed: Duration,
}

impl SessionResult {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Status code for the wire response.
    pub fn retcode(&self) -> RetCode {
        self.failure
            .as_ref()
            .map_or(RetCode::Ok, |f| RetCode::from_error(&f.error))
    }

    /// Human-readable status.
    pub fn message(&self) -> String {
        match &self.failure {
            Some(failure) => failure.to_string(),
            None => "OK".to_string(),
        }
    }

    /// Captured outputs in command order.
    pub fn stdout(&self) -> Vec<String> {
        self.outputs.iter().map(|o| o.output.clone()).collect()
    }
}
