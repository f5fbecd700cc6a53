//! Error types for netd.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for netd operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level errors (reaching and authenticating to the device)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Interactive shell errors (session init, reads, writes)
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Mode navigation and command execution errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Operator definition and resolution errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl Error {
    /// Whether the request budget ran out, at any stage.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Transport(TransportError::Timeout(_)) | Error::Channel(ChannelError::Timeout(_))
        )
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::Platform(PlatformError::InvalidPattern(e))
    }
}

/// Transport layer errors (connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host is not present in known_hosts (strict verification)
    #[error("Host key for {host}:{port} is not known")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// The connector does not speak the requested protocol
    #[error("Unsupported protocol '{0}'")]
    UnsupportedProtocol(String),

    /// Connection was not established within the request budget
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (shell setup, boundary reads).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The device refused the interactive shell
    #[error("Failed to request shell: {0}")]
    ShellRequestFailed(String),

    /// No boundary pattern matched before the request budget ran out
    #[error("Pattern not found within {0:?}")]
    Timeout(Duration),

    /// Remote side closed the shell
    #[error("Channel closed")]
    Closed,

    /// I/O error on the shell streams
    #[error("Channel I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Driver layer errors (mode navigation, command execution).
#[derive(Error, Debug)]
pub enum DriverError {
    /// The requested mode has no prompts on this operator
    #[error("Unknown mode '{mode}' for operator '{operator}'")]
    UnknownMode { operator: String, mode: String },

    /// No transition is declared for the (from, to) pair
    #[error("Unsupported mode transition '{from}' -> '{to}'")]
    UnsupportedTransition { from: String, to: String },

    /// An error signature matched while moving between modes
    #[error("Transition '{from}' -> '{to}' rejected at '{step}': matched '{pattern}'")]
    TransitionRejected {
        from: String,
        to: String,
        step: String,
        pattern: String,
    },

    /// An error signature matched a command's output
    #[error("Command {index} '{command}' failed: matched '{pattern}'")]
    CommandFailed {
        index: usize,
        command: String,
        pattern: String,
    },

    /// The request is malformed
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

/// Operator definition and registry errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Invalid operator definition
    #[error("Invalid operator definition: {message}")]
    InvalidDefinition { message: String },

    /// A boundary, error or selector pattern failed to compile
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// No registered operator matches the vendor/type selector
    #[error("No operator for '{selector}'")]
    NoOperator { selector: String },
}

/// Result type alias using netd's Error.
pub type Result<T> = std::result::Result<T, Error>;
