//! Wire shapes exchanged with the RPC front.
//!
//! The transport carrying them (JSON-RPC or otherwise) is up to the
//! integrator; these types only fix the field names and encoding.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::driver::{SessionRequest, SessionResult};
use crate::error::{ChannelError, DriverError, Error, PlatformError, Result};
use crate::transport::Protocol;

/// Credentials of the management login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Auth {
    pub username: String,
    pub password: String,
}

/// Inbound request: run `commands` on one device, in `mode`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliRequest {
    /// Caller's name for the device; only used in logs.
    pub device: String,
    pub vendor: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Firmware version. Informational, not used for operator selection.
    pub version: String,
    /// `host` or `host:port`; IPv6 hosts with a port are bracketed.
    pub address: String,
    pub auth: Auth,
    pub enable_pwd: String,
    pub commands: Vec<String>,
    /// `ssh` (default) or `telnet`.
    pub protocol: String,
    /// Target mode; empty means the operator's start mode.
    pub mode: String,
    /// Whole-request budget in seconds; 0 means the default.
    pub timeout: u64,
}

/// Outbound response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliResponse {
    pub retcode: RetCode,
    pub message: String,
    /// Captured output per command, aligned with the request's commands
    /// and cut short at the first failure.
    pub cmds_std: Vec<String>,
}

impl CliResponse {
    /// Response for a request that failed before any session was started.
    pub fn from_error(error: &Error) -> Self {
        Self {
            retcode: RetCode::from_error(error),
            message: error.to_string(),
            cmds_std: Vec::new(),
        }
    }
}

impl From<&SessionResult> for CliResponse {
    fn from(result: &SessionResult) -> Self {
        Self {
            retcode: result.retcode(),
            message: result.message(),
            cmds_std: result.stdout(),
        }
    }
}

/// Overall status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetCode {
    Ok,
    NoOperator,
    InvalidRequest,
    ConnectFailed,
    SessionInitFailed,
    UnsupportedMode,
    Timeout,
    TransitionFailed,
    CommandFailed,
    IoError,
}

impl RetCode {
    pub fn from_error(error: &Error) -> Self {
        if error.is_timeout() {
            return RetCode::Timeout;
        }
        match error {
            Error::Transport(_) => RetCode::ConnectFailed,
            Error::Channel(ChannelError::ShellRequestFailed(_)) => RetCode::SessionInitFailed,
            Error::Channel(_) => RetCode::IoError,
            Error::Driver(DriverError::UnknownMode { .. })
            | Error::Driver(DriverError::UnsupportedTransition { .. }) => RetCode::UnsupportedMode,
            Error::Driver(DriverError::TransitionRejected { .. }) => RetCode::TransitionFailed,
            Error::Driver(DriverError::CommandFailed { .. }) => RetCode::CommandFailed,
            Error::Driver(DriverError::InvalidRequest { .. }) => RetCode::InvalidRequest,
            Error::Platform(PlatformError::NoOperator { .. }) => RetCode::NoOperator,
            Error::Platform(_) => RetCode::InvalidRequest,
        }
    }
}

impl TryFrom<CliRequest> for SessionRequest {
    type Error = Error;

    fn try_from(request: CliRequest) -> Result<Self> {
        let invalid = |message: String| DriverError::InvalidRequest { message };

        let (host, port) = split_address(&request.address)
            .ok_or_else(|| invalid(format!("bad address '{}'", request.address)))?;
        let protocol: Protocol = request
            .protocol
            .parse()
            .map_err(|p| invalid(format!("unknown protocol '{p}'")))?;

        let mut builder = SessionRequest::builder(host)
            .port(port)
            .username(request.auth.username)
            .protocol(protocol)
            .mode(request.mode)
            .commands(request.commands);
        if !request.auth.password.is_empty() {
            builder = builder.password(request.auth.password);
        }
        if !request.enable_pwd.is_empty() {
            builder = builder.enable_password(request.enable_pwd);
        }
        if request.timeout > 0 {
            builder = builder.timeout(Duration::from_secs(request.timeout));
        }
        builder.build()
    }
}

/// Split `host[:port]`, defaulting the port to 22.
fn split_address(address: &str) -> Option<(String, u16)> {
    let address = address.trim();
    if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        let port = match tail {
            "" => 22,
            _ => tail.strip_prefix(':')?.parse().ok()?,
        };
        return Some((host.to_string(), port));
    }
    match address.rsplit_once(':') {
        // a second colon means a bare IPv6 address
        Some((host, port)) if !host.contains(':') => Some((host.to_string(), port.parse().ok()?)),
        _ => Some((address.to_string(), 22)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_request() {
        let json = r#"{
            "device": "juniper-srx-set-test",
            "vendor": "juniper",
            "type": "srx",
            "version": "6.0",
            "address": "192.168.1.252:22",
            "auth": {"username": "admin", "password": "r00tme"},
            "commands": ["set security address-book global address WS-100.2.2.46_32 wildcard-address 100.2.2.46/32", "commit"],
            "protocol": "ssh",
            "mode": "configure_private",
            "timeout": 30
        }"#;
        let request: CliRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.kind, "srx");
        assert_eq!(request.enable_pwd, "");

        let session = SessionRequest::try_from(request).unwrap();
        assert_eq!(session.target().host, "192.168.1.252");
        assert_eq!(session.target().port, 22);
        assert_eq!(session.target().username, "admin");
        assert_eq!(session.mode(), Some("configure_private"));
        assert_eq!(session.commands().len(), 2);
        assert_eq!(session.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_defaults_from_sparse_request() {
        let request: CliRequest = serde_json::from_str(
            r#"{"vendor": "cisco", "type": "asa", "address": "10.0.0.1", "auth": {"username": "admin"}}"#,
        )
        .unwrap();
        let session = SessionRequest::try_from(request).unwrap();
        assert_eq!(session.target().port, 22);
        assert_eq!(session.target().protocol, Protocol::Ssh);
        assert_eq!(session.mode(), None);
        assert_eq!(session.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_bad_requests() {
        let base = CliRequest {
            address: "10.0.0.1:22".into(),
            auth: Auth {
                username: "admin".into(),
                password: String::new(),
            },
            ..Default::default()
        };

        let bad_port = CliRequest {
            address: "10.0.0.1:ssh".into(),
            ..base.clone()
        };
        let bad_protocol = CliRequest {
            protocol: "serial".into(),
            ..base.clone()
        };
        for request in [bad_port, bad_protocol] {
            let err = SessionRequest::try_from(request).unwrap_err();
            assert_eq!(RetCode::from_error(&err), RetCode::InvalidRequest);
        }
    }

    #[test]
    fn test_split_address() {
        assert_eq!(split_address("fw1"), Some(("fw1".into(), 22)));
        assert_eq!(split_address("fw1:2222"), Some(("fw1".into(), 2222)));
        assert_eq!(split_address("[2001:db8::1]:830"), Some(("2001:db8::1".into(), 830)));
        assert_eq!(split_address("2001:db8::1"), Some(("2001:db8::1".into(), 22)));
        assert_eq!(split_address("[2001:db8::1"), None);
    }

    #[test]
    fn test_encode_response() {
        let response = CliResponse {
            retcode: RetCode::CommandFailed,
            message: "command 1: failed".into(),
            cmds_std: vec!["ok".into(), "% Invalid".into()],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["retcode"], "command_failed");
        assert_eq!(json["cmds_std"][1], "% Invalid");
    }
}
