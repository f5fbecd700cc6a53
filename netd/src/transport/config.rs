//! Connection parameters handed to a [`Connector`](super::Connector).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Remote shell protocol selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Ssh,
    Telnet,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Ssh => "ssh",
            Protocol::Telnet => "telnet",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "ssh" => Ok(Protocol::Ssh),
            "telnet" => Ok(Protocol::Telnet),
            other => Err(other.to_string()),
        }
    }
}

/// Where and as whom to connect.
#[derive(Debug)]
pub struct Target {
    /// Target host (hostname or IP address).
    pub host: String,

    /// Management port (default: 22).
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Authentication method.
    pub auth: AuthMethod,

    /// Transport protocol.
    pub protocol: Protocol,
}

impl Target {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Authentication method for the management session.
#[derive(Debug)]
pub enum AuthMethod {
    /// No authentication (for testing only).
    None,

    /// Password authentication.
    Password(SecretString),

    /// Private key authentication.
    PrivateKey {
        /// Path to the private key file.
        path: PathBuf,
        /// Optional passphrase for encrypted keys.
        passphrase: Option<SecretString>,
    },
}

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default)]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys.
    Strict,

    /// Accept and auto-learn unknown keys, but reject changed keys.
    #[default]
    AcceptNew,

    /// Accept all keys without checking. For testing and lab use only.
    Disabled,
}

/// Options for the SSH connector, shared by every session it opens.
#[derive(Debug, Clone)]
pub struct SshOptions {
    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// Path to known_hosts file. Defaults to the user's.
    pub known_hosts_path: Option<PathBuf>,

    /// Drop the connection after this long without traffic.
    pub inactivity_timeout: Duration,
}

impl Default for SshOptions {
    fn default() -> Self {
        Self {
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            inactivity_timeout: Duration::from_secs(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_parse() {
        assert_eq!("SSH".parse::<Protocol>(), Ok(Protocol::Ssh));
        assert_eq!("".parse::<Protocol>(), Ok(Protocol::Ssh));
        assert_eq!("telnet".parse::<Protocol>(), Ok(Protocol::Telnet));
        assert_eq!("serial".parse::<Protocol>(), Err("serial".to_string()));
    }

    #[test]
    fn test_password_is_redacted() {
        let target = Target {
            host: "192.0.2.1".into(),
            port: 22,
            username: "admin".into(),
            auth: AuthMethod::Password(SecretString::from("r00tme")),
            protocol: Protocol::Ssh,
        };
        assert_eq!(target.socket_addr(), "192.0.2.1:22");
        assert!(!format!("{target:?}").contains("r00tme"));
    }
}
