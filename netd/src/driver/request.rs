//! Per-call session request and its builder.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{DriverError, Result};
use crate::transport::{AuthMethod, Protocol, Target};

/// Everything one execution needs besides the operator: where to connect,
/// as whom, which mode to reach and what to run there.
///
/// Immutable once built.
#[derive(Debug)]
pub struct SessionRequest {
    target: Target,
    enable_password: Option<SecretString>,
    mode: Option<String>,
    commands: Vec<String>,
    timeout: Duration,
}

impl SessionRequest {
    /// Start building a request for `host`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use netd::SessionRequest;
    ///
    /// let request = SessionRequest::builder("192.0.2.1")
    ///     .username("admin")
    ///     .password("secret")
    ///     .enable_password("enable-secret")
    ///     .mode("login_enable")
    ///     .command("show version")
    ///     .timeout(Duration::from_secs(60))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(request.commands(), ["show version"]);
    /// ```
    pub fn builder(host: impl Into<String>) -> SessionRequestBuilder {
        SessionRequestBuilder::new(host)
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Requested mode; `None` means the operator's start mode.
    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Budget for the whole request, connect included.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Enable password, or the empty string when none was supplied.
    pub(crate) fn enable_password(&self) -> &str {
        self.enable_password
            .as_ref()
            .map(|p| p.expose_secret())
            .unwrap_or_default()
    }
}

/// Builder for [`SessionRequest`].
pub struct SessionRequestBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: AuthMethod,
    enable_password: Option<SecretString>,
    protocol: Protocol,
    mode: Option<String>,
    commands: Vec<String>,
    timeout: Duration,
}

impl SessionRequestBuilder {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            auth: AuthMethod::None,
            enable_password: None,
            protocol: Protocol::default(),
            mode: None,
            commands: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the management port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Set private key authentication with passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        };
        self
    }

    /// Password substituted into transitions that ask for one.
    pub fn enable_password(mut self, password: impl Into<String>) -> Self {
        self.enable_password = Some(SecretString::from(password.into()));
        self
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Mode to reach before running commands.
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Append one command. It may span several lines.
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.commands.push(command.into());
        self
    }

    pub fn commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.extend(commands.into_iter().map(Into::into));
        self
    }

    /// Set the request budget (default: 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<SessionRequest> {
        let invalid = |message: &str| DriverError::InvalidRequest {
            message: message.to_string(),
        };

        if self.host.trim().is_empty() {
            return Err(invalid("host is required").into());
        }
        let username = self
            .username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| invalid("username is required"))?;
        if self.timeout.is_zero() {
            return Err(invalid("timeout must be greater than zero").into());
        }

        Ok(SessionRequest {
            target: Target {
                host: self.host,
                port: self.port,
                username,
                auth: self.auth,
                protocol: self.protocol,
            },
            enable_password: self.enable_password,
            mode: self.mode.filter(|m| !m.is_empty()),
            commands: self.commands,
            timeout: self.timeout,
        })
    }
}

impl std::fmt::Debug for SessionRequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRequestBuilder")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("protocol", &self.protocol)
            .field("mode", &self.mode)
            .field("commands", &self.commands.len())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
