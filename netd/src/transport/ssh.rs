//! SSH connector implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use russh::client::{self, Handle};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use secrecy::ExposeSecret;

use super::config::{AuthMethod, HostKeyVerification, Protocol, SshOptions, Target};
use super::{Connection, Connector, Shell, ShellRequest};
use crate::error::{ChannelError, Result, TransportError};

/// Connector opening russh client sessions.
#[derive(Debug, Clone, Default)]
pub struct SshConnector {
    options: SshOptions,
}

impl SshConnector {
    pub fn new(options: SshOptions) -> Self {
        Self { options }
    }

    /// Authenticate with the server.
    async fn authenticate(session: &mut Handle<SshHandler>, target: &Target) -> Result<()> {
        let success = match &target.auth {
            AuthMethod::None => session
                .authenticate_none(&target.username)
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::Password(password) => session
                .authenticate_password(&target.username, password.expose_secret())
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::PrivateKey { path, passphrase } => {
                let key = load_secret_key(path, passphrase.as_ref().map(|p| p.expose_secret()))
                    .map_err(|e| TransportError::Key(e.to_string()))?;

                // Get the best RSA hash algorithm supported by the server
                let hash_alg = session
                    .best_supported_rsa_hash()
                    .await
                    .map_err(TransportError::Ssh)?
                    .flatten();

                session
                    .authenticate_publickey(
                        &target.username,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                    )
                    .await
                    .map_err(TransportError::Ssh)?
                    .success()
            }
        };

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: target.username.clone(),
            }
            .into());
        }

        Ok(())
    }
}

impl Connector for SshConnector {
    type Connection = SshConnection;

    async fn connect(&self, target: &Target) -> Result<SshConnection> {
        if target.protocol != Protocol::Ssh {
            return Err(TransportError::UnsupportedProtocol(target.protocol.to_string()).into());
        }

        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(self.options.inactivity_timeout),
            ..Default::default()
        });

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: target.host.clone(),
            port: target.port,
            host_key_verification: self.options.host_key_verification.clone(),
            known_hosts_path: self.options.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        debug!("ssh: connecting to {}", target.socket_addr());
        let mut session = client::connect(ssh_config, (target.host.as_str(), target.port), handler)
            .await
            .map_err(|e| {
                // Prefer the detailed error recorded by check_server_key
                let recorded = host_key_error.lock().ok().and_then(|mut slot| slot.take());
                recorded.unwrap_or(TransportError::Ssh(e))
            })?;

        Self::authenticate(&mut session, target).await?;

        Ok(SshConnection { session })
    }
}

/// An authenticated russh session.
pub struct SshConnection {
    session: Handle<SshHandler>,
}

impl Connection for SshConnection {
    async fn open_shell(&mut self, request: &ShellRequest) -> Result<Shell> {
        let channel = self
            .session
            .channel_open_session()
            .await
            .map_err(|e| ChannelError::ShellRequestFailed(e.to_string()))?;

        if let ShellRequest::Pty {
            term,
            width,
            height,
        } = request
        {
            channel
                .request_pty(true, term, *width, *height, 0, 0, &[])
                .await
                .map_err(|e| ChannelError::ShellRequestFailed(format!("pty: {e}")))?;
        }

        channel
            .request_shell(true)
            .await
            .map_err(|e| ChannelError::ShellRequestFailed(format!("shell: {e}")))?;

        Ok(Shell::from_stream(channel.into_stream()))
    }

    async fn close(self) -> Result<()> {
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Detailed host-key error for connect() to surface instead of the
    /// generic russh::Error::UnknownKey.
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// Check the host key against known_hosts.
    ///
    /// Returns `Ok(true)` if matched, `Ok(false)` if host not found,
    /// `Err(TransportError::HostKeyChanged)` if key changed.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> std::result::Result<bool, TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::check_known_hosts(&self.host, self.port, pubkey)
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    /// Save a new host key to known_hosts.
    fn learn_host_key(&self, pubkey: &PublicKey) -> std::result::Result<(), TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey)
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    fn reject(&self, error: TransportError) -> bool {
        if let Ok(mut slot) = self.host_key_error.lock() {
            *slot = Some(error);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.host_key_verification {
            HostKeyVerification::Disabled => Ok(true),

            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => {
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key: {}", e);
                    }
                    Ok(true)
                }
                Err(e) => Ok(self.reject(e)),
            },

            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => Ok(self.reject(TransportError::HostKeyUnknown {
                    host: self.host.clone(),
                    port: self.port,
                })),
                Err(e) => Ok(self.reject(e)),
            },
        }
    }
}
