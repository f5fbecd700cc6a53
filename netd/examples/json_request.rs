//! Handle one JSON-encoded `CliRequest` read from stdin and print the
//! `CliResponse`, the way an RPC front would.
//!
//! # Usage
//!
//! ```bash
//! echo '{"vendor": "juniper", "type": "srx", "address": "192.168.1.252:22",
//!        "auth": {"username": "admin", "password": "r00tme"},
//!        "commands": ["show configuration | display set | no-more"],
//!        "mode": "login", "timeout": 30}' \
//!     | cargo run --example json_request
//! ```

use std::io::Read;
use std::sync::Arc;

use netd::{CliHandler, CliRequest, Executor, Registry, SshConnector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let request: CliRequest = serde_json::from_str(&input)?;

    let registry = Arc::new(Registry::with_builtin_vendors()?);
    let handler = CliHandler::new(registry, Executor::new(SshConnector::default()));

    let response = handler.handle(request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
