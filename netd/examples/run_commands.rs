//! Run commands on one device through a built-in operator.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example run_commands -- --vendor cisco --type asa \
//!     --host 192.168.1.1 --user admin --password secret --enable secret \
//!     --mode login_enable "show version" "show clock"
//! ```

use std::env;
use std::time::Duration;

use netd::{Executor, Registry, SessionRequest, SshConnector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let registry = Registry::with_builtin_vendors()?;
    let operator = registry.resolve(&args.vendor, &args.kind)?;
    println!("Using operator {} for {}.{}", operator.name(), args.vendor, args.kind);

    let mut builder = SessionRequest::builder(&args.host)
        .port(args.port)
        .username(&args.user)
        .commands(&args.commands)
        .timeout(Duration::from_secs(args.timeout));
    if let Some(password) = &args.password {
        builder = builder.password(password);
    }
    if let Some(enable) = &args.enable {
        builder = builder.enable_password(enable);
    }
    if let Some(mode) = &args.mode {
        builder = builder.mode(mode);
    }
    let request = builder.build()?;

    let executor = Executor::new(SshConnector::default());
    let result = executor.run(&operator, &request).await;

    for output in &result.outputs {
        println!("\n> {}", output.command);
        println!("{}", "-".repeat(50));
        println!("{}", output);
    }

    println!("\n{:?}: {} ({:?})", result.retcode(), result.message(), result.elapsed);
    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Simple argument parser
struct Args {
    vendor: String,
    kind: String,
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    enable: Option<String>,
    mode: Option<String>,
    timeout: u64,
    commands: Vec<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut parsed = Self {
            vendor: "cisco".to_string(),
            kind: "ios".to_string(),
            host: "localhost".to_string(),
            port: 22,
            user: env::var("USER").unwrap_or_else(|_| "admin".to_string()),
            password: None,
            enable: None,
            mode: None,
            timeout: 30,
            commands: Vec::new(),
        };

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match args[i].as_str() {
                "--vendor" => parsed.vendor = value.unwrap_or_default(),
                "--type" => parsed.kind = value.unwrap_or_default(),
                "--host" | "-h" => parsed.host = value.unwrap_or_default(),
                "--port" | "-p" => {
                    parsed.port = value.and_then(|v| v.parse().ok()).unwrap_or(22)
                }
                "--user" | "-u" => parsed.user = value.unwrap_or_default(),
                "--password" | "-P" => parsed.password = value,
                "--enable" | "-e" => parsed.enable = value,
                "--mode" | "-m" => parsed.mode = value,
                "--timeout" | "-t" => {
                    parsed.timeout = value.and_then(|v| v.parse().ok()).unwrap_or(30)
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                command => {
                    parsed.commands.push(command.to_string());
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }
        parsed
    }

    fn print_help() {
        println!(
            r#"netd run_commands example

USAGE:
    cargo run --example run_commands -- [OPTIONS] [COMMAND]...

OPTIONS:
    --vendor <VENDOR>        Device vendor [default: cisco]
    --type <TYPE>            Device type [default: ios]
    -h, --host <HOST>        Target host [default: localhost]
    -p, --port <PORT>        SSH port [default: 22]
    -u, --user <USER>        Username [default: $USER]
    -P, --password <PASS>    Password for authentication
    -e, --enable <PASS>      Enable password
    -m, --mode <MODE>        Mode to run the commands in [default: start mode]
    -t, --timeout <SECS>     Budget for the whole request [default: 30]
    --help                   Print this help message
"#
        );
    }
}
