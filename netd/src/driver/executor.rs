//! Session executor: connect, walk to the requested mode, run commands,
//! tear down.
//!
//! One [`Executor::run`] call owns one connection from start to finish:
//!
//! 1. check the requested mode and look up the transition, before any I/O
//! 2. connect and open the operator's shell
//! 3. read the login banner up to the start mode's prompt
//! 4. replay the transition steps, reading to the target mode's prompt
//!    (or the step's own boundary) after each
//! 5. run each command, reading until a prompt or an error signature
//! 6. close the shell and the connection, on every path
//!
//! Every blocking operation shares a single deadline computed when the call
//! starts, so the request timeout covers the whole exchange.

use std::time::Duration;

use log::{debug, info, warn};
use memchr::memchr;
use tokio::time::{Instant, timeout, timeout_at};

use super::request::SessionRequest;
use super::response::{CommandOutput, Failure, SessionResult, Stage};
use crate::channel::{Boundary, LiveSession, PatternSet};
use crate::error::{ChannelError, DriverError, TransportError};
use crate::platform::{Operator, Step, StepInput};
use crate::transport::{Connection, Connector};

/// Executor-wide tuning, shared by every request.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Bytes at the end of the output searched for a prompt.
    pub search_depth: usize,

    /// Size of a single read from the shell.
    pub read_chunk: usize,

    /// How long teardown may take once the request is finished.
    pub close_grace: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            search_depth: 1000,
            read_chunk: 4096,
            close_grace: Duration::from_secs(5),
        }
    }
}

/// Runs session requests over connections from `C`.
///
/// Holds no per-request state; one executor serves any number of concurrent
/// requests.
#[derive(Debug)]
pub struct Executor<C> {
    connector: C,
    config: ExecutorConfig,
}

impl<C: Connector> Executor<C> {
    pub fn new(connector: C) -> Self {
        Self::with_config(connector, ExecutorConfig::default())
    }

    pub fn with_config(connector: C, config: ExecutorConfig) -> Self {
        Self { connector, config }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute `request` against a device described by `operator`.
    ///
    /// Never fails at the type level: the result carries the outputs of the
    /// commands that ran and, if the run stopped early, where and why.
    pub async fn run(&self, operator: &Operator, request: &SessionRequest) -> SessionResult {
        let started = Instant::now();
        let deadline = started + request.timeout();
        let mut outputs = Vec::with_capacity(request.commands().len());

        let failure = self
            .execute(operator, request, deadline, &mut outputs)
            .await
            .err();
        if let Some(failure) = &failure {
            info!("{}: {} failed: {}", operator.name(), request.target().host, failure);
        }

        SessionResult {
            outputs,
            failure,
            elapsed: started.elapsed(),
        }
    }

    async fn execute(
        &self,
        operator: &Operator,
        request: &SessionRequest,
        deadline: Instant,
        outputs: &mut Vec<CommandOutput>,
    ) -> Result<(), Failure> {
        let mode = request.mode().unwrap_or(operator.start_mode());
        let steps = plan(operator, mode).map_err(|e| Failure::new(Stage::Prepare, e))?;

        let target = request.target();
        info!("{}: connecting to {}", operator.name(), target.socket_addr());
        let mut connection = match timeout_at(deadline, self.connector.connect(target)).await {
            Ok(Ok(connection)) => connection,
            Ok(Err(e)) => return Err(Failure::new(Stage::Connect, e)),
            Err(_) => {
                return Err(Failure::new(
                    Stage::Connect,
                    TransportError::Timeout(request.timeout()),
                ));
            }
        };

        let shell = match timeout_at(deadline, connection.open_shell(operator.shell_request())).await
        {
            Ok(Ok(shell)) => shell,
            Ok(Err(e)) => {
                self.close_connection(connection).await;
                return Err(Failure::new(Stage::Shell, e));
            }
            Err(_) => {
                self.close_connection(connection).await;
                return Err(Failure::new(
                    Stage::Shell,
                    ChannelError::Timeout(request.timeout()),
                ));
            }
        };

        let mut session = LiveSession::new(
            shell,
            deadline,
            request.timeout(),
            self.config.search_depth,
            self.config.read_chunk,
        );
        let result = converse(&mut session, operator, request, mode, steps, outputs).await;

        debug!("{}: closing session ({:?} left)", operator.name(), session.remaining());
        self.teardown(session, connection).await;
        result
    }

    /// Close the shell, then the connection. Each gets its own grace period,
    /// and the connection is closed whatever happened to the shell.
    async fn teardown(&self, session: LiveSession, connection: C::Connection) {
        let grace = self.config.close_grace;
        if timeout(grace, session.close()).await.is_err() {
            warn!("shell close did not finish within {:?}", grace);
        }
        self.close_connection(connection).await;
        info!("session closed");
    }

    async fn close_connection(&self, connection: C::Connection) {
        match timeout(self.config.close_grace, connection.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("connection close failed: {}", e),
            Err(_) => warn!(
                "connection close did not finish within {:?}",
                self.config.close_grace
            ),
        }
    }
}

/// Check `mode` and return the steps reaching it from the start mode.
fn plan<'a>(operator: &'a Operator, mode: &str) -> crate::error::Result<&'a [Step]> {
    if operator.prompts(mode).is_none() {
        return Err(DriverError::UnknownMode {
            operator: operator.name().to_string(),
            mode: mode.to_string(),
        }
        .into());
    }
    let start = operator.start_mode();
    if mode == start {
        return Ok(&[]);
    }
    operator.transitions(start, mode).ok_or_else(|| {
        DriverError::UnsupportedTransition {
            from: start.to_string(),
            to: mode.to_string(),
        }
        .into()
    })
}

async fn converse(
    session: &mut LiveSession,
    operator: &Operator,
    request: &SessionRequest,
    mode: &str,
    steps: &[Step],
    outputs: &mut Vec<CommandOutput>,
) -> Result<(), Failure> {
    let start = operator.start_mode();
    let prompts = mode_prompts(operator, mode)?;

    let start_prompts = mode_prompts(operator, start)?;
    session
        .read_until(start_prompts, None, operator.pager())
        .await
        .map_err(|e| Failure::new(Stage::Banner, e))?;
    debug!("{}: in mode '{}'", operator.name(), start);

    for step in steps {
        transition_step(session, operator, request, start, mode, step, prompts)
            .await
            .map_err(|e| Failure::new(Stage::Transition, e))?;
    }
    if !steps.is_empty() {
        debug!("{}: in mode '{}'", operator.name(), mode);
    }

    for (index, command) in request.commands().iter().enumerate() {
        let output = run_command(session, operator, prompts, index, command).await?;
        let rejected = output.failure.clone();
        outputs.push(output);
        if let Some(pattern) = rejected {
            return Err(Failure::command(
                index,
                DriverError::CommandFailed {
                    index,
                    command: command.clone(),
                    pattern,
                },
            ));
        }
    }
    Ok(())
}

fn mode_prompts<'a>(operator: &'a Operator, mode: &str) -> Result<&'a PatternSet, Failure> {
    operator.prompts(mode).ok_or_else(|| {
        Failure::new(
            Stage::Prepare,
            DriverError::UnknownMode {
                operator: operator.name().to_string(),
                mode: mode.to_string(),
            },
        )
    })
}

async fn transition_step(
    session: &mut LiveSession,
    operator: &Operator,
    request: &SessionRequest,
    from: &str,
    to: &str,
    step: &Step,
    prompts: &PatternSet,
) -> crate::error::Result<()> {
    let input = match step.input() {
        StepInput::Command(command) => command.as_str(),
        StepInput::EnablePassword => request.enable_password(),
    };
    session
        .send(input, operator.line_break(), step.is_hidden())
        .await?;

    let boundary = step.boundary().unwrap_or(prompts);
    match session
        .read_until(boundary, Some(operator.error_patterns()), operator.pager())
        .await?
    {
        Boundary::Prompt { .. } => Ok(()),
        Boundary::Error { pattern, .. } => Err(DriverError::TransitionRejected {
            from: from.to_string(),
            to: to.to_string(),
            step: step.display_input().to_string(),
            pattern,
        }
        .into()),
    }
}

/// Run one caller command, line by line, and capture its output.
///
/// A rejected command still yields an output, carrying the matched
/// signature; only I/O failures and timeouts are returned as errors.
async fn run_command(
    session: &mut LiveSession,
    operator: &Operator,
    prompts: &PatternSet,
    index: usize,
    command: &str,
) -> Result<CommandOutput, Failure> {
    let started = Instant::now();
    let mut output = String::new();
    let mut raw_output = String::new();
    let mut failure = None;

    for line in command_lines(command) {
        session
            .send(line, operator.line_break(), false)
            .await
            .map_err(|e| Failure::command(index, e))?;
        let boundary = session
            .read_until(prompts, Some(operator.error_patterns()), operator.pager())
            .await
            .map_err(|e| Failure::command(index, e))?;

        let (data, end) = match &boundary {
            Boundary::Prompt { data, prompt } => (data, prompt.start),
            Boundary::Error { data, .. } => (data, trailing_prompt(data, prompts)),
        };
        raw_output.push_str(&String::from_utf8_lossy(data));
        let part = normalize(&data[..end], line);
        if !output.is_empty() && !part.is_empty() {
            output.push('\n');
        }
        output.push_str(&part);

        if let Boundary::Error { pattern, .. } = boundary {
            failure = Some(pattern);
            break;
        }
    }

    Ok(CommandOutput {
        command: command.to_string(),
        output,
        raw_output,
        elapsed: started.elapsed(),
        failure,
    })
}

/// Non-blank lines of a command body, trimmed. A blank body is sent as one
/// empty line.
fn command_lines(command: &str) -> Vec<&str> {
    let lines: Vec<&str> = command
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() { vec![""] } else { lines }
}

/// Offset where a prompt on the last line of `data` starts, or `data.len()`.
fn trailing_prompt(data: &[u8], prompts: &PatternSet) -> usize {
    let start = memchr::memrchr(b'\n', data).map_or(0, |i| i + 1);
    if prompts.is_match(&data[start..]) {
        start
    } else {
        data.len()
    }
}

/// Drop the echoed `sent` line and carriage returns.
fn normalize(data: &[u8], sent: &str) -> String {
    let echo_end = memchr(b'\n', data).map_or(data.len(), |i| i + 1);
    let body = if data[..echo_end].trim_ascii().ends_with(sent.as_bytes()) {
        &data[echo_end..]
    } else {
        data
    };
    String::from_utf8_lossy(body)
        .replace('\r', "")
        .trim_end_matches('\n')
        .to_string()
}
