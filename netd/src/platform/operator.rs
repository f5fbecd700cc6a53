//! Operator: the per-vendor descriptor of a device's command shell.
//!
//! An operator is pure data. It names the shell's modes and the prompts that
//! identify each of them, the literal steps that move the session from one
//! mode to another, the signatures of a rejected command, the line-break
//! convention and how the interactive shell must be requested. The executor
//! drives every vendor with the same algorithm over this data.
//!
//! ```text
//! login  ──enable / <enable password>──►  login_enable  ──configure terminal──►  configure_terminal
//!   >                                          #                                   (config)#
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::channel::PatternSet;
use crate::error::{PlatformError, Result};
use crate::transport::ShellRequest;

/// Line-break convention of a device shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreak {
    #[default]
    Lf,
    CrLf,
}

impl LineBreak {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineBreak::Lf => "\n",
            LineBreak::CrLf => "\r\n",
        }
    }
}

/// What a transition step writes to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInput {
    /// A literal command.
    Command(String),

    /// The request's enable password (empty if none was supplied).
    EnablePassword,
}

/// One write/read exchange of a mode transition.
#[derive(Debug, Clone)]
pub struct Step {
    input: StepInput,
    until: Option<PatternSet>,
}

impl Step {
    /// Send a literal command.
    pub fn send(command: impl Into<String>) -> Self {
        Self {
            input: StepInput::Command(command.into()),
            until: None,
        }
    }

    /// Send the enable password from the request.
    pub fn enable_password() -> Self {
        Self {
            input: StepInput::EnablePassword,
            until: None,
        }
    }

    /// Read until `pattern` instead of the target mode's prompt, e.g. when
    /// the device asks for a password before reaching the target mode.
    pub fn until(mut self, pattern: &str) -> std::result::Result<Self, regex::Error> {
        self.until = Some(PatternSet::new([pattern])?);
        Ok(self)
    }

    pub fn input(&self) -> &StepInput {
        &self.input
    }

    /// The step's own boundary, if any.
    pub fn boundary(&self) -> Option<&PatternSet> {
        self.until.as_ref()
    }

    /// Whether the input must be kept out of logs.
    pub fn is_hidden(&self) -> bool {
        self.input == StepInput::EnablePassword
    }

    /// The input as it may appear in logs and errors.
    pub fn display_input(&self) -> &str {
        match &self.input {
            StepInput::Command(command) => command,
            StepInput::EnablePassword => "<hidden>",
        }
    }
}

/// Pager prompt and the keystroke that advances it.
#[derive(Debug, Clone)]
pub struct Pager {
    pub pattern: PatternSet,
    pub reply: String,
}

/// Immutable per-vendor descriptor, shared by all sessions.
#[derive(Clone)]
pub struct Operator {
    name: String,
    prompts: IndexMap<String, PatternSet>,
    transitions: IndexMap<(String, String), Vec<Step>>,
    errors: PatternSet,
    pager: Option<Pager>,
    line_break: LineBreak,
    start_mode: String,
    shell: ShellRequest,
}

impl Operator {
    pub fn builder(name: impl Into<String>) -> OperatorBuilder {
        OperatorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Boundary patterns of `mode`.
    pub fn prompts(&self, mode: &str) -> Option<&PatternSet> {
        self.prompts.get(mode)
    }

    /// Steps moving the session from `from` to `to`.
    pub fn transitions(&self, from: &str, to: &str) -> Option<&[Step]> {
        self.transitions
            .get(&(from.to_string(), to.to_string()))
            .map(Vec::as_slice)
    }

    /// Error signatures applied to every command's output.
    pub fn error_patterns(&self) -> &PatternSet {
        &self.errors
    }

    pub fn pager(&self) -> Option<&Pager> {
        self.pager.as_ref()
    }

    pub fn line_break(&self) -> &'static str {
        self.line_break.as_str()
    }

    /// Mode assumed right after the shell opens.
    pub fn start_mode(&self) -> &str {
        &self.start_mode
    }

    pub fn shell_request(&self) -> &ShellRequest {
        &self.shell
    }

    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.prompts.keys().map(String::as_str)
    }

    /// Declared (from, to) pairs, in declaration order.
    pub fn transition_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.transitions
            .keys()
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("name", &self.name)
            .field("modes", &self.prompts.keys().collect::<Vec<_>>())
            .field("transitions", &self.transitions.keys().collect::<Vec<_>>())
            .field("errors", &self.errors.len())
            .field("line_break", &self.line_break)
            .field("start_mode", &self.start_mode)
            .field("shell", &self.shell)
            .finish()
    }
}

/// Builder for [`Operator`]. Patterns are compiled in [`build`](Self::build),
/// so a bad pattern fails construction rather than a session.
#[derive(Debug)]
pub struct OperatorBuilder {
    name: String,
    prompts: IndexMap<String, Vec<String>>,
    transitions: IndexMap<(String, String), Vec<Step>>,
    errors: Vec<String>,
    pager: Option<(String, String)>,
    line_break: LineBreak,
    start_mode: Option<String>,
    shell: ShellRequest,
}

impl OperatorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompts: IndexMap::new(),
            transitions: IndexMap::new(),
            errors: vec![],
            pager: None,
            line_break: LineBreak::default(),
            start_mode: None,
            shell: ShellRequest::default(),
        }
    }

    /// Declare a mode and its prompt patterns.
    pub fn mode<I, S>(mut self, name: impl Into<String>, prompts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prompts
            .entry(name.into())
            .or_default()
            .extend(prompts.into_iter().map(Into::into));
        self
    }

    /// Declare the steps moving from `from` to `to`.
    pub fn transition(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        steps: impl IntoIterator<Item = Step>,
    ) -> Self {
        self.transitions
            .insert((from.into(), to.into()), steps.into_iter().collect());
        self
    }

    /// Add an error signature.
    pub fn error(mut self, pattern: impl Into<String>) -> Self {
        self.errors.push(pattern.into());
        self
    }

    /// Declare a pager prompt and its reply.
    pub fn pager(mut self, pattern: impl Into<String>, reply: impl Into<String>) -> Self {
        self.pager = Some((pattern.into(), reply.into()));
        self
    }

    pub fn line_break(mut self, line_break: LineBreak) -> Self {
        self.line_break = line_break;
        self
    }

    pub fn start_mode(mut self, mode: impl Into<String>) -> Self {
        self.start_mode = Some(mode.into());
        self
    }

    pub fn shell(mut self, shell: ShellRequest) -> Self {
        self.shell = shell;
        self
    }

    /// Compile patterns and check that the mode graph is well formed.
    pub fn build(self) -> Result<Operator> {
        let invalid = |message: String| PlatformError::InvalidDefinition { message };

        let start_mode = self
            .start_mode
            .ok_or_else(|| invalid(format!("{}: start mode is required", self.name)))?;

        let mut prompts = IndexMap::with_capacity(self.prompts.len());
        for (mode, patterns) in self.prompts {
            if patterns.is_empty() {
                return Err(invalid(format!("{}: mode '{mode}' has no prompts", self.name)).into());
            }
            prompts.insert(mode, PatternSet::new(&patterns).map_err(PlatformError::from)?);
        }

        let known = |mode: &str| prompts.contains_key(mode);
        if !known(&start_mode) {
            return Err(invalid(format!(
                "{}: start mode '{start_mode}' has no prompts",
                self.name
            ))
            .into());
        }
        for (from, to) in self.transitions.keys() {
            if let Some(mode) = [from, to].into_iter().find(|m| !known(m.as_str())) {
                return Err(invalid(format!(
                    "{}: transition '{from}' -> '{to}' references mode '{mode}' with no prompts",
                    self.name
                ))
                .into());
            }
        }

        let errors = PatternSet::new(&self.errors).map_err(PlatformError::from)?;
        let pager = match self.pager {
            Some((pattern, reply)) => Some(Pager {
                pattern: PatternSet::new([pattern]).map_err(PlatformError::from)?,
                reply,
            }),
            None => None,
        };

        Ok(Operator {
            name: self.name,
            prompts,
            transitions: self.transitions,
            errors,
            pager,
            line_break: self.line_break,
            start_mode,
            shell: self.shell,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample() -> OperatorBuilder {
        Operator::builder("sample")
            .mode("login", [r"user> $"])
            .mode("enable", [r"user# $"])
            .transition("login", "enable", [Step::send("enable"), Step::enable_password()])
            .error(r"% Invalid")
            .start_mode("login")
    }

    #[test]
    fn test_build_and_lookup() {
        let op = sample().build().unwrap();
        assert_eq!(op.name(), "sample");
        assert_eq!(op.start_mode(), "login");
        assert_eq!(op.line_break(), "\n");
        assert!(op.prompts("login").unwrap().is_match(b"user> "));
        assert!(op.prompts("config").is_none());

        let steps = op.transitions("login", "enable").unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].input(), &StepInput::Command("enable".into()));
        assert!(steps[1].is_hidden());
        assert!(op.transitions("enable", "login").is_none());
    }

    #[test]
    fn test_transition_to_undeclared_mode_is_rejected() {
        let err = sample()
            .transition("enable", "config", [Step::send("configure terminal")])
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Platform(PlatformError::InvalidDefinition { ref message }) if message.contains("'config'")
        ));
    }

    #[test]
    fn test_start_mode_must_have_prompts() {
        let err = Operator::builder("x")
            .mode("login", [r"> $"])
            .start_mode("shell")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Platform(PlatformError::InvalidDefinition { .. })));
    }

    #[test]
    fn test_invalid_pattern_fails_build() {
        let err = sample().error(r"[unclosed").build().unwrap_err();
        assert!(matches!(err, Error::Platform(PlatformError::InvalidPattern(_))));
    }

    #[test]
    fn test_step_until() {
        let step = Step::send("enable").until(r"[Pp]assword: ?$").unwrap();
        assert!(step.boundary().unwrap().is_match(b"Password: "));
        assert!(!step.is_hidden());
        assert_eq!(step.display_input(), "enable");
        assert_eq!(Step::enable_password().display_input(), "<hidden>");
        assert!(Step::send("x").until("(").is_err());
    }
}
