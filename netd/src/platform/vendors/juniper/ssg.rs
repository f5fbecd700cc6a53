//! Juniper SSG (ScreenOS 6.x) operator.
//!
//! ScreenOS has a single command mode and answers a plain shell request;
//! it does not want a pseudo-terminal.

use crate::error::Result;
use crate::platform::Operator;
use crate::transport::ShellRequest;

pub const SELECTOR: &str = r"^juniper\.ssg$";

pub fn operator() -> Result<Operator> {
    Operator::builder("juniper_ssg")
        .mode("login", [r"[[:alnum:]]{1,}(-[[:alnum:]]+){0,}-> $"])
        .error(r"\^-+unknown keyword\s+")
        .error(r"\^-+command not completed")
        .error(r"\^$")
        .pager(r"--- more --- ", " ")
        .start_mode("login")
        .shell(ShellRequest::Plain)
        .build()
}
