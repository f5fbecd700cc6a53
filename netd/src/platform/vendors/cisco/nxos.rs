//! Cisco NX-OS operator. Sessions land directly in the `#` prompt.

use crate::error::Result;
use crate::platform::{Operator, Step};

use super::{CONFIG_PROMPT, ENABLE_PROMPT};

pub const SELECTOR: &str = r"^cisco\.nx-?os$";

pub fn operator() -> Result<Operator> {
    Operator::builder("cisco_nxos")
        .mode("login", [ENABLE_PROMPT])
        .mode("configure_terminal", [CONFIG_PROMPT])
        .transition("login", "configure_terminal", [Step::send("configure terminal")])
        .error(r"% Invalid command")
        .error(r"% Incomplete command")
        .error(r"% Invalid parameter")
        .error(r"% Permission denied")
        .pager(r"--More--", " ")
        .start_mode("login")
        .build()
}
