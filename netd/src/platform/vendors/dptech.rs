//! DPtech FW1000 operator.

use crate::error::Result;
use crate::platform::{Operator, Step};

pub const SELECTOR: &str = r"^dptech\.fw1000";

pub fn operator() -> Result<Operator> {
    Operator::builder("dptech_fw1000")
        .mode("login", [r"(?m)^<[\w.\-]+>$"])
        .mode("configure", [r"(?m)^\[[\w.\-]+\]$"])
        .transition("login", "configure", [Step::send("conf-mode")])
        .error(r"% Unknown command")
        .error(r"Invalid input")
        .error(r"% Command incomplete")
        .start_mode("login")
        .build()
}
