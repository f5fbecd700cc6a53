//! Topsec NGFW4000 (TOS) operator.

use crate::error::Result;
use crate::platform::Operator;
use crate::transport::ShellRequest;

pub const SELECTOR: &str = r"^topsec\.ngfw";

pub fn operator() -> Result<Operator> {
    Operator::builder("topsec_ngfw")
        .mode("login", [r"(?m)^[\w.\-]+# ?$"])
        .error(r"(?mi)^error")
        .start_mode("login")
        .shell(ShellRequest::Plain)
        .build()
}
