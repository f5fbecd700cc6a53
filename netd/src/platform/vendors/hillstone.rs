//! Hillstone SG-6000 (StoneOS) operator.

use crate::error::Result;
use crate::platform::{Operator, Step};

pub const SELECTOR: &str = r"^hillstone\.sg-?6000";

pub fn operator() -> Result<Operator> {
    Operator::builder("hillstone_sg6000")
        .mode("login", [r"(?m)^[\w.\-~]+# ?$"])
        .mode("configure", [r"(?m)^[\w.\-~]+\(config[\w.\-]*\)# ?$"])
        .transition("login", "configure", [Step::send("configure")])
        .error(r"(?m)^\s*\^-+")
        .error(r"Error: ")
        .error(r"incomplete command")
        .error(r"unrecognized keyword")
        .pager(r"--More--", " ")
        .start_mode("login")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sg6000_prompts() {
        let op = operator().unwrap();
        assert!(op.prompts("login").unwrap().is_match(b"SG-6000# "));
        assert!(!op.prompts("login").unwrap().is_match(b"SG-6000(config)# "));
        assert!(op.prompts("configure").unwrap().is_match(b"SG-6000(config-addr)# "));
    }
}
