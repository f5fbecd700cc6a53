//! H3C SecPath (Comware) operator.

use crate::error::Result;
use crate::platform::{Operator, Step};

pub const SELECTOR: &str = r"^h3c\.secpath";

pub fn operator() -> Result<Operator> {
    Operator::builder("h3c_secpath")
        .mode("login", [r"(?m)^<[^<>\r\n]+>$"])
        .mode("system_View", [r"(?m)^\[[^\[\]\r\n]+\]$"])
        .transition("login", "system_View", [Step::send("system-view")])
        .error(r"% Unrecognized command")
        .error(r"% Incomplete command")
        .error(r"% Wrong parameter")
        .error(r"% Too many parameters")
        .error(r"% Ambiguous command")
        .pager(r"---- More ----", " ")
        .start_mode("login")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secpath_prompts() {
        let op = operator().unwrap();
        assert!(op.prompts("login").unwrap().is_match(b"<H3C>"));
        assert!(op.prompts("system_View").unwrap().is_match(b"[H3C-security-policy-ip]"));
        assert!(op.error_patterns().is_match(b" % Unrecognized command found at '^' position."));
    }
}
