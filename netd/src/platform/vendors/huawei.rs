//! Huawei USG (VRP) operator.
//!
//! ```text
//! <USG6000V2>                 # login
//! [USG6000V2]                 # system_View
//! [USG6000V2-policy-security] # system_View sub-view
//! ```

use crate::error::Result;
use crate::platform::{Operator, Step};

pub const SELECTOR: &str = r"^huawei\.usg";

pub fn operator() -> Result<Operator> {
    Operator::builder("huawei_usg")
        .mode("login", [r"(?m)^<[^<>\r\n]+>$"])
        .mode("system_View", [r"(?m)^\[[^\[\]\r\n]+\]$"])
        .transition("login", "system_View", [Step::send("system-view")])
        .error(r"Error: ")
        .pager(r"  ---- More ----", " ")
        .start_mode("login")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usg_prompts() {
        let op = operator().unwrap();
        let login = op.prompts("login").unwrap();
        let system = op.prompts("system_View").unwrap();

        assert!(login.is_match(b"<USG6000V2>"));
        assert!(system.is_match(b"system-view\r\n[USG6000V2]"));
        assert!(system.is_match(b"[USG6000V2-policy-security]"));
        assert!(!login.is_match(b"[USG6000V2]"));
    }

    #[test]
    fn test_usg_errors() {
        let op = operator().unwrap();
        assert!(
            op.error_patterns()
                .is_match(b"Error: Unrecognized command found at '^' position.")
        );
    }
}
