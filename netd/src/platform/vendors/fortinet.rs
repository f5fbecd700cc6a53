//! Fortinet FortiGate (FortiOS) operator.
//!
//! Besides the login shell only the `global` settings table is reachable by
//! a fixed command (`config system global`, prompt `FGT (global) # `). Other
//! `config ...` blocks are sent as multi-line command bodies instead.

use crate::error::Result;
use crate::platform::{Operator, Step};

pub const SELECTOR: &str = r"^fortinet\.forti";

pub fn operator() -> Result<Operator> {
    Operator::builder("fortinet_fortigate")
        .mode("login", [r"(?m)^[\w.\-]+( \([\w.\-]+\))? [#$] ?$"])
        .mode("global", [r"(?m)^[\w.\-]+ \(global\) [#$] ?$"])
        .transition("login", "global", [Step::send("config system global")])
        .error(r"Command fail\. Return code")
        .error(r"Unknown action")
        .error(r"command parse error")
        .error(r"entry not found in datasource")
        .pager(r"--More-- ", " ")
        .start_mode("login")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::StepInput;

    #[test]
    fn test_fortigate_prompt() {
        let op = operator().unwrap();
        let login = op.prompts("login").unwrap();
        assert!(login.is_match(b"FortiGate-VM64-KVM # "));
        assert!(login.is_match(b"FGT (policy) # "));
        assert!(login.is_match(b"FGT (1) # "));
        assert!(op.error_patterns().is_match(b"Command fail. Return code -61"));
    }

    #[test]
    fn test_global_mode() {
        let op = operator().unwrap();
        let global = op.prompts("global").unwrap();
        assert!(global.is_match(b"config system global\r\nFortiGate-VM64-KVM (global) # "));
        assert!(!global.is_match(b"FortiGate-VM64-KVM # "));
        assert!(!global.is_match(b"FGT (policy) # "));

        let steps = op.transitions("login", "global").unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].input(),
            &StepInput::Command("config system global".into())
        );
    }
}
