//! Juniper SRX (JUNOS) operator.
//!
//! ```text
//! admin@srx>                  # login
//! [edit]
//! admin@srx#                  # configure / configure_private / configure_exclusive
//! ```
//!
//! The three configuration modes share a prompt; they differ only in how
//! the candidate configuration is locked.

use crate::error::Result;
use crate::platform::{Operator, Step};

pub const SELECTOR: &str = r"^juniper\.srx$";

const LOGIN_PROMPT: &str = r"(?m)^[\w\-@()/:.]{1,63}> ?$";
const CONFIG_PROMPT: &str = r"(?m)^[\w\-@()/:.]{1,63}# ?$";

pub fn operator() -> Result<Operator> {
    Operator::builder("juniper_srx")
        .mode("login", [LOGIN_PROMPT])
        .mode("configure", [CONFIG_PROMPT])
        .mode("configure_private", [CONFIG_PROMPT])
        .mode("configure_exclusive", [CONFIG_PROMPT])
        .transition("login", "configure", [Step::send("configure")])
        .transition("login", "configure_private", [Step::send("configure private")])
        .transition(
            "login",
            "configure_exclusive",
            [Step::send("configure exclusive")],
        )
        .error(r"(?m)^error: ")
        .error(r"unknown command\.")
        .error(r"syntax error")
        .error(r"missing argument\.")
        .error(r"is ambiguous\.")
        .pager(r"---\(more( \d+%)?\)---", " ")
        .start_mode("login")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srx_prompts() {
        let op = operator().unwrap();
        let login = op.prompts("login").unwrap();
        let private = op.prompts("configure_private").unwrap();

        assert!(login.is_match(b"show version\r\nadmin@srx-01> "));
        assert!(private.is_match(b"[edit]\r\nadmin@srx-01# "));
        assert!(!login.is_match(b"admin@srx-01# "));
        assert!(!private.is_match(b"admin@srx-01> "));
    }

    #[test]
    fn test_srx_errors() {
        let op = operator().unwrap();
        let errors = op.error_patterns();
        assert!(errors.is_match(b"\r\nerror: configuration check-out failed\r\n"));
        assert!(errors.is_match(b"          ^\r\nsyntax error.\r\n"));
        assert!(!errors.is_match(b"commit complete\r\n"));
    }

    #[test]
    fn test_srx_pager() {
        let op = operator().unwrap();
        let pager = op.pager().unwrap();
        assert!(pager.pattern.is_match(b"---(more 42%)---"));
        assert_eq!(pager.reply, " ");
    }
}
