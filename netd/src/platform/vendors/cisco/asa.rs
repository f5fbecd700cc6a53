//! Cisco ASA (9.x) operator.

use crate::error::Result;
use crate::platform::vendors::PASSWORD_PROMPT;
use crate::platform::{Operator, Step};
use crate::transport::ShellRequest;

use super::{CONFIG_PROMPT, ENABLE_PROMPT, LOGIN_PROMPT};

pub const SELECTOR: &str = r"^cisco\.asa$";

pub fn operator() -> Result<Operator> {
    Operator::builder("cisco_asa")
        .mode("login", [LOGIN_PROMPT])
        .mode("login_enable", [ENABLE_PROMPT])
        .mode("configure_terminal", [CONFIG_PROMPT])
        .transition(
            "login",
            "login_enable",
            [Step::send("enable").until(PASSWORD_PROMPT)?, Step::enable_password()],
        )
        .transition(
            "login",
            "configure_terminal",
            [
                Step::send("enable").until(PASSWORD_PROMPT)?,
                Step::enable_password(),
                Step::send("configure terminal"),
            ],
        )
        .transition(
            "login_enable",
            "configure_terminal",
            [Step::send("configure terminal")],
        )
        .error(r"ERROR: ")
        .error(r"% Invalid input")
        .error(r"Command authorization failed")
        .pager(r"<--- More --->", " ")
        .start_mode("login")
        .shell(ShellRequest::pty(511, 24))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::matches_any;

    #[test]
    fn test_asa_prompts() {
        let op = operator().unwrap();
        let login = op.prompts("login").unwrap();
        let enable = op.prompts("login_enable").unwrap();
        let config = op.prompts("configure_terminal").unwrap();

        assert!(matches_any(b"asaNAT> ", login));
        assert!(matches_any(b"TFTF-ASA5512x> ", login));
        assert!(matches_any(b"TFTF-ASA5512x# ", enable));
        assert!(matches_any(b"show run\r\nasa(config)# ", config));
        assert!(matches_any(b"asa(config-network-object)# ", config));

        assert!(!matches_any(b"asa(config)# ", enable));
        assert!(!matches_any(b"asa# ", login));
    }

    #[test]
    fn test_asa_enable_transition_asks_for_password() {
        let op = operator().unwrap();
        let steps = op.transitions("login", "configure_terminal").unwrap();
        assert_eq!(steps.len(), 3);
        assert!(steps[0].boundary().unwrap().is_match(b"enable\r\nPassword: "));
        assert!(steps[1].is_hidden());
        assert!(steps[2].boundary().is_none());
    }

    #[test]
    fn test_asa_errors() {
        let op = operator().unwrap();
        let errors = op.error_patterns();
        assert!(errors.is_match(b"ERROR: % Invalid input detected at '^' marker."));
        assert!(!errors.is_match(b"Cryptochecksum: 1a2b3c"));
    }
}
