//! Cisco IOS / IOS-XE operator.

use crate::error::Result;
use crate::platform::vendors::PASSWORD_PROMPT;
use crate::platform::{Operator, Step};

use super::{CONFIG_PROMPT, ENABLE_PROMPT, LOGIN_PROMPT};

pub const SELECTOR: &str = r"^cisco\.ios(-?xe)?$";

pub fn operator() -> Result<Operator> {
    Operator::builder("cisco_ios")
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
        .error(r"% Invalid input")
        .error(r"% Incomplete command")
        .error(r"% Ambiguous command")
        .error(r"% Unknown command")
        .error(r"(?m)^% No password set")
        .pager(r" --More-- ", " ")
        .start_mode("login")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ios_prompts() {
        let op = operator().unwrap();
        assert!(op.prompts("login").unwrap().is_match(b"Router>"));
        assert!(op.prompts("login_enable").unwrap().is_match(b"Router#"));
        assert!(op.prompts("configure_terminal").unwrap().is_match(b"Router(config-if)#"));
        assert!(op.error_patterns().is_match(b"% Invalid input detected at '^' marker."));
        assert!(op.error_patterns().is_match(b"enable\r\n% No password set\r\nRouter>"));
    }

    #[tokio::test]
    async fn test_enable_without_secret_fails_fast() {
        use std::time::Duration;

        use tokio_test::io::Builder;

        use crate::driver::{Executor, SessionRequest, Stage};
        use crate::error::{DriverError, Error};
        use crate::transport::mock::MockConnector;

        let device = Builder::new()
            .read(b"Router>")
            .write(b"enable\n")
            .read(b"enable\r\n% No password set\r\nRouter>")
            .build();
        let executor = Executor::new(MockConnector::new([device]));
        let request = SessionRequest::builder("192.0.2.1")
            .username("admin")
            .password("r00tme")
            .mode("login_enable")
            .command("show version")
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        let result = executor.run(&operator().unwrap(), &request).await;

        let failure = result.failure.as_ref().unwrap();
        assert_eq!(failure.stage, Stage::Transition);
        assert!(matches!(
            failure.error,
            Error::Driver(DriverError::TransitionRejected { ref pattern, .. })
                if pattern == "(?m)^% No password set"
        ));
        assert!(result.outputs.is_empty());
        assert_eq!(executor.connector().closes(), 1);
    }
}
