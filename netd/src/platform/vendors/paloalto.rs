//! Palo Alto Networks PAN-OS operator.
//!
//! ```text
//! admin@PA-VM>            # login
//! [edit]
//! admin@PA-VM#            # configure
//! ```

use crate::error::Result;
use crate::platform::{Operator, Step};

pub const SELECTOR: &str = r"^paloalto\.pan-?os$";

pub fn operator() -> Result<Operator> {
    Operator::builder("paloalto_panos")
        .mode("login", [r"(?m)^[\w.\-]+@[\w.\-()]+> ?$"])
        .mode("configure", [r"(?m)^[\w.\-]+@[\w.\-()]+# ?$"])
        .transition("login", "configure", [Step::send("configure")])
        .error(r"Unknown command: ")
        .error(r"Invalid syntax\.")
        .error(r"Server error ?:")
        .error(r"(?m)^Commit failed")
        .error(r"Validation Error:")
        .start_mode("login")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panos_prompts() {
        let op = operator().unwrap();
        assert!(op.prompts("login").unwrap().is_match(b"admin@PA-VM> "));
        assert!(op.prompts("configure").unwrap().is_match(b"[edit]\r\nadmin@PA-VM# "));
        assert!(!op.prompts("login").unwrap().is_match(b"admin@PA-VM# "));
    }

    #[test]
    fn test_panos_errors() {
        let op = operator().unwrap();
        assert!(op.error_patterns().is_match(b"Unknown command: sett\r\n"));
        assert!(!op.error_patterns().is_match(b"Configuration committed successfully\r\n"));
    }
}
