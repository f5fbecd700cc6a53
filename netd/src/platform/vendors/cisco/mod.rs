//! Cisco ASA, IOS and NX-OS operators.
//!
//! All three share the IOS prompt shape:
//!
//! ```text
//! asa>                    # login
//! asa#                    # login_enable
//! asa(config)#            # configure_terminal
//! asa(config-network)#    # configure_terminal sub-mode
//! ```

pub mod asa;
pub mod ios;
pub mod nxos;

pub(crate) const LOGIN_PROMPT: &str = r"(?m)^[\w.\-@/:]{1,63}> ?$";
pub(crate) const ENABLE_PROMPT: &str = r"(?m)^[\w.\-@/:]{1,63}# ?$";
pub(crate) const CONFIG_PROMPT: &str = r"(?m)^[\w.\-@/:]{1,63}\(config[\w.\-@/:+]*\)# ?$";
