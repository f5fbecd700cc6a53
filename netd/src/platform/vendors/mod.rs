//! Built-in vendor operators.
//!
//! Each vendor module exposes a `SELECTOR` over `"<vendor>.<type>"` and an
//! `operator()` constructor. [`register_all`] is the single place that wires
//! them into a [`Registry`]; it runs once at startup.

pub mod cisco;
pub mod dptech;
pub mod fortinet;
pub mod h3c;
pub mod hillstone;
pub mod huawei;
pub mod juniper;
pub mod paloalto;
pub mod topsec;

use crate::error::Result;
use crate::platform::Registry;

/// Password prompt shown mid-transition by devices with an enable secret.
pub(crate) const PASSWORD_PROMPT: &str = r"(?mi)^password: ?$";

/// Register every built-in operator, in resolution order.
pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(cisco::asa::SELECTOR, cisco::asa::operator()?)?;
    registry.register(cisco::ios::SELECTOR, cisco::ios::operator()?)?;
    registry.register(cisco::nxos::SELECTOR, cisco::nxos::operator()?)?;
    registry.register(juniper::srx::SELECTOR, juniper::srx::operator()?)?;
    registry.register(juniper::ssg::SELECTOR, juniper::ssg::operator()?)?;
    registry.register(paloalto::SELECTOR, paloalto::operator()?)?;
    registry.register(huawei::SELECTOR, huawei::operator()?)?;
    registry.register(h3c::SELECTOR, h3c::operator()?)?;
    registry.register(dptech::SELECTOR, dptech::operator()?)?;
    registry.register(fortinet::SELECTOR, fortinet::operator()?)?;
    registry.register(hillstone::SELECTOR, hillstone::operator()?)?;
    registry.register(topsec::SELECTOR, topsec::operator()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::platform::Registry;

    #[test]
    fn test_builtin_registry_resolves_known_devices() {
        let registry = Registry::with_builtin_vendors().unwrap();
        assert_eq!(registry.len(), 12);
        let cases = [
            ("cisco", "asa", "cisco_asa"),
            ("cisco", "IOS", "cisco_ios"),
            ("cisco", "NX-OS", "cisco_nxos"),
            ("juniper", "srx", "juniper_srx"),
            ("juniper", "SSG", "juniper_ssg"),
            ("paloalto", "pan-os", "paloalto_panos"),
            ("huawei", "usg", "huawei_usg"),
            ("H3C", "SecPath", "h3c_secpath"),
            ("h3c", "secpath", "h3c_secpath"),
            ("dptech", "fw1000", "dptech_fw1000"),
            ("fortinet", "FortiGate-VM64-KVM", "fortinet_fortigate"),
            ("hillstone", "SG-6000-VM01", "hillstone_sg6000"),
            ("topsec", "NGFW4000", "topsec_ngfw"),
        ];
        for (vendor, kind, name) in cases {
            let op = registry.resolve(vendor, kind).unwrap();
            assert_eq!(op.name(), name, "{vendor}.{kind}");
        }
        assert!(registry.resolve("cisco", "wlc").is_err());
    }

    #[test]
    fn test_every_builtin_graph_is_well_formed() {
        let registry = Registry::with_builtin_vendors().unwrap();
        for op in registry.operators() {
            assert!(op.prompts(op.start_mode()).is_some(), "{}", op.name());
            for mode in op.modes() {
                assert!(!op.prompts(mode).unwrap().is_empty(), "{}: {mode}", op.name());
            }
            for (from, to) in op.transition_pairs() {
                assert!(!op.prompts(from).unwrap().is_empty(), "{}: {from}", op.name());
                assert!(!op.prompts(to).unwrap().is_empty(), "{}: {to}", op.name());
                assert!(!op.transitions(from, to).unwrap().is_empty());
            }
        }
    }
}
