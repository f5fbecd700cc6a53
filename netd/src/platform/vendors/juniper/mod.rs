//! Juniper operators: JUNOS SRX and ScreenOS SSG.

pub mod srx;
pub mod ssg;
