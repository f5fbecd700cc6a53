//! Operator definitions for multi-vendor support.
//!
//! This module defines the per-vendor descriptors (prompts per mode, mode
//! transitions, error signatures) and the registry that selects one for a
//! request.

mod operator;
mod registry;
pub mod vendors;

pub use operator::{LineBreak, Operator, OperatorBuilder, Pager, Step, StepInput};
pub use registry::Registry;
