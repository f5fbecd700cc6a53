//! Registry resolving a request's vendor/type to an operator.
//!
//! Operators are registered once, at startup, under a selector pattern over
//! `"<vendor>.<type>"`. Resolution returns the first registered operator
//! whose selector matches, case-insensitively. After startup the registry is
//! only read, so it can be shared behind an `Arc` with no locking.

use std::sync::Arc;

use log::debug;
use regex::{Regex, RegexBuilder};

use super::operator::Operator;
use super::vendors;
use crate::error::{PlatformError, Result};

#[derive(Debug)]
struct Entry {
    selector: Regex,
    operator: Arc<Operator>,
}

/// Registry of operators keyed by selector pattern.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in vendor operator.
    pub fn with_builtin_vendors() -> Result<Self> {
        let mut registry = Self::new();
        vendors::register_all(&mut registry)?;
        Ok(registry)
    }

    /// Register `operator` under `selector`.
    ///
    /// Selectors are tested in registration order, so an earlier, broader
    /// selector shadows a later one.
    pub fn register(&mut self, selector: &str, operator: Operator) -> Result<()> {
        let selector = RegexBuilder::new(selector)
            .case_insensitive(true)
            .build()
            .map_err(PlatformError::from)?;
        debug!("registry: {} -> {}", selector.as_str(), operator.name());
        self.entries.push(Entry {
            selector,
            operator: Arc::new(operator),
        });
        Ok(())
    }

    /// Resolve the operator for `vendor` and `kind`.
    pub fn resolve(&self, vendor: &str, kind: &str) -> Result<Arc<Operator>> {
        let key = format!("{vendor}.{kind}");
        self.entries
            .iter()
            .find(|e| e.selector.is_match(&key))
            .map(|e| e.operator.clone())
            .ok_or_else(|| PlatformError::NoOperator { selector: key }.into())
    }

    /// Names of registered operators, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.operator.name())
    }

    /// Registered operators, in registration order.
    pub fn operators(&self) -> impl Iterator<Item = &Arc<Operator>> {
        self.entries.iter().map(|e| &e.operator)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
