//! Parameter sets
//!
//! An ordered, named group of parameters evaluated as one unit.

use apirules_core::{ApiParameter, LogHandle, ParamHandle};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

static SET_SEQUENCE: AtomicUsize = AtomicUsize::new(0);

fn next_set_id() -> String {
    format!("param{}", SET_SEQUENCE.fetch_add(1, Ordering::Relaxed) + 1)
}

/// True when every parameter is valid and carries a value.
///
/// Stops at the first failing parameter. An empty slice is vacuously
/// complete.
pub fn params_complete(params: &[ParamHandle]) -> bool {
    params.iter().all(|p| p.is_valid() && p.has_value())
}

/// A group of parameters that must be satisfied together
#[derive(Clone)]
pub struct ParamSet {
    id: String,
    label: Option<String>,
    params: Vec<ParamHandle>,
    log: Option<LogHandle>,
}

impl ParamSet {
    /// Create a set. Without an ID one is generated (`param1`, `param2`, ...)
    pub fn new(id: Option<String>, params: Vec<ParamHandle>) -> Self {
        Self {
            id: id.unwrap_or_else(next_set_id),
            label: None,
            params,
            log: None,
        }
    }

    /// Create an empty set with a generated ID
    pub fn auto() -> Self {
        Self::new(None, Vec::new())
    }

    /// Set a human-readable label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Write diagnostics for flag changes to `log`
    pub fn with_log(mut self, log: LogHandle) -> Self {
        self.log = Some(log);
        self
    }

    /// Append a parameter
    pub fn add_param(mut self, param: ParamHandle) -> Self {
        self.params.push(param);
        self
    }

    /// Append several parameters, keeping their order
    pub fn add_params(mut self, params: impl IntoIterator<Item = ParamHandle>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The label, or the ID when no label was given
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    pub fn params(&self) -> &[ParamHandle] {
        &self.params
    }

    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Every member is valid and has a value
    pub fn is_valid(&self) -> bool {
        params_complete(&self.params)
    }

    fn note(&self, action: &str) {
        if let Some(log) = &self.log {
            log.log(&self.id, &format!("{} [{}]", action, self));
        }
    }

    /// Mark every member as required
    pub fn apply(&self) -> &Self {
        self.note("Requiring");
        for param in &self.params {
            param.make_required(true);
        }
        self
    }

    /// Invalidate every member
    pub fn invalidate(&self) -> &Self {
        self.note("Invalidating");
        for param in &self.params {
            param.invalidate();
        }
        self
    }

    /// Mark every member as not required
    pub fn reset_required_state(&self) -> &Self {
        self.note("Resetting required state of");
        for param in &self.params {
            param.make_required(false);
        }
        self
    }
}

impl fmt::Debug for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ParamSet")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("params", &self.params)
            .finish()
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.names().join(", "))
    }
}
