//! Request parameters
//!
//! Rules never own parameters. They receive shared handles and coordinate
//! with each other through the `required` and `invalidated` flags, which
//! are mutated through `&self` so a change made by one rule is visible to
//! every rule evaluated after it.

use crate::value::ParamValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared handle to a parameter
pub type ParamHandle = Arc<dyn ApiParameter>;

/// Contract every request parameter fulfills
pub trait ApiParameter: Send + Sync + fmt::Debug {
    /// Name of the parameter, unique within a request
    fn name(&self) -> &str;

    /// The resolved value, `None` when the request did not carry one
    fn value(&self) -> Option<&ParamValue>;

    /// Whether the value passes the parameter's own type/format checks
    fn is_valid(&self) -> bool;

    fn has_value(&self) -> bool {
        self.value().is_some()
    }

    fn make_required(&self, required: bool);

    fn is_required(&self) -> bool;

    /// Exclude the parameter from the active scenario.
    ///
    /// One-way: nothing can clear the flag again.
    fn invalidate(&self);

    fn is_invalidated(&self) -> bool;
}

/// Expected type of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    Any,
    String,
    Integer,
    Float,
    Boolean,
    List,
}

impl ParamType {
    /// Check a value against this type
    pub fn accepts(&self, value: &ParamValue) -> bool {
        matches!(
            (self, value),
            (ParamType::Any, _)
                | (ParamType::String, ParamValue::Str(_))
                | (ParamType::Integer, ParamValue::Int(_))
                | (ParamType::Float, ParamValue::Float(_))
                | (ParamType::Boolean, ParamValue::Bool(_))
                | (ParamType::List, ParamValue::List(_))
        )
    }
}

/// A single request parameter
#[derive(Debug)]
pub struct RequestParam {
    name: String,
    value: Option<ParamValue>,
    param_type: ParamType,
    required: AtomicBool,
    invalidated: AtomicBool,
}

impl RequestParam {
    /// Create a parameter without a value
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            param_type: ParamType::Any,
            required: AtomicBool::new(false),
            invalidated: AtomicBool::new(false),
        }
    }

    /// Set the value
    pub fn with_value(mut self, value: impl Into<ParamValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the value from an optional, `None` meaning absent
    pub fn with_optional_value(mut self, value: Option<ParamValue>) -> Self {
        self.value = value;
        self
    }

    /// Set the expected type
    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }

    /// Mark as required from the start
    pub fn required(self) -> Self {
        self.required.store(true, Ordering::Relaxed);
        self
    }

    pub fn param_type(&self) -> ParamType {
        self.param_type
    }

    /// Wrap into a shared handle
    pub fn into_handle(self) -> ParamHandle {
        Arc::new(self)
    }
}

impl ApiParameter for RequestParam {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Option<&ParamValue> {
        self.value.as_ref()
    }

    fn is_valid(&self) -> bool {
        match &self.value {
            Some(value) => self.param_type.accepts(value),
            None => true,
        }
    }

    fn make_required(&self, required: bool) {
        self.required.store(required, Ordering::Relaxed);
    }

    fn is_required(&self) -> bool {
        self.required.load(Ordering::Relaxed)
    }

    fn invalidate(&self) {
        self.invalidated.store(true, Ordering::Relaxed);
    }

    fn is_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::Relaxed)
    }
}

impl fmt::Display for RequestParam {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => write!(f, "{}=null", self.name),
        }
    }
}
