//! Rule skeleton
//!
//! Every rule follows the same lifecycle:
//!
//! ```text
//! construct → pre_validate() → apply() → is_valid() / validation_results()
//!                                 │
//!                        validate() runs once
//! ```
//!
//! `pre_validate` establishes the baseline flags and must run for every
//! rule of a request before any rule is applied; [`RuleManager`] enforces
//! that order. `apply`, `is_valid` and `validation_results` all trigger the
//! same memoized evaluation, so a rule's logic runs at most once per
//! instance and there is no way to reset it.
//!
//! [`RuleManager`]: crate::manager::RuleManager

use apirules_core::{LogHandle, ValidationResults};
use serde::{Deserialize, Serialize};

/// Evaluation state of a rule. Moves from `Pending` to `Validated` once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleState {
    Pending,
    Validated,
}

/// State shared by all rule implementations
pub struct RuleBase {
    state: RuleState,
    results: ValidationResults,
    log: LogHandle,
}

impl RuleBase {
    /// Create the base for a rule of the given type
    pub fn new(type_id: &str, log: LogHandle) -> Self {
        Self {
            state: RuleState::Pending,
            results: ValidationResults::new(type_id),
            log,
        }
    }

    pub fn state(&self) -> RuleState {
        self.state
    }

    pub fn results(&self) -> &ValidationResults {
        &self.results
    }

    /// The sink this rule writes to
    pub fn log_handle(&self) -> LogHandle {
        self.log.clone()
    }

    /// Write a diagnostic line attributed to this rule
    pub fn log(&self, message: &str) {
        self.log.log(&self.results.subject, message);
    }

    fn complete(&mut self, results: ValidationResults) {
        if self.state == RuleState::Pending {
            self.results = results;
            self.state = RuleState::Validated;
        }
    }
}

impl std::fmt::Debug for RuleBase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("RuleBase")
            .field("state", &self.state)
            .field("results", &self.results)
            .finish()
    }
}

/// A validation rule over one or more parameters
///
/// [`validate`](Rule::validate) is the implementation hook and carries no
/// memoization of its own. Calling it directly runs the rule's side effects
/// again and writes to the caller's accumulator, leaving the rule's own
/// state and results untouched. Callers go through
/// [`apply`](Rule::apply), [`is_valid`](Rule::is_valid) or
/// [`validation_results`](Rule::validation_results).
pub trait Rule: Send + Sync {
    /// Rule type ID (constant per rule type)
    fn id(&self) -> &'static str;

    fn base(&self) -> &RuleBase;

    fn base_mut(&mut self) -> &mut RuleBase;

    /// Establish the baseline `required`/`invalidated` flags.
    fn pre_validate(&mut self);

    /// The rule's logic. Append to `results` only on failure.
    ///
    /// Only [`Rule::apply`] calls this; see the trait docs.
    fn validate(&mut self, results: &mut ValidationResults);

    fn state(&self) -> RuleState {
        self.base().state()
    }

    /// Run the rule's logic if it has not run yet
    fn apply(&mut self) {
        if self.base().state() == RuleState::Validated {
            return;
        }

        let mut results = ValidationResults::new(self.id());
        self.validate(&mut results);
        self.base_mut().complete(results);
    }

    fn is_valid(&mut self) -> bool {
        self.apply();
        self.base().results().is_valid()
    }

    fn validation_results(&mut self) -> &ValidationResults {
        self.apply();
        self.base().results()
    }
}
