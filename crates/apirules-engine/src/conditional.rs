//! Conditional requirement rules
//!
//! These rules never report errors themselves. They only decide whether
//! the target parameter is required; the required-field check that reports
//! a missing value happens elsewhere.
//!
//! Both rules skip evaluation when either parameter was invalidated by an
//! earlier rule (for example a losing branch of an [`OrRule`]).
//!
//! [`OrRule`]: crate::or_rule::OrRule

use crate::rule::{Rule, RuleBase};
use apirules_core::{ApiParameter, LogHandle, ParamHandle, ParamValue, ValidationResults};

/// Rule type ID of [`RequiredIfOtherIsSetRule`]
pub const RULE_TYPE_REQUIRED_IF_OTHER_IS_SET: &str = "required_if_other_is_set";

/// Rule type ID of [`RequiredIfOtherValueEquals`]
pub const RULE_TYPE_REQUIRED_IF_OTHER_VALUE_EQUALS: &str = "required_if_other_value_equals";

/// Whether either parameter left the active scenario
fn skipped(base: &RuleBase, target: &ParamHandle, other: &ParamHandle) -> bool {
    if target.is_invalidated() || other.is_invalidated() {
        base.log(&format!(
            "Skipping, [{}] or [{}] is invalidated",
            target.name(),
            other.name()
        ));
        return true;
    }
    false
}

/// Makes `target` required when `other` has a value
#[derive(Debug)]
pub struct RequiredIfOtherIsSetRule {
    base: RuleBase,
    target: ParamHandle,
    other: ParamHandle,
}

impl RequiredIfOtherIsSetRule {
    pub fn new(target: ParamHandle, other: ParamHandle, log: LogHandle) -> Self {
        Self {
            base: RuleBase::new(RULE_TYPE_REQUIRED_IF_OTHER_IS_SET, log),
            target,
            other,
        }
    }

    pub fn target(&self) -> &ParamHandle {
        &self.target
    }

    pub fn other(&self) -> &ParamHandle {
        &self.other
    }
}

impl Rule for RequiredIfOtherIsSetRule {
    fn id(&self) -> &'static str {
        RULE_TYPE_REQUIRED_IF_OTHER_IS_SET
    }

    fn base(&self) -> &RuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RuleBase {
        &mut self.base
    }

    fn pre_validate(&mut self) {
        self.target.make_required(false);
    }

    fn validate(&mut self, _results: &mut ValidationResults) {
        if skipped(&self.base, &self.target, &self.other) {
            return;
        }

        if self.other.value().is_some() {
            self.base.log(&format!(
                "[{}] is set, [{}] is now required",
                self.other.name(),
                self.target.name()
            ));
            self.target.make_required(true);
        }
    }
}

/// Makes `target` required when `other` holds exactly `expected`.
///
/// Comparison is strict: the string `"1"` does not match the integer `1`.
#[derive(Debug)]
pub struct RequiredIfOtherValueEquals {
    base: RuleBase,
    target: ParamHandle,
    other: ParamHandle,
    expected: ParamValue,
}

impl RequiredIfOtherValueEquals {
    pub fn new(
        target: ParamHandle,
        other: ParamHandle,
        expected: impl Into<ParamValue>,
        log: LogHandle,
    ) -> Self {
        Self {
            base: RuleBase::new(RULE_TYPE_REQUIRED_IF_OTHER_VALUE_EQUALS, log),
            target,
            other,
            expected: expected.into(),
        }
    }

    pub fn expected(&self) -> &ParamValue {
        &self.expected
    }
}

impl Rule for RequiredIfOtherValueEquals {
    fn id(&self) -> &'static str {
        RULE_TYPE_REQUIRED_IF_OTHER_VALUE_EQUALS
    }

    fn base(&self) -> &RuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RuleBase {
        &mut self.base
    }

    fn pre_validate(&mut self) {
        self.target.make_required(false);
    }

    fn validate(&mut self, _results: &mut ValidationResults) {
        if skipped(&self.base, &self.target, &self.other) {
            return;
        }

        if self.other.value() == Some(&self.expected) {
            self.base.log(&format!(
                "[{}] equals {}, [{}] is now required",
                self.other.name(),
                self.expected,
                self.target.name()
            ));
            self.target.make_required(true);
        }
    }
}
