//! Rule type selector
//!
//! Builds rules with the manager's log sink and registers them in call
//! order.

use crate::conditional::{
    RequiredIfOtherIsSetRule, RequiredIfOtherValueEquals, RULE_TYPE_REQUIRED_IF_OTHER_IS_SET,
    RULE_TYPE_REQUIRED_IF_OTHER_VALUE_EQUALS,
};
use crate::manager::RuleManager;
use crate::or_rule::{OrRule, RULE_TYPE_OR};
use crate::param_set::ParamSet;
use apirules_core::{ParamHandle, ParamValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported rule types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Or,
    RequiredIfOtherIsSet,
    RequiredIfOtherValueEquals,
}

impl RuleType {
    pub const ALL: [RuleType; 3] = [
        RuleType::Or,
        RuleType::RequiredIfOtherIsSet,
        RuleType::RequiredIfOtherValueEquals,
    ];

    /// The rule type ID reported by rules of this type
    pub fn id(&self) -> &'static str {
        match self {
            RuleType::Or => RULE_TYPE_OR,
            RuleType::RequiredIfOtherIsSet => RULE_TYPE_REQUIRED_IF_OTHER_IS_SET,
            RuleType::RequiredIfOtherValueEquals => RULE_TYPE_REQUIRED_IF_OTHER_VALUE_EQUALS,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Registers rules on a [`RuleManager`]
pub struct RuleTypeSelector<'a> {
    manager: &'a mut RuleManager,
}

impl<'a> RuleTypeSelector<'a> {
    pub fn new(manager: &'a mut RuleManager) -> Self {
        Self { manager }
    }

    /// OR rule over parameter lists, one set per list, in priority order
    pub fn or_rule(
        &mut self,
        sets: impl IntoIterator<Item = Vec<ParamHandle>>,
    ) -> &mut Self {
        let rule = sets
            .into_iter()
            .fold(OrRule::new(self.manager.log()), |rule, set| rule.or_params(set));
        self.manager.register(rule);
        self
    }

    /// OR rule over prebuilt sets
    pub fn or_sets(&mut self, sets: impl IntoIterator<Item = ParamSet>) -> &mut Self {
        let rule = sets
            .into_iter()
            .fold(OrRule::new(self.manager.log()), |rule, set| rule.or_set(set));
        self.manager.register(rule);
        self
    }

    pub fn required_if_other_is_set(
        &mut self,
        target: ParamHandle,
        other: ParamHandle,
    ) -> &mut Self {
        let rule = RequiredIfOtherIsSetRule::new(target, other, self.manager.log());
        self.manager.register(rule);
        self
    }

    pub fn required_if_other_value_equals(
        &mut self,
        target: ParamHandle,
        other: ParamHandle,
        expected: impl Into<ParamValue>,
    ) -> &mut Self {
        let rule = RequiredIfOtherValueEquals::new(target, other, expected, self.manager.log());
        self.manager.register(rule);
        self
    }
}
