//! apirules Engine: Parameter Rules for API Methods
//!
//! Rules coordinate through the `required` and `invalidated` flags of the
//! parameters they share, and report failures as data.
//!
//! # Architecture
//!
//! ```text
//! Parameters ─▶ RuleManager ──prepare()──▶ PreparedRules ──evaluate()──▶ EvaluationReport
//!                  │                          │                              │
//!            RuleTypeSelector           pre_validate()                 ValidationResults
//!            RuleConfig (YAML)           on every rule                   per rule
//! ```
//!
//! # Example
//!
//! ```
//! use apirules_engine::{RuleManager, VALIDATION_NO_PARAM_SET_MATCHED};
//! use apirules_core::{ApiParameter, RequestParam};
//!
//! let mut manager = RuleManager::new();
//! let username = manager.add_param(RequestParam::new("username").with_value("bob").into_handle()).unwrap();
//! let password = manager.add_param(RequestParam::new("password").with_value("secret").into_handle()).unwrap();
//! let token = manager.add_param(RequestParam::new("apiToken").into_handle()).unwrap();
//!
//! manager
//!     .selector()
//!     .or_rule(vec![vec![username.clone(), password.clone()], vec![token.clone()]]);
//!
//! let report = manager.prepare().evaluate();
//!
//! assert!(report.is_valid());
//! assert!(username.is_required() && password.is_required());
//! assert!(token.is_invalidated());
//! assert!(!report.has_code(VALIDATION_NO_PARAM_SET_MATCHED));
//! ```
//!
//! # Configuration
//!
//! ```
//! use apirules_engine::{RuleConfig, RuleManager};
//! use apirules_core::RequestParam;
//!
//! let config = RuleConfig::from_yaml(r#"
//! rules:
//!   - type: required_if_other_is_set
//!     target: password
//!     other: username
//! "#).unwrap();
//!
//! let mut manager = RuleManager::new();
//! manager.add_param(RequestParam::new("username").into_handle()).unwrap();
//! manager.add_param(RequestParam::new("password").into_handle()).unwrap();
//! config.register(&mut manager).unwrap();
//!
//! assert!(manager.validate().is_valid());
//! ```

pub mod conditional;
pub mod config;
pub mod manager;
pub mod or_rule;
pub mod param_set;
pub mod rule;
pub mod selector;

// Rules
pub use conditional::{
    RequiredIfOtherIsSetRule, RequiredIfOtherValueEquals, RULE_TYPE_REQUIRED_IF_OTHER_IS_SET,
    RULE_TYPE_REQUIRED_IF_OTHER_VALUE_EQUALS,
};
pub use or_rule::{OrRule, RULE_TYPE_OR, VALIDATION_NO_PARAM_SET_MATCHED};
pub use rule::{Rule, RuleBase, RuleState};

// Sets
pub use param_set::{params_complete, ParamSet};

// Wiring
pub use config::{RuleConfig, RuleSpec};
pub use manager::{
    EvaluationReport, ParamRegistry, ParamSnapshot, PreparedRules, RuleManager, RuleOutcome,
};
pub use selector::{RuleType, RuleTypeSelector};

#[cfg(test)]
mod tests {
    use super::*;
    use apirules_core::{ApiParameter, RequestParam};

    #[test]
    fn test_or_then_conditional_workflow() {
        // The conditional rule references a parameter of the losing branch
        let mut manager = RuleManager::new();
        let user = manager
            .add_param(RequestParam::new("username").with_value("bob").into_handle())
            .unwrap();
        let pass = manager
            .add_param(RequestParam::new("password").into_handle())
            .unwrap();
        let token = manager
            .add_param(RequestParam::new("apiToken").with_value("tok").into_handle())
            .unwrap();

        manager
            .selector()
            .or_rule(vec![vec![user.clone(), pass.clone()], vec![token.clone()]])
            .required_if_other_is_set(pass.clone(), user.clone());

        let report = manager.validate();

        assert!(report.is_valid());
        assert!(token.is_required());
        assert!(user.is_invalidated() && pass.is_invalidated());
        assert!(!pass.is_required());
    }

    #[test]
    fn test_conditional_applies_without_or() {
        let mut manager = RuleManager::new();
        let user = manager
            .add_param(RequestParam::new("username").with_value("bob").into_handle())
            .unwrap();
        let pass = manager
            .add_param(RequestParam::new("password").into_handle())
            .unwrap();

        manager.selector().required_if_other_is_set(pass.clone(), user);

        let report = manager.validate();
        assert!(report.is_valid());
        assert!(pass.is_required());
        assert!(report.param("password").unwrap().required);
    }
}
