//! Declarative rule configuration
//!
//! Rules can be described in YAML or JSON and registered against the
//! parameters of a [`RuleManager`]:
//!
//! ```yaml
//! rules:
//!   - type: or
//!     sets:
//!       - [username, password]
//!       - [apiToken]
//!   - type: required_if_other_value_equals
//!     target: reason
//!     other: status
//!     expected: "closed"
//! ```

use crate::manager::RuleManager;
use crate::selector::RuleType;
use apirules_core::{ParamHandle, ParamValue, Result, RulesError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One rule, tagged by its type ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleSpec {
    Or {
        sets: Vec<Vec<String>>,
    },
    RequiredIfOtherIsSet {
        target: String,
        other: String,
    },
    RequiredIfOtherValueEquals {
        target: String,
        other: String,
        expected: ParamValue,
    },
}

impl RuleSpec {
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleSpec::Or { .. } => RuleType::Or,
            RuleSpec::RequiredIfOtherIsSet { .. } => RuleType::RequiredIfOtherIsSet,
            RuleSpec::RequiredIfOtherValueEquals { .. } => RuleType::RequiredIfOtherValueEquals,
        }
    }
}

/// An ordered list of rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl RuleConfig {
    /// Load from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| RulesError::ParseError(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Load from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RulesError::ParseError(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            RulesError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| RulesError::ParseError(e.to_string()))
    }

    /// Reject rules that can never pass
    fn check(&self) -> Result<()> {
        for (i, rule) in self.rules.iter().enumerate() {
            if let RuleSpec::Or { sets } = rule {
                if sets.is_empty() {
                    return Err(RulesError::ConfigError(format!(
                        "rule #{} (or) has no parameter sets",
                        i
                    )));
                }
                if sets.iter().any(Vec::is_empty) {
                    tracing::warn!(rule = i, "OR rule contains an empty set, it always matches");
                }
            }
        }
        Ok(())
    }

    /// Resolve parameter names and register every rule, in order.
    ///
    /// Nothing is registered when a name cannot be resolved.
    pub fn register(&self, manager: &mut RuleManager) -> Result<()> {
        let mut resolved = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            resolved.push(Resolved::of(rule, manager)?);
        }

        let mut selector = manager.selector();
        for rule in resolved {
            match rule {
                Resolved::Or(sets) => {
                    selector.or_rule(sets);
                }
                Resolved::IsSet(target, other) => {
                    selector.required_if_other_is_set(target, other);
                }
                Resolved::ValueEquals(target, other, expected) => {
                    selector.required_if_other_value_equals(target, other, expected);
                }
            }
        }
        Ok(())
    }
}

/// A rule whose names were resolved to handles
enum Resolved {
    Or(Vec<Vec<ParamHandle>>),
    IsSet(ParamHandle, ParamHandle),
    ValueEquals(ParamHandle, ParamHandle, ParamValue),
}

impl Resolved {
    fn of(rule: &RuleSpec, manager: &RuleManager) -> Result<Self> {
        Ok(match rule {
            RuleSpec::Or { sets } => Resolved::Or(
                sets.iter()
                    .map(|set| {
                        set.iter()
                            .map(|name| manager.param(name))
                            .collect::<Result<Vec<_>>>()
                    })
                    .collect::<Result<_>>()?,
            ),
            RuleSpec::RequiredIfOtherIsSet { target, other } => {
                Resolved::IsSet(manager.param(target)?, manager.param(other)?)
            }
            RuleSpec::RequiredIfOtherValueEquals {
                target,
                other,
                expected,
            } => Resolved::ValueEquals(
                manager.param(target)?,
                manager.param(other)?,
                expected.clone(),
            ),
        })
    }
}
