//! Rule manager: registers rules and runs them in two phases
//!
//! ```text
//! RuleManager ──prepare()──▶ PreparedRules ──evaluate()──▶ EvaluationReport
//!   register                  pre_validate on all           apply on all
//! ```
//!
//! Rules rely on each other's baseline: every `required` flag must be
//! cleared before any rule decides to set one. `prepare` consumes the
//! manager, so no rule can be added after the baseline was established and
//! no rule can be applied before it.

use crate::rule::Rule;
use crate::selector::RuleTypeSelector;
use apirules_core::{
    default_log, ApiParameter, LogHandle, ParamHandle, ResultEntry, Result, RulesError,
    ValidationResults,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Parameters of one request, looked up by name
#[derive(Debug, Default)]
pub struct ParamRegistry {
    params: Vec<ParamHandle>,
    by_name: HashMap<String, usize>,
}

impl ParamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter. Names must be unique.
    pub fn add(&mut self, param: ParamHandle) -> Result<ParamHandle> {
        let name = param.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(RulesError::DuplicateParameter(name));
        }
        self.by_name.insert(name, self.params.len());
        self.params.push(param.clone());
        Ok(param)
    }

    pub fn get(&self, name: &str) -> Option<&ParamHandle> {
        self.by_name.get(name).map(|&i| &self.params[i])
    }

    /// Like [`get`](Self::get), failing on unknown names
    pub fn resolve(&self, name: &str) -> Result<ParamHandle> {
        self.get(name)
            .cloned()
            .ok_or_else(|| RulesError::UnknownParameter(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamHandle> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Collects parameters and rules for one request
pub struct RuleManager {
    params: ParamRegistry,
    rules: Vec<Box<dyn Rule>>,
    log: LogHandle,
}

impl RuleManager {
    pub fn new() -> Self {
        Self::with_log(default_log())
    }

    /// Create a manager whose rules write to `log`
    pub fn with_log(log: LogHandle) -> Self {
        Self {
            params: ParamRegistry::new(),
            rules: Vec::new(),
            log,
        }
    }

    /// Log sink handed to rules built through the selector
    pub fn log(&self) -> LogHandle {
        self.log.clone()
    }

    /// Register a request parameter
    pub fn add_param(&mut self, param: ParamHandle) -> Result<ParamHandle> {
        self.params.add(param)
    }

    /// Look up a registered parameter
    pub fn param(&self, name: &str) -> Result<ParamHandle> {
        self.params.resolve(name)
    }

    pub fn params(&self) -> &ParamRegistry {
        &self.params
    }

    /// Register a rule; rules run in registration order
    pub fn register<R: Rule + 'static>(&mut self, rule: R) -> &mut Self {
        debug!(rule_type = rule.id(), position = self.rules.len(), "Registering rule");
        self.rules.push(Box::new(rule));
        self
    }

    pub fn selector(&mut self) -> RuleTypeSelector<'_> {
        RuleTypeSelector::new(self)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rule_types(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Phase one: run `pre_validate` on every rule
    pub fn prepare(self) -> PreparedRules {
        info!(rules = self.rules.len(), params = self.params.len(), "Preparing rules");

        let mut rules = self.rules;
        for rule in rules.iter_mut() {
            rule.pre_validate();
        }

        PreparedRules {
            params: self.params,
            rules,
        }
    }

    /// Both phases in one call
    pub fn validate(self) -> EvaluationReport {
        self.prepare().evaluate()
    }
}

impl Default for RuleManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Rules whose baseline has been established
pub struct PreparedRules {
    params: ParamRegistry,
    rules: Vec<Box<dyn Rule>>,
}

impl PreparedRules {
    pub fn params(&self) -> &ParamRegistry {
        &self.params
    }

    /// Phase two: apply every rule in registration order
    pub fn evaluate(self) -> EvaluationReport {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let mut outcomes = Vec::with_capacity(self.rules.len());

        for (position, mut rule) in self.rules.into_iter().enumerate() {
            let results = rule.validation_results().clone();
            if !results.is_valid() {
                warn!(
                    trace_id = %trace_id,
                    rule_type = rule.id(),
                    position,
                    errors = results.errors().count(),
                    "Rule failed"
                );
            }
            outcomes.push(RuleOutcome {
                position,
                rule_type: rule.id().to_string(),
                results,
            });
        }

        let params = self.params.iter().map(|p| ParamSnapshot::of(&**p)).collect();

        let report = EvaluationReport {
            trace_id,
            evaluated_at: Utc::now(),
            outcomes,
            params,
        };
        info!(trace_id = %report.trace_id, "{}", report.summary());
        report
    }
}

/// Results of one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Registration position
    pub position: usize,
    pub rule_type: String,
    pub results: ValidationResults,
}

/// Parameter flags after evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSnapshot {
    pub name: String,
    pub has_value: bool,
    pub required: bool,
    pub invalidated: bool,
}

impl ParamSnapshot {
    fn of(param: &dyn ApiParameter) -> Self {
        Self {
            name: param.name().to_string(),
            has_value: param.has_value(),
            required: param.is_required(),
            invalidated: param.is_invalidated(),
        }
    }
}

/// Outcome of one evaluation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub trace_id: String,
    pub evaluated_at: DateTime<Utc>,
    pub outcomes: Vec<RuleOutcome>,
    pub params: Vec<ParamSnapshot>,
}

impl EvaluationReport {
    /// Valid when every rule is valid
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|o| o.results.is_valid())
    }

    pub fn errors(&self) -> Vec<&ResultEntry> {
        self.outcomes
            .iter()
            .flat_map(|o| o.results.errors())
            .collect()
    }

    pub fn failed_rules(&self) -> Vec<&RuleOutcome> {
        self.outcomes
            .iter()
            .filter(|o| !o.results.is_valid())
            .collect()
    }

    pub fn param(&self, name: &str) -> Option<&ParamSnapshot> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Whether any rule reported the given code
    pub fn has_code(&self, code: u32) -> bool {
        self.outcomes.iter().any(|o| o.results.contains_code(code))
    }

    pub fn summary(&self) -> String {
        let failed = self.failed_rules().len();
        if failed == 0 {
            format!("VALID: {} rules passed", self.outcomes.len())
        } else {
            format!(
                "INVALID: {} of {} rules failed ({} errors)",
                failed,
                self.outcomes.len(),
                self.errors().len()
            )
        }
    }
}
