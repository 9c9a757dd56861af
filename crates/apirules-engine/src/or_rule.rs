//! OR rule: alternative parameter sets
//!
//! Accepts a request when at least one of several parameter sets is fully
//! provided. Sets are checked in registration order and the first complete
//! one wins; there is no scoring beyond that order.
//!
//! Once a set is selected its parameters become required and the parameters
//! of every other set are invalidated, so rules evaluated later treat them
//! as outside the active scenario. A parameter that also belongs to the
//! selected set is never invalidated.

use crate::param_set::{params_complete, ParamSet};
use crate::rule::{Rule, RuleBase};
use apirules_core::{ApiParameter, LogHandle, ParamHandle, ValidationResults};
use std::sync::Arc;

/// Rule type ID
pub const RULE_TYPE_OR: &str = "or";

/// None of the registered parameter sets was complete
pub const VALIDATION_NO_PARAM_SET_MATCHED: u32 = 183001;

/// Handles pointing at the same parameter
fn same_param(a: &ParamHandle, b: &ParamHandle) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Selects the first complete parameter set
#[derive(Debug)]
pub struct OrRule {
    base: RuleBase,
    sets: Vec<ParamSet>,
    selected: Option<usize>,
}

impl OrRule {
    pub fn new(log: LogHandle) -> Self {
        Self {
            base: RuleBase::new(RULE_TYPE_OR, log),
            sets: Vec::new(),
            selected: None,
        }
    }

    /// Add a set made of a single parameter
    pub fn or_param(self, param: ParamHandle) -> Self {
        self.or_params(vec![param])
    }

    /// Add a set made of the given parameters
    pub fn or_params(self, params: impl IntoIterator<Item = ParamHandle>) -> Self {
        let set = ParamSet::auto()
            .with_log(self.base.log_handle())
            .add_params(params);
        self.or_set(set)
    }

    /// Add a prebuilt set
    pub fn or_set(mut self, set: ParamSet) -> Self {
        self.sets.push(set);
        self
    }

    pub fn sets(&self) -> &[ParamSet] {
        &self.sets
    }

    /// Index of the winning set, once evaluated
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_set(&self) -> Option<&ParamSet> {
        self.selected.and_then(|i| self.sets.get(i))
    }

    /// All sets as `a, b | c`
    pub fn describe_sets(&self) -> String {
        self.sets
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Rule for OrRule {
    fn id(&self) -> &'static str {
        RULE_TYPE_OR
    }

    fn base(&self) -> &RuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RuleBase {
        &mut self.base
    }

    fn pre_validate(&mut self) {
        // Nothing may look required before a set is selected
        for set in &self.sets {
            set.reset_required_state();
        }
    }

    fn validate(&mut self, results: &mut ValidationResults) {
        self.base
            .log(&format!("Evaluating {} parameter sets: {}", self.sets.len(), self.describe_sets()));

        // Select first, write flags after, so earlier sets are never
        // modified while later ones are checked.
        let winner = self.sets.iter().position(|set| params_complete(set.params()));

        let Some(index) = winner else {
            self.base.log("No parameter set matched");
            results.add_error(
                format!(
                    "None of the parameter sets matched. Valid sets are: {}",
                    self.describe_sets()
                ),
                VALIDATION_NO_PARAM_SET_MATCHED,
            );
            return;
        };

        let winner = &self.sets[index];
        winner.apply();

        // Sets may share parameters; those stay with the winner
        for (i, set) in self.sets.iter().enumerate() {
            if i == index {
                continue;
            }
            for param in set.params() {
                if !winner.params().iter().any(|w| same_param(w, param)) {
                    param.invalidate();
                }
            }
        }

        self.selected = Some(index);
        self.base.log(&format!(
            "Selected set #{} [{}] ({})",
            index,
            self.sets[index],
            self.sets[index].label()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apirules_core::{default_log, MemoryLog, RequestParam};

    fn filled(name: &str) -> ParamHandle {
        RequestParam::new(name).with_value("x").into_handle()
    }

    fn empty(name: &str) -> ParamHandle {
        RequestParam::new(name).into_handle()
    }

    fn prepared(rule: OrRule) -> OrRule {
        let mut rule = rule;
        rule.pre_validate();
        rule
    }

    #[test]
    fn test_first_match_wins() {
        let (a, b, c) = (filled("a"), filled("b"), empty("c"));
        let mut rule = prepared(
            OrRule::new(default_log())
                .or_param(a.clone())
                .or_param(b.clone())
                .or_param(c.clone()),
        );

        assert!(rule.is_valid());
        assert_eq!(rule.selected(), Some(0));
        assert!(a.is_required());
        assert!(!a.is_invalidated());
        assert!(b.is_invalidated());
        assert!(!b.is_required());
        assert!(c.is_invalidated());
    }

    #[test]
    fn test_later_set_wins_when_earlier_incomplete() {
        let (user, pass, token) = (filled("username"), empty("password"), filled("apiToken"));
        let mut rule = prepared(
            OrRule::new(default_log())
                .or_params(vec![user.clone(), pass.clone()])
                .or_param(token.clone()),
        );

        assert!(rule.is_valid());
        assert_eq!(rule.selected(), Some(1));
        assert!(token.is_required());
        assert!(user.is_invalidated() && pass.is_invalidated());
        assert!(!user.is_required());
    }

    #[test]
    fn test_no_match_reports_and_leaves_flags() {
        let (a, b) = (empty("a"), empty("b"));
        let mut rule = prepared(OrRule::new(default_log()).or_param(a.clone()).or_param(b.clone()));

        assert!(!rule.is_valid());
        let results = rule.validation_results();
        assert_eq!(results.len(), 1);
        assert!(results.contains_code(VALIDATION_NO_PARAM_SET_MATCHED));
        assert!(results.entries()[0].message.contains("a | b"));

        for p in [&a, &b] {
            assert!(!p.is_required());
            assert!(!p.is_invalidated());
        }
        assert_eq!(rule.selected(), None);
    }

    #[test]
    fn test_zero_sets_never_match() {
        let mut rule = prepared(OrRule::new(default_log()));
        assert!(!rule.is_valid());
        assert!(rule.validation_results().contains_code(VALIDATION_NO_PARAM_SET_MATCHED));
    }

    #[test]
    fn test_empty_set_wins_vacuously() {
        let a = filled("a");
        let mut rule = prepared(
            OrRule::new(default_log())
                .or_set(ParamSet::auto())
                .or_param(a.clone()),
        );

        assert!(rule.is_valid());
        assert_eq!(rule.selected(), Some(0));
        assert!(a.is_invalidated());
    }

    #[test]
    fn test_pre_validate_clears_required() {
        let a = RequestParam::new("a").with_value("x").required().into_handle();
        let mut rule = OrRule::new(default_log()).or_param(a.clone());

        rule.pre_validate();
        assert!(!a.is_required());
    }

    #[test]
    fn test_logs_selection() {
        let log = Arc::new(MemoryLog::new());
        let mut rule = prepared(
            OrRule::new(log.clone())
                .or_set(ParamSet::new(Some("token".to_string()), vec![filled("apiToken")]).with_label("Token login")),
        );

        rule.apply();
        assert!(log.contains("or | Evaluating 1 parameter sets: apiToken"));
        assert!(log.contains("Selected set #0 [apiToken] (Token login)"));
    }

    #[test]
    fn test_shared_param_stays_with_winner() {
        let user = filled("username");
        let pass = filled("password");
        let otp = empty("otp");
        let mut rule = prepared(
            OrRule::new(default_log())
                .or_params(vec![user.clone(), pass.clone()])
                .or_params(vec![user.clone(), otp.clone()]),
        );

        assert!(rule.is_valid());
        assert_eq!(rule.selected(), Some(0));
        assert!(user.is_required());
        assert!(!user.is_invalidated());
        assert!(pass.is_required() && !pass.is_invalidated());
        assert!(otp.is_invalidated());
    }

    #[test]
    fn test_shared_param_when_later_set_wins() {
        let user = filled("username");
        let pass = empty("password");
        let otp = filled("otp");
        let mut rule = prepared(
            OrRule::new(default_log())
                .or_params(vec![user.clone(), pass.clone()])
                .or_params(vec![user.clone(), otp.clone()]),
        );

        assert!(rule.is_valid());
        assert_eq!(rule.selected(), Some(1));
        assert!(user.is_required() && !user.is_invalidated());
        assert!(pass.is_invalidated() && !pass.is_required());
    }

    #[test]
    fn test_selected_set() {
        let mut rule = prepared(OrRule::new(default_log()).or_param(empty("a")).or_param(filled("b")));
        rule.apply();
        assert_eq!(rule.selected_set().map(|s| s.to_string()), Some("b".to_string()));
    }
}
