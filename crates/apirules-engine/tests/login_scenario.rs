//! Integration tests for alternative login parameter sets.
//!
//! SetA = [username, password], SetB = [apiToken], registered in that
//! order, once through the selector and once through YAML configuration.

use apirules_core::{ApiParameter, MemoryLog, ParamHandle, RequestParam, ValidationLog};
use apirules_engine::{
    EvaluationReport, RuleConfig, RuleManager, VALIDATION_NO_PARAM_SET_MATCHED,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const LOGIN_RULES: &str = r#"
rules:
  - type: or
    sets:
      - [username, password]
      - [apiToken]
"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

struct Login {
    username: ParamHandle,
    password: ParamHandle,
    token: ParamHandle,
}

fn login_params(
    manager: &mut RuleManager,
    username: Option<&str>,
    password: Option<&str>,
    token: Option<&str>,
) -> Login {
    let mut add = |name: &str, value: Option<&str>| {
        manager
            .add_param(
                RequestParam::new(name)
                    .with_optional_value(value.map(Into::into))
                    .into_handle(),
            )
            .unwrap()
    };
    Login {
        username: add("username", username),
        password: add("password", password),
        token: add("apiToken", token),
    }
}

fn flags(param: &ParamHandle) -> (bool, bool) {
    (param.is_required(), param.is_invalidated())
}

/// Run the login rule built in code
fn run_with_selector(
    username: Option<&str>,
    password: Option<&str>,
    token: Option<&str>,
) -> (Login, EvaluationReport) {
    let mut manager = RuleManager::new();
    let login = login_params(&mut manager, username, password, token);
    manager.selector().or_rule(vec![
        vec![login.username.clone(), login.password.clone()],
        vec![login.token.clone()],
    ]);
    (login, manager.prepare().evaluate())
}

/// Run the login rule loaded from YAML
fn run_with_config(
    username: Option<&str>,
    password: Option<&str>,
    token: Option<&str>,
) -> (Login, EvaluationReport) {
    let mut manager = RuleManager::new();
    let login = login_params(&mut manager, username, password, token);
    RuleConfig::from_yaml(LOGIN_RULES)
        .unwrap()
        .register(&mut manager)
        .unwrap();
    (login, manager.prepare().evaluate())
}

// =============================================================================
// Selector-built rules
// =============================================================================

#[test]
fn test_username_and_password_select_first_set() {
    init_tracing();
    let (login, report) = run_with_selector(Some("bob"), Some("secret"), None);

    assert!(report.is_valid());
    assert_eq!(flags(&login.username), (true, false));
    assert_eq!(flags(&login.password), (true, false));
    assert_eq!(flags(&login.token), (false, true));
}

#[test]
fn test_token_selects_second_set() {
    init_tracing();
    let (login, report) = run_with_selector(None, None, Some("tok123"));

    assert!(report.is_valid());
    assert_eq!(flags(&login.token), (true, false));
    assert_eq!(flags(&login.username), (false, true));
    assert_eq!(flags(&login.password), (false, true));
}

#[test]
fn test_nothing_provided_fails_without_touching_flags() {
    init_tracing();
    let (login, report) = run_with_selector(None, None, None);

    assert!(!report.is_valid());
    let errors = report.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, VALIDATION_NO_PARAM_SET_MATCHED);
    assert!(errors[0].message.contains("username, password | apiToken"));

    for param in [&login.username, &login.password, &login.token] {
        assert_eq!(flags(param), (false, false));
    }
}

#[test]
fn test_partial_first_set_falls_through() {
    let (login, report) = run_with_selector(Some("bob"), None, Some("tok123"));

    assert!(report.is_valid());
    assert_eq!(flags(&login.token), (true, false));
    assert_eq!(flags(&login.username), (false, true));
}

#[test]
fn test_both_sets_complete_prefers_first() {
    let (login, report) = run_with_selector(Some("bob"), Some("secret"), Some("tok123"));

    assert!(report.is_valid());
    assert_eq!(flags(&login.username), (true, false));
    assert_eq!(flags(&login.token), (false, true));
}

// =============================================================================
// Configuration-built rules behave identically
// =============================================================================

#[test]
fn test_config_matches_selector() {
    let inputs = [
        (Some("bob"), Some("secret"), None),
        (None, None, Some("tok123")),
        (None, None, None),
        (Some("bob"), None, None),
    ];

    for (u, p, t) in inputs {
        let (code_login, code_report) = run_with_selector(u, p, t);
        let (config_login, config_report) = run_with_config(u, p, t);

        assert_eq!(code_report.is_valid(), config_report.is_valid());
        assert_eq!(code_report.params, config_report.params);
        for (a, b) in [
            (&code_login.username, &config_login.username),
            (&code_login.password, &config_login.password),
            (&code_login.token, &config_login.token),
        ] {
            assert_eq!(flags(a), flags(b), "flags differ for {}", a.name());
        }
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn test_rules_log_to_injected_sink() {
    let log = Arc::new(MemoryLog::new());
    let sink: Arc<dyn ValidationLog> = log.clone();
    let mut manager = RuleManager::with_log(sink);
    let login = login_params(&mut manager, None, None, Some("tok123"));
    manager
        .selector()
        .or_rule(vec![vec![login.username.clone(), login.password.clone()], vec![login.token.clone()]])
        .required_if_other_is_set(login.password.clone(), login.username.clone());

    let report = manager.validate();

    assert!(report.is_valid());
    assert!(log.contains("or | Selected set #1 [apiToken]"));
    assert!(log.contains("required_if_other_is_set | Skipping"));
}
