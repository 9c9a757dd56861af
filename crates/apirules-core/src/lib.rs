//! apirules Core: Parameter Contract, Values, and Validation Results
//!
//! Building blocks shared by every rule: the [`ApiParameter`] contract that
//! rules consume, strictly typed [`ParamValue`]s, the per-rule
//! [`ValidationResults`] accumulator and the injectable [`ValidationLog`].

pub mod error;
pub mod log;
pub mod param;
pub mod results;
pub mod value;

pub use error::{Result, RulesError};
pub use log::{default_log, LogHandle, MemoryLog, TracingLog, ValidationLog};
pub use param::{ApiParameter, ParamHandle, ParamType, RequestParam};
pub use results::{ResultEntry, Severity, ValidationResults};
pub use value::ParamValue;

