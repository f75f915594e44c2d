//! Kali common types
//!
//! Wire types shared by the tool server (`kali-tools`) and the agent-side
//! bridge (`kali-bridge`): the execution result every invocation returns,
//! the health report, and the static catalog of security tools.

pub mod catalog;
pub mod health;
pub mod result;

pub use catalog::{Category, ParamKind, ParamSpec, ToolSpec};
pub use health::HealthReport;
pub use result::{ExecutionResult, NO_EXIT_CODE};
