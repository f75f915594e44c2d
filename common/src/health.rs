//! Health report returned by the tool server's `/health` endpoint

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub message: String,
    /// Essential tool name → found on the server's PATH
    #[serde(default)]
    pub tools_status: BTreeMap<String, bool>,
    #[serde(default)]
    pub all_essential_tools_available: bool,
}

impl HealthReport {
    /// Build a report from per-tool availability checks.
    pub fn from_checks(checks: impl IntoIterator<Item = (String, bool)>) -> Self {
        let tools_status: BTreeMap<String, bool> = checks.into_iter().collect();
        let all_essential_tools_available = tools_status.values().all(|ok| *ok);
        Self {
            status: "healthy".to_string(),
            message: "Kali Linux Tools API Server is running".to_string(),
            tools_status,
            all_essential_tools_available,
        }
    }

    /// Names of the essential tools that were not found
    pub fn missing_tools(&self) -> Vec<&str> {
        self.tools_status
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
