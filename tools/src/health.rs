//! Essential-tool availability checks behind `GET /health`

use std::time::Duration;

use kali_common::HealthReport;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::session::{self, SessionLimits};

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Checks whether each essential tool is on the server's PATH
pub struct HealthChecker {
    tools: Vec<String>,
    limits: SessionLimits,
}

impl HealthChecker {
    pub fn new(tools: Vec<String>, limits: &SessionLimits) -> Self {
        Self {
            tools,
            limits: SessionLimits {
                timeout: PROBE_TIMEOUT.min(limits.timeout),
                ..limits.clone()
            },
        }
    }

    /// Probe every tool with `command -v <tool>`, all at once.
    pub async fn check_all(&self) -> HealthReport {
        let mut probes = JoinSet::new();
        for tool in &self.tools {
            let tool = tool.clone();
            let limits = self.limits.clone();
            probes.spawn(async move {
                let result = session::run(&format!("command -v {tool}"), &limits).await;
                (tool, result.success)
            });
        }

        let mut checks = Vec::with_capacity(self.tools.len());
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok((tool, available)) => {
                    debug!("Tool {tool} available: {available}");
                    checks.push((tool, available));
                }
                Err(e) => warn!("Tool probe task failed: {e}"),
            }
        }
        // a probe that never reported counts as missing
        for tool in &self.tools {
            if !checks.iter().any(|(name, _)| name == tool) {
                checks.push((tool.clone(), false));
            }
        }

        let report = HealthReport::from_checks(checks);
        if !report.all_essential_tools_available {
            warn!("Missing essential tools: {}", report.missing_tools().join(", "));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_present_and_missing_tools() {
        let checker = HealthChecker::new(
            vec!["sh".to_string(), "definitely_not_a_tool_xyz".to_string()],
            &SessionLimits::default(),
        );
        let report = checker.check_all().await;
        assert_eq!(report.status, "healthy");
        assert_eq!(report.tools_status.get("sh"), Some(&true));
        assert_eq!(report.tools_status.get("definitely_not_a_tool_xyz"), Some(&false));
        assert!(!report.all_essential_tools_available);
    }

    #[tokio::test]
    async fn test_empty_tool_list_is_available() {
        let checker = HealthChecker::new(Vec::new(), &SessionLimits::default());
        let report = checker.check_all().await;
        assert!(report.tools_status.is_empty());
        assert!(report.all_essential_tools_available);
    }

    #[test]
    fn test_probe_timeout_capped() {
        let checker = HealthChecker::new(vec![], &SessionLimits::default());
        assert_eq!(checker.limits.timeout, PROBE_TIMEOUT);
    }
}
