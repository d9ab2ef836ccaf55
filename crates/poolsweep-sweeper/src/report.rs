use chrono::{DateTime, Utc};
use poolsweep_domain::{Region, ResourceHandle, SweepOutcome, SweeperName};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// `ListUserPools` rejects `MaxResults` above this.
pub const MAX_PAGE_SIZE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepOptions {
    pub page_size: u32,
}

impl SweepOptions {
    pub fn new(page_size: u32) -> Self {
        Self { page_size }
    }

    /// Page size clamped to what the service accepts.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE }
    }
}

/// Result of one successful sweep pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub run_id: Uuid,
    pub sweeper: SweeperName,
    pub region: Region,
    pub outcome: SweepOutcome,
    /// List calls that returned a page.
    pub pages: usize,
    /// Deleted resources, in deletion order.
    pub deleted: Vec<ResourceHandle>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SweepReport {
    pub fn new(sweeper: SweeperName, region: Region) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            sweeper,
            region,
            outcome: SweepOutcome::Done { deleted: 0 },
            pages: 0,
            deleted: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    pub(crate) fn finish(mut self, outcome: SweepOutcome) -> Self {
        self.outcome = outcome;
        self.finished_at = Utc::now();
        self
    }

    /// One-line summary for terminal output.
    pub fn summary(&self) -> String {
        format!("{} [{}]: {}", self.sweeper, self.region, self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(SweepOptions::new(0).effective_page_size(), 1);
        assert_eq!(SweepOptions::new(500).effective_page_size(), MAX_PAGE_SIZE);
        assert_eq!(SweepOptions::default().effective_page_size(), 50);
    }

    #[test]
    fn summary_names_sweeper_and_region() {
        let report = SweepReport::new(
            SweeperName::new("aws_cognito_user_pool").unwrap(),
            Region::new("us-west-2").unwrap(),
        )
        .finish(SweepOutcome::Done { deleted: 2 });
        assert_eq!(report.summary(), "aws_cognito_user_pool [us-west-2]: done (2 deleted)");
        assert!(report.finished_at >= report.started_at);
    }

    #[test]
    fn skipped_report_serializes_reason() {
        let report = SweepReport::new(
            SweeperName::new("aws_cognito_user_pool").unwrap(),
            Region::new("cn-north-1").unwrap(),
        )
        .finish(SweepOutcome::Skipped { reason: "AccessDeniedException".into() });

        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["region"], "cn-north-1");
        assert_eq!(v["outcome"]["status"], "skipped");
        assert_eq!(v["outcome"]["reason"], "AccessDeniedException");
        assert!(v["deleted"].as_array().unwrap().is_empty());
    }
}
