//! Caller environment for a query.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;

/// Who is asking, for which projects, and at what time.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub request_id: String,
    pub organization_id: Option<u64>,
    pub project_ids: Vec<u64>,
    pub now: DateTime<Utc>,
}

impl QueryContext {
    pub fn new(organization_id: Option<u64>, project_ids: Vec<u64>) -> Self {
        let request_id = format!("req-{}", &Uuid::new_v4().to_string()[..8]);

        Self {
            request_id,
            organization_id,
            project_ids,
            now: Utc::now(),
        }
    }

    /// Pin the clock, e.g. to build the same window twice.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.request_id, self.organization_id)
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new(None, Vec::new())
    }
}
