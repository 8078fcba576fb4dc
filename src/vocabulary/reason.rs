//! Rejection reasons accepted through `reason=`.

use crate::error::{QueryError, Result};

/// User-facing rejection reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonToken {
    SpikeProtection,
    UsageExceeded,
    GracePeriod,
    KeyQuota,
    ProjectQuota,
    OrgQuota,
    TooLarge,
    InvalidData,
}

impl ReasonToken {
    pub const ALL: [ReasonToken; 8] = [
        ReasonToken::SpikeProtection,
        ReasonToken::UsageExceeded,
        ReasonToken::GracePeriod,
        ReasonToken::KeyQuota,
        ReasonToken::ProjectQuota,
        ReasonToken::OrgQuota,
        ReasonToken::TooLarge,
        ReasonToken::InvalidData,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "spike_protection" => Some(ReasonToken::SpikeProtection),
            "usage_exceeded" => Some(ReasonToken::UsageExceeded),
            "grace_period" => Some(ReasonToken::GracePeriod),
            "key_quota" => Some(ReasonToken::KeyQuota),
            "project_quota" => Some(ReasonToken::ProjectQuota),
            "org_quota" => Some(ReasonToken::OrgQuota),
            "too_large" => Some(ReasonToken::TooLarge),
            "invalid_data" => Some(ReasonToken::InvalidData),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonToken::SpikeProtection => "spike_protection",
            ReasonToken::UsageExceeded => "usage_exceeded",
            ReasonToken::GracePeriod => "grace_period",
            ReasonToken::KeyQuota => "key_quota",
            ReasonToken::ProjectQuota => "project_quota",
            ReasonToken::OrgQuota => "org_quota",
            ReasonToken::TooLarge => "too_large",
            ReasonToken::InvalidData => "invalid_data",
        }
    }

    /// Reason codes stored for this reason.
    pub fn codes(&self) -> &'static [&'static str] {
        match self {
            // Spike protection is recorded under the rate limiter's name.
            ReasonToken::SpikeProtection => &["smart_rate_limit"],
            ReasonToken::UsageExceeded => &["usage_exceeded"],
            ReasonToken::GracePeriod => &["grace_period"],
            ReasonToken::KeyQuota => &["key_quota"],
            ReasonToken::ProjectQuota => &["project_quota"],
            ReasonToken::OrgQuota => &["org_quota"],
            ReasonToken::TooLarge => &["too_large"],
            ReasonToken::InvalidData => &["invalid_data"],
        }
    }
}

/// Map the raw `reason` values to stored reason codes, in first-seen order.
pub fn resolve_reasons(raw_filter: &[&str]) -> Result<Vec<&'static str>> {
    let mut codes = Vec::new();
    for raw in raw_filter {
        let token = ReasonToken::parse(raw)
            .ok_or_else(|| QueryError::InvalidField(format!("Invalid reason: \"{}\"", raw)))?;
        codes.extend_from_slice(token.codes());
    }
    Ok(codes)
}
