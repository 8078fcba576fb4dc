//! Event outcomes accepted through `outcome=`.

use serde::{Serialize, Serializer};

use crate::error::{QueryError, Result};

/// Outcome code, as written by the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Outcome {
    Accepted = 0,
    Filtered = 1,
    RateLimited = 2,
    Invalid = 3,
    Abuse = 4,
    ClientDiscard = 5,
}

impl Outcome {
    pub const ALL: [Outcome; 6] = [
        Outcome::Accepted,
        Outcome::Filtered,
        Outcome::RateLimited,
        Outcome::Invalid,
        Outcome::Abuse,
        Outcome::ClientDiscard,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "accepted" => Some(Outcome::Accepted),
            "filtered" => Some(Outcome::Filtered),
            "rate_limited" => Some(Outcome::RateLimited),
            "invalid" => Some(Outcome::Invalid),
            "abuse" => Some(Outcome::Abuse),
            "client_discard" => Some(Outcome::ClientDiscard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::Filtered => "filtered",
            Outcome::RateLimited => "rate_limited",
            Outcome::Invalid => "invalid",
            Outcome::Abuse => "abuse",
            Outcome::ClientDiscard => "client_discard",
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Map the raw `outcome` values one-to-one onto outcome codes.
pub fn resolve_outcomes(raw_filter: &[&str]) -> Result<Vec<Outcome>> {
    raw_filter
        .iter()
        .map(|raw| {
            Outcome::parse(raw)
                .ok_or_else(|| QueryError::InvalidField(format!("Invalid outcome: \"{}\"", raw)))
        })
        .collect()
}
