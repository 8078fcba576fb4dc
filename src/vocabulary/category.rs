//! Data categories and the category filter mapping.
//!
//! A user-facing category token expands to one or more storage categories.
//! `error` covers every category the ingestion path files as an error event.
//!
//! Categories are also partitioned into families whose `quantity` is measured
//! differently (events vs. attachment bytes). A single query may only select
//! categories from one family.

use serde::{Serialize, Serializer};

use crate::error::{QueryError, Result};
use crate::logging::structured::LogContext;

/// Storage category code, as written by the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DataCategory {
    Default = 0,
    Error = 1,
    Transaction = 2,
    Security = 3,
    Attachment = 4,
    Session = 5,
}

impl DataCategory {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl Serialize for DataCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Categories whose quantities cannot be reported side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryFamily {
    Events,
    Attachments,
}

impl CategoryFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFamily::Events => "events",
            CategoryFamily::Attachments => "attachments",
        }
    }
}

/// User-facing category accepted through `category=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryToken {
    Error,
    Default,
    Transaction,
    Security,
    Attachment,
    Session,
}

impl CategoryToken {
    pub const ALL: [CategoryToken; 6] = [
        CategoryToken::Error,
        CategoryToken::Default,
        CategoryToken::Transaction,
        CategoryToken::Security,
        CategoryToken::Attachment,
        CategoryToken::Session,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "error" => Some(CategoryToken::Error),
            "default" => Some(CategoryToken::Default),
            "transaction" => Some(CategoryToken::Transaction),
            "security" => Some(CategoryToken::Security),
            "attachment" => Some(CategoryToken::Attachment),
            "session" => Some(CategoryToken::Session),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryToken::Error => "error",
            CategoryToken::Default => "default",
            CategoryToken::Transaction => "transaction",
            CategoryToken::Security => "security",
            CategoryToken::Attachment => "attachment",
            CategoryToken::Session => "session",
        }
    }

    /// Storage categories this token stands for. Never empty.
    pub fn categories(&self) -> &'static [DataCategory] {
        match self {
            CategoryToken::Error => &[
                DataCategory::Default,
                DataCategory::Error,
                DataCategory::Security,
            ],
            CategoryToken::Default => &[DataCategory::Default],
            CategoryToken::Transaction => &[DataCategory::Transaction],
            CategoryToken::Security => &[DataCategory::Security],
            CategoryToken::Attachment => &[DataCategory::Attachment],
            CategoryToken::Session => &[DataCategory::Session],
        }
    }

    pub fn family(&self) -> CategoryFamily {
        match self {
            CategoryToken::Attachment => CategoryFamily::Attachments,
            CategoryToken::Error
            | CategoryToken::Default
            | CategoryToken::Transaction
            | CategoryToken::Security
            | CategoryToken::Session => CategoryFamily::Events,
        }
    }
}

/// Map the raw `category` values to storage categories.
///
/// Codes are concatenated in first-seen order; duplicates are left in place.
/// Fails with `InvalidField` on an unknown token and with `InvalidQuery` when
/// the selection spans more than one [`CategoryFamily`].
pub fn resolve_categories(raw_filter: &[&str], ctx: &LogContext) -> Result<Vec<DataCategory>> {
    let tokens = raw_filter
        .iter()
        .map(|raw| {
            CategoryToken::parse(raw)
                .ok_or_else(|| QueryError::InvalidField(format!("Invalid category: \"{}\"", raw)))
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(first) = tokens.first() {
        let family = first.family();
        if let Some(other) = tokens.iter().find(|t| t.family() != family) {
            crate::log_debug!(
                ctx,
                "CATEGORY_FAMILY_CONFLICT",
                first = first.as_str(),
                conflicting = other.as_str()
            );
            return Err(QueryError::InvalidQuery(format!(
                "Category \"{}\" ({}) cannot be combined with \"{}\" ({})",
                other.as_str(),
                other.family().as_str(),
                first.as_str(),
                family.as_str()
            )));
        }
    }

    Ok(tokens
        .iter()
        .flat_map(|t| t.categories().iter().copied())
        .collect())
}
