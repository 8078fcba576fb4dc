//! Request-scoped log prefixes and key=value logging macros.
//!
//! Every line logged while building a query starts with the request it
//! belongs to and, when known, the organization that sent it, so rejections
//! can be traced back to the caller.

use std::fmt;

/// Prefix identifying which stats request a log line came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    pub request_id: String,
    /// Absent for requests not scoped to an organization.
    pub organization_id: Option<u64>,
}

impl LogContext {
    pub fn new(request_id: &str, organization_id: Option<u64>) -> Self {
        Self {
            request_id: request_id.to_string(),
            organization_id,
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[request={}]", self.request_id)?;
        if let Some(org) = self.organization_id {
            write!(f, " [org={}]", org)?;
        }
        Ok(())
    }
}

/// Log an info message with context.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),+ $(,)?) => {
        log::info!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),+), $($value),+)
        )
    };
}

/// Log a warning message with context.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),+ $(,)?) => {
        log::warn!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),+), $($value),+)
        )
    };
}

/// Log a debug message with context.
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),+ $(,)?) => {
        log::debug!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),+), $($value),+)
        )
    };
}
