//! Outcomes query construction.
//!
//! Turns request parameters into a validated [`QueryDefinition`]:
//! - `raw` - ordered multi-valued request parameters
//! - `context` - caller environment (organization, projects, clock)
//! - `definition` - the validated descriptor and its builder

pub mod context;
pub mod definition;
pub mod raw;

pub use context::*;
pub use definition::*;
pub use raw::*;
