//! Closed query vocabulary.
//!
//! Every user-facing token the stats API accepts is listed here together with
//! the storage value it maps to:
//! - `field` - aggregate selection (`sum(quantity)`, `sum(times_seen)`)
//! - `groupBy` - grouping dimensions
//! - `category` - data categories, including one-to-many expansions
//! - `reason` - rejection reasons
//! - `outcome` - event outcomes
//!
//! Unknown tokens fall through an exhaustive `match` and surface as
//! `QueryError::InvalidField`.

pub mod category;
pub mod field;
pub mod groupby;
pub mod outcome;
pub mod reason;

pub use category::*;
pub use field::*;
pub use groupby::*;
pub use outcome::*;
pub use reason::*;
