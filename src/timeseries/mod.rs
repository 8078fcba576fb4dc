//! Time window resolution.
//!
//! Turns `statsPeriod`, `start`/`end` and `interval` into an aligned
//! `[start, end)` window and a rollup (bucket size in seconds):
//! - `period` - `4d`/`6h`/`10m` style durations
//! - `window` - the constrained range and rollup policy

pub mod period;
pub mod window;

pub use period::*;
pub use window::*;
