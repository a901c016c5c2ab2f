//! Domain types for term structure construction.
//!
//! - [`Date`]: Calendar date
//! - [`Period`]: Tenor such as `3M` or `10Y`
//! - [`Frequency`]: Payment frequency
//! - [`Compounding`]: Interest compounding convention

mod date;
mod frequency;
mod period;

pub use date::Date;
pub use frequency::{Compounding, Frequency};
pub use period::{Period, TimeUnit};
