//! Domain types and pure logic shared by every atlas crate.
//!
//! Nothing in here touches the network or the database: the GDP estimator,
//! query argument validation and the summary image all operate on plain
//! values handed in by the refresh engine and the HTTP layer.

pub mod error;
pub mod gdp;
pub mod query;
pub mod summary;
pub mod types;
