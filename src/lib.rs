#![doc = include_str!("../README.md")]
mod aggregate;
mod data;
mod record;
pub mod render;
mod units;

pub use aggregate::aggregate;
pub use data::{Data, Row, SortKey, Table};
pub use record::{read_csv, Record};
pub use units::Units;
