// Library root: batting leaderboards from master and batting records.
//
// Pipeline: loader -> records -> join -> rank (with a stats function) -> caller.

pub mod config;
pub mod join;
pub mod loader;
pub mod query;
pub mod rank;
pub mod records;
pub mod stats;
