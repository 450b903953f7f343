// Library root for the statline binary: the reference report run and its
// rendering, exposed so integration tests can drive them without a process.

pub mod report;
pub mod run;
