//! CLI command implementations.

mod check;
mod coverage;
mod lookup;

pub use check::{run_check, CheckArgs};
pub use coverage::{run_coverage, CoverageArgs};
pub use lookup::{run_lookup, LookupArgs};
