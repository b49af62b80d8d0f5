//! Terminal and JSON rendering shared by the commands.

pub mod diagnostic;
pub mod table;

pub use diagnostic::{read_catalog, TsDiagnostic};
