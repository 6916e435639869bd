//! Derived views over loaded collections. Pure functions, no I/O.

pub mod dashboard;
pub mod languages;

pub use dashboard::{summarize, DashboardSummary, UpcomingDeadline};
pub use languages::language_tally;

/// Tally key for records with no status or language.
pub const UNSPECIFIED: &str = "Unspecified";
