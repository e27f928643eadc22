pub mod analytics;
pub mod company;
pub mod order;
pub mod profile;
pub mod report;
pub mod survey;
pub mod unit;

// Re-export models for easier access
pub use analytics::*;
pub use company::*;
pub use order::*;
pub use profile::*;
pub use report::*;
pub use survey::*;
pub use unit::*;

/// Checks that a required string field is non-empty after trimming.
///
/// Returns the validation message for the first offending field so handlers
/// can fail fast with a 400 naming it.
pub(crate) fn require_field(value: &str, field: &'static str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required", field))
    } else {
        Ok(())
    }
}
