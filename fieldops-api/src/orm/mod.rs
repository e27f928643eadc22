pub mod analytics;
pub mod company;
mod db;
pub mod order;
pub mod profile;
pub mod report;
pub mod survey;
#[cfg(any(test, feature = "test-staging"))]
pub mod testing;
pub mod unit;

pub use db::*;
