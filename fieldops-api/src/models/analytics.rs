use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Aggregate counts shown on the dashboard landing page.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardTotals {
    pub total_orders: i64,
    pub total_reports: i64,
    pub total_companies: i64,
}
