//! Order and schedule models.
//!
//! An order is a service engagement for a company, tracked through a status
//! lifecycle. Every order owns exactly one schedule row, created in the same
//! transaction as the order itself.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::require_field;

/// Lifecycle status of an order.
///
/// Forward path: `InProgress` → `WaitingSurvey` → `Finished`. Any
/// non-canceled state may move to `Canceled`, which is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow, TS,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum OrderStatus {
    InProgress,
    WaitingSurvey,
    Finished,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::WaitingSurvey => "WAITING_SURVEY",
            OrderStatus::Finished => "FINISHED",
            OrderStatus::Canceled => "CANCELED",
        }
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Canceled, _) => false,
            (_, Canceled) => true,
            (InProgress, WaitingSurvey) => true,
            (WaitingSurvey, Finished) => true,
            _ => false,
        }
    }
}

impl ToSql<Text, Sqlite> for OrderStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for OrderStatus {
    fn from_sql(value: <Sqlite as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        match s.as_str() {
            "IN_PROGRESS" => Ok(OrderStatus::InProgress),
            "WAITING_SURVEY" => Ok(OrderStatus::WaitingSurvey),
            "FINISHED" => Ok(OrderStatus::Finished),
            "CANCELED" => Ok(OrderStatus::Canceled),
            other => Err(format!("unrecognized order status '{}'", other).into()),
        }
    }
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::orders)]
#[ts(export)]
pub struct Order {
    pub id: i32,
    pub company_id: i32,
    pub requester: String,
    pub location: String,
    pub purpose: String,
    pub status: OrderStatus,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
}

impl Order {
    /// Display number shown on the dashboard: the given calendar year
    /// followed by the zero-padded order id. Derived at display time, never
    /// persisted.
    pub fn display_number(&self, year: i32) -> String {
        format!("{}{:04}", year, self.id)
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder {
    pub company_id: i32,
    pub requester: String,
    pub location: String,
    pub purpose: String,
    pub status: OrderStatus,
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::order_schedules)]
#[ts(export)]
pub struct OrderSchedule {
    pub id: i32,
    pub order_id: i32,
    #[ts(type = "string")]
    pub starts_on: NaiveDate,
    #[ts(type = "string | null")]
    pub predicted_end_on: Option<NaiveDate>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::order_schedules)]
pub struct NewOrderSchedule {
    pub order_id: i32,
    pub starts_on: NaiveDate,
    pub predicted_end_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct OrderScheduleInput {
    #[ts(type = "string")]
    pub starts_on: NaiveDate,
    #[ts(type = "string | null")]
    pub predicted_end_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct OrderInput {
    pub company_id: i32,
    pub requester: String,
    pub location: String,
    pub purpose: String,
    pub schedule: OrderScheduleInput,
}

impl OrderInput {
    pub fn validate(&self) -> Result<(), String> {
        require_field(&self.requester, "requester")?;
        require_field(&self.location, "location")?;
        require_field(&self.purpose, "purpose")?;
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct OrderStatusInput {
    pub status: OrderStatus,
}

/// Full order view returned by the detail endpoints: the order row, its
/// schedule, and the display number computed for the current year.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDetail {
    pub order: Order,
    pub schedule: OrderSchedule,
    pub display_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_forward_path() {
        assert!(OrderStatus::InProgress.can_transition_to(OrderStatus::WaitingSurvey));
        assert!(OrderStatus::WaitingSurvey.can_transition_to(OrderStatus::Finished));
        assert!(!OrderStatus::InProgress.can_transition_to(OrderStatus::Finished));
        assert!(!OrderStatus::Finished.can_transition_to(OrderStatus::InProgress));
    }

    #[test]
    fn test_canceled_is_terminal() {
        for next in [
            OrderStatus::InProgress,
            OrderStatus::WaitingSurvey,
            OrderStatus::Finished,
            OrderStatus::Canceled,
        ] {
            assert!(!OrderStatus::Canceled.can_transition_to(next));
        }
        assert!(OrderStatus::InProgress.can_transition_to(OrderStatus::Canceled));
        assert!(OrderStatus::Finished.can_transition_to(OrderStatus::Canceled));
    }

    #[test]
    fn test_display_number_pads_to_four_digits() {
        let order = Order {
            id: 7,
            company_id: 1,
            requester: "req".into(),
            location: "loc".into(),
            purpose: "maintenance".into(),
            status: OrderStatus::InProgress,
            created_at: chrono::Utc::now().naive_utc(),
        };
        assert_eq!(order.display_number(2026), "20260007");

        let order = Order { id: 12345, ..order };
        assert_eq!(order.display_number(2026), "202612345");
    }
}
