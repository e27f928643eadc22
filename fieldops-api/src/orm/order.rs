//! Order persistence.
//!
//! An order and its schedule row are created in one transaction. Orders are
//! never hard-deleted: cancellation sets the status to CANCELED and leaves
//! the row in place so reports and surveys keep a valid parent.

use diesel::prelude::*;

use crate::models::{
    NewOrder, NewOrderSchedule, Order, OrderInput, OrderSchedule, OrderStatus,
};
use crate::orm::last_insert_rowid;

pub fn get_order_by_id(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<Option<Order>, diesel::result::Error> {
    use crate::schema::orders::dsl::*;
    let result = orders
        .filter(id.eq(order_id))
        .first::<Order>(conn)
        .optional()?;
    Ok(result)
}

pub fn get_all_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, diesel::result::Error> {
    use crate::schema::orders::dsl::*;
    orders.order(id.asc()).load::<Order>(conn)
}

pub fn get_orders_by_company(
    conn: &mut SqliteConnection,
    company: i32,
) -> Result<Vec<Order>, diesel::result::Error> {
    use crate::schema::orders::dsl::*;
    orders
        .filter(company_id.eq(company))
        .order(id.asc())
        .load::<Order>(conn)
}

pub fn get_order_schedule(
    conn: &mut SqliteConnection,
    order: i32,
) -> Result<OrderSchedule, diesel::result::Error> {
    use crate::schema::order_schedules::dsl::*;
    order_schedules
        .filter(order_id.eq(order))
        .first::<OrderSchedule>(conn)
}

/// Inserts the order row and its schedule row in one transaction. A new
/// order always starts IN_PROGRESS.
pub fn insert_order(
    conn: &mut SqliteConnection,
    input: &OrderInput,
) -> Result<(Order, OrderSchedule), diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::{order_schedules, orders};

        let new_order = NewOrder {
            company_id: input.company_id,
            requester: input.requester.clone(),
            location: input.location.clone(),
            purpose: input.purpose.clone(),
            status: OrderStatus::InProgress,
        };

        diesel::insert_into(orders::table)
            .values(&new_order)
            .execute(conn)?;
        let order_id = last_insert_rowid(conn)?;

        let new_schedule = NewOrderSchedule {
            order_id,
            starts_on: input.schedule.starts_on,
            predicted_end_on: input.schedule.predicted_end_on,
        };
        diesel::insert_into(order_schedules::table)
            .values(&new_schedule)
            .execute(conn)?;

        let order = orders::table
            .filter(orders::id.eq(order_id))
            .first::<Order>(conn)?;
        let schedule = get_order_schedule(conn, order_id)?;
        Ok((order, schedule))
    })
}

/// Replaces the order's scalar fields and its schedule row's fields.
/// Returns Ok(None) if the order id is absent. The status is not touched
/// here; transitions go through [`set_order_status`].
pub fn update_order(
    conn: &mut SqliteConnection,
    order_id: i32,
    input: &OrderInput,
) -> Result<Option<(Order, OrderSchedule)>, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::{order_schedules, orders};

        let rows = diesel::update(orders::table.filter(orders::id.eq(order_id)))
            .set((
                orders::company_id.eq(input.company_id),
                orders::requester.eq(&input.requester),
                orders::location.eq(&input.location),
                orders::purpose.eq(&input.purpose),
            ))
            .execute(conn)?;
        if rows == 0 {
            return Ok(None);
        }

        diesel::update(order_schedules::table.filter(order_schedules::order_id.eq(order_id)))
            .set((
                order_schedules::starts_on.eq(input.schedule.starts_on),
                order_schedules::predicted_end_on.eq(input.schedule.predicted_end_on),
            ))
            .execute(conn)?;

        let order = orders::table
            .filter(orders::id.eq(order_id))
            .first::<Order>(conn)?;
        let schedule = get_order_schedule(conn, order_id)?;
        Ok(Some((order, schedule)))
    })
}

/// Outcome of a status transition attempt.
pub enum TransitionOutcome {
    Updated(Order),
    NotFound,
    /// The state machine refuses the move; carries the current status.
    Refused(OrderStatus),
}

/// Moves an order to `next` if the state machine allows it.
pub fn set_order_status(
    conn: &mut SqliteConnection,
    order_id: i32,
    next: OrderStatus,
) -> Result<TransitionOutcome, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::orders::dsl::*;

        let order = match get_order_by_id(conn, order_id)? {
            Some(order) => order,
            None => return Ok(TransitionOutcome::NotFound),
        };

        if !order.status.can_transition_to(next) {
            return Ok(TransitionOutcome::Refused(order.status));
        }

        diesel::update(orders.filter(id.eq(order_id)))
            .set(status.eq(next))
            .execute(conn)?;

        let updated = orders.filter(id.eq(order_id)).first::<Order>(conn)?;
        Ok(TransitionOutcome::Updated(updated))
    })
}

/// Soft cancel: sets status=CANCELED, preserving the row and everything
/// referencing it.
pub fn cancel_order(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<TransitionOutcome, diesel::result::Error> {
    set_order_status(conn, order_id, OrderStatus::Canceled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyInput, OrderScheduleInput};
    use crate::orm::company::insert_company;
    use crate::orm::testing::setup_test_db;
    use chrono::NaiveDate;

    fn seed_order(conn: &mut SqliteConnection) -> (Order, OrderSchedule) {
        let company = insert_company(
            conn,
            &CompanyInput {
                name: "Order Holder".to_string(),
                legal_id: "11.111.111/0001-11".to_string(),
                unit_label: None,
            },
        )
        .unwrap();

        insert_order(
            conn,
            &OrderInput {
                company_id: company.id,
                requester: "Maintenance lead".to_string(),
                location: "Plant A".to_string(),
                purpose: "Quarterly inspection".to_string(),
                schedule: OrderScheduleInput {
                    starts_on: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                    predicted_end_on: NaiveDate::from_ymd_opt(2026, 9, 3),
                },
            },
        )
        .expect("order insert should succeed")
    }

    #[test]
    fn test_insert_order_creates_schedule() {
        let mut conn = setup_test_db();
        let (order, schedule) = seed_order(&mut conn);

        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(schedule.order_id, order.id);
        assert_eq!(
            schedule.starts_on,
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
        );
    }

    #[test]
    fn test_cancel_preserves_row() {
        let mut conn = setup_test_db();
        let (order, _) = seed_order(&mut conn);

        match cancel_order(&mut conn, order.id).unwrap() {
            TransitionOutcome::Updated(updated) => {
                assert_eq!(updated.status, OrderStatus::Canceled)
            }
            _ => panic!("cancel should succeed"),
        }

        let fetched = get_order_by_id(&mut conn, order.id).unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::Canceled);
    }

    #[test]
    fn test_canceled_refuses_further_transitions() {
        let mut conn = setup_test_db();
        let (order, _) = seed_order(&mut conn);
        cancel_order(&mut conn, order.id).unwrap();

        match set_order_status(&mut conn, order.id, OrderStatus::WaitingSurvey).unwrap() {
            TransitionOutcome::Refused(current) => assert_eq!(current, OrderStatus::Canceled),
            _ => panic!("transition out of CANCELED must be refused"),
        }
    }

    #[test]
    fn test_skipping_a_state_is_refused() {
        let mut conn = setup_test_db();
        let (order, _) = seed_order(&mut conn);

        match set_order_status(&mut conn, order.id, OrderStatus::Finished).unwrap() {
            TransitionOutcome::Refused(current) => assert_eq!(current, OrderStatus::InProgress),
            _ => panic!("IN_PROGRESS -> FINISHED must be refused"),
        }
    }
}
