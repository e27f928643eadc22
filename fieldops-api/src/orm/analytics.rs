use diesel::prelude::*;

use crate::models::DashboardTotals;

/// Counts orders, reports, and companies for the dashboard overview.
pub fn get_dashboard_totals(
    conn: &mut SqliteConnection,
) -> Result<DashboardTotals, diesel::result::Error> {
    use crate::schema::{companies, orders, reports};

    let total_orders = orders::table.count().get_result::<i64>(conn)?;
    let total_reports = reports::table.count().get_result::<i64>(conn)?;
    let total_companies = companies::table.count().get_result::<i64>(conn)?;

    Ok(DashboardTotals {
        total_orders,
        total_reports,
        total_companies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyInput, OrderInput, OrderScheduleInput};
    use crate::orm::company::insert_company;
    use crate::orm::order::insert_order;
    use crate::orm::testing::setup_test_db;
    use chrono::NaiveDate;

    #[test]
    fn test_totals_start_at_zero() {
        let mut conn = setup_test_db();
        let totals = get_dashboard_totals(&mut conn).unwrap();
        assert_eq!(totals.total_orders, 0);
        assert_eq!(totals.total_reports, 0);
        assert_eq!(totals.total_companies, 0);
    }

    #[test]
    fn test_totals_track_inserted_rows() {
        let mut conn = setup_test_db();
        let company = insert_company(
            &mut conn,
            &CompanyInput {
                name: "Counted Co".to_string(),
                legal_id: "44.444.444/0001-44".to_string(),
                unit_label: None,
            },
        )
        .unwrap();

        for _ in 0..2 {
            insert_order(
                &mut conn,
                &OrderInput {
                    company_id: company.id,
                    requester: "Maintenance lead".to_string(),
                    location: "Plant A".to_string(),
                    purpose: "Quarterly inspection".to_string(),
                    schedule: OrderScheduleInput {
                        starts_on: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                        predicted_end_on: None,
                    },
                },
            )
            .unwrap();
        }

        let totals = get_dashboard_totals(&mut conn).unwrap();
        assert_eq!(totals.total_orders, 2);
        assert_eq!(totals.total_reports, 0);
        assert_eq!(totals.total_companies, 1);
    }
}
