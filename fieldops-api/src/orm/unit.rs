use diesel::prelude::*;

use crate::models::{NewUnit, Unit, UnitInput};
use crate::orm::last_insert_rowid;

pub fn get_unit_by_id(
    conn: &mut SqliteConnection,
    unit_id: i32,
) -> Result<Option<Unit>, diesel::result::Error> {
    use crate::schema::units::dsl::*;
    let result = units
        .filter(id.eq(unit_id))
        .first::<Unit>(conn)
        .optional()?;
    Ok(result)
}

pub fn get_all_units(conn: &mut SqliteConnection) -> Result<Vec<Unit>, diesel::result::Error> {
    use crate::schema::units::dsl::*;
    units.order(id.asc()).load::<Unit>(conn)
}

pub fn get_units_by_company(
    conn: &mut SqliteConnection,
    company: i32,
) -> Result<Vec<Unit>, diesel::result::Error> {
    use crate::schema::units::dsl::*;
    units
        .filter(company_id.eq(company))
        .order(id.asc())
        .load::<Unit>(conn)
}

/// Insert a new unit. A missing company surfaces as a foreign key violation.
pub fn insert_unit(
    conn: &mut SqliteConnection,
    input: &UnitInput,
) -> Result<Unit, diesel::result::Error> {
    use crate::schema::units::dsl::*;

    let new_unit = NewUnit {
        name: input.name.clone(),
        company_id: input.company_id,
    };

    diesel::insert_into(units).values(&new_unit).execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    units.filter(id.eq(last_id)).first::<Unit>(conn)
}

pub fn update_unit(
    conn: &mut SqliteConnection,
    unit_id: i32,
    input: &UnitInput,
) -> Result<Option<Unit>, diesel::result::Error> {
    use crate::schema::units::dsl::*;

    let rows = diesel::update(units.filter(id.eq(unit_id)))
        .set((name.eq(&input.name), company_id.eq(input.company_id)))
        .execute(conn)?;

    if rows == 0 {
        return Ok(None);
    }
    get_unit_by_id(conn, unit_id)
}

/// Returns Ok(true) if the unit was found and deleted, Ok(false) if not found.
pub fn delete_unit(
    conn: &mut SqliteConnection,
    unit_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::units::dsl::*;
    let rows_affected = diesel::delete(units.filter(id.eq(unit_id))).execute(conn)?;
    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompanyInput;
    use crate::orm::company::insert_company;
    use crate::orm::testing::setup_test_db;

    fn seed_company(conn: &mut SqliteConnection) -> i32 {
        insert_company(
            conn,
            &CompanyInput {
                name: "Unit Holder".to_string(),
                legal_id: "99.999.999/0001-99".to_string(),
                unit_label: None,
            },
        )
        .expect("company insert should succeed")
        .id
    }

    #[test]
    fn test_insert_and_list_units() {
        let mut conn = setup_test_db();
        let company_id = seed_company(&mut conn);

        let unit = insert_unit(
            &mut conn,
            &UnitInput {
                name: "Plant A".to_string(),
                company_id,
            },
        )
        .expect("unit insert should succeed");
        assert_eq!(unit.name, "Plant A");
        assert_eq!(unit.company_id, company_id);

        let listed = get_units_by_company(&mut conn, company_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, unit.id);
    }

    #[test]
    fn test_insert_unit_for_missing_company_fails() {
        let mut conn = setup_test_db();
        let err = insert_unit(
            &mut conn,
            &UnitInput {
                name: "Orphan".to_string(),
                company_id: 4242,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                _
            )
        ));
    }

    #[test]
    fn test_company_delete_blocked_by_unit() {
        let mut conn = setup_test_db();
        let company_id = seed_company(&mut conn);
        insert_unit(
            &mut conn,
            &UnitInput {
                name: "Blocker".to_string(),
                company_id,
            },
        )
        .unwrap();

        let err = crate::orm::company::delete_company(&mut conn, company_id).unwrap_err();
        assert!(matches!(
            err,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                _
            )
        ));
        // The company survives the refused delete.
        assert!(
            crate::orm::company::get_company_by_id(&mut conn, company_id)
                .unwrap()
                .is_some()
        );
    }
}
