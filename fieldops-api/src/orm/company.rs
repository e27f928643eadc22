use diesel::prelude::*;

use crate::models::{Company, CompanyInput, NewCompany};
use crate::orm::last_insert_rowid;

/// Try to find a company by id.
/// Returns Ok(Some(Company)) if found, Ok(None) if not, Err on DB error.
pub fn get_company_by_id(
    conn: &mut SqliteConnection,
    company_id: i32,
) -> Result<Option<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    let result = companies
        .filter(id.eq(company_id))
        .first::<Company>(conn)
        .optional()?;
    Ok(result)
}

/// Try to find a company by its legal registration identifier.
pub fn get_company_by_legal_id(
    conn: &mut SqliteConnection,
    legal: &str,
) -> Result<Option<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    let result = companies
        .filter(legal_id.eq(legal))
        .first::<Company>(conn)
        .optional()?;
    Ok(result)
}

pub fn get_all_companies(
    conn: &mut SqliteConnection,
) -> Result<Vec<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    companies.order(id.asc()).load::<Company>(conn)
}

/// Insert a new company and read back the stored row.
pub fn insert_company(
    conn: &mut SqliteConnection,
    input: &CompanyInput,
) -> Result<Company, diesel::result::Error> {
    use crate::schema::companies::dsl::*;

    let new_comp = NewCompany {
        name: input.name.clone(),
        legal_id: input.legal_id.clone(),
        unit_label: input.unit_label.clone(),
    };

    diesel::insert_into(companies)
        .values(&new_comp)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;

    companies.filter(id.eq(last_id)).first::<Company>(conn)
}

/// Full scalar replace of a company's fields.
/// Returns Ok(Some(Company)) with the updated row, Ok(None) if the id is
/// absent.
pub fn update_company(
    conn: &mut SqliteConnection,
    company_id: i32,
    input: &CompanyInput,
) -> Result<Option<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;

    let rows = diesel::update(companies.filter(id.eq(company_id)))
        .set((
            name.eq(&input.name),
            legal_id.eq(&input.legal_id),
            unit_label.eq(&input.unit_label),
        ))
        .execute(conn)?;

    if rows == 0 {
        return Ok(None);
    }
    get_company_by_id(conn, company_id)
}

/// Counts the units and orders referencing a company. Deletes are refused
/// while either count is non-zero.
pub fn count_company_dependents(
    conn: &mut SqliteConnection,
    company_id: i32,
) -> Result<(i64, i64), diesel::result::Error> {
    use crate::schema::{orders, units};

    let unit_count = units::table
        .filter(units::company_id.eq(company_id))
        .count()
        .get_result(conn)?;
    let order_count = orders::table
        .filter(orders::company_id.eq(company_id))
        .count()
        .get_result(conn)?;
    Ok((unit_count, order_count))
}

/// Delete a company by id.
/// Returns Ok(true) if the company was found and deleted, Ok(false) if not
/// found, Err on DB error (including a foreign key violation if dependents
/// slipped past the explicit check).
pub fn delete_company(
    conn: &mut SqliteConnection,
    company_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    let rows_affected = diesel::delete(companies.filter(id.eq(company_id))).execute(conn)?;
    Ok(rows_affected > 0)
}
