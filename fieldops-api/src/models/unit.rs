use diesel::{Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::require_field;

#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::units)]
#[ts(export)]
pub struct Unit {
    pub id: i32,
    pub name: String,
    pub company_id: i32,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::units)]
pub struct NewUnit {
    pub name: String,
    pub company_id: i32,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UnitInput {
    pub name: String,
    pub company_id: i32,
}

impl UnitInput {
    pub fn validate(&self) -> Result<(), String> {
        require_field(&self.name, "name")
    }
}
