use diesel::{Identifiable, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::require_field;

#[derive(Deserialize, Queryable, Identifiable, QueryableByName, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::companies)]
#[ts(export)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub legal_id: String,
    pub unit_label: Option<String>,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::companies)]
pub struct NewCompany {
    pub name: String,
    pub legal_id: String,
    pub unit_label: Option<String>,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct CompanyInput {
    pub name: String,
    pub legal_id: String,
    pub unit_label: Option<String>,
}

impl CompanyInput {
    pub fn validate(&self) -> Result<(), String> {
        require_field(&self.name, "name")?;
        require_field(&self.legal_id, "legal_id")?;
        Ok(())
    }
}
