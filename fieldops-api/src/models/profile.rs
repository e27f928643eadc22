//! Profile models.
//!
//! A profile mirrors an external identity-provider account. It is created
//! lazily on first authenticated access, keyed by the provider's user id.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::require_field;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow, TS,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ProfileRole {
    User,
    Technician,
    Manager,
}

impl ProfileRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileRole::User => "USER",
            ProfileRole::Technician => "TECHNICIAN",
            ProfileRole::Manager => "MANAGER",
        }
    }
}

impl ToSql<Text, Sqlite> for ProfileRole {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for ProfileRole {
    fn from_sql(value: <Sqlite as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        match s.as_str() {
            "USER" => Ok(ProfileRole::User),
            "TECHNICIAN" => Ok(ProfileRole::Technician),
            "MANAGER" => Ok(ProfileRole::Manager),
            other => Err(format!("unrecognized profile role '{}'", other).into()),
        }
    }
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::profiles)]
#[ts(export)]
pub struct Profile {
    pub id: i32,
    pub external_user_id: String,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub role: ProfileRole,
    pub register_number: Option<String>,
    pub position: Option<String>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::profiles)]
pub struct NewProfile {
    pub external_user_id: String,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub role: ProfileRole,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ProfileInput {
    pub name: String,
    pub email: String,
    pub role: ProfileRole,
    pub register_number: Option<String>,
    pub position: Option<String>,
}

impl ProfileInput {
    pub fn validate(&self) -> Result<(), String> {
        require_field(&self.name, "name")?;
        require_field(&self.email, "email")?;
        Ok(())
    }
}
