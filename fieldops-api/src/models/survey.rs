//! Survey models.
//!
//! A survey gathers post-service feedback for an order. Exactly one survey
//! may exist per order. Participants with a null answered timestamp are
//! discardable drafts and are replaced on update.

use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::require_field;

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::surveys)]
#[ts(export)]
pub struct Survey {
    pub id: i32,
    pub order_id: i32,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::surveys)]
pub struct NewSurvey {
    pub order_id: i32,
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::survey_participants)]
#[ts(export)]
pub struct SurveyParticipant {
    pub id: i32,
    pub survey_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    #[ts(type = "string | null")]
    pub answered_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::survey_participants)]
pub struct NewSurveyParticipant {
    pub survey_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub role: String,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct SurveyParticipantInput {
    pub name: String,
    pub email: Option<String>,
    pub role: String,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct SurveyInput {
    pub order_id: i32,
    pub participants: Vec<SurveyParticipantInput>,
}

impl SurveyInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.participants.is_empty() {
            return Err("participants is required".to_string());
        }
        for participant in &self.participants {
            require_field(&participant.name, "participants.name")?;
            require_field(&participant.role, "participants.role")?;
        }
        Ok(())
    }
}

/// Survey plus its participants, as returned by the detail endpoints.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SurveyDetail {
    pub survey: Survey,
    pub participants: Vec<SurveyParticipant>,
}
