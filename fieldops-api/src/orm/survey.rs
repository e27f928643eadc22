//! Survey persistence.
//!
//! Exactly one survey may exist per order; the unique constraint on
//! `surveys.order_id` is the backstop for the explicit existence check.
//! On update, participants with a null answered timestamp are treated as
//! discardable drafts: they are deleted and the new participant set is
//! inserted in the same transaction. Answered participants are preserved.

use diesel::prelude::*;

use crate::models::{
    NewSurvey, NewSurveyParticipant, Survey, SurveyDetail, SurveyInput, SurveyParticipant,
};
use crate::orm::last_insert_rowid;

pub fn get_survey_by_id(
    conn: &mut SqliteConnection,
    survey_id: i32,
) -> Result<Option<Survey>, diesel::result::Error> {
    use crate::schema::surveys::dsl::*;
    let result = surveys
        .filter(id.eq(survey_id))
        .first::<Survey>(conn)
        .optional()?;
    Ok(result)
}

pub fn get_survey_by_order(
    conn: &mut SqliteConnection,
    order: i32,
) -> Result<Option<Survey>, diesel::result::Error> {
    use crate::schema::surveys::dsl::*;
    let result = surveys
        .filter(order_id.eq(order))
        .first::<Survey>(conn)
        .optional()?;
    Ok(result)
}

pub fn get_all_surveys(conn: &mut SqliteConnection) -> Result<Vec<Survey>, diesel::result::Error> {
    use crate::schema::surveys::dsl::*;
    surveys.order(id.asc()).load::<Survey>(conn)
}

pub fn get_participants(
    conn: &mut SqliteConnection,
    survey: i32,
) -> Result<Vec<SurveyParticipant>, diesel::result::Error> {
    use crate::schema::survey_participants::dsl::*;
    survey_participants
        .filter(survey_id.eq(survey))
        .order(id.asc())
        .load::<SurveyParticipant>(conn)
}

pub fn get_survey_detail(
    conn: &mut SqliteConnection,
    survey: Survey,
) -> Result<SurveyDetail, diesel::result::Error> {
    let participants = get_participants(conn, survey.id)?;
    Ok(SurveyDetail {
        survey,
        participants,
    })
}

fn insert_participants(
    conn: &mut SqliteConnection,
    survey: i32,
    input: &SurveyInput,
) -> Result<(), diesel::result::Error> {
    use crate::schema::survey_participants;

    let rows: Vec<NewSurveyParticipant> = input
        .participants
        .iter()
        .map(|p| NewSurveyParticipant {
            survey_id: survey,
            name: p.name.clone(),
            email: p.email.clone(),
            role: p.role.clone(),
        })
        .collect();
    diesel::insert_into(survey_participants::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

/// Transactionally inserts a survey and its participants.
pub fn insert_survey(
    conn: &mut SqliteConnection,
    input: &SurveyInput,
) -> Result<SurveyDetail, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::surveys;

        diesel::insert_into(surveys::table)
            .values(&NewSurvey {
                order_id: input.order_id,
            })
            .execute(conn)?;
        let survey_id = last_insert_rowid(conn)?;

        insert_participants(conn, survey_id, input)?;

        let survey = surveys::table
            .filter(surveys::id.eq(survey_id))
            .first::<Survey>(conn)?;
        get_survey_detail(conn, survey)
    })
}

/// Replaces the survey's draft participants: deletes those whose answered
/// timestamp is null, then bulk-inserts the new list, in one transaction.
/// Returns Ok(None) if the survey id is absent.
///
/// The survey stays bound to the order it was created for; the input's
/// `order_id` never moves it. Reassignment would let answered responses
/// migrate between engagements.
pub fn update_survey(
    conn: &mut SqliteConnection,
    survey_id: i32,
    input: &SurveyInput,
) -> Result<Option<SurveyDetail>, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::survey_participants;

        let survey = match get_survey_by_id(conn, survey_id)? {
            Some(survey) => survey,
            None => return Ok(None),
        };

        diesel::delete(
            survey_participants::table
                .filter(survey_participants::survey_id.eq(survey.id))
                .filter(survey_participants::answered_at.is_null()),
        )
        .execute(conn)?;

        insert_participants(conn, survey.id, input)?;

        get_survey_detail(conn, survey).map(Some)
    })
}

/// Returns Ok(true) if the survey was found and deleted (participants
/// cascade).
pub fn delete_survey(
    conn: &mut SqliteConnection,
    survey_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::surveys::dsl::*;
    let rows_affected = diesel::delete(surveys.filter(id.eq(survey_id))).execute(conn)?;
    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyInput, OrderInput, OrderScheduleInput, SurveyParticipantInput};
    use crate::orm::company::insert_company;
    use crate::orm::order::insert_order;
    use crate::orm::testing::setup_test_db;
    use chrono::NaiveDate;

    fn seed_order(conn: &mut SqliteConnection) -> i32 {
        let company = insert_company(
            conn,
            &CompanyInput {
                name: "Survey Holder".to_string(),
                legal_id: "33.333.333/0001-33".to_string(),
                unit_label: None,
            },
        )
        .unwrap();
        let (order, _) = insert_order(
            conn,
            &OrderInput {
                company_id: company.id,
                requester: "Requester".to_string(),
                location: "Plant C".to_string(),
                purpose: "Install".to_string(),
                schedule: OrderScheduleInput {
                    starts_on: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
                    predicted_end_on: None,
                },
            },
        )
        .unwrap();
        order.id
    }

    fn survey_input(order_id: i32, names: &[&str]) -> SurveyInput {
        SurveyInput {
            order_id,
            participants: names
                .iter()
                .map(|n| SurveyParticipantInput {
                    name: n.to_string(),
                    email: None,
                    role: "operator".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_insert_survey_with_participants() {
        let mut conn = setup_test_db();
        let order_id = seed_order(&mut conn);

        let detail = insert_survey(&mut conn, &survey_input(order_id, &["Alice", "Bob"]))
            .expect("survey insert should succeed");
        assert_eq!(detail.survey.order_id, order_id);
        assert_eq!(detail.participants.len(), 2);
        assert!(detail.participants.iter().all(|p| p.answered_at.is_none()));
    }

    #[test]
    fn test_second_survey_for_order_violates_unique_constraint() {
        let mut conn = setup_test_db();
        let order_id = seed_order(&mut conn);
        insert_survey(&mut conn, &survey_input(order_id, &["Alice"])).unwrap();

        let err = insert_survey(&mut conn, &survey_input(order_id, &["Mallory"])).unwrap_err();
        assert!(matches!(
            err,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _
            )
        ));

        // The original survey and its participants are unchanged.
        let survey = get_survey_by_order(&mut conn, order_id).unwrap().unwrap();
        let participants = get_participants(&mut conn, survey.id).unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].name, "Alice");
    }

    #[test]
    fn test_update_preserves_answered_participants() {
        let mut conn = setup_test_db();
        let order_id = seed_order(&mut conn);
        let detail =
            insert_survey(&mut conn, &survey_input(order_id, &["Alice", "Bob"])).unwrap();

        // Mark Alice as answered; she must survive the replace.
        {
            use crate::schema::survey_participants::dsl::*;
            diesel::update(
                survey_participants
                    .filter(survey_id.eq(detail.survey.id))
                    .filter(name.eq("Alice")),
            )
            .set(answered_at.eq(chrono::Utc::now().naive_utc()))
            .execute(&mut conn)
            .unwrap();
        }

        let updated = update_survey(
            &mut conn,
            detail.survey.id,
            &survey_input(order_id, &["Carol"]),
        )
        .unwrap()
        .unwrap();

        let names: Vec<&str> = updated.participants.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Carol"]);
    }

    #[test]
    fn test_update_never_reassigns_the_order() {
        let mut conn = setup_test_db();
        let company = insert_company(
            &mut conn,
            &CompanyInput {
                name: "Two Orders Co".to_string(),
                legal_id: "55.555.555/0001-55".to_string(),
                unit_label: None,
            },
        )
        .unwrap();
        let order_input = |purpose: &str| OrderInput {
            company_id: company.id,
            requester: "Requester".to_string(),
            location: "Plant C".to_string(),
            purpose: purpose.to_string(),
            schedule: OrderScheduleInput {
                starts_on: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
                predicted_end_on: None,
            },
        };
        let (first_order, _) = insert_order(&mut conn, &order_input("Install")).unwrap();
        let (second_order, _) = insert_order(&mut conn, &order_input("Repair")).unwrap();

        let detail =
            insert_survey(&mut conn, &survey_input(first_order.id, &["Alice"])).unwrap();

        let updated = update_survey(
            &mut conn,
            detail.survey.id,
            &survey_input(second_order.id, &["Bob"]),
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.survey.order_id, first_order.id);
        assert!(get_survey_by_order(&mut conn, second_order.id)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_update_missing_survey_returns_none() {
        let mut conn = setup_test_db();
        let order_id = seed_order(&mut conn);
        let result = update_survey(&mut conn, 777, &survey_input(order_id, &["X"])).unwrap();
        assert!(result.is_none());
    }
}
