use diesel::prelude::*;

use crate::models::{NewProfile, Profile, ProfileInput, ProfileRole};

pub fn get_profile_by_id(
    conn: &mut SqliteConnection,
    profile_id: i32,
) -> Result<Option<Profile>, diesel::result::Error> {
    use crate::schema::profiles::dsl::*;
    let result = profiles
        .filter(id.eq(profile_id))
        .first::<Profile>(conn)
        .optional()?;
    Ok(result)
}

pub fn get_profile_by_external_id(
    conn: &mut SqliteConnection,
    external_id: &str,
) -> Result<Option<Profile>, diesel::result::Error> {
    use crate::schema::profiles::dsl::*;
    let result = profiles
        .filter(external_user_id.eq(external_id))
        .first::<Profile>(conn)
        .optional()?;
    Ok(result)
}

pub fn get_all_profiles(
    conn: &mut SqliteConnection,
) -> Result<Vec<Profile>, diesel::result::Error> {
    use crate::schema::profiles::dsl::*;
    profiles.order(id.asc()).load::<Profile>(conn)
}

/// Idempotent create-if-absent keyed by the identity provider's user id.
/// Called on every authenticated session start; repeated calls return the
/// same row and never duplicate it.
pub fn upsert_profile(
    conn: &mut SqliteConnection,
    external_id: &str,
    display_name: &str,
    mail: &str,
    image: Option<&str>,
) -> Result<Profile, diesel::result::Error> {
    use crate::schema::profiles::dsl::*;

    let new_profile = NewProfile {
        external_user_id: external_id.to_string(),
        name: display_name.to_string(),
        email: mail.to_string(),
        image_url: image.map(|url| url.to_string()),
        role: ProfileRole::User,
    };

    // A concurrent first access races on the unique external id; the loser's
    // insert is a no-op and both read the same row back.
    diesel::insert_into(profiles)
        .values(&new_profile)
        .on_conflict(external_user_id)
        .do_nothing()
        .execute(conn)?;

    profiles
        .filter(external_user_id.eq(external_id))
        .first::<Profile>(conn)
}

/// Full scalar replace of the profile's editable fields.
pub fn update_profile(
    conn: &mut SqliteConnection,
    profile_id: i32,
    input: &ProfileInput,
) -> Result<Option<Profile>, diesel::result::Error> {
    use crate::schema::profiles::dsl::*;

    let rows = diesel::update(profiles.filter(id.eq(profile_id)))
        .set((
            name.eq(&input.name),
            email.eq(&input.email),
            role.eq(input.role),
            register_number.eq(&input.register_number),
            position.eq(&input.position),
        ))
        .execute(conn)?;

    if rows == 0 {
        return Ok(None);
    }
    get_profile_by_id(conn, profile_id)
}

pub fn delete_profile(
    conn: &mut SqliteConnection,
    profile_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::profiles::dsl::*;
    let rows_affected = diesel::delete(profiles.filter(id.eq(profile_id))).execute(conn)?;
    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::setup_test_db;

    #[test]
    fn test_upsert_is_idempotent() {
        let mut conn = setup_test_db();

        let first = upsert_profile(
            &mut conn,
            "idp_42",
            "Dana Field",
            "dana@example.com",
            Some("https://img.example/dana.png"),
        )
        .expect("upsert should succeed");
        assert_eq!(first.role, ProfileRole::User);

        let second = upsert_profile(
            &mut conn,
            "idp_42",
            "Dana Field",
            "dana@example.com",
            None,
        )
        .expect("repeat upsert should succeed");
        assert_eq!(second.id, first.id);

        let all = get_all_profiles(&mut conn).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_update_profile_fields() {
        let mut conn = setup_test_db();
        let profile =
            upsert_profile(&mut conn, "idp_7", "Tech One", "tech@example.com", None).unwrap();

        let updated = update_profile(
            &mut conn,
            profile.id,
            &ProfileInput {
                name: "Tech One".to_string(),
                email: "tech@example.com".to_string(),
                role: ProfileRole::Technician,
                register_number: Some("REG-001".to_string()),
                position: Some("Field technician".to_string()),
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.role, ProfileRole::Technician);
        assert_eq!(updated.register_number.as_deref(), Some("REG-001"));
    }
}
