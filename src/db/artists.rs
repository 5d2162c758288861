use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use uuid::Uuid;

use crate::db::users as user_db;
use crate::models::artists::{self, Monologues, Photos};

/// Make sure `owner_id` has exactly one profile and return it.
///
/// This is the only place profiles are created. The insert relies on the
/// unique `user_id` index, so concurrent callers converge on one row. The
/// flag reports whether this call created it.
pub async fn ensure_profile(
    db: &DatabaseConnection,
    owner_id: Uuid,
    email: &str,
) -> Result<(artists::Model, bool), DbErr> {
    let candidate = artists::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner_id),
        email: Set(email.to_string()),
        full_name: Set(None),
        whatsapp: Set(None),
        calling: Set(None),
        short_bio: Set(None),
        gender: Set(None),
        language: Set(None),
        home_city: Set(None),
        home_state: Set(None),
        current_city: Set(None),
        current_state: Set(None),
        instagram: Set(None),
        youtube: Set(None),
        twitter: Set(None),
        linkedin: Set(None),
        talent_category: Set(None),
        height: Set(None),
        age: Set(None),
        screen_age: Set(None),
        video_reel: Set(None),
        skills: Set(Default::default()),
        past_projects: Set(Default::default()),
        photos: Set(Default::default()),
        monologues: Set(Default::default()),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    };

    let inserted = artists::Entity::insert(candidate)
        .on_conflict(
            OnConflict::column(artists::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    let profile = get_profile_by_owner(db, owner_id)
        .await?
        .ok_or(DbErr::RecordNotFound("Artist profile not found".to_string()))?;

    let created = inserted > 0;
    if created {
        user_db::link_artist_profile(db, owner_id, profile.id).await?;
        tracing::info!(%owner_id, profile_id = %profile.id, "artist profile created");
    }

    Ok((profile, created))
}

/// Fetch the profile owned by a user.
pub async fn get_profile_by_owner(
    db: &DatabaseConnection,
    owner_id: Uuid,
) -> Result<Option<artists::Model>, DbErr> {
    artists::Entity::find()
        .filter(artists::Column::UserId.eq(owner_id))
        .one(db)
        .await
}

/// Fetch a single profile by its own ID.
pub async fn get_profile_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<artists::Model>, DbErr> {
    artists::Entity::find_by_id(id).one(db).await
}

/// Public listing: profiles with personal info, newest first.
pub async fn get_profiles_paginated(
    db: &DatabaseConnection,
    page: u64,
    limit: u64,
) -> Result<Vec<artists::Model>, DbErr> {
    artists::Entity::find()
        .filter(artists::Column::FullName.is_not_null())
        .order_by_desc(artists::Column::CreatedAt)
        .order_by_desc(artists::Column::Id)
        .paginate(db, limit)
        .fetch_page(page - 1)
        .await
}

/// Write every column of `profile` back.
///
/// Callers read the row and apply their section while holding the owner's
/// lock, so the full-row write cannot interleave with another section's.
pub async fn save_profile(
    db: &DatabaseConnection,
    profile: artists::Model,
) -> Result<artists::Model, DbErr> {
    let mut active = artists::ActiveModel::from(profile).reset_all();
    active.updated_at = Set(Some(Utc::now()));
    active.update(db).await
}

/// Replace the photo mapping. Paths must already point at durable files.
pub async fn update_photos(
    db: &DatabaseConnection,
    profile: artists::Model,
    photos: Photos,
) -> Result<artists::Model, DbErr> {
    let mut active: artists::ActiveModel = profile.into();
    active.photos = Set(photos);
    active.updated_at = Set(Some(Utc::now()));
    active.update(db).await
}

/// Replace the monologue sequence wholesale.
pub async fn update_monologues(
    db: &DatabaseConnection,
    profile: artists::Model,
    monologues: Monologues,
) -> Result<artists::Model, DbErr> {
    let mut active: artists::ActiveModel = profile.into();
    active.monologues = Set(monologues);
    active.updated_at = Set(Some(Utc::now()));
    active.update(db).await
}
