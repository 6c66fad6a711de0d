//! Profiles repository

use async_trait::async_trait;
use uuid::Uuid;

use super::{ProfileStore, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{
        profile::{NewProfile, ProfileCredentials},
        Profile, ProfileShort,
    },
};

#[async_trait]
impl ProfileStore for Repository {
    async fn profile_create(&self, profile: &NewProfile) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, email, username, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, username, created_at
            "#,
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(&profile.username)
        .bind(&profile.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, format!("Email {} is already registered", profile.email)))
    }

    async fn profile_get(&self, id: Uuid) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>(
            "SELECT id, email, username, created_at FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }

    async fn profile_get_credentials(&self, email: &str) -> AppResult<Option<ProfileCredentials>> {
        let row = sqlx::query_as::<_, ProfileCredentials>(
            "SELECT * FROM profiles WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn profile_list(&self) -> AppResult<Vec<ProfileShort>> {
        let rows = sqlx::query_as::<_, ProfileShort>(
            "SELECT id, username FROM profiles ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
