use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::auth_dto::{LoginRequest, RegisterRequest};
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::streak::update_streak;

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the account and counts the registration as the first study
    /// session, so a brand-new user already shows a streak of 1.
    pub async fn register(&self, req: RegisterRequest) -> Result<User> {
        let email = req.email.trim().to_lowercase();

        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(Error::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&req.password)?;

        let mut user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, total_sessions, last_active)
             VALUES ($1, $2, $3, 1, NOW())
             RETURNING *",
        )
        .bind(req.name.trim())
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        update_streak(&mut user, Utc::now().date_naive());
        sqlx::query("UPDATE users SET streak = $1, last_study_date = $2, updated_at = NOW() WHERE id = $3")
            .bind(user.streak)
            .bind(user.last_study_date)
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        tracing::info!("Registered user {} ({})", user.id, user.email);

        Ok(user)
    }

    /// Checks credentials and applies the per-day login activity: streak
    /// transition, session counter, last-active stamp.
    pub async fn login(&self, req: LoginRequest) -> Result<User> {
        let email = req.email.trim().to_lowercase();

        let mut user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&req.password, &user.password_hash)? {
            return Err(Error::Unauthorized("Invalid credentials".to_string()));
        }

        update_streak(&mut user, Utc::now().date_naive());
        user.total_sessions += 1;

        sqlx::query(
            "UPDATE users
             SET streak = $1, last_study_date = $2, total_sessions = total_sessions + 1,
                 last_active = NOW(), updated_at = NOW()
             WHERE id = $3",
        )
        .bind(user.streak)
        .bind(user.last_study_date)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(&self, user_id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    pub async fn rename(&self, user_id: Uuid, name: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET name = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(name.trim())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        Ok(user)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let user = self.get_by_id(user_id).await?;

        if !verify_password(current_password, &user.password_hash)? {
            return Err(Error::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        let password_hash = hash_password(new_password)?;
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
