use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::middleware::auth::Claims;

/// Signs a bearer token identifying the user. The secret and lifetime come
/// from configuration; passing them in keeps this testable without global
/// state.
pub fn issue_token(user_id: Uuid, role: &str, secret: &str, expires_hours: i64) -> Result<String> {
    let exp = (Utc::now() + Duration::hours(expires_hours)).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp,
        role: Some(role.to_string()),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}
