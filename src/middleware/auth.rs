use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::models::user::ROLE_ADMIN;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> crate::error::Result<Uuid> {
        self.sub
            .parse()
            .map_err(|_| crate::error::Error::Unauthorized("Invalid token subject".to_string()))
    }
}

fn unauthorized(reason: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": reason }))).into_response()
}

fn decode_claims(headers: &HeaderMap) -> Result<Claims, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("missing_authorization")?;
    let auth_str = auth_header.to_str().map_err(|_| "bad_authorization")?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("unsupported_scheme")?;

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| "invalid_token")
}

/// Requires a valid bearer token; the decoded [`Claims`] are inserted into
/// request extensions for handlers to consume.
pub async fn require_auth(mut req: Request, next: Next) -> Response {
    match decode_claims(req.headers()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(reason) => unauthorized(reason),
    }
}

/// Like [`require_auth`], but additionally rejects non-admin roles.
pub async fn require_admin(mut req: Request, next: Next) -> Response {
    match decode_claims(req.headers()) {
        Ok(claims) => {
            let role = claims.role.clone().unwrap_or_default();
            if !role.eq_ignore_ascii_case(ROLE_ADMIN) {
                return (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "Admin access required" })),
                )
                    .into_response();
            }
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(reason) => unauthorized(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn init_test_config() {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            std::env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
            std::env::set_var("DATABASE_URL", "postgres://localhost/prepforge_test");
            std::env::set_var("JWT_SECRET", "middleware-test-secret");
            std::env::set_var("JWT_EXPIRES_HOURS", "24");
            std::env::set_var("AUTH_RPS", "100");
            let _ = crate::config::init_config();
        });
    }

    async fn whoami(Extension(claims): Extension<Claims>) -> String {
        claims.sub
    }

    fn protected_router() -> Router {
        Router::new()
            .route("/me", get(whoami))
            .route_layer(axum::middleware::from_fn(require_auth))
    }

    fn admin_router() -> Router {
        Router::new()
            .route("/admin", get(whoami))
            .route_layer(axum::middleware::from_fn(require_admin))
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        init_test_config();
        let resp = protected_router()
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_passes_claims_through() {
        init_test_config();
        let user_id = Uuid::new_v4();
        let token =
            crate::utils::token::issue_token(user_id, "user", "middleware-test-secret", 1)
                .unwrap();
        let resp = protected_router()
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[tokio::test]
    async fn non_admin_role_is_forbidden_on_admin_routes() {
        init_test_config();
        let token =
            crate::utils::token::issue_token(Uuid::new_v4(), "user", "middleware-test-secret", 1)
                .unwrap();
        let resp = admin_router()
            .oneshot(
                Request::builder()
                    .uri("/admin")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_role_is_allowed_on_admin_routes() {
        init_test_config();
        let token =
            crate::utils::token::issue_token(Uuid::new_v4(), "admin", "middleware-test-secret", 1)
                .unwrap();
        let resp = admin_router()
            .oneshot(
                Request::builder()
                    .uri("/admin")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
