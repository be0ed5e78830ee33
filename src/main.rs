use axum::{
    routing::{get, post, put},
    Router,
};
use prepforge_backend::middleware::rate_limit::AuthRateLimiter;
use prepforge_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware, routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/api/health", get(routes::health::health));

    // Credential endpoints stay unauthenticated but rate-limited.
    let auth_api = Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .layer(axum::middleware::from_fn_with_state(
            AuthRateLimiter::new(config.auth_rps),
            middleware::rate_limit::limit_middleware,
        ));

    let user_api = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/auth/profile", put(routes::auth::update_profile))
        .route(
            "/api/auth/change-password",
            put(routes::auth::change_password),
        )
        .route("/api/questions", get(routes::questions::list_questions))
        .route("/api/questions/topics", get(routes::questions::list_topics))
        .route("/api/questions/:id", get(routes::questions::get_question))
        .route(
            "/api/questions/:id/submit",
            post(routes::questions::submit_answer),
        )
        .route("/api/mocktest/generate", post(routes::mock_tests::generate))
        .route("/api/mocktest", get(routes::mock_tests::list))
        .route("/api/mocktest/:id", get(routes::mock_tests::detail))
        .route("/api/mocktest/:id/start", post(routes::mock_tests::start))
        .route("/api/mocktest/:id/submit", post(routes::mock_tests::submit))
        .route(
            "/api/bookmarks",
            get(routes::bookmarks::list_bookmarks).post(routes::bookmarks::create_bookmark),
        )
        .route(
            "/api/bookmarks/collections",
            get(routes::bookmarks::list_collections),
        )
        .route(
            "/api/bookmarks/:id",
            put(routes::bookmarks::update_bookmark).delete(routes::bookmarks::remove_bookmark),
        )
        .route("/api/analytics/overview", get(routes::analytics::overview))
        .route(
            "/api/analytics/topic-breakdown",
            get(routes::analytics::topic_breakdown),
        )
        .route("/api/analytics/activity", get(routes::analytics::activity))
        .route(
            "/api/analytics/test-history",
            get(routes::analytics::test_history),
        )
        .route(
            "/api/analytics/difficulty-breakdown",
            get(routes::analytics::difficulty_breakdown),
        )
        .route("/api/export/my-progress", get(routes::export::my_progress))
        .route("/api/export/my-tests", get(routes::export::my_tests))
        .route_layer(axum::middleware::from_fn(middleware::auth::require_auth));

    let admin_api = Router::new()
        .route("/api/questions", post(routes::questions::create_question))
        .route(
            "/api/questions/:id",
            put(routes::questions::update_question).delete(routes::questions::delete_question),
        )
        .route("/api/export/attendance", get(routes::export::attendance))
        .route_layer(axum::middleware::from_fn(middleware::auth::require_admin));

    let app = base_routes
        .merge(auth_api)
        .merge(user_api)
        .merge(admin_api)
        .with_state(app_state)
        .layer(middleware::cors::client_cors(config.client_url.as_deref()))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
