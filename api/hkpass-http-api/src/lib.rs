use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use hkpass_app::{
    Application,
    workflow::{
        CrudError,
        access::LoginError,
        leaderboard::LeaderboardError,
        scoring::{attack::AttackError, complete_minigame::CompletionError},
    },
};
use log::info;
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
};

mod attacks;
mod leaderboards;
mod login;
mod minigames;
mod players;
mod settings;
mod teams;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
}

pub fn router(app: Arc<Application>) -> Router {
    let api: Router<AppState> = Router::new()
        .route("/teams", get(teams::list).post(teams::create))
        .route(
            "/teams/{id}",
            get(teams::get)
                .put(teams::replace)
                .patch(teams::update)
                .delete(teams::delete),
        )
        .route("/players", get(players::list).post(players::create))
        .route(
            "/players/{id}",
            get(players::get)
                .put(players::replace)
                .patch(players::update)
                .delete(players::delete),
        )
        .route("/minigames", get(minigames::list).post(minigames::create))
        .route(
            "/minigames/{id}",
            get(minigames::get)
                .put(minigames::replace)
                .patch(minigames::update)
                .delete(minigames::delete),
        )
        .route("/minigames/{id}/complete", post(minigames::complete))
        .route("/settings", get(settings::list).post(settings::create))
        .route(
            "/settings/{id}",
            get(settings::get)
                .put(settings::replace)
                .patch(settings::update)
                .delete(settings::delete),
        )
        .route("/attacks", get(attacks::list).post(attacks::submit))
        .route("/leaderboards", get(leaderboards::get_all))
        .route("/login", post(login::login));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .with_state(AppState { app })
}

/// The router behind a layer that strips trailing slashes, so `/api/teams/`
/// and `/api/teams` reach the same handler.
pub fn service(app: Arc<Application>) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(app))
}

pub async fn run(
    app: Arc<Application>,
    host: &str,
    port: u16,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;

    info!("HTTP API listening on {}:{}", host, port);
    axum::serve(
        listener,
        axum::ServiceExt::<Request>::into_make_service(service(app)),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    info!("HTTP API shut down gracefully");
    Ok(())
}

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    Conflict(String),
    BadRequest(String),
    Unauthorized(String),
    Internal(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServiceError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let (status, msg) = match self {
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServiceError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServiceError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

impl From<CrudError> for ServiceError {
    fn from(err: CrudError) -> Self {
        match err {
            CrudError::NotFound(what) => ServiceError::NotFound(format!("{} not found", what)),
            CrudError::Conflict(msg) => ServiceError::Conflict(msg),
            CrudError::Validation(msg) => ServiceError::BadRequest(msg),
            CrudError::Repository => ServiceError::Internal("storage failure".to_string()),
        }
    }
}

impl From<AttackError> for ServiceError {
    fn from(err: AttackError) -> Self {
        match err {
            AttackError::NotFound(what) => ServiceError::NotFound(format!("{} not found", what)),
            AttackError::InvalidOperation(msg) => ServiceError::BadRequest(msg),
            AttackError::Conflict(msg) => ServiceError::Conflict(msg),
            AttackError::Repository => ServiceError::Internal("storage failure".to_string()),
        }
    }
}

impl From<CompletionError> for ServiceError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::NotFound(what) => {
                ServiceError::NotFound(format!("{} not found", what))
            }
            CompletionError::Repository => ServiceError::Internal("storage failure".to_string()),
        }
    }
}

impl From<LeaderboardError> for ServiceError {
    fn from(err: LeaderboardError) -> Self {
        match err {
            LeaderboardError::Repository => ServiceError::Internal("storage failure".to_string()),
        }
    }
}

impl From<LoginError> for ServiceError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::WrongPassword => ServiceError::Unauthorized("wrong password".to_string()),
            LoginError::SettingsMissing => {
                ServiceError::Conflict("settings record is missing".to_string())
            }
            LoginError::Repository => ServiceError::Internal("storage failure".to_string()),
        }
    }
}

/// Narrows a wire integer into a domain field, reporting the field name on
/// failure.
pub(crate) fn narrow<T: TryFrom<i64>>(field: &str, value: i64) -> Result<T, ServiceError> {
    T::try_from(value)
        .map_err(|_| ServiceError::BadRequest(format!("{} is out of range: {}", field, value)))
}
