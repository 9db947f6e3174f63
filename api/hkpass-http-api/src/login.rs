use axum::{Json, extract::State};

use crate::{AppState, ServiceError};

#[derive(serde::Deserialize)]
pub struct JsonLogin {
    password: String,
}

pub async fn login(
    State(app_state): State<AppState>,
    Json(body): Json<JsonLogin>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    app_state
        .app
        .display_login_use_case
        .verify(&body.password)
        .await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
