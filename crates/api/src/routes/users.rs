//! User data routes.

use axum::{
    Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::AppState;
use crate::middleware::{AuthUser, auth_middleware};
use crate::response::ApiResult;
use crate::routes::require_user;

/// Creates the user router. Everything here sits behind the session
/// cookie.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/data", get(get_user_data))
        .layer(from_fn_with_state(state, auth_middleware))
}

/// GET /api/user/data - the caller's profile, without password or OTP
/// fields.
async fn get_user_data(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Response> {
    let user = require_user(&state.db, auth.user_id()).await?;

    Ok(Json(json!({
        "success": true,
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "employment_type": user.employment_type,
            "is_verified": user.is_verified,
            "profile_picture": user.profile_picture,
        },
    }))
    .into_response())
}
