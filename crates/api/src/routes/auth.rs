//! Authentication and account routes.
//!
//! Covers registration, login/logout, OTP verification, the password
//! reset flow, profile management, and account deletion. The session
//! token is issued here and travels only as an HTTP-only cookie.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{delete, post, put},
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::json;
use tracing::{info, warn};

use crate::AppState;
use crate::cookies::{clear_session_cookie, session_cookie};
use crate::middleware::{AuthUser, auth_middleware};
use crate::response::{ApiError, ApiResult};
use crate::routes::require_user;
use riderledger_core::account::{EmploymentType, validate_profile_picture};
use riderledger_core::auth::{
    hash_password, validate_display_name, validate_password, verify_password,
};
use riderledger_core::otp;
use riderledger_db::UserRepository;
use riderledger_db::entities::users;
use riderledger_db::repositories::{NewUser, ProfileChanges, UnverifiedUpdate};
use riderledger_shared::AppError;
use riderledger_shared::auth::{
    DeleteAccountRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    SendResetOtpRequest, UpdateProfileRequest, UploadPictureRequest, VerifyEmailRequest,
    VerifyResetOtpRequest,
};

/// Creates the auth router. Routes behind the session cookie are layered
/// with the auth middleware; the rest are public.
pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/send-verify-otp", post(send_verify_otp))
        .route("/verify-account", post(verify_account))
        .route("/is-auth", post(is_authenticated))
        .route("/update-profile", put(update_profile))
        .route("/upload-profile-picture", post(upload_profile_picture))
        .route("/remove-profile-picture", delete(remove_profile_picture))
        .route("/delete-account", delete(delete_account))
        .layer(from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/send-reset-otp", post(send_reset_otp))
        .route("/verify-reset-otp", post(verify_reset_otp))
        .route("/reset-password", post(reset_password))
        .merge(protected)
}

/// The projection returned on register/login: id, name, email only.
fn public_json(user: &users::Model) -> serde_json::Value {
    json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
    })
}

/// The full profile projection. Never includes password or OTP fields.
fn profile_json(user: &users::Model) -> serde_json::Value {
    json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "employment_type": user.employment_type,
        "is_verified": user.is_verified,
        "profile_picture": user.profile_picture,
    })
}

fn otp_matches(stored: Option<&str>, supplied: &str) -> bool {
    stored.is_some_and(|otp| otp == supplied)
}

fn otp_expired(expires_at: Option<DateTime<FixedOffset>>) -> bool {
    expires_at.is_none_or(|at| at < Utc::now())
}

/// POST /api/auth/register
///
/// A verified duplicate email is a conflict; an unverified one gets its
/// fields and OTP refreshed instead of a second account. Every success
/// path issues the session cookie.
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Response> {
    let (Some(name), Some(email), Some(password), Some(employment)) = (
        payload.name,
        payload.email,
        payload.password,
        payload.employment_type,
    ) else {
        return Err(ApiError(AppError::Validation(
            "All fields are required: name, email, password, employment_type".to_string(),
        )));
    };

    validate_display_name(&name)?;
    validate_password(&password)?;
    let employment_type: EmploymentType = employment.parse()?;

    let user_repo = UserRepository::new((*state.db).clone());
    let password_hash = hash_password(&password)?;
    let code = otp::generate();
    let expires_at = Utc::now() + otp::verify_otp_ttl();

    if let Some(existing) = user_repo.find_by_email(&email).await? {
        if existing.is_verified {
            return Err(ApiError(AppError::Conflict(
                "User already exists with this email".to_string(),
            )));
        }

        // Unverified re-registration: refresh the account in place.
        let user = user_repo
            .refresh_unverified(
                existing,
                UnverifiedUpdate {
                    name,
                    password_hash,
                    employment_type,
                    verify_otp: code.clone(),
                    verify_otp_expires_at: expires_at,
                },
            )
            .await?;

        let token = state.jwt_service.generate_session_token(user.id)?;
        let jar = jar.add(session_cookie(
            token,
            state.jwt_service.session_ttl_days(),
            state.production,
        ));

        let message = match state
            .email_service
            .send_verification_otp(&user.email, &user.name, &code)
            .await
        {
            Ok(()) => "New verification OTP sent to email.",
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Failed to send verification email");
                "Account updated, but the OTP email could not be sent."
            }
        };

        info!(user_id = %user.id, "Unverified account re-registered");
        return Ok((
            StatusCode::OK,
            jar,
            Json(json!({
                "success": true,
                "message": message,
                "user": public_json(&user),
            })),
        )
            .into_response());
    }

    let user = user_repo
        .create(NewUser {
            name,
            email,
            password_hash,
            employment_type,
            verify_otp: code.clone(),
            verify_otp_expires_at: expires_at,
        })
        .await?;

    let token = state.jwt_service.generate_session_token(user.id)?;
    let jar = jar.add(session_cookie(
        token,
        state.jwt_service.session_ttl_days(),
        state.production,
    ));

    let message = match state
        .email_service
        .send_verification_otp(&user.email, &user.name, &code)
        .await
    {
        Ok(()) => "User registered successfully. Verification OTP sent to email.",
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "Failed to send verification email");
            "User registered successfully, but the OTP email could not be sent."
        }
    };

    info!(user_id = %user.id, email = %user.email, "New user registered");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(json!({
            "success": true,
            "message": message,
            "user": public_json(&user),
        })),
    )
        .into_response())
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Response> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(ApiError(AppError::Validation(
            "Email and password are required".to_string(),
        )));
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let Some(user) = user_repo.find_by_email(&email).await? else {
        info!(email = %email, "Login attempt for unknown email");
        return Err(ApiError(AppError::Unauthorized(
            "Invalid credentials".to_string(),
        )));
    };

    if !user.is_verified {
        return Err(ApiError(AppError::Unauthorized(
            "Sign up again and verify your email to login".to_string(),
        )));
    }

    if !verify_password(&password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt");
        return Err(ApiError(AppError::Unauthorized(
            "Invalid credentials".to_string(),
        )));
    }

    let token = state.jwt_service.generate_session_token(user.id)?;
    let jar = jar.add(session_cookie(
        token,
        state.jwt_service.session_ttl_days(),
        state.production,
    ));

    info!(user_id = %user.id, "User logged in");
    Ok((
        jar,
        Json(json!({
            "success": true,
            "message": "Login successful",
            "user": public_json(&user),
        })),
    )
        .into_response())
}

/// POST /api/auth/logout - clears the session cookie unconditionally.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let jar = jar.add(clear_session_cookie(state.production));
    (
        jar,
        Json(json!({
            "success": true,
            "message": "Logged out successfully",
        })),
    )
        .into_response()
}

/// POST /api/auth/send-verify-otp - regenerates the verification OTP.
/// Already-verified accounts are a no-op success.
async fn send_verify_otp(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Response> {
    let user = require_user(&state.db, auth.user_id()).await?;

    if user.is_verified {
        return Ok(Json(json!({
            "success": true,
            "message": "Account is already verified",
        }))
        .into_response());
    }

    let code = otp::generate();
    let expires_at = Utc::now() + otp::verify_otp_ttl();
    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo.set_verify_otp(user, &code, expires_at).await?;

    let message = match state
        .email_service
        .send_verification_otp(&user.email, &user.name, &code)
        .await
    {
        Ok(()) => "Verification OTP sent to email",
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "Failed to send verification email");
            "Verification OTP generated, but the email could not be sent"
        }
    };

    Ok(Json(json!({
        "success": true,
        "message": message,
    }))
    .into_response())
}

/// POST /api/auth/verify-account - checks the OTP and marks the account
/// verified. Mismatch is reported before expiry.
async fn verify_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<VerifyEmailRequest>,
) -> ApiResult<Response> {
    let Some(code) = payload.otp else {
        return Err(ApiError(AppError::Validation("OTP is required".to_string())));
    };

    let user = require_user(&state.db, auth.user_id()).await?;

    if !otp_matches(user.verify_otp.as_deref(), &code) {
        return Err(ApiError(AppError::Validation("Invalid OTP".to_string())));
    }
    if otp_expired(user.verify_otp_expires_at) {
        return Err(ApiError(AppError::Validation("OTP has expired".to_string())));
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo.mark_verified(user).await?;

    info!(user_id = %user.id, "Email verified");
    Ok(Json(json!({
        "success": true,
        "message": "Email verified successfully",
    }))
    .into_response())
}

/// POST /api/auth/is-auth - returns the authenticated user's projection.
async fn is_authenticated(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Response> {
    let user = require_user(&state.db, auth.user_id()).await?;

    Ok(Json(json!({
        "success": true,
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "employment_type": user.employment_type,
            "is_verified": user.is_verified,
        },
    }))
    .into_response())
}

/// POST /api/auth/send-reset-otp - stores and emails a password reset
/// OTP. Requires an existing, verified account.
async fn send_reset_otp(
    State(state): State<AppState>,
    Json(payload): Json<SendResetOtpRequest>,
) -> ApiResult<Response> {
    let Some(email) = payload.email else {
        return Err(ApiError(AppError::Validation("Email is required".to_string())));
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let Some(user) = user_repo.find_by_email(&email).await? else {
        return Err(ApiError(AppError::NotFound("User not found".to_string())));
    };

    if !user.is_verified {
        return Err(ApiError(AppError::Unauthorized(
            "Please verify your email first".to_string(),
        )));
    }

    let code = otp::generate();
    let expires_at = Utc::now() + otp::reset_otp_ttl();
    let user = user_repo.set_reset_otp(user, &code, expires_at).await?;

    let message = match state
        .email_service
        .send_reset_otp(&user.email, &user.name, &code)
        .await
    {
        Ok(()) => "Password reset OTP sent to email",
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "Failed to send reset email");
            "Password reset OTP generated, but the email could not be sent"
        }
    };

    Ok(Json(json!({
        "success": true,
        "message": message,
    }))
    .into_response())
}

/// POST /api/auth/verify-reset-otp - read-only OTP check. The OTP stays
/// in place; it is cleared only when the reset completes.
async fn verify_reset_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyResetOtpRequest>,
) -> ApiResult<Response> {
    let (Some(email), Some(code)) = (payload.email, payload.otp) else {
        return Err(ApiError(AppError::Validation(
            "Email and OTP are required".to_string(),
        )));
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let Some(user) = user_repo.find_by_email(&email).await? else {
        return Err(ApiError(AppError::NotFound("User not found".to_string())));
    };

    if !otp_matches(user.reset_otp.as_deref(), &code) {
        return Err(ApiError(AppError::Validation("Invalid OTP".to_string())));
    }
    if otp_expired(user.reset_otp_expires_at) {
        return Err(ApiError(AppError::Validation("OTP has expired".to_string())));
    }

    Ok(Json(json!({
        "success": true,
        "message": "OTP verified successfully",
    }))
    .into_response())
}

/// POST /api/auth/reset-password - completes the reset: re-validates the
/// OTP, replaces the hash, clears the reset OTP pair.
async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<Response> {
    let (Some(email), Some(code), Some(new_password), Some(confirm_password)) = (
        payload.email,
        payload.otp,
        payload.new_password,
        payload.confirm_password,
    ) else {
        return Err(ApiError(AppError::Validation(
            "All fields are required".to_string(),
        )));
    };

    validate_password(&new_password)?;
    if new_password != confirm_password {
        return Err(ApiError(AppError::Validation(
            "Passwords do not match".to_string(),
        )));
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let Some(user) = user_repo.find_by_email(&email).await? else {
        return Err(ApiError(AppError::NotFound("User not found".to_string())));
    };

    if !otp_matches(user.reset_otp.as_deref(), &code) {
        return Err(ApiError(AppError::Validation("Invalid OTP".to_string())));
    }
    if otp_expired(user.reset_otp_expires_at) {
        return Err(ApiError(AppError::Validation("OTP has expired".to_string())));
    }

    let password_hash = hash_password(&new_password)?;
    let user = user_repo.reset_password(user, &password_hash).await?;

    info!(user_id = %user.id, "Password reset");
    Ok(Json(json!({
        "success": true,
        "message": "Password reset successfully",
    }))
    .into_response())
}

/// PUT /api/auth/update-profile - applies any subset of the profile
/// fields. An employment change reassigns the fixed salary; a password
/// change requires the current password.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Response> {
    let user = require_user(&state.db, auth.user_id()).await?;
    let mut changes = ProfileChanges::default();

    if let Some(name) = payload.name
        && name != user.name
    {
        validate_display_name(&name)?;
        changes.name = Some(name);
    }

    if let Some(employment) = payload.employment_type
        && employment != user.employment_type
    {
        let employment_type: EmploymentType = employment.parse()?;
        changes.employment_type = Some(employment_type);
    }

    if let Some(new_password) = payload.new_password {
        let Some(old_password) = payload.old_password else {
            return Err(ApiError(AppError::Validation(
                "Current password is required to set new password".to_string(),
            )));
        };
        if !verify_password(&old_password, &user.password_hash)? {
            return Err(ApiError(AppError::Unauthorized(
                "Current password is incorrect".to_string(),
            )));
        }
        validate_password(&new_password)?;
        changes.password_hash = Some(hash_password(&new_password)?);
    }

    if let Some(picture) = payload.profile_picture {
        // Only the format is checked here; the size ceiling belongs to
        // the dedicated upload endpoint.
        if !picture.starts_with("data:image/") {
            return Err(ApiError(AppError::Validation(
                "Invalid profile picture format".to_string(),
            )));
        }
        changes.profile_picture = Some(picture);
    }

    if changes.is_empty() {
        return Err(ApiError(AppError::Validation(
            "No changes provided".to_string(),
        )));
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo.apply_profile_changes(user, changes).await?;

    info!(user_id = %user.id, "Profile updated");
    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": profile_json(&user),
    }))
    .into_response())
}

/// POST /api/auth/upload-profile-picture - enforces the data-URI format
/// and the 5MB decoded-size ceiling.
async fn upload_profile_picture(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UploadPictureRequest>,
) -> ApiResult<Response> {
    let Some(picture) = payload.profile_picture else {
        return Err(ApiError(AppError::Validation(
            "Invalid or missing profile picture".to_string(),
        )));
    };
    validate_profile_picture(&picture)?;

    let user = require_user(&state.db, auth.user_id()).await?;
    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo.set_profile_picture(user, Some(picture)).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile picture uploaded successfully",
        "user": profile_json(&user),
    }))
    .into_response())
}

/// DELETE /api/auth/remove-profile-picture
async fn remove_profile_picture(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Response> {
    let user = require_user(&state.db, auth.user_id()).await?;

    if user.profile_picture.is_none() {
        return Err(ApiError(AppError::Validation(
            "No profile picture to remove".to_string(),
        )));
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo.set_profile_picture(user, None).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile picture removed successfully",
        "user": profile_json(&user),
    }))
    .into_response())
}

/// DELETE /api/auth/delete-account - the caller re-asserts their email
/// and password; daily records and summaries go before the user row.
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
    Json(payload): Json<DeleteAccountRequest>,
) -> ApiResult<Response> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(ApiError(AppError::Validation(
            "Email and password are required".to_string(),
        )));
    };

    let user = require_user(&state.db, auth.user_id()).await?;

    if user.email != email {
        return Err(ApiError(AppError::Unauthorized(
            "Email does not match your account".to_string(),
        )));
    }
    if !verify_password(&password, &user.password_hash)? {
        return Err(ApiError(AppError::Unauthorized(
            "Incorrect password".to_string(),
        )));
    }

    let user_repo = UserRepository::new((*state.db).clone());
    user_repo.delete_account(user.id).await?;
    let jar = jar.add(clear_session_cookie(state.production));

    info!(user_id = %user.id, "Account deleted");
    Ok((
        jar,
        Json(json!({
            "success": true,
            "message": "Account deleted successfully",
        })),
    )
        .into_response())
}
