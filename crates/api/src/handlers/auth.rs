//! Handlers for the `/auth` resource (login, signup, password reset,
//! logout, session retrieval).
//!
//! Credentials live in the CRM-equivalent Contacts table; only Argon2
//! hashes and reset-token digests are stored there. Access tokens are
//! stateless JWTs, so logout is a client-side discard that we log for
//! audit.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use reeltrack_core::error::CoreError;
use reeltrack_records::contacts::Contact;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::reset::{generate_reset_token, hash_reset_token};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// Request body for `POST /auth/reset-password/confirm`.
#[derive(Debug, Deserialize)]
pub struct ConfirmResetRequest {
    pub email: String,
    /// Plaintext token from the reset email.
    pub token: String,
    pub password: String,
}

/// Successful authentication response returned by login and signup.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`] and `/auth/me`.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    /// Organization slug, when the contact is linked to one.
    pub org: Option<String>,
    pub staff: bool,
}

impl From<Contact> for UserInfo {
    fn from(contact: Contact) -> Self {
        Self {
            email: contact.email,
            name: contact.display_name,
            avatar_url: contact.avatar_url,
            org: contact.org,
            staff: contact.is_staff,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let contact = state
        .tables
        .contacts
        .find_by_email(&input.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    // A contact row can exist (created by the agency) before the client
    // ever signed up; such rows have no password hash yet.
    let stored_hash = contact
        .password_hash
        .as_deref()
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, stored_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::info!(email = %contact.email, "Failed login attempt");
        return Err(invalid_credentials());
    }

    tracing::info!(email = %contact.email, "Client signed in");
    build_auth_response(&state, contact)
}

/// POST /api/v1/auth/signup
///
/// Create a contact with credentials and sign the caller in.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if input.email.trim().is_empty() || !input.email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "A valid email address is required".into(),
        )));
    }

    if state
        .tables
        .contacts
        .find_by_email(&input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let contact = state
        .tables
        .contacts
        .create(&input.email, input.name.trim(), &password_hash)
        .await?;

    tracing::info!(email = %contact.email, "New client signed up");
    let response = build_auth_response(&state, contact)?;
    Ok((StatusCode::CREATED, response))
}

/// POST /api/v1/auth/reset-password
///
/// Issue a password-reset token and mail it to the contact. Always
/// answers 202 with a generic message so the endpoint cannot be used to
/// probe which emails exist.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    if let Some(contact) = state.tables.contacts.find_by_email(&input.email).await? {
        let (token, token_hash) = generate_reset_token();
        state
            .tables
            .contacts
            .set_reset_token_hash(&contact.record_id, &token_hash)
            .await?;

        match &state.mailer {
            Some(mailer) => {
                if let Err(e) = mailer.send_reset(&contact.email, &token).await {
                    tracing::error!(email = %contact.email, error = %e, "Failed to send reset email");
                }
            }
            None => {
                tracing::warn!(email = %contact.email, "SMTP not configured; reset email skipped");
            }
        }
    } else {
        tracing::debug!(email = %input.email, "Password reset requested for unknown email");
    }

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/reset-password/confirm
///
/// Consume a reset token and set the new password. Any mismatch answers
/// with the same generic 401 so the endpoint leaks nothing about which
/// part failed.
pub async fn confirm_reset(
    State(state): State<AppState>,
    Json(input): Json<ConfirmResetRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let contact = state
        .tables
        .contacts
        .find_by_email(&input.email)
        .await?
        .ok_or_else(invalid_reset_token)?;

    let stored_hash = contact
        .reset_token_hash
        .as_deref()
        .ok_or_else(invalid_reset_token)?;

    if hash_reset_token(&input.token) != stored_hash {
        tracing::info!(email = %contact.email, "Reset token mismatch");
        return Err(invalid_reset_token());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    state
        .tables
        .contacts
        .set_password_hash(&contact.record_id, &password_hash)
        .await?;
    state
        .tables
        .contacts
        .clear_reset_token_hash(&contact.record_id)
        .await?;

    tracing::info!(email = %contact.email, "Password reset completed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/logout
///
/// Tokens are stateless; the client discards its copy. Logged for audit.
pub async fn logout(auth: AuthUser) -> AppResult<StatusCode> {
    tracing::info!(email = %auth.email, "Client signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// Return the signed-in contact's current profile from the CRM table.
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserInfo>> {
    let contact = state
        .tables
        .contacts
        .find_by_email(&auth.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Account no longer exists".into(),
            ))
        })?;

    Ok(Json(contact.into()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

fn invalid_reset_token() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid or expired reset token".into(),
    ))
}

fn build_auth_response(state: &AppState, contact: Contact) -> AppResult<Json<AuthResponse>> {
    let access_token = generate_access_token(
        &contact.email,
        &contact.display_name,
        contact.is_staff,
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: contact.into(),
    }))
}
