//! Auth form endpoints. Each request is one form submission.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use super::AppState;
use crate::core::auth::{FormOutcome, LoginForm, RegisterForm, ResetPasswordForm};

fn respond(outcome: FormOutcome) -> (StatusCode, Json<FormOutcome>) {
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(outcome))
}

/// `POST /auth/login`: signs in and returns the session with the dashboard redirect.
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(mut form): Json<LoginForm>,
) -> (StatusCode, Json<FormOutcome>) {
    respond(form.submit(&state.auth).await)
}

/// `POST /auth/register`: creates an account after the passwords match.
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(mut form): Json<RegisterForm>,
) -> (StatusCode, Json<FormOutcome>) {
    respond(form.submit(&state.auth).await)
}

/// `POST /auth/reset-password`: sends the password reset e-mail.
pub async fn reset_password_handler(
    State(state): State<Arc<AppState>>,
    Json(mut form): Json<ResetPasswordForm>,
) -> (StatusCode, Json<FormOutcome>) {
    respond(form.submit(&state.auth).await)
}
