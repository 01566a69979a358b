//! Authentication and preferences forms.
//!
//! Each form makes a single call to its backend and maps the result to a
//! [`FormOutcome`] carrying the message to show. Nothing is retried. While a
//! call is outstanding the form reports [`pending`](LoginForm::is_pending) and
//! refuses another submit, which is what a disabled submit button does.

use crate::{core::profile, entities::profile as profile_entity, errors::Result};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{info, warn};

/// Upstream error code for a sign-up with an e-mail that is already registered.
pub const USER_ALREADY_EXISTS: &str = "user_already_exists";

/// Shown for any failure without a dedicated message.
pub const GENERIC_ERROR: &str = "Wystąpił błąd. Spróbuj ponownie.";
/// Shown when login credentials are rejected.
pub const LOGIN_FAILED: &str = "Nieprawidłowy e-mail lub hasło";
/// Shown after a successful login.
pub const LOGIN_SUCCESS: &str = "Zalogowano pomyślnie";
/// Shown when password and confirmation differ.
pub const PASSWORD_MISMATCH: &str = "Hasła nie są identyczne";
/// Shown when the e-mail is already registered.
pub const ACCOUNT_EXISTS: &str = "Konto z tym adresem e-mail już istnieje";
/// Shown after a successful registration.
pub const REGISTER_SUCCESS: &str = "Konto utworzone. Sprawdź skrzynkę e-mail, aby je potwierdzić.";
/// Shown after a reset e-mail is sent.
pub const RESET_SENT: &str = "Wysłaliśmy link do zresetowania hasła";
/// Shown after preferences are saved.
pub const PREFERENCES_SAVED: &str = "Zapisano preferencje";
/// Shown when the calorie goal is not a positive number.
pub const INVALID_GOAL: &str = "Cel kaloryczny musi być dodatnią liczbą";
/// Shown when a submit arrives while the previous one is still running.
pub const ALREADY_SUBMITTING: &str = "Trwa wysyłanie formularza";

/// Where the dashboard lives after login.
pub const DASHBOARD_ROUTE: &str = "/dashboard";
/// Where users go after registering.
pub const LOGIN_ROUTE: &str = "/login";

/// A signed-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for the backend
    pub access_token: String,
    /// Token to obtain a new access token
    pub refresh_token: Option<String>,
    /// Signed-in user id
    pub user_id: String,
    /// Signed-in e-mail
    pub email: Option<String>,
}

/// A newly registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUp {
    /// New user id
    pub user_id: String,
    /// Registered e-mail
    pub email: Option<String>,
}

/// Failure reported by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    /// HTTP status, 0 when the request never got an answer
    pub status: u16,
    /// Machine-readable code such as [`USER_ALREADY_EXISTS`]
    pub code: Option<String>,
    /// Human-readable text from upstream
    pub message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code}, status {})", self.message, self.status),
            None => write!(f, "{} (status {})", self.message, self.status),
        }
    }
}

impl std::error::Error for AuthError {}

/// The identity half of the remote backend.
pub trait AuthBackend {
    /// Password sign-in.
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = std::result::Result<Session, AuthError>> + Send;

    /// Account creation.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> impl Future<Output = std::result::Result<SignUp, AuthError>> + Send;

    /// Sends a password reset e-mail.
    fn send_password_reset(
        &self,
        email: &str,
    ) -> impl Future<Output = std::result::Result<(), AuthError>> + Send;
}

/// Storage for the preferences form.
pub trait ProfileStore {
    /// Creates or replaces the user's preferences.
    fn save_profile(
        &self,
        user_id: &str,
        display_name: Option<String>,
        daily_kcal_goal: f64,
        language: &str,
    ) -> impl Future<Output = Result<profile_entity::Model>> + Send;
}

impl ProfileStore for DatabaseConnection {
    fn save_profile(
        &self,
        user_id: &str,
        display_name: Option<String>,
        daily_kcal_goal: f64,
        language: &str,
    ) -> impl Future<Output = Result<profile_entity::Model>> + Send {
        profile::upsert_profile(self, user_id, display_name, daily_kcal_goal, language)
    }
}

/// What the user sees after submitting a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOutcome {
    /// Whether the remote call succeeded
    pub success: bool,
    /// Message to display
    pub message: String,
    /// Route to navigate to; `None` means stay (or close the dialog)
    pub redirect: Option<String>,
    /// Session for a successful login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

impl FormOutcome {
    fn success(message: &str, redirect: Option<&str>) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            redirect: redirect.map(str::to_string),
            session: None,
        }
    }

    fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            redirect: None,
            session: None,
        }
    }
}

/// Guards a form against overlapping submits.
#[derive(Debug, Default, Clone, Copy)]
struct Pending(bool);

impl Pending {
    /// Marks the form busy until the returned guard is dropped, or `None` if it already is.
    fn begin(&mut self) -> Option<PendingGuard<'_>> {
        if self.0 {
            return None;
        }
        self.0 = true;
        Some(PendingGuard(&mut self.0))
    }
}

/// Clears the pending flag on drop, including when the submit future is cancelled.
struct PendingGuard<'a>(&'a mut bool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    /// E-mail field
    pub email: String,
    /// Password field
    pub password: String,
    #[serde(skip)]
    pending: Pending,
}

impl LoginForm {
    /// A filled-in form.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            pending: Pending::default(),
        }
    }

    /// Whether a submit is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.0
    }

    /// Signs in once; on success the dashboard route is returned.
    pub async fn submit<B: AuthBackend>(&mut self, backend: &B) -> FormOutcome {
        let Some(submitting) = self.pending.begin() else {
            return FormOutcome::failure(ALREADY_SUBMITTING);
        };
        let result = backend.sign_in(self.email.trim(), &self.password).await;
        drop(submitting);

        match result {
            Ok(session) => {
                info!("User {} signed in", session.user_id);
                FormOutcome {
                    session: Some(session),
                    ..FormOutcome::success(LOGIN_SUCCESS, Some(DASHBOARD_ROUTE))
                }
            }
            Err(e) => {
                warn!("Sign-in failed: {e}");
                FormOutcome::failure(LOGIN_FAILED)
            }
        }
    }
}

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    /// E-mail field
    pub email: String,
    /// Password field
    pub password: String,
    /// Password confirmation field
    pub confirm_password: String,
    /// Optional name field
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(skip)]
    pending: Pending,
}

impl RegisterForm {
    /// A filled-in form.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            display_name: None,
            pending: Pending::default(),
        }
    }

    /// Whether a submit is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.0
    }

    /// Checks the confirmation locally, then signs up once.
    pub async fn submit<B: AuthBackend>(&mut self, backend: &B) -> FormOutcome {
        if self.password != self.confirm_password {
            return FormOutcome::failure(PASSWORD_MISMATCH);
        }
        let Some(submitting) = self.pending.begin() else {
            return FormOutcome::failure(ALREADY_SUBMITTING);
        };
        let display_name = self
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        let result = backend
            .sign_up(self.email.trim(), &self.password, display_name)
            .await;
        drop(submitting);

        match result {
            Ok(account) => {
                info!("Registered user {}", account.user_id);
                FormOutcome::success(REGISTER_SUCCESS, Some(LOGIN_ROUTE))
            }
            Err(e) if e.code.as_deref() == Some(USER_ALREADY_EXISTS) => {
                FormOutcome::failure(ACCOUNT_EXISTS)
            }
            Err(e) => {
                warn!("Sign-up failed: {e}");
                FormOutcome::failure(GENERIC_ERROR)
            }
        }
    }
}

/// Password reset form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordForm {
    /// E-mail field
    pub email: String,
    #[serde(skip)]
    pending: Pending,
}

impl ResetPasswordForm {
    /// A filled-in form.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            pending: Pending::default(),
        }
    }

    /// Whether a submit is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.0
    }

    /// Requests the reset e-mail once; the dialog closes on success.
    pub async fn submit<B: AuthBackend>(&mut self, backend: &B) -> FormOutcome {
        let Some(submitting) = self.pending.begin() else {
            return FormOutcome::failure(ALREADY_SUBMITTING);
        };
        let result = backend.send_password_reset(self.email.trim()).await;
        drop(submitting);

        match result {
            Ok(()) => FormOutcome::success(RESET_SENT, None),
            Err(e) => {
                warn!("Password reset failed: {e}");
                FormOutcome::failure(GENERIC_ERROR)
            }
        }
    }
}

/// Profile preferences form.
#[derive(Debug, Clone)]
pub struct PreferencesForm {
    /// Whose preferences these are
    pub user_id: String,
    /// Name field
    pub display_name: Option<String>,
    /// Daily goal field
    pub daily_kcal_goal: f64,
    /// Language field
    pub language: String,
    pending: Pending,
}

impl PreferencesForm {
    /// A filled-in form for `user_id`.
    #[must_use]
    pub fn new(user_id: impl Into<String>, daily_kcal_goal: f64) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
            daily_kcal_goal,
            language: "pl".to_string(),
            pending: Pending::default(),
        }
    }

    /// Prefills the form from a saved profile.
    #[must_use]
    pub fn from_profile(profile: &profile_entity::Model) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            display_name: profile.display_name.clone(),
            daily_kcal_goal: profile.daily_kcal_goal,
            language: profile.language.clone(),
            pending: Pending::default(),
        }
    }

    /// Whether a submit is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.0
    }

    /// Validates the goal, then saves once; the dialog closes on success.
    pub async fn submit<S: ProfileStore>(&mut self, store: &S) -> FormOutcome {
        if !self.daily_kcal_goal.is_finite() || self.daily_kcal_goal <= 0.0 {
            return FormOutcome::failure(INVALID_GOAL);
        }
        let Some(submitting) = self.pending.begin() else {
            return FormOutcome::failure(ALREADY_SUBMITTING);
        };
        let result = store
            .save_profile(
                &self.user_id,
                self.display_name.clone(),
                self.daily_kcal_goal,
                &self.language,
            )
            .await;
        drop(submitting);

        match result {
            Ok(_) => FormOutcome::success(PREFERENCES_SAVED, None),
            Err(e) => {
                warn!("Saving preferences for {} failed: {e}", self.user_id);
                FormOutcome::failure(GENERIC_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Answers every call with a canned result and counts the calls.
    #[derive(Default)]
    struct FakeBackend {
        fail_with: Option<AuthError>,
        stall_next_sign_in: AtomicBool,
        sign_in_calls: AtomicUsize,
        sign_up_calls: AtomicUsize,
        reset_calls: AtomicUsize,
    }

    impl FakeBackend {
        fn failing(status: u16, code: Option<&str>) -> Self {
            Self {
                fail_with: Some(AuthError {
                    status,
                    code: code.map(str::to_string),
                    message: "upstream said no".to_string(),
                }),
                ..Self::default()
            }
        }

        fn outcome<T>(&self, value: T) -> std::result::Result<T, AuthError> {
            self.fail_with.clone().map_or(Ok(value), Err)
        }
    }

    impl AuthBackend for FakeBackend {
        async fn sign_in(
            &self,
            email: &str,
            _password: &str,
        ) -> std::result::Result<Session, AuthError> {
            self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
            if self.stall_next_sign_in.swap(false, Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            self.outcome(Session {
                access_token: "token".to_string(),
                refresh_token: None,
                user_id: "u-1".to_string(),
                email: Some(email.to_string()),
            })
        }

        async fn sign_up(
            &self,
            email: &str,
            _password: &str,
            _display_name: Option<&str>,
        ) -> std::result::Result<SignUp, AuthError> {
            self.sign_up_calls.fetch_add(1, Ordering::SeqCst);
            self.outcome(SignUp {
                user_id: "u-2".to_string(),
                email: Some(email.to_string()),
            })
        }

        async fn send_password_reset(&self, _email: &str) -> std::result::Result<(), AuthError> {
            self.reset_calls.fetch_add(1, Ordering::SeqCst);
            self.outcome(())
        }
    }

    #[tokio::test]
    async fn test_login_success_navigates() {
        let backend = FakeBackend::default();
        let mut form = LoginForm::new(" ala@example.com ", "secret");

        let outcome = form.submit(&backend).await;

        assert!(outcome.success);
        assert_eq!(outcome.message, LOGIN_SUCCESS);
        assert_eq!(outcome.redirect.as_deref(), Some(DASHBOARD_ROUTE));
        assert_eq!(
            outcome.session.unwrap().email.as_deref(),
            Some("ala@example.com")
        );
        assert!(!form.is_pending());
    }

    #[tokio::test]
    async fn test_login_failure_message() {
        let backend = FakeBackend::failing(400, Some("invalid_credentials"));
        let mut form = LoginForm::new("ala@example.com", "wrong");

        let outcome = form.submit(&backend).await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, LOGIN_FAILED);
        assert!(outcome.redirect.is_none());
        assert_eq!(backend.sign_in_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_register_mismatch_never_calls_backend() {
        let backend = FakeBackend::default();
        let mut form = RegisterForm::new("ala@example.com", "secret1", "secret2");

        let outcome = form.submit(&backend).await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, PASSWORD_MISMATCH);
        assert_eq!(backend.sign_up_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_register_success() {
        let backend = FakeBackend::default();
        let mut form = RegisterForm::new("ala@example.com", "secret", "secret");

        let outcome = form.submit(&backend).await;

        assert!(outcome.success);
        assert_eq!(outcome.message, REGISTER_SUCCESS);
        assert_eq!(outcome.redirect.as_deref(), Some(LOGIN_ROUTE));
        assert_eq!(backend.sign_up_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_register_existing_account_message() {
        let backend = FakeBackend::failing(422, Some(USER_ALREADY_EXISTS));
        let mut form = RegisterForm::new("ala@example.com", "secret", "secret");

        let outcome = form.submit(&backend).await;

        assert_eq!(outcome.message, ACCOUNT_EXISTS);
    }

    #[tokio::test]
    async fn test_register_other_errors_are_generic() {
        let backend = FakeBackend::failing(500, Some("unexpected_failure"));
        let mut form = RegisterForm::new("ala@example.com", "secret", "secret");
        assert_eq!(form.submit(&backend).await.message, GENERIC_ERROR);

        let backend = FakeBackend::failing(0, None);
        assert_eq!(form.submit(&backend).await.message, GENERIC_ERROR);
    }

    #[tokio::test]
    async fn test_reset_password() {
        let backend = FakeBackend::default();
        let outcome = ResetPasswordForm::new("ala@example.com")
            .submit(&backend)
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.message, RESET_SENT);
        assert!(outcome.redirect.is_none());

        let backend = FakeBackend::failing(429, Some("over_email_send_rate_limit"));
        let outcome = ResetPasswordForm::new("ala@example.com")
            .submit(&backend)
            .await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, GENERIC_ERROR);
        assert_eq!(backend.reset_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pending_refuses_overlap() {
        let mut pending = Pending::default();
        let guard = pending.begin();
        assert!(guard.is_some());
        drop(guard);
        assert!(!pending.0);

        pending.0 = true;
        assert!(pending.begin().is_none());
        assert!(pending.0);
    }

    #[tokio::test]
    async fn test_cancelled_submit_releases_form() {
        let backend = FakeBackend {
            stall_next_sign_in: AtomicBool::new(true),
            ..FakeBackend::default()
        };
        let mut form = LoginForm::new("ala@example.com", "secret");

        // The caller gives up while sign-in is still outstanding
        tokio::select! {
            biased;
            _ = form.submit(&backend) => panic!("stalled sign-in finished"),
            () = std::future::ready(()) => {}
        }
        assert!(!form.is_pending());

        let outcome = form.submit(&backend).await;
        assert!(outcome.success);
        assert_eq!(backend.sign_in_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_preferences_saved_to_database() -> Result<()> {
        let db = setup_test_db().await?;
        let mut form = PreferencesForm::new("user1", 1750.0);
        form.display_name = Some("Ala".to_string());

        let outcome = form.submit(&db).await;
        assert!(outcome.success);
        assert_eq!(outcome.message, PREFERENCES_SAVED);

        let saved = profile::get_profile(&db, "user1").await?.unwrap();
        assert_eq!(saved.daily_kcal_goal, 1750.0);

        let mut reopened = PreferencesForm::from_profile(&saved);
        assert_eq!(reopened.display_name.as_deref(), Some("Ala"));
        reopened.daily_kcal_goal = 0.0;
        let outcome = reopened.submit(&db).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, INVALID_GOAL);
        assert_eq!(
            profile::get_profile(&db, "user1").await?.unwrap().daily_kcal_goal,
            1750.0
        );

        Ok(())
    }
}
