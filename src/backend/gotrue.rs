//! REST client for a GoTrue-compatible auth service.
//!
//! Implements [`AuthBackend`] with one request per call. Error bodies vary
//! between service versions, so the code and message are picked from whichever
//! of the known fields is present.

use crate::{
    config::server::ServiceConfig,
    core::auth::{AuthBackend, AuthError, Session, SignUp},
    errors::Result,
};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument};

/// Auth service client.
#[derive(Debug, Clone)]
pub struct GoTrueClient {
    client: Client,
    base_url: String,
    api_key: String,
    reset_redirect: String,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: UserRecord,
}

/// Sign-up answers with the user when e-mail confirmation is on, with a session when it is off.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user: Option<UserRecord>,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl GoTrueClient {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: &str, api_key: &str, reset_redirect: &str) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            reset_redirect: reset_redirect.to_string(),
        })
    }

    /// Creates a client from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::new(
            &config.auth_url,
            &config.auth_api_key,
            &config.password_reset_redirect,
        )
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> std::result::Result<Response, AuthError> {
        let url = format!("{}/auth/v1/{path}", self.base_url);
        let mut builder = self
            .client
            .post(url)
            .query(query)
            .header("apikey", &self.api_key)
            .json(body);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        debug!("Auth service answered {status}: {text}");
        Err(parse_error(status.as_u16(), &text))
    }
}

fn transport_error(error: reqwest::Error) -> AuthError {
    AuthError {
        status: error.status().map_or(0, |s| s.as_u16()),
        code: None,
        message: error.to_string(),
    }
}

/// Extracts the code and message from an error body.
fn parse_error(status: u16, body: &str) -> AuthError {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return AuthError {
            status,
            code: None,
            message: if body.is_empty() {
                format!("HTTP {status}")
            } else {
                body.to_string()
            },
        };
    };

    let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

    let code = text("error_code").or_else(|| text("code")).or_else(|| {
        // Older versions put the code in `error` and the text in `error_description`.
        value.get("error_description").and_then(|_| text("error"))
    });
    let message = text("msg")
        .or_else(|| text("error_description"))
        .or_else(|| text("message"))
        .or_else(|| text("error"))
        .unwrap_or_else(|| format!("HTTP {status}"));

    AuthError {
        status,
        code,
        message,
    }
}

impl AuthBackend for GoTrueClient {
    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> std::result::Result<Session, AuthError> {
        let response = self
            .post(
                "token",
                &[("grant_type", "password")],
                &Credentials { email, password },
            )
            .await?;
        let token: TokenResponse = response.json().await.map_err(transport_error)?;

        Ok(Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user_id: token.user.id,
            email: token.user.email,
        })
    }

    #[instrument(skip(self, password))]
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> std::result::Result<SignUp, AuthError> {
        let body = json!({
            "email": email,
            "password": password,
            "data": { "display_name": display_name },
        });
        let response = self.post("signup", &[], &body).await?;
        let created: SignUpResponse = response.json().await.map_err(transport_error)?;

        match (created.user, created.id) {
            (Some(user), _) => Ok(SignUp {
                user_id: user.id,
                email: user.email,
            }),
            (None, Some(id)) => Ok(SignUp {
                user_id: id,
                email: created.email,
            }),
            (None, None) => Err(AuthError {
                status: 200,
                code: None,
                message: "Sign-up response did not contain a user".to_string(),
            }),
        }
    }

    #[instrument(skip(self))]
    async fn send_password_reset(&self, email: &str) -> std::result::Result<(), AuthError> {
        self.post(
            "recover",
            &[("redirect_to", self.reset_redirect.as_str())],
            &json!({ "email": email }),
        )
        .await?;
        Ok(())
    }
}
