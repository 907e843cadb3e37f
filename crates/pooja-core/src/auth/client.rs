//! GoTrue password and refresh-token flows.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{
    describe_api_error, AuthError, AuthResult, AuthSession, AuthUser, SessionPersistence,
};
use crate::config::{http_client, SupabaseConfig, HTTP_TIMEOUT};
use crate::util::{is_web_url, now_unix_seconds, trimmed_non_empty};

/// Grants accepted by the `/token` endpoint.
enum Grant<'a> {
    Password { email: &'a str, password: &'a str },
    RefreshToken(&'a str),
}

impl Grant<'_> {
    const fn name(&self) -> &'static str {
        match self {
            Self::Password { .. } => "password",
            Self::RefreshToken(_) => "refresh_token",
        }
    }

    fn body(&self) -> serde_json::Value {
        match self {
            Self::Password { email, password } => json!({ "email": email, "password": password }),
            Self::RefreshToken(token) => json!({ "refresh_token": token }),
        }
    }
}

/// Auth client that keeps its session in `S`.
#[derive(Clone)]
pub struct AuthClient<S: SessionPersistence> {
    base: Url,
    anon_key: String,
    http: Client,
    store: S,
}

impl<S: SessionPersistence> AuthClient<S> {
    pub fn new(config: &SupabaseConfig, store: S) -> AuthResult<Self> {
        let anon_key = trimmed_non_empty(Some(config.anon_key.clone())).ok_or(
            AuthError::InvalidConfiguration("Supabase anon key must not be empty"),
        )?;
        Ok(Self {
            base: auth_base_url(&config.url)?,
            anon_key,
            http: http_client()?,
            store,
        })
    }

    /// The stored session, refreshed when it is about to expire.
    ///
    /// A session that cannot be refreshed is dropped and `None` returned.
    pub async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        let Some(stored) = self.store.load_session()? else {
            return Ok(None);
        };
        if !stored.needs_refresh() {
            return Ok(Some(stored));
        }

        match self.refresh_session(&stored.refresh_token).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(error) => {
                tracing::warn!("Stored session for {} could not be refreshed: {}", stored.user.email, error);
                self.store.clear_session()?;
                Ok(None)
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Api("Email and password are required".to_string()));
        }

        let session = self.token(Grant::Password { email, password }).await?;
        tracing::info!("Signed in as {}", session.user.email);
        Ok(session)
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> AuthResult<AuthSession> {
        if refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Refresh token must not be empty",
            ));
        }
        self.token(Grant::RefreshToken(refresh_token)).await
    }

    /// Revoke the session server-side and forget it locally.
    pub async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let response = self
            .post(self.endpoint("logout")?)
            .bearer_auth(access_token)
            .send()
            .await?;
        // An expired token is already unusable.
        if response.status() != StatusCode::UNAUTHORIZED {
            ensure_success(response).await?;
        }

        self.store.clear_session()?;
        tracing::info!("Signed out");
        Ok(())
    }

    async fn token(&self, grant: Grant<'_>) -> AuthResult<AuthSession> {
        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", grant.name());

        let response = self
            .post(url)
            .bearer_auth(&self.anon_key)
            .json(&grant.body())
            .send()
            .await?;
        let session = ensure_success(response)
            .await?
            .json::<TokenResponse>()
            .await?
            .into_session()?;

        self.store.save_session(&session)?;
        Ok(session)
    }

    fn post(&self, url: Url) -> RequestBuilder {
        self.http
            .post(url)
            .header("apikey", &self.anon_key)
            .timeout(HTTP_TIMEOUT)
    }

    fn endpoint(&self, path: &str) -> AuthResult<Url> {
        self.base
            .join(path)
            .map_err(|_| AuthError::InvalidConfiguration("Supabase URL cannot hold auth paths"))
    }
}

/// The `/auth/v1/` base for a project URL, which may already include it.
pub fn auth_base_url(project_url: &str) -> AuthResult<Url> {
    let trimmed = project_url.trim().trim_end_matches('/');
    if !is_web_url(trimmed) {
        return Err(AuthError::InvalidConfiguration(
            "Supabase URL must be an http:// or https:// URL",
        ));
    }

    let base = if trimmed.ends_with("/auth/v1") {
        format!("{trimmed}/")
    } else {
        format!("{trimmed}/auth/v1/")
    };
    Url::parse(&base).map_err(|_| AuthError::InvalidConfiguration("Supabase URL is malformed"))
}

async fn ensure_success(response: Response) -> AuthResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AuthError::Api(describe_api_error(status, &body)))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: GoTrueUser,
}

impl TokenResponse {
    fn into_session(self) -> AuthResult<AuthSession> {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|seconds| now_unix_seconds() + seconds))
            .ok_or_else(|| AuthError::Api("Token response has no expiry".to_string()))?;
        Ok(AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

/// Profile fields filled in by the identity provider.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserMetadata {
    full_name: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
    picture: Option<String>,
}

impl From<GoTrueUser> for AuthUser {
    fn from(user: GoTrueUser) -> Self {
        let UserMetadata {
            full_name,
            name,
            avatar_url,
            picture,
        } = user.user_metadata;
        let email = trimmed_non_empty(user.email).unwrap_or_default();

        Self {
            name: trimmed_non_empty(full_name)
                .or_else(|| trimmed_non_empty(name))
                .unwrap_or_else(|| email.clone()),
            avatar: trimmed_non_empty(avatar_url).or_else(|| trimmed_non_empty(picture)),
            id: user.id,
            email,
        }
    }
}
