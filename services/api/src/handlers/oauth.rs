use anyhow::Context as _;
use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::CookieJar;
use rand::RngExt;
use serde::{Deserialize, Serialize};

use skillshare_auth_types::cookie::{
    clear_oauth_state_cookie, oauth_state, set_oauth_state_cookie,
};

use crate::domain::repository::OAuthProvider;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::oauth::OAuthLoginUseCase;

const STATE_LEN: usize = 32;
const STATE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn generate_state() -> String {
    let mut rng = rand::rng();
    (0..STATE_LEN)
        .map(|_| STATE_CHARSET[rng.random_range(0..STATE_CHARSET.len())] as char)
        .collect()
}

// ── GET /auth/google ─────────────────────────────────────────────────────────

pub async fn google_login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let google = state.google.as_ref().ok_or(ApiError::OAuthUnavailable)?;
    let oauth_state = generate_state();
    let url = google.authorize_url(&oauth_state)?;
    let jar = set_oauth_state_cookie(jar, oauth_state, state.secure_cookies);
    Ok((jar, Redirect::temporary(&url)))
}

// ── GET /auth/google/callback ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
}

/// Tokens handed to the frontend in the redirect fragment.
#[derive(Serialize)]
struct CallbackFragment<'a> {
    access_token: &'a str,
    refresh_token: &'a str,
    expires_in: i64,
    provider: &'a str,
}

/// `true` when the cookie holds a non-empty state equal to the returned one.
pub fn state_matches(expected: Option<&str>, returned: &str) -> bool {
    matches!(expected, Some(expected) if !expected.is_empty() && expected == returned)
}

pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let google = state.google.clone().ok_or(ApiError::OAuthUnavailable)?;
    if !state_matches(oauth_state(&jar).as_deref(), &query.state) {
        return Err(ApiError::InvalidOAuthState);
    }
    let jar = clear_oauth_state_cookie(jar, state.secure_cookies);

    let provider = google.name();
    let usecase = OAuthLoginUseCase {
        repo: state.user_repo(),
        provider: google,
        tokens: state.tokens.clone(),
    };
    let pair = usecase.execute(&query.code).await?;

    let fragment = serde_qs::to_string(&CallbackFragment {
        access_token: &pair.access_token,
        refresh_token: &pair.refresh_token,
        expires_in: pair.expires_in,
        provider,
    })
    .context("encode oauth callback fragment")?;
    let target = format!("{}#{fragment}", state.frontend_oauth_callback_url);
    Ok((jar, Redirect::temporary(&target)))
}
