use std::time::Duration;

use anyhow::Context as _;
use serde::Deserialize;

use crate::domain::repository::OAuthProvider;
use crate::domain::types::{GOOGLE_PROVIDER, OAuthProfile};
use crate::error::ApiError;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const SCOPES: &str = "https://www.googleapis.com/auth/userinfo.email https://www.googleapis.com/auth/userinfo.profile";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Google OAuth 2.0 web-server flow over `reqwest`.
#[derive(Clone)]
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    id: String,
    email: String,
    #[serde(default)]
    verified_email: bool,
    #[serde(default)]
    name: String,
}

impl GoogleOAuthClient {
    pub fn new(
        client_id: String,
        client_secret: String,
        redirect_url: String,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build google http client")?;
        Ok(Self {
            http,
            client_id,
            client_secret,
            redirect_url,
        })
    }

    async fn fetch_access_token(&self, code: &str) -> anyhow::Result<String> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let token: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .context("send token request")?
            .error_for_status()
            .context("token endpoint rejected the code")?
            .json()
            .await
            .context("decode token response")?;
        Ok(token.access_token)
    }

    async fn fetch_user_info(&self, access_token: &str) -> anyhow::Result<UserInfo> {
        self.http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .context("send userinfo request")?
            .error_for_status()
            .context("userinfo endpoint returned an error")?
            .json()
            .await
            .context("decode userinfo response")
    }
}

impl OAuthProvider for GoogleOAuthClient {
    fn name(&self) -> &'static str {
        GOOGLE_PROVIDER
    }

    fn authorize_url(&self, state: &str) -> Result<String, ApiError> {
        let url = reqwest::Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("access_type", "offline"),
                ("state", state),
            ],
        )
        .context("build google authorize url")?;
        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthProfile, ApiError> {
        let access_token = self
            .fetch_access_token(code)
            .await
            .map_err(ApiError::OAuthExchange)?;
        let info = self
            .fetch_user_info(&access_token)
            .await
            .map_err(ApiError::OAuthExchange)?;

        let name = if info.name.trim().is_empty() {
            info.email.clone()
        } else {
            info.name
        };
        Ok(OAuthProfile {
            subject: info.id,
            email: info.email,
            verified_email: info.verified_email,
            name,
        })
    }
}
