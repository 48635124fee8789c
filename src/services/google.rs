// SPDX-License-Identifier: MIT

//! Google OAuth client: authorization-code exchange and userinfo fetch.
//!
//! Token issuance mechanics belong to Google's protocol; this client only
//! turns a callback code into an [`IdentityAssertion`] for reconciliation.

use crate::error::AppError;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Claims from a successful external authentication, as consumed by the
/// identity reconciler.
#[derive(Debug, Clone)]
pub struct IdentityAssertion {
    /// Google subject id (stable external identity)
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: String,
}

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleAuthClient {
    http: reqwest::Client,
    token_url: String,
    userinfo_url: String,
    client_id: String,
    client_secret: String,
}

impl GoogleAuthClient {
    /// Create a new client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("failed building Google OAuth HTTP client")?;

        Ok(Self {
            http,
            token_url: TOKEN_URL.to_string(),
            userinfo_url: USERINFO_URL.to_string(),
            client_id,
            client_secret,
        })
    }

    /// Build the consent-screen URL the sign-in flow redirects to.
    pub fn authorization_url(&self, callback_url: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope=openid%20email%20profile&state={}",
            AUTH_URL,
            self.client_id,
            urlencoding::encode(callback_url),
            state
        )
    }

    /// Exchange an authorization code and fetch the authenticated user's
    /// claims, producing the identity assertion.
    pub async fn fetch_identity(
        &self,
        code: &str,
        callback_url: &str,
    ) -> Result<IdentityAssertion, AppError> {
        let tokens = self.exchange_code(code, callback_url).await?;
        let userinfo = self.fetch_userinfo(&tokens.access_token).await?;

        Ok(IdentityAssertion {
            external_id: userinfo.sub,
            email: userinfo.email.unwrap_or_default(),
            display_name: userinfo.name.unwrap_or_default(),
            avatar_url: userinfo.picture.unwrap_or_default(),
        })
    }

    /// Exchange authorization code for tokens (internal helper).
    async fn exchange_code(
        &self,
        code: &str,
        callback_url: &str,
    ) -> Result<GoogleTokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", callback_url),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::GoogleApi(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Google token exchange failed");
            return Err(AppError::GoogleApi(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GoogleApi(format!("Failed to parse token response: {}", e)))
    }

    /// Fetch the OpenID userinfo document for an access token.
    async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserinfo, AppError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::GoogleApi(format!("Userinfo request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GoogleApi(format!(
                "Userinfo failed: HTTP {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GoogleApi(format!("Failed to parse userinfo: {}", e)))
    }
}

/// Token response from Google OAuth.
#[derive(Debug, Clone, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

/// OpenID Connect userinfo claims.
#[derive(Debug, Clone, Deserialize)]
struct GoogleUserinfo {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}
