// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! # Authentication
//!
//! The credentials of a connection are exchanged for a token with the
//! Identity v3 `POST /v3/auth/tokens` API. The token is returned in the
//! `X-Subject-Token` header and the response body carries the service
//! catalog used to locate the other services.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::SecretString;
use tracing::debug;

pub mod error;
#[cfg(test)]
pub(crate) mod mock;
pub mod options;
pub mod session;
pub mod types;

pub use error::AuthError;
pub use options::{AuthOptions, AuthOptionsBuilder, Environment, ProcessEnvironment};
pub use session::AuthenticatedSession;
pub use types::{IssuedToken, TokenResponse};

/// Header carrying the issued token.
pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Header carrying the token of authenticated requests.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Token issuer.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchange the credentials for a token.
    async fn authenticate(&self, options: &AuthOptions) -> Result<IssuedToken, AuthError>;
}

/// Token issuer talking to the Identity service.
#[derive(Clone, Debug)]
pub struct HttpAuthenticator {
    http_client: Client,
}

impl HttpAuthenticator {
    pub fn new(http_client: Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    #[tracing::instrument(level = "debug", skip(self, options))]
    async fn authenticate(&self, options: &AuthOptions) -> Result<IssuedToken, AuthError> {
        let url = options.token_url()?;
        let body = options.to_request()?;

        debug!(%url, "requesting token");
        let response = self.http_client.post(url).json(&body).send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let id = response
                    .headers()
                    .get(SUBJECT_TOKEN_HEADER)
                    .and_then(|val| val.to_str().ok())
                    .map(SecretString::from)
                    .ok_or(AuthError::MissingSubjectToken)?;
                let body: TokenResponse = response.json().await?;
                debug!(expires_at = ?body.token.expires_at, "token issued");
                Ok(IssuedToken {
                    id,
                    token: body.token,
                })
            }
            status => {
                debug!("Identity service returned {:?}", response);
                let message = response.text().await.unwrap_or_default();
                Err(AuthError::Rejected { status, message })
            }
        }
    }
}
