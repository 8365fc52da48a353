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
//! # Authenticated session
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use url::Url;

use crate::auth::{AuthError, AuthOptions, Authenticator, IssuedToken};
use crate::catalog::{CatalogError, Interface};

/// Authenticated session of a connection.
///
/// Holds the current token and the service catalog. The token is renewed in
/// place when the Identity service declares it expired.
pub struct AuthenticatedSession {
    http_client: Client,
    authenticator: Arc<dyn Authenticator>,
    options: AuthOptions,
    token: RwLock<IssuedToken>,
}

impl fmt::Debug for AuthenticatedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedSession")
            .field("identity_endpoint", &self.options.identity_endpoint)
            .field("allow_reauth", &self.options.allow_reauth)
            .finish_non_exhaustive()
    }
}

impl AuthenticatedSession {
    /// Exchange the credentials for a token and open the session.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn authenticate(
        http_client: Client,
        authenticator: Arc<dyn Authenticator>,
        options: AuthOptions,
    ) -> Result<Self, AuthError> {
        let token = authenticator.authenticate(&options).await?;
        Ok(Self {
            http_client,
            authenticator,
            options,
            token: RwLock::new(token),
        })
    }

    /// HTTP client shared by the session and its service clients.
    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    /// Whether an expired token may be renewed.
    pub fn allow_reauth(&self) -> bool {
        self.options.allow_reauth
    }

    /// Current token.
    pub async fn auth_token(&self) -> SecretString {
        self.token.read().await.id.clone()
    }

    /// Resolve a service endpoint in the catalog of the current token.
    pub async fn endpoint_url(
        &self,
        catalog_types: &[&str],
        region: &str,
        interface: Interface,
    ) -> Result<Url, CatalogError> {
        self.token
            .read()
            .await
            .token
            .catalog
            .endpoint_url(catalog_types, region, interface)
    }

    /// Replace the `stale` token with a new one.
    ///
    /// When another caller already renewed the token the current one is
    /// returned without contacting the Identity service again.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn reauthenticate(&self, stale: &SecretString) -> Result<SecretString, AuthError> {
        if !self.options.allow_reauth {
            return Err(AuthError::ReauthenticationDisabled);
        }
        let mut token = self.token.write().await;
        if token.id.expose_secret() != stale.expose_secret() {
            return Ok(token.id.clone());
        }
        info!("token expired, re-authenticating");
        *token = self.authenticator.authenticate(&self.options).await?;
        Ok(token.id.clone())
    }
}
