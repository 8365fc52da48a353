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
//! # Authentication options
//!
//! Credentials are looked up in the `OS_*` environment variables used by the
//! OpenStack command line clients first. When the environment does not carry
//! a complete set of credentials the connection configuration is used.
use derive_builder::Builder;
use secrecy::SecretString;
use std::collections::HashMap;
use tracing::info;
use url::Url;

use crate::auth::error::AuthError;
use crate::auth::types::*;
use crate::config::ConnectionConfig;
use crate::error::BuilderError;

/// Domain used for users and projects referenced by name without a domain.
pub const DEFAULT_DOMAIN_ID: &str = "default";

/// Source of environment variables.
pub trait Environment: Send + Sync {
    /// Value of the variable. Unset and empty variables are `None`.
    fn var(&self, key: &str) -> Option<String>;
}

/// The environment of the running process.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|val| !val.is_empty())
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|val| !val.is_empty()).cloned()
    }
}

/// Normalized credentials for the token exchange.
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct AuthOptions {
    #[builder(default)]
    pub identity_endpoint: Option<String>,
    #[builder(default)]
    pub user_id: Option<String>,
    #[builder(default)]
    pub username: Option<String>,
    #[builder(default)]
    pub password: Option<SecretString>,
    #[builder(default)]
    pub project_id: Option<String>,
    #[builder(default)]
    pub project_name: Option<String>,
    #[builder(default)]
    pub domain_id: Option<String>,
    #[builder(default)]
    pub domain_name: Option<String>,
    #[builder(default)]
    pub token_id: Option<SecretString>,
    #[builder(default)]
    pub application_credential_id: Option<String>,
    #[builder(default)]
    pub application_credential_name: Option<String>,
    #[builder(default)]
    pub application_credential_secret: Option<SecretString>,
    /// Whether an expired token may be renewed with these options.
    #[builder(default = "true")]
    pub allow_reauth: bool,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            identity_endpoint: None,
            user_id: None,
            username: None,
            password: None,
            project_id: None,
            project_name: None,
            domain_id: None,
            domain_name: None,
            token_id: None,
            application_credential_id: None,
            application_credential_name: None,
            application_credential_secret: None,
            allow_reauth: true,
        }
    }
}

impl AuthOptions {
    /// Read the options from the `OS_*` variables.
    ///
    /// Fails when the variables do not describe a usable set of credentials.
    pub fn from_env(env: &dyn Environment) -> Result<Self, AuthError> {
        let auth_url = env.var("OS_AUTH_URL");
        let user_id = env.var("OS_USERID");
        let username = env.var("OS_USERNAME");
        let password = env.var("OS_PASSWORD");
        let project_id = env.var("OS_PROJECT_ID").or_else(|| env.var("OS_TENANT_ID"));
        let project_name = env
            .var("OS_PROJECT_NAME")
            .or_else(|| env.var("OS_TENANT_NAME"));
        let domain_id = env
            .var("OS_DOMAIN_ID")
            .or_else(|| env.var("OS_USER_DOMAIN_ID"));
        let domain_name = env
            .var("OS_DOMAIN_NAME")
            .or_else(|| env.var("OS_USER_DOMAIN_NAME"));
        let app_cred_id = env.var("OS_APPLICATION_CREDENTIAL_ID");
        let app_cred_name = env.var("OS_APPLICATION_CREDENTIAL_NAME");
        let app_cred_secret = env.var("OS_APPLICATION_CREDENTIAL_SECRET");

        let identity_endpoint =
            auth_url.ok_or(AuthError::MissingEnvironmentVariable("OS_AUTH_URL"))?;

        let has_user = user_id.is_some() || username.is_some();
        if !has_user && (app_cred_id.is_none() || app_cred_secret.is_none()) {
            return Err(AuthError::MissingAnyEnvironmentVariable(vec![
                "OS_USERID",
                "OS_USERNAME",
            ]));
        }
        if password.is_none() && app_cred_id.is_none() && app_cred_name.is_none() {
            return Err(AuthError::MissingEnvironmentVariable("OS_PASSWORD"));
        }
        if (app_cred_id.is_some() || app_cred_name.is_some()) && app_cred_secret.is_none() {
            return Err(AuthError::MissingEnvironmentVariable(
                "OS_APPLICATION_CREDENTIAL_SECRET",
            ));
        }
        let has_domain = domain_id.is_some() || domain_name.is_some();
        if !has_domain && project_id.is_none() && project_name.is_some() {
            return Err(AuthError::MissingEnvironmentVariable("OS_PROJECT_ID"));
        }
        if app_cred_id.is_none() && app_cred_name.is_some() && username.is_some() && !has_domain
        {
            return Err(AuthError::MissingAnyEnvironmentVariable(vec![
                "OS_DOMAIN_ID",
                "OS_DOMAIN_NAME",
            ]));
        }

        Ok(Self {
            identity_endpoint: Some(identity_endpoint),
            user_id,
            username,
            password: password.map(SecretString::from),
            project_id,
            project_name,
            domain_id,
            domain_name,
            token_id: None,
            application_credential_id: app_cred_id,
            application_credential_name: app_cred_name,
            application_credential_secret: app_cred_secret.map(SecretString::from),
            allow_reauth: true,
        })
    }

    /// Build the options from the connection configuration.
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            identity_endpoint: config.endpoint_url.clone(),
            user_id: config.userid.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            project_id: config.project_id.clone(),
            project_name: config.project_name.clone(),
            domain_id: config.domain_id.clone(),
            domain_name: config.domain_name.clone(),
            token_id: config.access_token.clone(),
            application_credential_id: config.app_credential_id.clone(),
            application_credential_name: None,
            application_credential_secret: config.app_credential_secret.clone(),
            allow_reauth: config.allow_reauth.unwrap_or(true),
        }
    }

    /// Options from the environment, or from the configuration when the
    /// environment is incomplete.
    pub fn resolve(config: &ConnectionConfig, env: &dyn Environment) -> Self {
        match Self::from_env(env) {
            Ok(mut options) => {
                options.allow_reauth = config.allow_reauth.unwrap_or(true);
                options
            }
            Err(error) => {
                info!(%error, "no auth info available in environment, filling with defaults");
                Self::from_config(config)
            }
        }
    }

    /// URL of the token creation API.
    pub fn token_url(&self) -> Result<Url, AuthError> {
        let endpoint = self
            .identity_endpoint
            .as_deref()
            .ok_or(AuthError::MissingEndpoint)?;
        let mut url = Url::parse(endpoint)?;
        if !url.path().ends_with('/') {
            url.set_path(&format!("{}/", url.path()));
        }
        if !url.path().ends_with("/v3/") {
            url = url.join("v3/")?;
        }
        Ok(url.join("auth/tokens")?)
    }

    /// Build the token creation request body.
    ///
    /// Methods are tried in order: token, application credential, password.
    pub fn to_request(&self) -> Result<AuthRequest, AuthError> {
        if self.identity_endpoint.is_none() {
            return Err(AuthError::MissingEndpoint);
        }

        if let Some(token_id) = &self.token_id {
            let identity = IdentityBuilder::default()
                .methods(vec!["token".into()])
                .token(TokenAuth {
                    id: token_id.clone(),
                })
                .build()?;
            return Ok(AuthRequest {
                auth: AuthRequestInner {
                    identity,
                    scope: self.scope(),
                },
            });
        }

        if self.application_credential_id.is_some() || self.application_credential_name.is_some()
        {
            let secret = self
                .application_credential_secret
                .clone()
                .ok_or(AuthError::MissingApplicationCredentialSecret)?;
            let mut app_cred = ApplicationCredentialAuthBuilder::default();
            app_cred.secret(secret);
            if let Some(id) = &self.application_credential_id {
                app_cred.id(id);
            } else if let Some(name) = &self.application_credential_name {
                app_cred
                    .name(name)
                    .user(self.user_reference().ok_or(AuthError::MissingCredentials)?);
            }
            let identity = IdentityBuilder::default()
                .methods(vec!["application_credential".into()])
                .application_credential(app_cred.build()?)
                .build()?;
            // Application credentials carry their own scope.
            return Ok(AuthRequest {
                auth: AuthRequestInner {
                    identity,
                    scope: None,
                },
            });
        }

        if let Some(password) = &self.password {
            let user = self.user_reference().ok_or(AuthError::MissingCredentials)?;
            let mut user_password = UserPasswordBuilder::default();
            user_password.password(password.clone());
            if let Some(id) = user.id {
                user_password.id(id);
            }
            if let Some(name) = user.name {
                user_password.name(name);
            }
            if let Some(domain) = user.domain {
                user_password.domain(domain);
            }
            let identity = IdentityBuilder::default()
                .methods(vec!["password".into()])
                .password(PasswordAuth {
                    user: user_password.build()?,
                })
                .build()?;
            return Ok(AuthRequest {
                auth: AuthRequestInner {
                    identity,
                    scope: self.scope(),
                },
            });
        }

        Err(AuthError::MissingCredentials)
    }

    fn domain(&self) -> Option<Domain> {
        if let Some(id) = &self.domain_id {
            Some(Domain::by_id(id))
        } else {
            self.domain_name.as_ref().map(Domain::by_name)
        }
    }

    fn user_reference(&self) -> Option<UserReference> {
        if let Some(id) = &self.user_id {
            return Some(UserReference {
                id: Some(id.clone()),
                ..Default::default()
            });
        }
        self.username.as_ref().map(|name| UserReference {
            id: None,
            name: Some(name.clone()),
            domain: Some(
                self.domain()
                    .unwrap_or_else(|| Domain::by_id(DEFAULT_DOMAIN_ID)),
            ),
        })
    }

    fn scope(&self) -> Option<Scope> {
        if let Some(id) = &self.project_id {
            return Some(Scope::Project(ScopeProject {
                id: Some(id.clone()),
                ..Default::default()
            }));
        }
        if let Some(name) = &self.project_name {
            return Some(Scope::Project(ScopeProject {
                id: None,
                name: Some(name.clone()),
                domain: Some(
                    self.domain()
                        .unwrap_or_else(|| Domain::by_id(DEFAULT_DOMAIN_ID)),
                ),
            }));
        }
        self.domain().map(Scope::Domain)
    }
}
