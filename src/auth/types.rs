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
//! # Identity v3 token types
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use crate::catalog::Catalog;
use crate::error::BuilderError;

fn expose<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(secret.expose_secret())
}

/// An authentication request.
#[derive(Clone, Debug, Serialize)]
pub struct AuthRequest {
    /// An identity object.
    pub auth: AuthRequestInner,
}

/// An authentication request.
#[derive(Clone, Debug, Serialize)]
pub struct AuthRequestInner {
    /// An identity object.
    pub identity: Identity,

    /// The authorization scope. Unscoped when not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

/// An identity object.
#[derive(Builder, Clone, Debug, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct Identity {
    /// The authentication methods.
    pub methods: Vec<String>,

    /// The password object, contains the authentication information.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordAuth>,

    /// The token object, contains the authentication information.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenAuth>,

    /// The application credential object.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_credential: Option<ApplicationCredentialAuth>,
}

/// The password object, contains the authentication information.
#[derive(Clone, Debug, Serialize)]
pub struct PasswordAuth {
    /// A user object.
    pub user: UserPassword,
}

/// User password information
#[derive(Builder, Clone, Debug, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct UserPassword {
    /// User ID
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// User Name
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// User domain
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    /// User password
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// The token object.
#[derive(Clone, Debug, Serialize)]
pub struct TokenAuth {
    /// Token ID
    #[serde(serialize_with = "expose")]
    pub id: SecretString,
}

/// The application credential object.
#[derive(Builder, Clone, Debug, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ApplicationCredentialAuth {
    /// Application credential ID.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Application credential name. Requires the owning user.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Owner of the application credential.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserReference>,
    /// Application credential secret.
    #[serde(serialize_with = "expose")]
    pub secret: SecretString,
}

/// User referenced by ID or by name within a domain.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct UserReference {
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

/// The authorization scope.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Project scope.
    Project(ScopeProject),
    /// Domain scope.
    Domain(Domain),
}

/// Project scope information.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into, strip_option))]
pub struct ScopeProject {
    /// Project ID.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Project Name.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Project domain.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

/// Domain information.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into, strip_option))]
pub struct Domain {
    /// Domain ID.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Domain Name.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Domain {
    pub fn by_id<S: Into<String>>(id: S) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }

    pub fn by_name<S: Into<String>>(name: S) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }
}

/// Token creation response.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TokenResponse {
    /// Token
    pub token: Token,
}

/// Authorization token as returned by the Identity service.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Token {
    /// The authentication methods used to obtain the token.
    #[serde(default)]
    pub methods: Vec<String>,

    /// The date and time when the token expires.
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub expires_at: Option<DateTime<Utc>>,

    /// A user object.
    #[serde(default)]
    pub user: Option<TokenUser>,

    /// The project the token is scoped to.
    #[serde(default)]
    pub project: Option<TokenProject>,

    /// A catalog object.
    #[serde(default)]
    pub catalog: Catalog,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TokenUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<Domain>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TokenProject {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<Domain>,
}

/// A token issued by the Identity service.
#[derive(Clone, Debug)]
pub struct IssuedToken {
    /// Token ID taken from the `X-Subject-Token` header.
    pub id: SecretString,
    /// Token body.
    pub token: Token,
}
