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

use async_trait::async_trait;
use mockall::mock;

use crate::auth::{AuthError, AuthOptions, Authenticator, IssuedToken};
use crate::auth::types::Token;
use crate::catalog::Catalog;

mock! {
    pub IdentityAuthenticator {}

    #[async_trait]
    impl Authenticator for IdentityAuthenticator {
        async fn authenticate(&self, options: &AuthOptions) -> Result<IssuedToken, AuthError>;
    }
}

/// A token with the given id and catalog.
pub fn issued_token<S: Into<String>>(id: S, catalog: Catalog) -> IssuedToken {
    IssuedToken {
        id: secrecy::SecretString::from(id.into()),
        token: Token {
            methods: vec!["password".into()],
            catalog,
            ..Default::default()
        },
    }
}
