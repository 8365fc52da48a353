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

use reqwest::StatusCode;
use thiserror::Error;

use crate::error::BuilderError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// A required environment variable is not set.
    #[error("environment variable {0} is not set")]
    MissingEnvironmentVariable(&'static str),

    /// None of the alternative environment variables is set.
    #[error("one of the environment variables {} must be set", .0.join(", "))]
    MissingAnyEnvironmentVariable(Vec<&'static str>),

    /// The Identity endpoint is not configured.
    #[error("identity endpoint is not set")]
    MissingEndpoint,

    /// Neither a token, an application credential nor a password is available.
    #[error("no token, application credential or password available")]
    MissingCredentials,

    /// The application credential is incomplete.
    #[error("application credential secret is not set")]
    MissingApplicationCredentialSecret,

    /// The token expired and renewing it is not allowed.
    #[error("token expired and re-authentication is disabled")]
    ReauthenticationDisabled,

    /// The Identity service refused to issue a token.
    #[error("identity service rejected the authentication with {status}: {message}")]
    Rejected { status: StatusCode, message: String },

    /// The token is missing in the response headers.
    #[error("X-Subject-Token header is missing in the identity service response")]
    MissingSubjectToken,

    /// HTTP error.
    #[error(transparent)]
    Http {
        /// The source of the error.
        #[from]
        source: reqwest::Error,
    },

    /// Structures builder error.
    #[error(transparent)]
    StructBuilder {
        /// The source of the error.
        #[from]
        source: BuilderError,
    },

    /// Url parsing error.
    #[error(transparent)]
    UrlParse {
        /// The source of the error.
        #[from]
        source: url::ParseError,
    },
}
