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

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum RequestError {
    /// The service answered with an error status.
    #[error("request to {url} failed with {status}: {message}")]
    Api {
        url: String,
        status: StatusCode,
        message: String,
    },

    /// HTTP error.
    #[error(transparent)]
    Http {
        /// The source of the error.
        #[from]
        source: reqwest::Error,
    },

    #[error("data serialization error")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// The response does not contain the expected resource key.
    #[error("response does not contain the {0} key")]
    MissingResourceKey(String),

    /// The expired token could not be renewed.
    #[error(transparent)]
    Reauthentication {
        /// The source of the error.
        #[from]
        source: AuthError,
    },

    /// Url parsing error.
    #[error(transparent)]
    UrlParse {
        /// The source of the error.
        #[from]
        source: url::ParseError,
    },
}
