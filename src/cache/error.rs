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

use thiserror::Error;

use crate::auth::AuthError;
use crate::catalog::CatalogError;
use crate::service::ServiceType;

#[derive(Error, Debug)]
pub enum ClientCacheError {
    /// No authenticated session could be established.
    #[error("authentication failed: {source}")]
    Authentication {
        #[source]
        source: AuthError,
    },

    /// The service client could not be constructed.
    #[error("cannot create the {service_type} client: {source}")]
    ClientConstruction {
        service_type: ServiceType,
        #[source]
        source: CatalogError,
    },

    /// The HTTP client could not be built.
    #[error(transparent)]
    HttpClient {
        /// The source of the error.
        #[from]
        source: reqwest::Error,
    },
}
