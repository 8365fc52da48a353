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

#[derive(Error, Debug)]
pub enum CatalogError {
    /// No endpoint matches the service type, region and interface.
    #[error(
        "no {interface} endpoint of the {service_type} service found in region {region:?}"
    )]
    EndpointNotFound {
        service_type: String,
        region: String,
        interface: String,
    },

    /// More than one endpoint matches and the region does not disambiguate them.
    #[error("{count} endpoints of the {service_type} service match, set the region")]
    MultipleEndpoints { service_type: String, count: usize },

    /// The endpoint URL in the catalog is invalid.
    #[error("invalid endpoint url {url}")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
