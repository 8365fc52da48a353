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
//! # Service catalog
//!
//! The catalog is returned by the Identity service together with the token.
//! It lists every service of the deployment with its endpoints, one per
//! region and interface.
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::BuilderError;

pub mod error;

pub use error::CatalogError;

/// A catalog object.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Catalog(pub Vec<CatalogService>);

/// A catalog service.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct CatalogService {
    #[builder(default)]
    pub r#type: Option<String>,
    #[builder(default)]
    pub name: Option<String>,
    pub id: String,
    #[builder(default)]
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// A catalog endpoint.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct Endpoint {
    pub id: String,
    pub url: String,
    pub interface: String,
    #[builder(default)]
    pub region: Option<String>,
    #[builder(default)]
    pub region_id: Option<String>,
}

/// Endpoint interface.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    #[default]
    Public,
    Internal,
    Admin,
}

impl Interface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Endpoint {
    fn matches(&self, interface: Interface, region: &str) -> bool {
        if self.interface != interface.as_str() {
            return false;
        }
        region.is_empty()
            || self.region_id.as_deref() == Some(region)
            || self.region.as_deref() == Some(region)
    }
}

impl Catalog {
    /// Resolve the endpoint URL of a service.
    ///
    /// `catalog_types` are tried in order; the first type with at least one
    /// matching endpoint wins. An empty `region` matches every region.
    pub fn endpoint_url(
        &self,
        catalog_types: &[&str],
        region: &str,
        interface: Interface,
    ) -> Result<Url, CatalogError> {
        for catalog_type in catalog_types {
            let mut urls: Vec<&str> = self
                .0
                .iter()
                .filter(|svc| svc.r#type.as_deref() == Some(*catalog_type))
                .flat_map(|svc| svc.endpoints.iter())
                .filter(|ep| ep.matches(interface, region))
                .map(|ep| ep.url.as_str())
                .collect();
            urls.sort_unstable();
            urls.dedup();

            match urls.as_slice() {
                [] => continue,
                [url] => {
                    return Url::parse(url).map_err(|source| CatalogError::UrlParse {
                        url: url.to_string(),
                        source,
                    });
                }
                _ => {
                    return Err(CatalogError::MultipleEndpoints {
                        service_type: catalog_type.to_string(),
                        count: urls.len(),
                    });
                }
            }
        }
        Err(CatalogError::EndpointNotFound {
            service_type: catalog_types.join(","),
            region: region.into(),
            interface: interface.to_string(),
        })
    }
}
