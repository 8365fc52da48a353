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
//! # OpenStack services
//!
//! The connector talks to a closed set of services. Each service is located
//! in the catalog by its catalog type and, where the service supports it,
//! pinned to an API microversion.
use std::fmt;

use crate::config::ConnectionConfig;

pub mod client;
pub mod error;

pub use client::{Pager, ServiceClient};
pub use error::RequestError;

// Defaults refer to the Train release.
pub const DEFAULT_IDENTITY_V3_MICROVERSION: &str = "3.13";
pub const DEFAULT_COMPUTE_V2_MICROVERSION: &str = "2.79";
pub const DEFAULT_BLOCKSTORAGE_V3_MICROVERSION: &str = "3.59";

/// Service family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServiceType {
    /// Identity v3 (Keystone).
    Identity,
    /// Compute v2 (Nova).
    Compute,
    /// Network v2 (Neutron).
    Network,
    /// Block Storage v3 (Cinder).
    BlockStorage,
    /// Image v2 (Glance).
    ImageService,
}

impl ServiceType {
    pub const ALL: [ServiceType; 5] = [
        ServiceType::Identity,
        ServiceType::Compute,
        ServiceType::Network,
        ServiceType::BlockStorage,
        ServiceType::ImageService,
    ];

    /// Position of the service in [`ServiceType::ALL`].
    pub const fn index(&self) -> usize {
        match self {
            Self::Identity => 0,
            Self::Compute => 1,
            Self::Network => 2,
            Self::BlockStorage => 3,
            Self::ImageService => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "openstack_identity_v3",
            Self::Compute => "openstack_compute_v2",
            Self::Network => "openstack_network_v2",
            Self::BlockStorage => "openstack_blockstorage_v3",
            Self::ImageService => "openstack_imageservice_v2",
        }
    }

    /// Catalog types in lookup order.
    pub fn catalog_types(&self) -> &'static [&'static str] {
        match self {
            Self::Identity => &["identity"],
            Self::Compute => &["compute"],
            Self::Network => &["network"],
            Self::BlockStorage => &["volumev3", "block-storage"],
            Self::ImageService => &["image"],
        }
    }

    /// Version path appended to catalog URLs that do not carry one.
    pub fn version_suffix(&self) -> Option<&'static str> {
        match self {
            Self::Identity => Some("v3/"),
            Self::Network => Some("v2.0/"),
            Self::ImageService => Some("v2/"),
            Self::Compute | Self::BlockStorage => None,
        }
    }

    /// Service name used in the `OpenStack-API-Version` header.
    pub fn microversion_service(&self) -> Option<&'static str> {
        match self {
            Self::Identity => Some("identity"),
            Self::Compute => Some("compute"),
            Self::BlockStorage => Some("volume"),
            Self::ImageService => Some("image"),
            Self::Network => None,
        }
    }

    /// Service specific microversion header predating `OpenStack-API-Version`.
    pub fn legacy_microversion_header(&self) -> Option<&'static str> {
        match self {
            Self::Compute => Some("X-OpenStack-Nova-API-Version"),
            Self::BlockStorage => Some("X-OpenStack-Volume-API-Version"),
            _ => None,
        }
    }

    /// Microversion for the connection: the configured override, the
    /// default, or empty.
    pub fn microversion(&self, config: &ConnectionConfig) -> String {
        let (configured, default) = match self {
            Self::Identity => (
                &config.identity_v3_microversion,
                DEFAULT_IDENTITY_V3_MICROVERSION,
            ),
            Self::Compute => (
                &config.compute_v2_microversion,
                DEFAULT_COMPUTE_V2_MICROVERSION,
            ),
            Self::BlockStorage => (
                &config.blockstorage_v3_microversion,
                DEFAULT_BLOCKSTORAGE_V3_MICROVERSION,
            ),
            Self::ImageService => (&config.image_v2_microversion, ""),
            // Neutron has no microversions.
            Self::Network => return String::new(),
        };
        configured.clone().unwrap_or_else(|| default.into())
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
