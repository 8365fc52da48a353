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
//! # Connection configuration
//!
//! The configuration file holds one named section per OpenStack deployment:
//!
//! ```toml
//! [connections.default]
//! endpoint_url = "https://keystone.example.com:5000/v3"
//! username = "admin"
//! password = "secret"
//! project_name = "admin"
//! domain_name = "Default"
//! region = "RegionOne"
//! ```
//!
//! The format is inferred from the file extension (`toml`, `yaml`, `json` or
//! `ini`).
use config::File;
use eyre::{Report, WrapErr};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

use crate::catalog::Interface;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// HTTP connect timeout in seconds shared by every connection.
    pub connect_timeout: u64,

    /// Connections by name.
    #[serde(default)]
    pub connections: BTreeMap<String, ConnectionConfig>,
}

/// Settings of a single OpenStack connection.
///
/// Every setting is optional. An unset value is `None`, never an empty
/// string.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ConnectionConfig {
    /// Identity service URL.
    pub endpoint_url: Option<String>,
    /// User ID.
    pub userid: Option<String>,
    /// User name.
    pub username: Option<String>,
    /// User password.
    pub password: Option<SecretString>,
    /// Project ID to scope the token to.
    pub project_id: Option<String>,
    /// Project name to scope the token to.
    pub project_name: Option<String>,
    /// Domain ID of the user and project.
    pub domain_id: Option<String>,
    /// Domain name of the user and project.
    pub domain_name: Option<String>,
    /// Existing token to reuse instead of a password.
    pub access_token: Option<SecretString>,
    /// Application credential ID.
    #[serde(alias = "app_credential_key")]
    pub app_credential_id: Option<String>,
    /// Application credential secret.
    pub app_credential_secret: Option<SecretString>,
    /// Region of the service endpoints.
    pub region: Option<String>,
    /// Endpoint interface.
    pub interface: Option<Interface>,
    /// Whether an expired token may be renewed with the stored credentials.
    pub allow_reauth: Option<bool>,

    pub identity_v3_microversion: Option<String>,
    pub compute_v2_microversion: Option<String>,
    pub blockstorage_v3_microversion: Option<String>,
    pub image_v2_microversion: Option<String>,

    /// Log verbosity used when the caller does not set one.
    pub trace_level: Option<TraceLevel>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<TraceLevel> for LevelFilter {
    fn from(value: TraceLevel) -> Self {
        match value {
            TraceLevel::Off => LevelFilter::OFF,
            TraceLevel::Error => LevelFilter::ERROR,
            TraceLevel::Warn => LevelFilter::WARN,
            TraceLevel::Info => LevelFilter::INFO,
            TraceLevel::Debug => LevelFilter::DEBUG,
            TraceLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl Config {
    pub fn new(path: PathBuf) -> Result<Self, Report> {
        let mut builder = config::Config::builder();

        if std::path::Path::new(&path).is_file() {
            builder = builder.add_source(File::from(path));
        }

        builder.try_into()
    }

    /// Look up a connection by name.
    pub fn connection(&self, name: &str) -> Option<&ConnectionConfig> {
        self.connections.get(name)
    }
}

impl TryFrom<config::ConfigBuilder<config::builder::DefaultState>> for Config {
    type Error = Report;
    fn try_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, Self::Error> {
        let mut builder = builder;
        builder = builder.set_default("connect_timeout", "30")?;

        builder
            .build()
            .wrap_err("Failed to read configuration file")?
            .try_deserialize()
            .wrap_err("Failed to parse configuration file")
    }
}
