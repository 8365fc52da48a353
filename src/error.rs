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
//! # Error
//!
//! Errors surfaced to the query engine while serving a table.
use thiserror::Error;

use crate::cache::ClientCacheError;
use crate::service::RequestError;

/// Connector error.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The authenticated session or a service client is not available.
    #[error(transparent)]
    ClientCache {
        /// The source of the error.
        #[from]
        source: ClientCacheError,
    },

    /// An OpenStack API request failed.
    #[error(transparent)]
    Request {
        /// The source of the error.
        #[from]
        source: RequestError,
    },

    /// A required key column was not given.
    #[error("table {table} requires the {column} key column")]
    MissingKeyColumn {
        /// Table name.
        table: &'static str,
        /// Column name.
        column: &'static str,
    },

    /// The table is not provided by the connector.
    #[error("table {0} is not provided by the connector")]
    UnknownTable(String),
}

/// Error of the structures builders.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Mandatory field is not set.
    #[error("{0} must be initialized")]
    UninitializedField(&'static str),
}

impl From<derive_builder::UninitializedFieldError> for BuilderError {
    fn from(value: derive_builder::UninitializedFieldError) -> Self {
        Self::UninitializedField(value.field_name())
    }
}
