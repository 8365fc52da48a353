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
//! # Plugin
//!
//! Registry of the tables the connector serves.
use std::collections::BTreeMap;
use std::sync::Arc;

use super::attachment::AttachmentTable;
use super::image::Image;
use super::instance::Instance;
use super::network::Network;
use super::port::Port;
use super::project::Project;
use super::security_group::SecurityGroup;
use super::security_group_rule::SecurityGroupRule;
use super::user::User;
use super::volume::Volume;
use super::{ResourceTable, Table};
use crate::error::ConnectorError;

pub const PLUGIN_NAME: &str = "openstack";

/// Tables by name.
#[derive(Clone)]
pub struct Plugin {
    tables: BTreeMap<&'static str, Arc<dyn Table>>,
}

impl Plugin {
    pub fn new() -> Self {
        let tables: [Arc<dyn Table>; 10] = [
            Arc::new(AttachmentTable),
            Arc::new(ResourceTable::<Image>::new()),
            Arc::new(ResourceTable::<Instance>::new()),
            Arc::new(ResourceTable::<Network>::new()),
            Arc::new(ResourceTable::<Port>::new()),
            Arc::new(ResourceTable::<Project>::new()),
            Arc::new(ResourceTable::<SecurityGroup>::new()),
            Arc::new(ResourceTable::<SecurityGroupRule>::new()),
            Arc::new(ResourceTable::<User>::new()),
            Arc::new(ResourceTable::<Volume>::new()),
        ];
        Self {
            tables: tables
                .into_iter()
                .map(|table| (table.definition().name, table))
                .collect(),
        }
    }

    /// Table names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tables.keys().copied()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Arc<dyn Table>> {
        self.tables.values()
    }

    pub fn table(&self, name: &str) -> Result<Arc<dyn Table>, ConnectorError> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| ConnectorError::UnknownTable(name.into()))
    }
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new()
    }
}
