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
//! Networking ports.
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{
    Column, ColumnType, Query, Quals, Resource, Row, TableDefinition, push_bool, push_str, row,
    timestamp,
};
use crate::service::ServiceType;

static DEFINITION: TableDefinition = TableDefinition {
    name: "openstack_port",
    description: "Ports of the OpenStack Networking service.",
    columns: &[
        Column::new("id", ColumnType::String, "The ID of the port."),
        Column::new("name", ColumnType::String, "The name of the port."),
        Column::new(
            "description",
            ColumnType::String,
            "The description of the port.",
        ),
        Column::new(
            "network_id",
            ColumnType::String,
            "The ID of the network of the port.",
        ),
        Column::new(
            "admin_state_up",
            ColumnType::Bool,
            "The administrative state of the port.",
        ),
        Column::new("status", ColumnType::String, "The status of the port."),
        Column::new(
            "mac_address",
            ColumnType::String,
            "The MAC address of the port.",
        ),
        Column::new(
            "project_id",
            ColumnType::String,
            "The ID of the project owning the port.",
        ),
        Column::new(
            "device_owner",
            ColumnType::String,
            "The entity type using the port.",
        ),
        Column::new(
            "device_id",
            ColumnType::String,
            "The ID of the device using the port.",
        ),
        Column::new(
            "fixed_ips",
            ColumnType::Json,
            "The IP addresses of the port.",
        ),
        Column::new(
            "security_groups",
            ColumnType::Json,
            "The IDs of the security groups of the port.",
        ),
        Column::new(
            "revision_number",
            ColumnType::Int,
            "The revision number of the port.",
        ),
        Column::new(
            "created_at",
            ColumnType::Timestamp,
            "The date and time when the port was created.",
        ),
        Column::new(
            "updated_at",
            ColumnType::Timestamp,
            "The date and time when the port was last updated.",
        ),
    ],
    list_key_columns: &[
        "id",
        "name",
        "status",
        "description",
        "admin_state_up",
        "network_id",
        "project_id",
        "device_owner",
        "device_id",
        "mac_address",
    ],
    get_key_columns: &["id"],
};

#[derive(Debug, Deserialize)]
pub struct Port {
    pub id: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub network_id: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub admin_state_up: bool,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub mac_address: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub device_owner: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub device_id: String,
    #[serde(default)]
    pub fixed_ips: serde_json::Value,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub security_groups: Vec<String>,
    #[serde(default)]
    pub revision_number: Option<i64>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Port {
    const SERVICE: ServiceType = ServiceType::Network;
    const LIST_PATH: &'static str = "ports";
    const COLLECTION_KEY: &'static str = "ports";
    const ITEM_PATH: &'static str = "ports";
    const RESOURCE_KEY: Option<&'static str> = Some("port");

    fn definition() -> &'static TableDefinition {
        &DEFINITION
    }

    fn list_query(quals: &Quals) -> Query {
        let mut query = Query::new();
        for column in [
            "id",
            "name",
            "status",
            "description",
            "network_id",
            "project_id",
            "device_owner",
            "device_id",
            "mac_address",
        ] {
            push_str(&mut query, quals, column, column);
        }
        push_bool(&mut query, quals, "admin_state_up", "admin_state_up");
        query
    }

    fn into_row(self) -> Row {
        row(json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "network_id": self.network_id,
            "admin_state_up": self.admin_state_up,
            "status": self.status,
            "mac_address": self.mac_address,
            "project_id": self.project_id.or(self.tenant_id),
            "device_owner": self.device_owner,
            "device_id": self.device_id,
            "fixed_ips": self.fixed_ips,
            "security_groups": self.security_groups,
            "revision_number": self.revision_number,
            "created_at": timestamp(self.created_at),
            "updated_at": timestamp(self.updated_at),
        }))
    }
}
