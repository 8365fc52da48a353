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
//! Networking networks.
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{
    Column, ColumnType, Query, Quals, Resource, Row, TableDefinition, push_bool, push_str, row,
    timestamp,
};
use crate::service::ServiceType;

static DEFINITION: TableDefinition = TableDefinition {
    name: "openstack_network",
    description: "Networks of the OpenStack Networking service.",
    columns: &[
        Column::new("id", ColumnType::String, "The ID of the network."),
        Column::new("name", ColumnType::String, "The name of the network."),
        Column::new(
            "description",
            ColumnType::String,
            "The description of the network.",
        ),
        Column::new(
            "project_id",
            ColumnType::String,
            "The ID of the project owning the network.",
        ),
        Column::new(
            "admin_state_up",
            ColumnType::Bool,
            "The administrative state of the network.",
        ),
        Column::new(
            "availability_zone_hints",
            ColumnType::Json,
            "The availability zone candidates for the network.",
        ),
        Column::new(
            "qos_policy_id",
            ColumnType::String,
            "The ID of the QoS policy of the network.",
        ),
        Column::new(
            "revision_number",
            ColumnType::Int,
            "The revision number of the network.",
        ),
        Column::new(
            "shared",
            ColumnType::Bool,
            "Whether the network is shared among projects.",
        ),
        Column::new("status", ColumnType::String, "The status of the network."),
        Column::new(
            "subnets",
            ColumnType::Json,
            "The IDs of the subnets of the network.",
        ),
        Column::new(
            "vlan_transparent",
            ColumnType::Bool,
            "Whether the network is VLAN transparent.",
        ),
        Column::new(
            "is_default",
            ColumnType::Bool,
            "Whether the network is the default external network.",
        ),
        Column::new(
            "created_at",
            ColumnType::Timestamp,
            "The date and time when the network was created.",
        ),
        Column::new(
            "updated_at",
            ColumnType::Timestamp,
            "The date and time when the network was last updated.",
        ),
        Column::new("tags", ColumnType::Json, "The tags of the network."),
    ],
    list_key_columns: &[
        "id",
        "name",
        "description",
        "project_id",
        "status",
        "shared",
        "admin_state_up",
    ],
    get_key_columns: &["id"],
};

#[derive(Debug, Deserialize)]
pub struct Network {
    pub id: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub description: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub admin_state_up: bool,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub availability_zone_hints: Vec<String>,
    #[serde(default)]
    pub qos_policy_id: Option<String>,
    #[serde(default)]
    pub revision_number: Option<i64>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub shared: bool,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub subnets: Vec<String>,
    #[serde(default)]
    pub vlan_transparent: Option<bool>,
    #[serde(default)]
    pub is_default: Option<bool>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub tags: Vec<String>,
}

impl Resource for Network {
    const SERVICE: ServiceType = ServiceType::Network;
    const LIST_PATH: &'static str = "networks";
    const COLLECTION_KEY: &'static str = "networks";
    const ITEM_PATH: &'static str = "networks";
    const RESOURCE_KEY: Option<&'static str> = Some("network");

    fn definition() -> &'static TableDefinition {
        &DEFINITION
    }

    fn list_query(quals: &Quals) -> Query {
        let mut query = Query::new();
        push_str(&mut query, quals, "id", "id");
        push_str(&mut query, quals, "name", "name");
        push_str(&mut query, quals, "description", "description");
        push_str(&mut query, quals, "project_id", "project_id");
        push_str(&mut query, quals, "status", "status");
        push_bool(&mut query, quals, "shared", "shared");
        push_bool(&mut query, quals, "admin_state_up", "admin_state_up");
        query
    }

    fn into_row(self) -> Row {
        row(json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "project_id": self.project_id.or(self.tenant_id),
            "admin_state_up": self.admin_state_up,
            "availability_zone_hints": self.availability_zone_hints,
            "qos_policy_id": self.qos_policy_id,
            "revision_number": self.revision_number,
            "shared": self.shared,
            "status": self.status,
            "subnets": self.subnets,
            "vlan_transparent": self.vlan_transparent,
            "is_default": self.is_default,
            "created_at": timestamp(self.created_at),
            "updated_at": timestamp(self.updated_at),
            "tags": self.tags,
        }))
    }
}
