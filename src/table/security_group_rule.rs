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
//! Networking security group rules.
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{
    Column, ColumnType, Query, Quals, Resource, Row, TableDefinition, push_str, row, timestamp,
};
use crate::service::ServiceType;

static DEFINITION: TableDefinition = TableDefinition {
    name: "openstack_security_group_rule",
    description: "Security group rules of the OpenStack Networking service.",
    columns: &[
        Column::new("id", ColumnType::String, "The ID of the rule."),
        Column::new(
            "description",
            ColumnType::String,
            "The description of the rule.",
        ),
        Column::new(
            "project_id",
            ColumnType::String,
            "The ID of the project owning the rule.",
        ),
        Column::new(
            "created_at",
            ColumnType::Timestamp,
            "The date and time when the rule was created.",
        ),
        Column::new(
            "updated_at",
            ColumnType::Timestamp,
            "The date and time when the rule was last updated.",
        ),
        Column::new(
            "remote_group_id",
            ColumnType::String,
            "The ID of the remote security group.",
        ),
        Column::new(
            "direction",
            ColumnType::String,
            "The direction of the traffic, ingress or egress.",
        ),
        Column::new(
            "protocol",
            ColumnType::String,
            "The IP protocol matched by the rule.",
        ),
        Column::new(
            "ethertype",
            ColumnType::String,
            "The ethertype, IPv4 or IPv6.",
        ),
        Column::new(
            "port_range_min",
            ColumnType::Int,
            "The lowest port matched by the rule.",
        ),
        Column::new(
            "port_range_max",
            ColumnType::Int,
            "The highest port matched by the rule.",
        ),
        Column::new(
            "security_group_id",
            ColumnType::String,
            "The ID of the security group of the rule.",
        ),
        Column::new(
            "remote_ip_prefix",
            ColumnType::String,
            "The remote IP prefix matched by the rule.",
        ),
        Column::new(
            "revision",
            ColumnType::Int,
            "The revision number of the rule.",
        ),
    ],
    list_key_columns: &[
        "id",
        "description",
        "direction",
        "ethertype",
        "protocol",
        "project_id",
        "remote_group_id",
        "security_group_id",
        "port_range_min",
        "port_range_max",
        "remote_ip_prefix",
    ],
    get_key_columns: &["id"],
};

#[derive(Debug, Deserialize)]
pub struct SecurityGroupRule {
    pub id: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub description: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub remote_group_id: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub direction: String,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub ethertype: String,
    #[serde(default)]
    pub port_range_min: Option<i64>,
    #[serde(default)]
    pub port_range_max: Option<i64>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub security_group_id: String,
    #[serde(default)]
    pub remote_ip_prefix: Option<String>,
    #[serde(default)]
    pub revision_number: Option<i64>,
}

impl Resource for SecurityGroupRule {
    const SERVICE: ServiceType = ServiceType::Network;
    const LIST_PATH: &'static str = "security-group-rules";
    const COLLECTION_KEY: &'static str = "security_group_rules";
    const ITEM_PATH: &'static str = "security-group-rules";
    const RESOURCE_KEY: Option<&'static str> = Some("security_group_rule");

    fn definition() -> &'static TableDefinition {
        &DEFINITION
    }

    fn list_query(quals: &Quals) -> Query {
        let mut query = Query::new();
        for &column in DEFINITION.list_key_columns {
            push_str(&mut query, quals, column, column);
        }
        query
    }

    fn into_row(self) -> Row {
        row(json!({
            "id": self.id,
            "description": self.description,
            "project_id": self.project_id.or(self.tenant_id),
            "created_at": timestamp(self.created_at),
            "updated_at": timestamp(self.updated_at),
            "remote_group_id": self.remote_group_id,
            "direction": self.direction,
            "protocol": self.protocol,
            "ethertype": self.ethertype,
            "port_range_min": self.port_range_min,
            "port_range_max": self.port_range_max,
            "security_group_id": self.security_group_id,
            "remote_ip_prefix": self.remote_ip_prefix,
            "revision": self.revision_number,
        }))
    }
}
