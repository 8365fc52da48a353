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
//! Networking security groups.
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{
    Column, ColumnType, Query, Quals, Resource, Row, TableDefinition, push_str, row, timestamp,
};
use crate::service::ServiceType;

static DEFINITION: TableDefinition = TableDefinition {
    name: "openstack_security_group",
    description: "Security groups of the OpenStack Networking service.",
    columns: &[
        Column::new("id", ColumnType::String, "The ID of the security group."),
        Column::new(
            "name",
            ColumnType::String,
            "The name of the security group.",
        ),
        Column::new(
            "description",
            ColumnType::String,
            "The description of the security group.",
        ),
        Column::new(
            "project_id",
            ColumnType::String,
            "The ID of the project owning the security group.",
        ),
        Column::new(
            "created_at",
            ColumnType::Timestamp,
            "The date and time when the security group was created.",
        ),
        Column::new(
            "updated_at",
            ColumnType::Timestamp,
            "The date and time when the security group was last updated.",
        ),
        Column::new("tags", ColumnType::Json, "The tags of the security group."),
        Column::new(
            "security_group_rule_ids",
            ColumnType::Json,
            "The IDs of the rules of the security group.",
        ),
        Column::new(
            "security_group_rules",
            ColumnType::Json,
            "The rules of the security group.",
        ),
    ],
    list_key_columns: &["id", "name", "description", "project_id"],
    get_key_columns: &["id"],
};

#[derive(Debug, Deserialize)]
pub struct SecurityGroup {
    pub id: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub name: String,
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
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub security_group_rules: Vec<Value>,
}

impl Resource for SecurityGroup {
    const SERVICE: ServiceType = ServiceType::Network;
    const LIST_PATH: &'static str = "security-groups";
    const COLLECTION_KEY: &'static str = "security_groups";
    const ITEM_PATH: &'static str = "security-groups";
    const RESOURCE_KEY: Option<&'static str> = Some("security_group");

    fn definition() -> &'static TableDefinition {
        &DEFINITION
    }

    fn list_query(quals: &Quals) -> Query {
        let mut query = Query::new();
        for column in ["id", "name", "description", "project_id"] {
            push_str(&mut query, quals, column, column);
        }
        query
    }

    fn into_row(self) -> Row {
        let rule_ids: Vec<Value> = self
            .security_group_rules
            .iter()
            .filter_map(|rule| rule.get("id").cloned())
            .collect();
        row(json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "project_id": self.project_id.or(self.tenant_id),
            "created_at": timestamp(self.created_at),
            "updated_at": timestamp(self.updated_at),
            "tags": self.tags,
            "security_group_rule_ids": rule_ids,
            "security_group_rules": self.security_group_rules,
        }))
    }
}
