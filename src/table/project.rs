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
//! Identity projects.
use serde::Deserialize;
use serde_json::json;

use super::{
    Column, ColumnType, Query, Quals, Resource, Row, TableDefinition, push_bool, push_str, row,
};
use crate::service::ServiceType;

static DEFINITION: TableDefinition = TableDefinition {
    name: "openstack_project",
    description: "Projects of the OpenStack Identity service.",
    columns: &[
        Column::new("id", ColumnType::String, "The ID of the project."),
        Column::new("name", ColumnType::String, "The name of the project."),
        Column::new(
            "description",
            ColumnType::String,
            "The description of the project.",
        ),
        Column::new(
            "is_domain",
            ColumnType::Bool,
            "Whether the project acts as a domain.",
        ),
        Column::new(
            "domain_id",
            ColumnType::String,
            "The ID of the domain owning the project.",
        ),
        Column::new(
            "enabled",
            ColumnType::Bool,
            "Whether the project is enabled.",
        ),
        Column::new(
            "parent_id",
            ColumnType::String,
            "The ID of the parent project.",
        ),
    ],
    list_key_columns: &["name", "is_domain", "domain_id", "enabled", "parent_id"],
    get_key_columns: &["id"],
};

#[derive(Debug, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub is_domain: bool,
    #[serde(default)]
    pub domain_id: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub enabled: bool,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Resource for Project {
    const SERVICE: ServiceType = ServiceType::Identity;
    const LIST_PATH: &'static str = "projects";
    const COLLECTION_KEY: &'static str = "projects";
    const ITEM_PATH: &'static str = "projects";
    const RESOURCE_KEY: Option<&'static str> = Some("project");

    fn definition() -> &'static TableDefinition {
        &DEFINITION
    }

    fn list_query(quals: &Quals) -> Query {
        let mut query = Query::new();
        push_str(&mut query, quals, "name", "name");
        push_bool(&mut query, quals, "is_domain", "is_domain");
        push_str(&mut query, quals, "domain_id", "domain_id");
        push_bool(&mut query, quals, "enabled", "enabled");
        push_str(&mut query, quals, "parent_id", "parent_id");
        query
    }

    fn into_row(self) -> Row {
        row(json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "is_domain": self.is_domain,
            "domain_id": self.domain_id,
            "enabled": self.enabled,
            "parent_id": self.parent_id,
        }))
    }
}
