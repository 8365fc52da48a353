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
//! Identity users.
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{
    Column, ColumnType, Query, Quals, Resource, Row, TableDefinition, push_bool, push_str, row,
    timestamp,
};
use crate::service::ServiceType;

static DEFINITION: TableDefinition = TableDefinition {
    name: "openstack_user",
    description: "Users of the OpenStack Identity service.",
    columns: &[
        Column::new("id", ColumnType::String, "The ID of the user."),
        Column::new("name", ColumnType::String, "The name of the user."),
        Column::new(
            "description",
            ColumnType::String,
            "The description of the user.",
        ),
        Column::new(
            "default_project_id",
            ColumnType::String,
            "The ID of the default project of the user.",
        ),
        Column::new(
            "domain_id",
            ColumnType::String,
            "The ID of the domain owning the user.",
        ),
        Column::new("enabled", ColumnType::Bool, "Whether the user is enabled."),
        Column::new(
            "password_expires_at",
            ColumnType::Timestamp,
            "The date and time when the password expires.",
        ),
    ],
    list_key_columns: &["id", "name", "domain_id", "enabled", "password_expires_at"],
    get_key_columns: &["id"],
};

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_project_id: Option<String>,
    #[serde(default)]
    pub domain_id: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub password_expires_at: Option<DateTime<Utc>>,
}

impl Resource for User {
    const SERVICE: ServiceType = ServiceType::Identity;
    const LIST_PATH: &'static str = "users";
    const COLLECTION_KEY: &'static str = "users";
    const ITEM_PATH: &'static str = "users";
    const RESOURCE_KEY: Option<&'static str> = Some("user");

    fn definition() -> &'static TableDefinition {
        &DEFINITION
    }

    fn list_query(quals: &Quals) -> Query {
        let mut query = Query::new();
        push_str(&mut query, quals, "id", "unique_id");
        push_str(&mut query, quals, "name", "name");
        push_str(&mut query, quals, "domain_id", "domain_id");
        push_bool(&mut query, quals, "enabled", "enabled");
        push_str(&mut query, quals, "password_expires_at", "password_expires_at");
        query
    }

    fn into_row(self) -> Row {
        row(json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "default_project_id": self.default_project_id,
            "domain_id": self.domain_id,
            "enabled": self.enabled,
            "password_expires_at": timestamp(self.password_expires_at),
        }))
    }
}
