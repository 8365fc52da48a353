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
//! Compute instances (servers) of all projects.
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{
    Column, ColumnType, Query, Quals, Resource, Row, TableDefinition, push_str, row, timestamp,
};
use crate::service::ServiceType;

static DEFINITION: TableDefinition = TableDefinition {
    name: "openstack_instance",
    description: "Virtual machines of the OpenStack Compute service.",
    columns: &[
        Column::new("id", ColumnType::String, "The ID of the instance."),
        Column::new("name", ColumnType::String, "The name of the instance."),
        Column::new("status", ColumnType::String, "The status of the instance."),
        Column::new(
            "project_id",
            ColumnType::String,
            "The ID of the project owning the instance.",
        ),
        Column::new(
            "user_id",
            ColumnType::String,
            "The ID of the user who created the instance.",
        ),
        Column::new(
            "image_id",
            ColumnType::String,
            "The ID of the image the instance was booted from.",
        ),
        Column::new(
            "flavor_id",
            ColumnType::String,
            "The ID of the flavor, absent from compute API 2.47 on.",
        ),
        Column::new(
            "flavor_name",
            ColumnType::String,
            "The name of the flavor, from compute API 2.47 on.",
        ),
        Column::new(
            "host_id",
            ColumnType::String,
            "The obfuscated ID of the host running the instance.",
        ),
        Column::new(
            "availability_zone",
            ColumnType::String,
            "The availability zone of the instance.",
        ),
        Column::new(
            "key_name",
            ColumnType::String,
            "The name of the keypair injected in the instance.",
        ),
        Column::new(
            "created",
            ColumnType::Timestamp,
            "The date and time when the instance was created.",
        ),
        Column::new(
            "updated",
            ColumnType::Timestamp,
            "The date and time when the instance was last updated.",
        ),
        Column::new(
            "launched_at",
            ColumnType::Timestamp,
            "The date and time when the instance was launched.",
        ),
        Column::new(
            "terminated_at",
            ColumnType::Timestamp,
            "The date and time when the instance was terminated.",
        ),
        Column::new(
            "addresses",
            ColumnType::Json,
            "The addresses of the instance by network.",
        ),
        Column::new(
            "metadata",
            ColumnType::Json,
            "The metadata key/value pairs of the instance.",
        ),
    ],
    list_key_columns: &["name", "status", "project_id", "image_id", "flavor_id"],
    get_key_columns: &["id"],
};

#[derive(Debug, Deserialize)]
pub struct Instance {
    pub id: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub status: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Object with an `id`, or an empty string for volume backed instances.
    #[serde(default)]
    pub image: Value,
    #[serde(default)]
    pub flavor: Value,
    #[serde(default, rename = "hostId")]
    pub host_id: Option<String>,
    #[serde(default, rename = "OS-EXT-AZ:availability_zone")]
    pub availability_zone: Option<String>,
    #[serde(default)]
    pub key_name: Option<String>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(
        default,
        rename = "OS-SRV-USG:launched_at",
        deserialize_with = "crate::time::deserialize_optional"
    )]
    pub launched_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        rename = "OS-SRV-USG:terminated_at",
        deserialize_with = "crate::time::deserialize_optional"
    )]
    pub terminated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub addresses: Value,
    #[serde(default)]
    pub metadata: Value,
}

fn field(value: &Value, key: &str) -> Value {
    value.get(key).cloned().unwrap_or(Value::Null)
}

impl Resource for Instance {
    const SERVICE: ServiceType = ServiceType::Compute;
    const LIST_PATH: &'static str = "servers/detail";
    const COLLECTION_KEY: &'static str = "servers";
    const ITEM_PATH: &'static str = "servers";
    const RESOURCE_KEY: Option<&'static str> = Some("server");

    fn definition() -> &'static TableDefinition {
        &DEFINITION
    }

    fn list_query(quals: &Quals) -> Query {
        let mut query = vec![("all_tenants", "true".to_string())];
        push_str(&mut query, quals, "name", "name");
        push_str(&mut query, quals, "status", "status");
        push_str(&mut query, quals, "project_id", "project_id");
        push_str(&mut query, quals, "image_id", "image");
        push_str(&mut query, quals, "flavor_id", "flavor");
        query
    }

    fn into_row(self) -> Row {
        row(json!({
            "id": self.id,
            "name": self.name,
            "status": self.status,
            "project_id": self.tenant_id,
            "user_id": self.user_id,
            "image_id": field(&self.image, "id"),
            "flavor_id": field(&self.flavor, "id"),
            "flavor_name": field(&self.flavor, "original_name"),
            "host_id": self.host_id.filter(|x| !x.is_empty()),
            "availability_zone": self.availability_zone,
            "key_name": self.key_name,
            "created": timestamp(self.created),
            "updated": timestamp(self.updated),
            "launched_at": timestamp(self.launched_at),
            "terminated_at": timestamp(self.terminated_at),
            "addresses": self.addresses,
            "metadata": self.metadata,
        }))
    }
}
