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
//! Image service images.
//!
//! Glance returns custom image properties as top level attributes of the
//! image. Every attribute without a dedicated column lands in `properties`.
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::{
    Column, ColumnType, Query, Quals, Resource, Row, TableDefinition, push_str, qual_str, row,
    timestamp,
};
use crate::service::ServiceType;

/// Image statuses known to the Image API.
const STATUSES: [&str; 9] = [
    "queued",
    "saving",
    "uploading",
    "importing",
    "active",
    "deactivated",
    "killed",
    "deleted",
    "pending_delete",
];

/// Hypermedia attributes that are neither columns nor properties.
const LINKS: [&str; 3] = ["self", "file", "schema"];

static DEFINITION: TableDefinition = TableDefinition {
    name: "openstack_image",
    description: "Images of the OpenStack Image service.",
    columns: &[
        Column::new("id", ColumnType::String, "The ID of the image."),
        Column::new("name", ColumnType::String, "The name of the image."),
        Column::new("status", ColumnType::String, "The status of the image."),
        Column::new("tags", ColumnType::Json, "The tags of the image."),
        Column::new(
            "container_format",
            ColumnType::String,
            "The container format of the image.",
        ),
        Column::new(
            "disk_format",
            ColumnType::String,
            "The disk format of the image.",
        ),
        Column::new(
            "min_disk",
            ColumnType::Int,
            "The minimum disk size required to boot the image in GiB.",
        ),
        Column::new(
            "min_ram",
            ColumnType::Int,
            "The minimum RAM required to boot the image in MiB.",
        ),
        Column::new(
            "project_id",
            ColumnType::String,
            "The ID of the project owning the image.",
        ),
        Column::new(
            "protected",
            ColumnType::Bool,
            "Whether the image is protected from deletion.",
        ),
        Column::new(
            "visibility",
            ColumnType::String,
            "The visibility of the image.",
        ),
        Column::new(
            "hidden",
            ColumnType::Bool,
            "Whether the image is hidden from the default listing.",
        ),
        Column::new(
            "checksum",
            ColumnType::String,
            "The MD5 checksum of the image data.",
        ),
        Column::new(
            "hash_algo",
            ColumnType::String,
            "The algorithm of the multihash of the image data.",
        ),
        Column::new(
            "hash_value",
            ColumnType::String,
            "The multihash of the image data.",
        ),
        Column::new(
            "size",
            ColumnType::Int,
            "The size of the image data in bytes.",
        ),
        Column::new(
            "virtual_size",
            ColumnType::Int,
            "The virtual size of the image in bytes.",
        ),
        Column::new(
            "created_at",
            ColumnType::Timestamp,
            "The date and time when the image was created.",
        ),
        Column::new(
            "updated_at",
            ColumnType::Timestamp,
            "The date and time when the image was last updated.",
        ),
        Column::new(
            "properties",
            ColumnType::Json,
            "The custom properties of the image.",
        ),
    ],
    list_key_columns: &["id", "name", "status", "container_format", "disk_format"],
    get_key_columns: &["id"],
};

#[derive(Debug, Deserialize)]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub container_format: Option<String>,
    #[serde(default)]
    pub disk_format: Option<String>,
    #[serde(default)]
    pub min_disk: Option<i64>,
    #[serde(default)]
    pub min_ram: Option<i64>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub protected: bool,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub os_hidden: bool,
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub os_hash_algo: Option<String>,
    #[serde(default)]
    pub os_hash_value: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub virtual_size: Option<i64>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Sizes are unknown, not empty, when zero.
fn non_zero(value: Option<i64>) -> Option<i64> {
    value.filter(|x| *x != 0)
}

impl Resource for Image {
    const SERVICE: ServiceType = ServiceType::ImageService;
    const LIST_PATH: &'static str = "images";
    const COLLECTION_KEY: &'static str = "images";
    const ITEM_PATH: &'static str = "images";
    const RESOURCE_KEY: Option<&'static str> = None;

    fn definition() -> &'static TableDefinition {
        &DEFINITION
    }

    fn list_query(quals: &Quals) -> Query {
        let mut query = Query::new();
        push_str(&mut query, quals, "id", "id");
        push_str(&mut query, quals, "name", "name");
        if let Some(status) = qual_str(quals, "status") {
            let status = status.to_lowercase();
            if STATUSES.contains(&status.as_str()) {
                query.push(("status", status));
            } else {
                debug!(%status, "ignoring unknown image status filter");
            }
        }
        push_str(&mut query, quals, "container_format", "container_format");
        push_str(&mut query, quals, "disk_format", "disk_format");
        query
    }

    fn into_row(mut self) -> Row {
        for key in LINKS {
            self.properties.remove(key);
        }
        row(json!({
            "id": self.id,
            "name": self.name,
            "status": self.status.to_lowercase(),
            "tags": self.tags,
            "container_format": self.container_format,
            "disk_format": self.disk_format,
            "min_disk": non_zero(self.min_disk),
            "min_ram": non_zero(self.min_ram),
            "project_id": self.owner,
            "protected": self.protected,
            "visibility": self.visibility,
            "hidden": self.os_hidden,
            "checksum": self.checksum,
            "hash_algo": self.os_hash_algo,
            "hash_value": self.os_hash_value,
            "size": non_zero(self.size),
            "virtual_size": non_zero(self.virtual_size),
            "created_at": timestamp(self.created_at),
            "updated_at": timestamp(self.updated_at),
            "properties": self.properties,
        }))
    }
}
