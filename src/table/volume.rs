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
//! Block storage volumes of all projects.
//!
//! The image metadata Cinder copies onto volumes created from an image is
//! flattened into `image_*` columns.
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{
    Column, ColumnType, Query, Quals, Resource, Row, TableDefinition, push_str, row, timestamp,
};
use crate::service::ServiceType;

static DEFINITION: TableDefinition = TableDefinition {
    name: "openstack_volume",
    description: "Volumes of the OpenStack Block Storage service.",
    columns: &[
        Column::new("id", ColumnType::String, "The ID of the volume."),
        Column::new("name", ColumnType::String, "The name of the volume."),
        Column::new(
            "description",
            ColumnType::String,
            "The description of the volume.",
        ),
        Column::new(
            "project_id",
            ColumnType::String,
            "The ID of the project owning the volume.",
        ),
        Column::new(
            "user_id",
            ColumnType::String,
            "The ID of the user who created the volume.",
        ),
        Column::new("status", ColumnType::String, "The status of the volume."),
        Column::new(
            "replication_status",
            ColumnType::String,
            "The replication status of the volume.",
        ),
        Column::new("size", ColumnType::Int, "The size of the volume in GiB."),
        Column::new(
            "availability_zone",
            ColumnType::String,
            "The availability zone of the volume.",
        ),
        Column::new(
            "bootable",
            ColumnType::Bool,
            "Whether the volume is bootable.",
        ),
        Column::new(
            "encrypted",
            ColumnType::Bool,
            "Whether the volume is encrypted.",
        ),
        Column::new(
            "multiattach",
            ColumnType::Bool,
            "Whether the volume can be attached to several instances.",
        ),
        Column::new(
            "consistencygroup_id",
            ColumnType::String,
            "The ID of the consistency group of the volume.",
        ),
        Column::new("volume_type", ColumnType::String, "The type of the volume."),
        Column::new(
            "snapshot_id",
            ColumnType::String,
            "The ID of the snapshot the volume was created from.",
        ),
        Column::new(
            "source_vol_id",
            ColumnType::String,
            "The ID of the volume the volume was cloned from.",
        ),
        Column::new(
            "backup_id",
            ColumnType::String,
            "The ID of the backup the volume was restored from.",
        ),
        Column::new(
            "group_id",
            ColumnType::String,
            "The ID of the group of the volume.",
        ),
        Column::new(
            "created_at",
            ColumnType::Timestamp,
            "The date and time when the volume was created.",
        ),
        Column::new(
            "updated_at",
            ColumnType::Timestamp,
            "The date and time when the volume was last updated.",
        ),
        Column::new(
            "metadata",
            ColumnType::Json,
            "The metadata key/value pairs of the volume.",
        ),
        Column::new(
            "volume_image_metadata",
            ColumnType::Json,
            "The metadata of the image the volume was created from.",
        ),
        Column::new(
            "image_id",
            ColumnType::String,
            "The ID of the source image.",
        ),
        Column::new(
            "image_name",
            ColumnType::String,
            "The name of the source image.",
        ),
        Column::new(
            "image_size",
            ColumnType::Int,
            "The size of the source image in bytes.",
        ),
        Column::new(
            "image_architecture",
            ColumnType::String,
            "The CPU architecture of the source image.",
        ),
        Column::new(
            "image_checksum",
            ColumnType::String,
            "The checksum of the source image.",
        ),
        Column::new(
            "image_container_format",
            ColumnType::String,
            "The container format of the source image.",
        ),
        Column::new(
            "image_disk_format",
            ColumnType::String,
            "The disk format of the source image.",
        ),
        Column::new(
            "image_hw_disk_bus",
            ColumnType::String,
            "The disk bus requested by the source image.",
        ),
        Column::new(
            "image_hw_qemu_guest_agent",
            ColumnType::Bool,
            "Whether the source image runs the QEMU guest agent.",
        ),
        Column::new(
            "image_hw_rng_model",
            ColumnType::String,
            "The random number generator model of the source image.",
        ),
        Column::new(
            "image_hw_scsi_model",
            ColumnType::String,
            "The SCSI controller model of the source image.",
        ),
        Column::new(
            "image_min_disk",
            ColumnType::Int,
            "The minimum disk size of the source image in GiB.",
        ),
        Column::new(
            "image_min_ram",
            ColumnType::Int,
            "The minimum RAM of the source image in MiB.",
        ),
        Column::new(
            "image_os_distro",
            ColumnType::String,
            "The operating system distribution of the source image.",
        ),
    ],
    list_key_columns: &["name", "status", "project_id"],
    get_key_columns: &["id"],
};

#[derive(Debug, Deserialize)]
pub struct Volume {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "os-vol-tenant-attr:tenant_id")]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub status: String,
    #[serde(default)]
    pub replication_status: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub availability_zone: Option<String>,
    /// Rendered as the string `"true"` or `"false"`.
    #[serde(default)]
    pub bootable: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub encrypted: bool,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub multiattach: bool,
    #[serde(default)]
    pub consistencygroup_id: Option<String>,
    #[serde(default)]
    pub volume_type: Option<String>,
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub source_volid: Option<String>,
    #[serde(default)]
    pub backup_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub volume_image_metadata: Option<Map<String, Value>>,
}

/// Image metadata values are strings, numbers included.
struct ImageMetadata<'a>(Option<&'a Map<String, Value>>);

impl ImageMetadata<'_> {
    fn str(&self, key: &str) -> Value {
        match self.0.and_then(|meta| meta.get(key)) {
            Some(Value::String(val)) => Value::String(val.clone()),
            Some(Value::Number(val)) => Value::String(val.to_string()),
            _ => Value::Null,
        }
    }

    fn int(&self, key: &str) -> Value {
        match self.0.and_then(|meta| meta.get(key)) {
            Some(Value::String(val)) => val.parse::<i64>().map_or(Value::Null, Value::from),
            Some(Value::Number(val)) => Value::Number(val.clone()),
            _ => Value::Null,
        }
    }

    fn yes(&self, key: &str) -> Value {
        match self.0.and_then(|meta| meta.get(key)).and_then(Value::as_str) {
            Some(val) => Value::Bool(val.eq_ignore_ascii_case("yes")),
            None => Value::Null,
        }
    }
}

impl Resource for Volume {
    const SERVICE: ServiceType = ServiceType::BlockStorage;
    const LIST_PATH: &'static str = "volumes/detail";
    const COLLECTION_KEY: &'static str = "volumes";
    const ITEM_PATH: &'static str = "volumes";
    const RESOURCE_KEY: Option<&'static str> = Some("volume");

    fn definition() -> &'static TableDefinition {
        &DEFINITION
    }

    fn list_query(quals: &Quals) -> Query {
        let mut query = vec![("all_tenants", "true".to_string())];
        push_str(&mut query, quals, "name", "name");
        push_str(&mut query, quals, "status", "status");
        push_str(&mut query, quals, "project_id", "project_id");
        query
    }

    fn into_row(self) -> Row {
        let image = ImageMetadata(self.volume_image_metadata.as_ref());
        let mut columns = row(json!({
            "image_id": image.str("image_id"),
            "image_name": image.str("image_name"),
            "image_size": image.int("size"),
            "image_architecture": image.str("architecture"),
            "image_checksum": image.str("checksum"),
            "image_container_format": image.str("container_format"),
            "image_disk_format": image.str("disk_format"),
            "image_hw_disk_bus": image.str("hw_disk_bus"),
            "image_hw_qemu_guest_agent": image.yes("hw_qemu_guest_agent"),
            "image_hw_rng_model": image.str("hw_rng_model"),
            "image_hw_scsi_model": image.str("hw_scsi_model"),
            "image_min_disk": image.int("min_disk"),
            "image_min_ram": image.int("min_ram"),
            "image_os_distro": image.str("os_distro"),
        }));
        columns.extend(row(json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "project_id": self.tenant_id,
            "user_id": self.user_id,
            "status": self.status,
            "replication_status": self.replication_status,
            "size": self.size,
            "availability_zone": self.availability_zone,
            "bootable": self.bootable.map(|val| val.eq_ignore_ascii_case("true")),
            "encrypted": self.encrypted,
            "multiattach": self.multiattach,
            "consistencygroup_id": self.consistencygroup_id,
            "volume_type": self.volume_type,
            "snapshot_id": self.snapshot_id,
            "source_vol_id": self.source_volid,
            "backup_id": self.backup_id,
            "group_id": self.group_id,
            "created_at": timestamp(self.created_at),
            "updated_at": timestamp(self.updated_at),
            "metadata": self.metadata,
            "volume_image_metadata": self.volume_image_metadata,
        })));
        columns
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;
    use crate::table::ResourceTable;
    use crate::table::testing::{cache, collect, quals};

    #[tokio::test]
    async fn test_list_flattens_image_metadata() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::GET)
                    .path("/volume/v3/p1/volumes/detail")
                    .query_param("all_tenants", "true")
                    .query_param("status", "in-use")
                    .header("openstack-api-version", "volume 3.59")
                    .header("x-openstack-volume-api-version", "3.59");
                then.status(200).json_body(json!({
                    "volumes": [{
                        "id": "v1", "name": "root", "description": null,
                        "os-vol-tenant-attr:tenant_id": "p1", "user_id": "u1",
                        "status": "in-use", "size": 10, "availability_zone": "nova",
                        "bootable": "true", "encrypted": false, "multiattach": false,
                        "volume_type": "lvmdriver-1", "source_volid": null,
                        "created_at": "2022-10-07T18:55:54.000000", "updated_at": null,
                        "metadata": {"attached_mode": "rw"},
                        "volume_image_metadata": {
                            "image_id": "i1", "image_name": "cirros", "size": "16338944",
                            "checksum": "443b7623e27ecf03dc9e01ee93f67afe",
                            "container_format": "bare", "disk_format": "qcow2",
                            "hw_qemu_guest_agent": "Yes", "min_disk": "1", "min_ram": "0",
                            "os_distro": "cirros"
                        }
                    }, {
                        "id": "v2", "name": "data", "status": "in-use", "size": 1,
                        "bootable": "false"
                    }]
                }));
            })
            .await;

        let cache = cache(&server);
        let rows = collect(
            &ResourceTable::<Volume>::new(),
            &cache,
            &quals(json!({"status": "in-use"})),
        )
        .await
        .unwrap();
        mock.assert_async().await;

        let row = &rows[0];
        assert_eq!(json!("p1"), row["project_id"]);
        assert_eq!(json!(true), row["bootable"]);
        assert_eq!(json!("2022-10-07T18:55:54+00:00"), row["created_at"]);
        assert_eq!(json!(null), row["updated_at"]);
        assert_eq!(json!("i1"), row["image_id"]);
        assert_eq!(json!(16338944), row["image_size"]);
        assert_eq!(json!(true), row["image_hw_qemu_guest_agent"]);
        assert_eq!(json!(1), row["image_min_disk"]);
        assert_eq!(json!(0), row["image_min_ram"]);
        assert_eq!(json!(null), row["image_architecture"]);
        assert_eq!(json!("rw"), row["metadata"]["attached_mode"]);

        let row = &rows[1];
        assert_eq!(json!(false), row["bootable"]);
        assert_eq!(json!(null), row["image_id"]);
        assert_eq!(json!(null), row["image_hw_qemu_guest_agent"]);
        assert_eq!(json!(null), row["volume_image_metadata"]);
    }
}
