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
//! Block storage volume attachments.
//!
//! Attachments carry no owner. Without a `project_id` filter the table lists
//! the projects of the Identity service and queries the attachments of each
//! project in turn, tagging rows with the project being queried.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::debug;

use super::project::Project;
use super::{
    Column, ColumnType, Query, Quals, Row, Table, TableDefinition, push_str, qual_str,
    required_qual, row, timestamp,
};
use crate::cache::ClientCache;
use crate::error::ConnectorError;
use crate::service::ServiceType;

static DEFINITION: TableDefinition = TableDefinition {
    name: "openstack_attachment",
    description: "Volume attachments of the OpenStack Block Storage service.",
    columns: &[
        Column::new("id", ColumnType::String, "The ID of the attachment."),
        Column::new(
            "attachment_id",
            ColumnType::String,
            "The ID of the attachment.",
        ),
        Column::new(
            "volume_id",
            ColumnType::String,
            "The ID of the attached volume.",
        ),
        Column::new(
            "instance_id",
            ColumnType::String,
            "The ID of the instance the volume is attached to.",
        ),
        Column::new(
            "status",
            ColumnType::String,
            "The status of the attachment.",
        ),
        Column::new(
            "attach_mode",
            ColumnType::String,
            "The attach mode, rw or ro.",
        ),
        Column::new(
            "attached_at",
            ColumnType::Timestamp,
            "The date and time when the volume was attached.",
        ),
        Column::new(
            "detached_at",
            ColumnType::Timestamp,
            "The date and time when the volume was detached.",
        ),
        Column::new(
            "project_id",
            ColumnType::String,
            "The ID of the project the attachment was listed for.",
        ),
        Column::new(
            "connection_info",
            ColumnType::Json,
            "The connection information of the attachment.",
        ),
    ],
    list_key_columns: &["instance_id", "volume_id", "project_id"],
    get_key_columns: &["id"],
};

#[derive(Debug, Deserialize)]
pub struct Attachment {
    pub id: String,
    #[serde(default)]
    pub volume_id: Option<String>,
    #[serde(default)]
    pub instance: Option<String>,
    #[serde(default, deserialize_with = "crate::table::null_default")]
    pub status: String,
    #[serde(default)]
    pub attach_mode: Option<String>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub attached_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub detached_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub connection_info: Value,
}

impl Attachment {
    fn into_row(self, project_id: Option<&str>) -> Row {
        row(json!({
            "attachment_id": self.id,
            "id": self.id,
            "volume_id": self.volume_id,
            "instance_id": self.instance,
            "status": self.status,
            "attach_mode": self.attach_mode,
            "attached_at": timestamp(self.attached_at),
            "detached_at": timestamp(self.detached_at),
            "project_id": project_id,
            "connection_info": self.connection_info,
        }))
    }
}

/// Table of the volume attachments.
#[derive(Debug, Default)]
pub struct AttachmentTable;

#[async_trait]
impl Table for AttachmentTable {
    fn definition(&self) -> &'static TableDefinition {
        &DEFINITION
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = DEFINITION.name))]
    async fn list(
        &self,
        cache: &ClientCache,
        quals: &Quals,
        sink: &mpsc::Sender<Row>,
    ) -> Result<usize, ConnectorError> {
        let client = cache.get_service_client(ServiceType::BlockStorage).await?;
        let mut query: Query = vec![("all_tenants", "true".to_string())];
        push_str(&mut query, quals, "instance_id", "instance_id");
        push_str(&mut query, quals, "volume_id", "volume_id");

        let projects = match qual_str(quals, "project_id") {
            Some(project_id) => vec![project_id],
            None => {
                let identity = cache.get_service_client(ServiceType::Identity).await?;
                identity
                    .list::<Project>("projects", &[], "projects")
                    .await?
                    .into_iter()
                    .map(|project| project.id)
                    .collect()
            }
        };

        let mut count = 0;
        for project_id in projects {
            debug!(%project_id, "listing attachments of the project");
            let mut project_query = query.clone();
            project_query.push(("project_id", project_id.clone()));
            let mut pager = client.pages("attachments/detail", &project_query, "attachments")?;
            while let Some(page) = pager.next_page::<Attachment>().await? {
                for item in page {
                    if sink.send(item.into_row(Some(&project_id))).await.is_err() {
                        debug!("receiver closed, exit");
                        return Ok(count);
                    }
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = DEFINITION.name))]
    async fn get(&self, cache: &ClientCache, quals: &Quals) -> Result<Option<Row>, ConnectorError> {
        let id = required_qual(quals, DEFINITION.name, "id")?;
        let project_id = qual_str(quals, "project_id");
        let client = cache.get_service_client(ServiceType::BlockStorage).await?;
        let item: Option<Attachment> = client
            .get(&format!("attachments/{id}"), Some("attachment"))
            .await?;
        Ok(item.map(|item| item.into_row(project_id.as_deref())))
    }
}
