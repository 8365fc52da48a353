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
//! # Tables
//!
//! A table maps one OpenStack resource type to flat rows. Rows are JSON
//! objects with one key per column, absent values being `null`.
//!
//! Equality filters ("quals") on the key columns of a table are forwarded to
//! the API as query parameters. The host engine is expected to apply every
//! filter again on the returned rows, so tables may ignore filters the API
//! does not support.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tokio::sync::mpsc;
use tracing::debug;

use crate::cache::ClientCache;
use crate::error::ConnectorError;
use crate::service::ServiceType;

pub mod attachment;
pub mod image;
pub mod instance;
pub mod network;
pub mod plugin;
pub mod port;
pub mod project;
pub mod security_group;
pub mod security_group_rule;
#[cfg(test)]
pub(crate) mod testing;
pub mod user;
pub mod volume;

pub use plugin::Plugin;

/// A table row.
pub type Row = Map<String, Value>;

/// Equality filters by column name.
pub type Quals = BTreeMap<String, Value>;

/// API query parameters.
pub type Query = Vec<(&'static str, String)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Int,
    Bool,
    Json,
    /// RFC 3339 string.
    Timestamp,
}

#[derive(Clone, Debug, Serialize)]
pub struct Column {
    pub name: &'static str,
    pub r#type: ColumnType,
    pub description: &'static str,
}

impl Column {
    pub const fn new(name: &'static str, r#type: ColumnType, description: &'static str) -> Self {
        Self {
            name,
            r#type,
            description,
        }
    }
}

/// Table metadata.
#[derive(Clone, Debug, Serialize)]
pub struct TableDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: &'static [Column],
    /// Optional filters of the list operation.
    pub list_key_columns: &'static [&'static str],
    /// Required filters of the get operation.
    pub get_key_columns: &'static [&'static str],
}

/// A queryable table.
#[async_trait]
pub trait Table: Send + Sync {
    fn definition(&self) -> &'static TableDefinition;

    /// Stream the rows matching the quals into `sink`.
    ///
    /// Returns the number of rows sent. Stops early, without error, once the
    /// receiving side is closed.
    async fn list(
        &self,
        cache: &ClientCache,
        quals: &Quals,
        sink: &mpsc::Sender<Row>,
    ) -> Result<usize, ConnectorError>;

    /// Fetch a single row by its key columns.
    async fn get(&self, cache: &ClientCache, quals: &Quals) -> Result<Option<Row>, ConnectorError>;
}

/// An OpenStack resource with the usual list and get APIs.
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    const SERVICE: ServiceType;
    /// Path of the list API relative to the service endpoint.
    const LIST_PATH: &'static str;
    /// Key of the resources array in the list response.
    const COLLECTION_KEY: &'static str;
    /// Path of the resource collection, the get API being `<ITEM_PATH>/<id>`.
    const ITEM_PATH: &'static str;
    /// Key of the resource in the get response, `None` when the body is the
    /// resource.
    const RESOURCE_KEY: Option<&'static str>;

    fn definition() -> &'static TableDefinition;

    /// Query parameters of the list API.
    fn list_query(quals: &Quals) -> Query;

    fn into_row(self) -> Row;
}

/// Table serving a [`Resource`].
pub struct ResourceTable<R>(PhantomData<fn() -> R>);

impl<R> ResourceTable<R> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<R> Default for ResourceTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource> Table for ResourceTable<R> {
    fn definition(&self) -> &'static TableDefinition {
        R::definition()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = R::definition().name))]
    async fn list(
        &self,
        cache: &ClientCache,
        quals: &Quals,
        sink: &mpsc::Sender<Row>,
    ) -> Result<usize, ConnectorError> {
        let client = cache.get_service_client(R::SERVICE).await?;
        let query = R::list_query(quals);
        debug!(?query, "listing resources");

        let mut pager = client.pages(R::LIST_PATH, &query, R::COLLECTION_KEY)?;
        let mut count = 0;
        while let Some(page) = pager.next_page::<R>().await? {
            for item in page {
                if sink.send(item.into_row()).await.is_err() {
                    debug!("receiver closed, exit");
                    return Ok(count);
                }
                count += 1;
            }
        }
        debug!(count, "resources retrieved");
        Ok(count)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = R::definition().name))]
    async fn get(&self, cache: &ClientCache, quals: &Quals) -> Result<Option<Row>, ConnectorError> {
        let id = required_qual(quals, R::definition().name, "id")?;
        let client = cache.get_service_client(R::SERVICE).await?;
        let item: Option<R> = client
            .get(&format!("{}/{id}", R::ITEM_PATH), R::RESOURCE_KEY)
            .await?;
        Ok(item.map(R::into_row))
    }
}

/// String value of a qual.
pub fn qual_str(quals: &Quals, column: &str) -> Option<String> {
    match quals.get(column)? {
        Value::String(val) => Some(val.clone()),
        Value::Number(val) => Some(val.to_string()),
        Value::Bool(val) => Some(val.to_string()),
        _ => None,
    }
}

/// Boolean value of a qual.
pub fn qual_bool(quals: &Quals, column: &str) -> Option<bool> {
    match quals.get(column)? {
        Value::Bool(val) => Some(*val),
        Value::String(val) => val.parse().ok(),
        _ => None,
    }
}

pub(crate) fn required_qual(
    quals: &Quals,
    table: &'static str,
    column: &'static str,
) -> Result<String, ConnectorError> {
    qual_str(quals, column).ok_or(ConnectorError::MissingKeyColumn { table, column })
}

/// Forward the string qual `column` as the `param` query parameter.
pub(crate) fn push_str(query: &mut Query, quals: &Quals, column: &str, param: &'static str) {
    if let Some(val) = qual_str(quals, column) {
        query.push((param, val));
    }
}

/// Forward the boolean qual `column` as the `param` query parameter.
pub(crate) fn push_bool(query: &mut Query, quals: &Quals, column: &str, param: &'static str) {
    if let Some(val) = qual_bool(quals, column) {
        query.push((param, val.to_string()));
    }
}

/// Render a timestamp column.
pub(crate) fn timestamp(value: Option<DateTime<Utc>>) -> Value {
    value.map_or(Value::Null, |dt| Value::String(dt.to_rfc3339()))
}

/// Deserialize an explicit `null` as the default value of the field.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Convert a `json!` object into a row.
pub(crate) fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}
