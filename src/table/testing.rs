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
//! Helpers for table tests: a connection whose catalog points every service
//! to a mock server.
use httpmock::MockServer;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::{Quals, Row, Table};
use crate::auth::mock::{MockIdentityAuthenticator, issued_token};
use crate::cache::ClientCache;
use crate::catalog::{Catalog, CatalogService, CatalogServiceBuilder, EndpointBuilder};
use crate::config::ConnectionConfig;
use crate::error::ConnectorError;

fn service(service_type: &str, url: String) -> CatalogService {
    CatalogServiceBuilder::default()
        .id(service_type)
        .r#type(service_type)
        .endpoints(vec![
            EndpointBuilder::default()
                .id(format!("{service_type}-public"))
                .interface("public")
                .region("RegionOne")
                .region_id("RegionOne")
                .url(url)
                .build()
                .unwrap(),
        ])
        .build()
        .unwrap()
}

/// Catalog with the services mounted under `/identity/v3`, `/compute/v2.1`,
/// `/network/v2.0`, `/volume/v3/p1` and `/image/v2`.
pub(crate) fn catalog(server: &MockServer) -> Catalog {
    Catalog(vec![
        service("identity", server.url("/identity/v3")),
        service("compute", server.url("/compute/v2.1")),
        service("network", server.url("/network")),
        service("volumev3", server.url("/volume/v3/p1")),
        service("image", server.url("/image")),
    ])
}

pub(crate) fn cache(server: &MockServer) -> ClientCache {
    let catalog = catalog(server);
    let mut authenticator = MockIdentityAuthenticator::default();
    authenticator
        .expect_authenticate()
        .returning(move |_| Ok(issued_token("token-1", catalog.clone())));
    ClientCache::from_parts(
        ConnectionConfig {
            endpoint_url: Some(server.url("/identity/v3")),
            userid: Some("uid".into()),
            password: Some("p".into()),
            region: Some("RegionOne".into()),
            ..Default::default()
        },
        Client::new(),
        Arc::new(authenticator),
        Arc::new(HashMap::<String, String>::new()),
    )
}

pub(crate) fn quals(value: Value) -> Quals {
    serde_json::from_value(value).unwrap()
}

/// Run the list operation and collect the produced rows.
pub(crate) async fn collect(
    table: &dyn Table,
    cache: &ClientCache,
    quals: &Quals,
) -> Result<Vec<Row>, ConnectorError> {
    let (tx, mut rx) = mpsc::channel(16);
    let (count, rows) = tokio::join!(
        async move { table.list(cache, quals, &tx).await },
        async move {
            let mut rows = Vec::new();
            while let Some(row) = rx.recv().await {
                rows.push(row);
            }
            rows
        }
    );
    assert_eq!(count?, rows.len());
    Ok(rows)
}
