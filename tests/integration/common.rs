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
//

use eyre::Result;
use httpmock::{Mock, MockServer};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use openstack_connector::auth::HttpAuthenticator;
use openstack_connector::cache::{ClientCache, build_http_client};
use openstack_connector::config::ConnectionConfig;
use openstack_connector::table::{Quals, Row, Table};

pub const TOKEN: &str = "gAAAAABj-token";

/// Catalog entry of a service served by the mock server.
fn service(server: &MockServer, service_type: &str, path: &str) -> Value {
    json!({
        "id": format!("{service_type}-id"),
        "type": service_type,
        "name": service_type,
        "endpoints": [
            {
                "id": format!("{service_type}-internal"),
                "interface": "internal",
                "region": "RegionOne",
                "region_id": "RegionOne",
                "url": "http://internal.invalid"
            },
            {
                "id": format!("{service_type}-public"),
                "interface": "public",
                "region": "RegionOne",
                "region_id": "RegionOne",
                "url": server.url(path)
            }
        ]
    })
}

/// Register the token API of the Identity service accepting the password of
/// [`connection`].
pub async fn keystone(server: &MockServer) -> Mock<'_> {
    let catalog = json!([
        service(server, "identity", "/identity/v3"),
        service(server, "compute", "/compute/v2.1"),
        service(server, "network", "/network"),
        service(server, "volumev3", "/volume/v3/p1"),
        service(server, "image", "/image"),
    ]);
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/identity/v3/auth/tokens")
                .json_body(json!({"auth": {
                    "identity": {
                        "methods": ["password"],
                        "password": {"user": {
                            "name": "u",
                            "domain": {"name": "Default"},
                            "password": "p4ssw0rd"
                        }}
                    },
                    "scope": {"project": {"name": "demo", "domain": {"name": "Default"}}}
                }}));
            then.status(201)
                .header("X-Subject-Token", TOKEN)
                .json_body(json!({"token": {
                    "methods": ["password"],
                    "expires_at": "2030-01-01T00:00:00.000000Z",
                    "user": {
                        "id": "u1", "name": "u",
                        "domain": {"id": "default", "name": "Default"}
                    },
                    "project": {
                        "id": "p1", "name": "demo",
                        "domain": {"id": "default", "name": "Default"}
                    },
                    "catalog": catalog
                }}));
        })
        .await
}

pub fn connection(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig {
        endpoint_url: Some(server.url("/identity/v3")),
        username: Some("u".into()),
        password: Some("p4ssw0rd".into()),
        project_name: Some("demo".into()),
        domain_name: Some("Default".into()),
        region: Some("RegionOne".into()),
        ..Default::default()
    }
}

/// Cache of a connection authenticating against the mock server with an
/// empty environment.
pub fn cache(config: ConnectionConfig) -> Result<ClientCache> {
    let http_client = build_http_client(Duration::from_secs(5))?;
    Ok(ClientCache::from_parts(
        config,
        http_client.clone(),
        Arc::new(HttpAuthenticator::new(http_client)),
        Arc::new(HashMap::<String, String>::new()),
    ))
}

pub fn quals(value: Value) -> Result<Quals> {
    Ok(serde_json::from_value(value)?)
}

/// Run the list operation of a table and collect the rows.
pub async fn collect(table: &dyn Table, cache: &ClientCache, quals: &Quals) -> Result<Vec<Row>> {
    let (tx, mut rx) = mpsc::channel(8);
    let producer = async {
        let tx = tx;
        table.list(cache, quals, &tx).await
    };
    let consumer = async {
        let mut rows = Vec::new();
        while let Some(row) = rx.recv().await {
            rows.push(row);
        }
        rows
    };
    let (count, rows) = tokio::join!(producer, consumer);
    assert_eq!(count?, rows.len());
    Ok(rows)
}
