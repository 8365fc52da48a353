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

use eyre::Result;
use httpmock::MockServer;
use serde_json::json;

use openstack_connector::error::ConnectorError;
use openstack_connector::table::Plugin;

use crate::common::{TOKEN, cache, collect, connection, keystone, quals};

#[tokio::test]
async fn test_list_instances_over_pages() -> Result<()> {
    let server = MockServer::start_async().await;
    let token_mock = keystone(&server).await;
    let next = server.url("/compute/v2.1/servers/detail?all_tenants=true&marker=s1");
    let first = server
        .mock_async(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/compute/v2.1/servers/detail")
                .query_param("all_tenants", "true")
                .query_param("status", "ACTIVE")
                .header("x-auth-token", TOKEN)
                .header("openstack-api-version", "compute 2.79");
            then.status(200).json_body(json!({
                "servers": [{
                    "id": "s1", "name": "web", "status": "ACTIVE", "tenant_id": "p1",
                    "user_id": "u1", "image": {"id": "i1"},
                    "flavor": {"original_name": "m1.small"},
                    "created": "2022-10-07T18:55:54Z",
                    "OS-SRV-USG:launched_at": "2022-10-07T18:56:02.000000"
                }],
                "servers_links": [{"rel": "next", "href": next}]
            }));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/compute/v2.1/servers/detail")
                .query_param("marker", "s1")
                .header("x-auth-token", TOKEN);
            then.status(200).json_body(json!({
                "servers": [{"id": "s2", "name": "db", "status": "ACTIVE", "tenant_id": "p2"}]
            }));
        })
        .await;

    let cache = cache(connection(&server))?;
    let table = Plugin::new().table("openstack_instance")?;
    let rows = collect(table.as_ref(), &cache, &quals(json!({"status": "ACTIVE"}))?).await?;

    token_mock.assert_hits_async(1).await;
    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(
        vec!["web", "db"],
        rows.iter()
            .map(|row| row["name"].as_str().unwrap_or_default())
            .collect::<Vec<_>>()
    );
    assert_eq!(json!("i1"), rows[0]["image_id"]);
    assert_eq!(json!("2022-10-07T18:56:02+00:00"), rows[0]["launched_at"]);
    Ok(())
}

#[tokio::test]
async fn test_tables_share_the_session() -> Result<()> {
    let server = MockServer::start_async().await;
    let token_mock = keystone(&server).await;
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/identity/v3/projects")
                .header("x-auth-token", TOKEN);
            then.status(200).json_body(json!({
                "projects": [{"id": "p1", "name": "demo", "domain_id": "default", "enabled": true}],
                "links": {"next": null, "previous": null, "self": "ignored"}
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/image/v2/images")
                .header("x-auth-token", TOKEN);
            then.status(200).json_body(json!({
                "images": [{"id": "i1", "name": "cirros", "status": "active", "owner": "p1"}],
                "first": "/v2/images",
                "schema": "/v2/schemas/images"
            }));
        })
        .await;

    let cache = cache(connection(&server))?;
    let plugin = Plugin::new();
    let projects = collect(
        plugin.table("openstack_project")?.as_ref(),
        &cache,
        &quals(json!({}))?,
    )
    .await?;
    let images = collect(
        plugin.table("openstack_image")?.as_ref(),
        &cache,
        &quals(json!({}))?,
    )
    .await?;

    token_mock.assert_hits_async(1).await;
    assert_eq!(json!("demo"), projects[0]["name"]);
    assert_eq!(json!("p1"), images[0]["project_id"]);
    Ok(())
}

#[tokio::test]
async fn test_get_missing_volume() -> Result<()> {
    let server = MockServer::start_async().await;
    keystone(&server).await;
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/volume/v3/p1/volumes/missing");
            then.status(404).json_body(json!({"itemNotFound": {
                "code": 404,
                "message": "Volume missing could not be found."
            }}));
        })
        .await;

    let cache = cache(connection(&server))?;
    let row = Plugin::new()
        .table("openstack_volume")?
        .get(&cache, &quals(json!({"id": "missing"}))?)
        .await?;
    assert!(row.is_none());
    Ok(())
}

#[tokio::test]
async fn test_api_errors_are_returned() -> Result<()> {
    let server = MockServer::start_async().await;
    keystone(&server).await;
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::GET).path("/network/v2.0/ports");
            then.status(503).body("service unavailable");
        })
        .await;

    let cache = cache(connection(&server))?;
    let res = collect(
        Plugin::new().table("openstack_port")?.as_ref(),
        &cache,
        &quals(json!({}))?,
    )
    .await;
    let err = res.expect_err("listing must fail");
    assert!(matches!(
        err.downcast_ref::<ConnectorError>(),
        Some(ConnectorError::Request { .. })
    ));
    Ok(())
}
