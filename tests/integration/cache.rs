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
use secrecy::ExposeSecret;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

use openstack_connector::auth::AuthError;
use openstack_connector::cache::ClientCacheError;
use openstack_connector::config::Config;
use openstack_connector::service::ServiceType;

use crate::common::{TOKEN, cache, connection, keystone};

#[tokio::test]
async fn test_concurrent_clients_share_one_token() -> Result<()> {
    let server = MockServer::start_async().await;
    let token_mock = keystone(&server).await;

    let cache = Arc::new(cache(connection(&server))?);
    let mut handles = Vec::new();
    for _ in 0..4 {
        for service_type in ServiceType::ALL {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache.get_service_client(service_type).await
            }));
        }
    }
    let mut clients = Vec::new();
    for handle in handles {
        clients.push(handle.await??);
    }
    token_mock.assert_hits_async(1).await;

    let compute = cache.get_service_client(ServiceType::Compute).await?;
    assert_eq!(
        4,
        clients
            .iter()
            .filter(|client| Arc::ptr_eq(client, &compute))
            .count()
    );
    assert_eq!(server.url("/compute/v2.1/"), compute.endpoint().as_str());
    assert_eq!("2.79", compute.microversion());
    assert_eq!(
        TOKEN,
        compute.session().auth_token().await.expose_secret()
    );

    let network = cache.get_service_client(ServiceType::Network).await?;
    assert_eq!(server.url("/network/v2.0/"), network.endpoint().as_str());
    assert_eq!("", network.microversion());
    Ok(())
}

#[tokio::test]
async fn test_rejected_credentials_are_not_cached() -> Result<()> {
    let server = MockServer::start_async().await;
    let token_mock = server
        .mock_async(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/identity/v3/auth/tokens");
            then.status(401).json_body(json!({"error": {
                "code": 401,
                "title": "Unauthorized",
                "message": "The request you have made requires authentication."
            }}));
        })
        .await;

    let cache = cache(connection(&server))?;
    for service_type in [ServiceType::Compute, ServiceType::Identity] {
        match cache.get_service_client(service_type).await {
            Err(ClientCacheError::Authentication {
                source: AuthError::Rejected { status, .. },
            }) => assert_eq!(401, status.as_u16()),
            other => panic!("unexpected result {other:?}"),
        }
    }
    token_mock.assert_hits_async(2).await;
    Ok(())
}

#[tokio::test]
async fn test_connection_from_config_file() -> Result<()> {
    let server = MockServer::start_async().await;
    let token_mock = keystone(&server).await;

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    write!(
        file,
        r#"
connect_timeout = 5

[connections.default]
endpoint_url = "{}"
username = "u"
password = "p4ssw0rd"
project_name = "demo"
domain_name = "Default"
region = "RegionOne"
interface = "public"
blockstorage_v3_microversion = "3.60"
"#,
        server.url("/identity/v3")
    )?;

    let config = Config::new(file.path().to_path_buf())?;
    assert_eq!(5, config.connect_timeout);
    let connection = config
        .connection("default")
        .cloned()
        .ok_or_else(|| eyre::eyre!("connection missing"))?;

    let cache = cache(connection)?;
    let volume = cache.get_service_client(ServiceType::BlockStorage).await?;
    assert_eq!(server.url("/volume/v3/p1/"), volume.endpoint().as_str());
    assert_eq!("3.60", volume.microversion());
    token_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_region_without_endpoints() -> Result<()> {
    let server = MockServer::start_async().await;
    let token_mock = keystone(&server).await;

    let mut config = connection(&server);
    config.region = Some("RegionTwo".into());
    let cache = cache(config)?;
    assert!(matches!(
        cache.get_service_client(ServiceType::ImageService).await,
        Err(ClientCacheError::ClientConstruction {
            service_type: ServiceType::ImageService,
            ..
        })
    ));
    // The session survives the failed client construction.
    cache.get_authenticated_client().await?;
    token_mock.assert_hits_async(1).await;
    Ok(())
}
