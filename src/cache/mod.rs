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
//! # Client cache
//!
//! Every connection owns one [`ClientCache`]. The cache authenticates the
//! connection on first use and hands out the same session and the same
//! service client per service type for the lifetime of the connection.
//!
//! Concurrent first requests for the same entry wait for a single
//! construction. A failed construction is not remembered: the next request
//! tries again.
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::auth::{
    AuthOptions, AuthenticatedSession, Authenticator, Environment, HttpAuthenticator,
    ProcessEnvironment,
};
use crate::config::ConnectionConfig;
use crate::service::{ServiceClient, ServiceType};

pub mod error;

pub use error::ClientCacheError;

/// Build the HTTP client shared by all requests of a connection.
pub fn build_http_client(connect_timeout: Duration) -> Result<Client, ClientCacheError> {
    Ok(Client::builder()
        .gzip(true)
        .connect_timeout(connect_timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()?)
}

/// Authenticated clients of a connection.
pub struct ClientCache {
    config: Arc<ConnectionConfig>,
    http_client: Client,
    authenticator: Arc<dyn Authenticator>,
    environment: Arc<dyn Environment>,
    session: OnceCell<Arc<AuthenticatedSession>>,
    clients: [OnceCell<Arc<ServiceClient>>; ServiceType::ALL.len()],
}

impl fmt::Debug for ClientCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCache")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("clients", &self.clients)
            .finish_non_exhaustive()
    }
}

impl ClientCache {
    /// Cache authenticating with the Identity service and reading the
    /// process environment.
    pub fn new(config: ConnectionConfig, http_client: Client) -> Self {
        let authenticator = Arc::new(HttpAuthenticator::new(http_client.clone()));
        Self::from_parts(config, http_client, authenticator, Arc::new(ProcessEnvironment))
    }

    pub fn from_parts(
        config: ConnectionConfig,
        http_client: Client,
        authenticator: Arc<dyn Authenticator>,
        environment: Arc<dyn Environment>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            http_client,
            authenticator,
            environment,
            session: OnceCell::new(),
            clients: Default::default(),
        }
    }

    /// Authenticated session of the connection.
    ///
    /// Credentials come from the `OS_*` environment when it is complete and
    /// from the connection configuration otherwise.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_authenticated_client(
        &self,
    ) -> Result<Arc<AuthenticatedSession>, ClientCacheError> {
        if let Some(session) = self.session.get() {
            debug!("returning the authenticated client from cache");
            return Ok(Arc::clone(session));
        }

        self.session
            .get_or_try_init(|| async {
                info!("creating new authenticated client");
                let options = AuthOptions::resolve(&self.config, self.environment.as_ref());
                let session = AuthenticatedSession::authenticate(
                    self.http_client.clone(),
                    Arc::clone(&self.authenticator),
                    options,
                )
                .await
                .map_err(|source| {
                    error!(error = %source, "error creating authenticated client");
                    ClientCacheError::Authentication { source }
                })?;
                debug!("saving authenticated client to cache");
                Ok::<_, ClientCacheError>(Arc::new(session))
            })
            .await
            .cloned()
    }

    /// Client of the given service bound to the connection region.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_service_client(
        &self,
        service_type: ServiceType,
    ) -> Result<Arc<ServiceClient>, ClientCacheError> {
        debug!(%service_type, "returning service client");
        let cell = &self.clients[service_type.index()];
        if let Some(client) = cell.get() {
            debug!("returning service client from cache");
            return Ok(Arc::clone(client));
        }

        cell.get_or_try_init(|| async {
            info!(%service_type, "creating new service client");
            let session = self.get_authenticated_client().await.inspect_err(|err| {
                error!(error = %err, "no valid authenticated provider client available")
            })?;

            let region = self.config.region.as_deref().unwrap_or_default();
            let interface = self.config.interface.unwrap_or_default();
            let client = ServiceClient::new(
                session,
                service_type,
                region,
                interface,
                service_type.microversion(&self.config),
            )
            .await
            .map_err(|source| {
                error!(%service_type, error = %source, "error creating service client");
                ClientCacheError::ClientConstruction {
                    service_type,
                    source,
                }
            })?;

            debug!(%service_type, "saving service client to cache");
            Ok::<_, ClientCacheError>(Arc::new(client))
        })
        .await
        .cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use tracing_test::traced_test;

    use super::*;
    use crate::auth::AuthError;
    use crate::auth::mock::{MockIdentityAuthenticator, issued_token};
    use crate::catalog::{
        Catalog, CatalogError, CatalogService, CatalogServiceBuilder, EndpointBuilder,
    };

    fn service(service_type: &str, url: &str) -> CatalogService {
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

    fn full_catalog() -> Catalog {
        Catalog(vec![
            service("identity", "https://keystone.example.com/v3"),
            service("compute", "https://nova.example.com/v2.1"),
            service("network", "https://neutron.example.com"),
            service("volumev3", "https://cinder.example.com/v3/p1"),
            service("image", "https://glance.example.com"),
        ])
    }

    fn config() -> ConnectionConfig {
        ConnectionConfig {
            endpoint_url: Some("https://keystone.example.com/v3".into()),
            username: Some("u".into()),
            password: Some("p4ssw0rd".into()),
            project_name: Some("demo".into()),
            region: Some("RegionOne".into()),
            ..Default::default()
        }
    }

    fn cache(config: ConnectionConfig, authenticator: MockIdentityAuthenticator) -> ClientCache {
        ClientCache::from_parts(
            config,
            Client::new(),
            Arc::new(authenticator),
            Arc::new(HashMap::<String, String>::new()),
        )
    }

    fn authenticator_once() -> MockIdentityAuthenticator {
        let mut authenticator = MockIdentityAuthenticator::default();
        authenticator
            .expect_authenticate()
            .times(1)
            .returning(|_| Ok(issued_token("token-1", full_catalog())));
        authenticator
    }

    #[tokio::test]
    async fn test_distinct_clients_with_default_microversions() {
        let sot = cache(config(), authenticator_once());

        let mut clients = Vec::new();
        for service_type in ServiceType::ALL {
            let client = sot.get_service_client(service_type).await.unwrap();
            assert_eq!(service_type, client.service_type());
            clients.push(client);
        }
        assert_eq!("3.13", clients[0].microversion());
        assert_eq!("2.79", clients[1].microversion());
        assert_eq!("", clients[2].microversion());
        assert_eq!("3.59", clients[3].microversion());
        assert_eq!("", clients[4].microversion());
        assert_eq!(
            "https://neutron.example.com/v2.0/",
            clients[2].endpoint().as_str()
        );

        for (i, a) in clients.iter().enumerate() {
            for b in clients.iter().skip(i + 1) {
                assert!(!Arc::ptr_eq(a, b));
            }
            // All clients share the single session.
            assert!(Arc::ptr_eq(a.session(), clients[0].session()));
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_clients_are_memoized() {
        let sot = cache(config(), authenticator_once());

        let session1 = sot.get_authenticated_client().await.unwrap();
        let compute1 = sot.get_service_client(ServiceType::Compute).await.unwrap();
        let compute2 = sot.get_service_client(ServiceType::Compute).await.unwrap();
        let session2 = sot.get_authenticated_client().await.unwrap();

        assert!(Arc::ptr_eq(&compute1, &compute2));
        assert!(Arc::ptr_eq(&session1, &session2));
        assert!(Arc::ptr_eq(&session1, compute1.session()));
        assert!(logs_contain("creating new authenticated client"));
        assert!(logs_contain("returning service client from cache"));
        assert!(!logs_contain("p4ssw0rd"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_constructs_once() {
        let sot = Arc::new(cache(config(), authenticator_once()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let sot = Arc::clone(&sot);
            let service_type = if i % 2 == 0 {
                ServiceType::Compute
            } else {
                ServiceType::BlockStorage
            };
            handles.push(tokio::spawn(async move {
                sot.get_service_client(service_type).await
            }));
        }
        let mut compute = Vec::new();
        let mut volume = Vec::new();
        for handle in handles {
            let client = handle.await.unwrap().unwrap();
            match client.service_type() {
                ServiceType::Compute => compute.push(client),
                _ => volume.push(client),
            }
        }
        assert_eq!(4, compute.len());
        assert!(compute.iter().all(|c| Arc::ptr_eq(c, &compute[0])));
        assert!(volume.iter().all(|c| Arc::ptr_eq(c, &volume[0])));
    }

    #[tokio::test]
    async fn test_authentication_failure_is_not_cached() {
        let mut authenticator = MockIdentityAuthenticator::default();
        authenticator
            .expect_authenticate()
            .times(ServiceType::ALL.len())
            .returning(|_| {
                Err(AuthError::Rejected {
                    status: reqwest::StatusCode::UNAUTHORIZED,
                    message: "invalid credentials".into(),
                })
            });
        let sot = cache(config(), authenticator);

        for service_type in ServiceType::ALL {
            match sot.get_service_client(service_type).await {
                Err(ClientCacheError::Authentication {
                    source: AuthError::Rejected { .. },
                }) => {}
                other => panic!("unexpected result {other:?}"),
            }
        }
        assert!(sot.session.get().is_none());
        assert!(sot.clients.iter().all(|cell| cell.get().is_none()));
    }

    #[tokio::test]
    async fn test_retry_after_authentication_failure() {
        let mut authenticator = MockIdentityAuthenticator::default();
        let mut seq = mockall::Sequence::new();
        authenticator
            .expect_authenticate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(AuthError::Rejected {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    message: String::new(),
                })
            });
        authenticator
            .expect_authenticate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(issued_token("token-1", full_catalog())));
        let sot = cache(config(), authenticator);

        assert!(sot.get_service_client(ServiceType::Network).await.is_err());
        let network = sot.get_service_client(ServiceType::Network).await.unwrap();
        assert_eq!("", network.microversion());
    }

    #[tokio::test]
    async fn test_microversion_override() {
        let sot = cache(
            ConnectionConfig {
                identity_v3_microversion: Some("3.14".into()),
                ..config()
            },
            authenticator_once(),
        );
        let identity = sot.get_service_client(ServiceType::Identity).await.unwrap();
        assert_eq!("3.14", identity.microversion());
        let compute = sot.get_service_client(ServiceType::Compute).await.unwrap();
        assert_eq!("2.79", compute.microversion());
    }

    #[tokio::test]
    async fn test_password_project_region_scenario() {
        let mut authenticator = MockIdentityAuthenticator::default();
        authenticator
            .expect_authenticate()
            .withf(|options| {
                options.username.as_deref() == Some("u")
                    && options.password.is_some()
                    && options.project_name.as_deref() == Some("demo")
                    && options.allow_reauth
            })
            .times(1)
            .returning(|_| Ok(issued_token("token-1", full_catalog())));
        let sot = cache(config(), authenticator);

        let compute = sot.get_service_client(ServiceType::Compute).await.unwrap();
        assert_eq!("2.79", compute.microversion());
        assert_eq!(
            "https://nova.example.com/v2.1/",
            compute.endpoint().as_str()
        );
        let identity = sot.get_service_client(ServiceType::Identity).await.unwrap();
        assert_eq!("3.13", identity.microversion());
    }

    #[tokio::test]
    async fn test_missing_password_without_environment() {
        let http_client = Client::new();
        let sot = ClientCache::from_parts(
            ConnectionConfig {
                endpoint_url: Some("http://127.0.0.1:1/v3".into()),
                username: Some("u".into()),
                ..Default::default()
            },
            http_client.clone(),
            Arc::new(HttpAuthenticator::new(http_client)),
            Arc::new(HashMap::<String, String>::new()),
        );

        assert!(matches!(
            sot.get_service_client(ServiceType::Compute).await,
            Err(ClientCacheError::Authentication {
                source: AuthError::MissingCredentials
            })
        ));
        assert!(sot.session.get().is_none());
        assert!(sot.clients.iter().all(|cell| cell.get().is_none()));
    }

    #[tokio::test]
    async fn test_region_mismatch_keeps_session() {
        let sot = cache(
            ConnectionConfig {
                region: Some("RegionTwo".into()),
                ..config()
            },
            authenticator_once(),
        );

        match sot.get_service_client(ServiceType::Compute).await {
            Err(ClientCacheError::ClientConstruction {
                service_type,
                source: CatalogError::EndpointNotFound { .. },
            }) => assert_eq!(ServiceType::Compute, service_type),
            other => panic!("unexpected result {other:?}"),
        }
        assert!(sot.session.get().is_some());
        assert!(sot.clients[ServiceType::Compute.index()].get().is_none());
        // The session is reused, the authenticator is not called again.
        assert!(sot.get_service_client(ServiceType::ImageService).await.is_err());
    }

    #[tokio::test]
    async fn test_environment_takes_precedence() {
        let mut authenticator = MockIdentityAuthenticator::default();
        authenticator
            .expect_authenticate()
            .withf(|options| {
                options.identity_endpoint.as_deref() == Some("https://env.example.com/v3")
                    && options.user_id.as_deref() == Some("env-user")
            })
            .times(1)
            .returning(|_| Ok(issued_token("token-1", full_catalog())));
        let env: HashMap<String, String> = [
            ("OS_AUTH_URL", "https://env.example.com/v3"),
            ("OS_USERID", "env-user"),
            ("OS_PASSWORD", "secret"),
        ]
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
        let sot = ClientCache::from_parts(
            config(),
            Client::new(),
            Arc::new(authenticator),
            Arc::new(env),
        );

        sot.get_authenticated_client().await.unwrap();
    }
}
