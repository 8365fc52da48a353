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
//! # Service client
//!
//! A service client sends authenticated, microversion pinned requests to a
//! single service endpoint and follows the pagination links of the
//! responses. Services disagree on how the next page is announced:
//!
//! - Compute, Network and Block Storage return a `<collection>_links` list
//!   with a `rel: next` entry;
//! - Identity returns `links.next`;
//! - Image returns a top level `next` path relative to the service root.
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{AUTH_TOKEN_HEADER, AuthenticatedSession};
use crate::catalog::{CatalogError, Interface};
use crate::service::{RequestError, ServiceType};

/// Header pinning the microversion of a service.
pub const API_VERSION_HEADER: &str = "OpenStack-API-Version";

/// Client of one service of a connection.
#[derive(Debug)]
pub struct ServiceClient {
    service_type: ServiceType,
    endpoint: Url,
    root: Url,
    microversion: String,
    session: Arc<AuthenticatedSession>,
}

impl ServiceClient {
    /// Locate the service in the session catalog and bind a client to it.
    pub async fn new(
        session: Arc<AuthenticatedSession>,
        service_type: ServiceType,
        region: &str,
        interface: Interface,
        microversion: String,
    ) -> Result<Self, CatalogError> {
        let mut endpoint = session
            .endpoint_url(service_type.catalog_types(), region, interface)
            .await?;
        if !endpoint.path().ends_with('/') {
            endpoint.set_path(&format!("{}/", endpoint.path()));
        }
        let mut root = endpoint.clone();
        if let Some(suffix) = service_type.version_suffix() {
            if endpoint.path().ends_with(suffix) {
                root = endpoint
                    .join("../")
                    .map_err(|source| url_error(&endpoint, source))?;
            } else {
                endpoint = endpoint
                    .join(suffix)
                    .map_err(|source| url_error(&endpoint, source))?;
            }
        }
        debug!(%service_type, %endpoint, %microversion, "service client bound");
        Ok(Self {
            service_type,
            endpoint,
            root,
            microversion,
            session,
        })
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    /// Versioned endpoint URL, always with a trailing slash.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Pinned microversion, empty when the service is not pinned.
    pub fn microversion(&self) -> &str {
        &self.microversion
    }

    pub fn session(&self) -> &Arc<AuthenticatedSession> {
        &self.session
    }

    /// Build the URL of a path relative to the endpoint.
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, RequestError> {
        let mut url = self.endpoint.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn request(&self, url: Url, token: &SecretString) -> RequestBuilder {
        let mut request = self
            .session
            .http_client()
            .get(url)
            .header(AUTH_TOKEN_HEADER, token.expose_secret())
            .header(ACCEPT, "application/json");
        if !self.microversion.is_empty() {
            if let Some(service) = self.service_type.microversion_service() {
                request = request.header(
                    API_VERSION_HEADER,
                    format!("{service} {}", self.microversion),
                );
            }
            if let Some(header) = self.service_type.legacy_microversion_header() {
                request = request.header(header, self.microversion.as_str());
            }
        }
        request
    }

    /// Send a GET request, renewing the token once when it expired.
    async fn send(&self, url: Url) -> Result<Response, RequestError> {
        let token = self.session.auth_token().await;
        trace!(%url, "GET");
        let response = self.request(url.clone(), &token).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED && self.session.allow_reauth() {
            let token = self.session.reauthenticate(&token).await?;
            return Ok(self.request(url, &token).send().await?);
        }
        Ok(response)
    }

    async fn fetch(&self, url: Url) -> Result<Option<Value>, RequestError> {
        let response = self.send(url.clone()).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => {
                debug!("{} returned {:?}", self.service_type, response);
                let message = response.text().await.unwrap_or_default();
                Err(RequestError::Api {
                    url: url.to_string(),
                    status,
                    message,
                })
            }
        }
    }

    /// Fetch a single resource. `None` when it does not exist.
    ///
    /// The resource is taken from `resource_key` of the response body, or
    /// the body itself when no key is given.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        resource_key: Option<&str>,
    ) -> Result<Option<T>, RequestError> {
        let Some(mut body) = self.fetch(self.url(path, &[])?).await? else {
            return Ok(None);
        };
        if let Some(key) = resource_key {
            body = body
                .get_mut(key)
                .map(Value::take)
                .ok_or_else(|| RequestError::MissingResourceKey(key.into()))?;
        }
        Ok(Some(serde_json::from_value(body)?))
    }

    /// Page through a collection.
    pub fn pages(
        &self,
        path: &str,
        query: &[(&str, String)],
        collection_key: &str,
    ) -> Result<Pager<'_>, RequestError> {
        Ok(Pager {
            client: self,
            collection_key: collection_key.into(),
            next: Some(self.url(path, query)?),
            seen: HashSet::new(),
        })
    }

    /// Fetch every page of a collection.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        collection_key: &str,
    ) -> Result<Vec<T>, RequestError> {
        let mut pager = self.pages(path, query, collection_key)?;
        let mut items = Vec::new();
        while let Some(page) = pager.next_page().await? {
            items.extend(page);
        }
        Ok(items)
    }

    fn resolve_link(&self, link: &str) -> Result<Url, RequestError> {
        match Url::parse(link) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(self.root.join(link.trim_start_matches('/'))?)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn url_error(url: &Url, source: url::ParseError) -> CatalogError {
    CatalogError::UrlParse {
        url: url.to_string(),
        source,
    }
}

/// Link to the next page announced by the response body.
fn next_link<'a>(body: &'a Value, collection_key: &str) -> Option<&'a str> {
    if let Some(links) = body
        .get(format!("{collection_key}_links"))
        .and_then(Value::as_array)
    {
        return links
            .iter()
            .find(|link| link.get("rel").and_then(Value::as_str) == Some("next"))
            .and_then(|link| link.get("href"))
            .and_then(Value::as_str);
    }
    if let Some(next) = body
        .get("links")
        .and_then(|links| links.get("next"))
        .and_then(Value::as_str)
    {
        return Some(next);
    }
    body.get("next").and_then(Value::as_str)
}

/// Cursor over the pages of a collection.
pub struct Pager<'a> {
    client: &'a ServiceClient,
    collection_key: String,
    next: Option<Url>,
    seen: HashSet<Url>,
}

impl Pager<'_> {
    /// Fetch the next page. `None` once the collection is exhausted.
    pub async fn next_page<T: DeserializeOwned>(&mut self) -> Result<Option<Vec<T>>, RequestError> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };
        if !self.seen.insert(url.clone()) {
            debug!(%url, "pagination loop detected");
            return Ok(None);
        }
        let mut body = match self.client.fetch(url.clone()).await? {
            Some(body) => body,
            None => {
                return Err(RequestError::Api {
                    url: url.to_string(),
                    status: StatusCode::NOT_FOUND,
                    message: "collection not found".into(),
                });
            }
        };
        let items = body
            .get_mut(&self.collection_key)
            .map(Value::take)
            .ok_or_else(|| RequestError::MissingResourceKey(self.collection_key.clone()))?;
        let items: Vec<T> = serde_json::from_value(items)?;
        if items.is_empty() {
            return Ok(None);
        }
        self.next = next_link(&body, &self.collection_key)
            .map(|link| self.client.resolve_link(link))
            .transpose()?;
        Ok(Some(items))
    }
}
