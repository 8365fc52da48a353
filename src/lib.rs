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

//! # OpenStack connector
//!
//! The connector exposes the resources of an OpenStack cloud (instances,
//! volumes and their attachments, networks, ports, security groups and their
//! rules, projects, users and images) as flat, queryable tables that an
//! embedding query engine can drive.
//!
//! Every connection to an OpenStack deployment owns a [`cache::ClientCache`].
//! The cache exchanges the configured credentials for a token with the
//! Identity service exactly once and derives one service client per service
//! family (Identity, Compute, Network, Block Storage, Image) from the
//! resulting session. Tables never build clients themselves: they borrow them
//! from the cache, issue the (paginated) API calls, flatten the JSON responses
//! into [`table::Row`]s and stream them to the caller.
//!
//! In practice this means:
//!
//! - credentials are taken from the usual `OS_*` environment variables when
//!   they are complete, and from the connection configuration otherwise;
//!
//! - authentication and endpoint discovery are paid once per connection, no
//!   matter how many queries run concurrently against it;
//!
//! - the API microversion of every service is pinned per connection (with
//!   defaults matching the Train release) so that the shape of the responses
//!   does not change under the tables' feet.

pub mod auth;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod service;
pub mod table;
pub mod time;
