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
//! OpenStack connector executable.
//!
//! Queries the tables of a configured OpenStack connection and prints the
//! rows as JSON lines on stdout.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, Result};
use eyre::{WrapErr, eyre};
use serde_json::Value;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    prelude::*,
};

use openstack_connector::cache::{ClientCache, build_http_client};
use openstack_connector::config::Config;
use openstack_connector::table::{Plugin, Quals};

/// Rows buffered between the table and the output writer.
const ROW_BUFFER: usize = 64;

/// OpenStack connector.
///
/// Exposes the resources of an OpenStack cloud (projects, users, instances,
/// networks, ports, security groups, volumes, attachments and images) as
/// queryable tables.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the connector config file.
    #[arg(short, long, default_value = "/etc/openstack-connector/connector.toml")]
    config: PathBuf,

    /// Name of the connection in the config file.
    #[arg(long, default_value = "default")]
    connection: String,

    /// Verbosity level. Repeat to increase level.
    #[arg(short, long, global=true, action = clap::ArgAction::Count, display_order = 920)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the table definitions.
    Tables,
    /// List the rows of a table.
    List {
        /// Table name.
        table: String,
        /// Equality filter as `column=value`. May be repeated.
        #[arg(short, long = "qual", value_parser = parse_qual)]
        quals: Vec<(String, Value)>,
    },
    /// Get a single row of a table by its ID.
    Get {
        /// Table name.
        table: String,
        /// Resource ID.
        id: String,
        /// Additional key column as `column=value`. May be repeated.
        #[arg(short, long = "qual", value_parser = parse_qual)]
        quals: Vec<(String, Value)>,
    },
}

/// Parse `column=value`. JSON scalars keep their type, anything else is a
/// string.
fn parse_qual(arg: &str) -> Result<(String, Value), String> {
    let (column, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("invalid filter {arg:?}, expected column=value"))?;
    let value = match serde_json::from_str::<Value>(value) {
        Ok(value @ (Value::Bool(_) | Value::Number(_))) => value,
        _ => Value::String(value.into()),
    };
    Ok((column.into(), value))
}

#[tokio::main]
async fn main() -> Result<(), Report> {
    color_eyre::install()?;
    let args = Args::parse();

    let cfg = Config::new(args.config)?;
    let connection = cfg.connection(&args.connection).cloned();

    let level = match args.verbose {
        0 => connection
            .as_ref()
            .and_then(|conn| conn.trace_level)
            .map_or(LevelFilter::WARN, LevelFilter::from),
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = Targets::new()
        .with_default(level)
        .with_target("hyper_util", level.min(LevelFilter::INFO))
        .with_target("reqwest", level.min(LevelFilter::INFO));

    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(filter);

    // build the tracing registry
    tracing_subscriber::registry().with(log_layer).init();

    let connection = connection.unwrap_or_else(|| {
        warn!(
            connection = %args.connection,
            "connection not found in the config file, relying on the environment"
        );
        Default::default()
    });

    let plugin = Plugin::new();
    let (table, quals) = match args.command {
        Command::Tables => {
            let mut stdout = io::stdout().lock();
            for table in plugin.tables() {
                serde_json::to_writer(&mut stdout, table.definition())?;
                writeln!(stdout)?;
            }
            return Ok(());
        }
        Command::List { table, quals } => (table, quals),
        Command::Get { table, id, quals } => {
            let mut quals: Quals = quals.into_iter().collect();
            quals.insert("id".into(), Value::String(id));

            let table = plugin.table(&table)?;
            let http_client = build_http_client(Duration::from_secs(cfg.connect_timeout))?;
            let cache = ClientCache::new(connection, http_client);
            let row = table
                .get(&cache, &quals)
                .await
                .wrap_err("Failed to get the row")?
                .ok_or_else(|| eyre!("{} not found", table.definition().name))?;
            println!("{}", serde_json::to_string(&row)?);
            return Ok(());
        }
    };

    let table = plugin.table(&table)?;
    let quals: Quals = quals.into_iter().collect();
    debug!(table = table.definition().name, ?quals, "listing table");

    let http_client = build_http_client(Duration::from_secs(cfg.connect_timeout))?;
    let cache = ClientCache::new(connection, http_client);

    let (tx, mut rx) = mpsc::channel(ROW_BUFFER);
    let producer = async {
        let tx = tx;
        table
            .list(&cache, &quals, &tx)
            .await
            .wrap_err("Failed to list the table")
    };
    let consumer = async {
        let mut stdout = io::stdout().lock();
        while let Some(row) = rx.recv().await {
            serde_json::to_writer(&mut stdout, &row)?;
            writeln!(stdout)?;
        }
        Ok::<_, Report>(())
    };
    let (count, ()) = tokio::try_join!(producer, consumer)?;
    info!(count, "rows listed");

    Ok(())
}
