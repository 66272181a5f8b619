//! schemascope CLI - database schema inspector

use schemascope_cli::catalog::{Catalog, MySqlCatalog};
use schemascope_cli::cli::Args;
use schemascope_cli::config::DbConfig;
use schemascope_cli::server::{self, ServerConfig};

use anyhow::{Context, Result};
use clap::Parser;
use schemascope_core::{generate_models, Schema};
use std::fs;
use std::process::ExitCode;

/// Crawl or output failure.
const EXIT_FAILURE: u8 = 1;
/// Configuration error (missing connection settings, bad config file).
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();

    if args.serve {
        return run_serve_mode(args);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("schemascope: error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// One-shot mode: crawl the schema once and print it (or the generated
/// model stubs).
fn run(args: Args) -> Result<()> {
    let db = DbConfig::resolve(args.database_url.as_deref(), &args.config)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let schema: Schema = runtime.block_on(async {
        let catalog = MySqlCatalog::connect(&db).await?;
        let schema = catalog.crawl_schema().await;
        catalog.close().await;
        schema
    })?;

    let text = if args.models {
        let models = generate_models(&schema);
        let mut out = String::new();
        for (table_name, stub) in &models {
            out.push_str(&format!("// Model for {table_name}:\n{stub}\n"));
        }
        out
    } else if args.compact {
        serde_json::to_string(&schema)?
    } else {
        serde_json::to_string_pretty(&schema)?
    };

    match &args.output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{text}"),
    }

    Ok(())
}

/// Serve mode: start the HTTP server.
fn run_serve_mode(args: Args) -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let db = match DbConfig::resolve(args.database_url.as_deref(), &args.config) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("schemascope: error: {e:#}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let config = ServerConfig {
        db,
        port: args.port,
    };

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    match runtime.block_on(server::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("schemascope: server error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
