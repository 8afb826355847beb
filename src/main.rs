//! swagger-from-source - command-line tool for generating Swagger documents.
//!
//! Analyzes the routing code of an Axum or Actix-Web project, reads the YAML blocks in the
//! handlers' doc comments and writes a Swagger 2.0 document, or serves it at `/swagger.json`.
//!
//! # Usage
//!
//! ```bash
//! swagger-from-source [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! swagger-from-source ./my-api-project -o swagger.yaml
//! ```
//!
//! Generate JSON documentation with a custom title:
//! ```bash
//! swagger-from-source ./my-api-project -f json --title "Pets API" -o swagger.json
//! ```
//!
//! Serve the document while developing:
//! ```bash
//! swagger-from-source ./my-api-project --serve 127.0.0.1:8080 -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_from_source::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("swagger-from-source starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Done");

    Ok(())
}
