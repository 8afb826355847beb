use crate::config::SwaggerConfig;
use crate::detector::Framework;
use crate::plugin::RoutesPlugin;
use crate::project::SourceProject;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use crate::server::{add_swagger_json_endpoint, serve, SWAGGER_JSON_PATH};
use anyhow::{Context, Result};
use axum::Router;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

/// Generate a Swagger document from the routes and handler doc comments of an Axum or
/// Actix-Web project
#[derive(Parser, Debug)]
#[command(name = "swagger-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Specify the web framework to parse (if not specified, auto-detect)
    #[arg(short = 'w', long = "framework", value_enum)]
    pub framework: Option<Framework>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Document title, overrides the config file
    #[arg(long = "title")]
    pub title: Option<String>,

    /// Document version, overrides the config file
    #[arg(long = "api-version")]
    pub api_version: Option<String>,

    /// YAML or JSON file with document settings
    #[arg(long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Serve the document at /swagger.json on this address instead of writing it
    #[arg(long = "serve", value_name = "ADDR")]
    pub serve: Option<String>,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    match (&args.serve, &args.output_path) {
        (Some(addr), _) => info!("Serving on: {}", addr),
        (None, Some(output)) => info!("Output file: {}", output.display()),
        (None, None) => info!("Output: stdout"),
    }
    match args.framework {
        Some(framework) => info!("Framework: {}", framework),
        None => info!("Framework: auto-detect"),
    }

    Ok(args)
}

/// Effective document settings: config file first, then flag overrides.
pub fn load_config(args: &CliArgs) -> Result<SwaggerConfig> {
    let mut config = match &args.config_path {
        Some(path) => SwaggerConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SwaggerConfig::default(),
    };

    if let Some(title) = &args.title {
        config.title = title.clone();
    }
    if let Some(version) = &args.api_version {
        config.version = version.clone();
    }

    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let config = load_config(&args)?;

    let project = Arc::new(
        SourceProject::load(&args.project_path, args.framework)
            .context("Failed to analyze project")?,
    );

    if let Some(addr) = &args.serve {
        let (router, _spec) = add_swagger_json_endpoint(Router::new(), project, config);
        let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
        info!("Starting server, GET {} to fetch the document", SWAGGER_JSON_PATH);
        runtime
            .block_on(serve(addr, router))
            .with_context(|| format!("Server on {} failed", addr))?;
        return Ok(());
    }

    let routes = Arc::new(RoutesPlugin::new(project.clone()).code_precedence(config.code_precedence));
    let mut spec = config.to_spec().with_plugin(routes.clone());
    let operations = routes.build_paths(&mut spec);

    if operations == 0 {
        log::warn!("No routes found in the project");
    }

    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&spec)?,
        OutputFormat::Json => serialize_json(&spec)?,
    };

    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)?;
        info!("Wrote Swagger document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Summary:");
    info!("  - Files analyzed: {}", project.file_count());
    info!("  - Operations documented: {}", operations);
    info!("  - Error responses: {}", spec.document().responses().len());
    info!("  - Frameworks: {:?}", project.frameworks());

    Ok(())
}
