use crate::detector::{Framework, FrameworkDetector};
use crate::error::{Error, Result};
use crate::extractor::actix::ActixExtractor;
use crate::extractor::axum::AxumExtractor;
use crate::extractor::RouteExtractor;
use crate::parser::{AstParser, ParsedFile};
use crate::scanner::FileScanner;
use crate::source::{
    ExceptionHandlerEntry, ExceptionHandlerSource, HandlerDoc, HandlerKey, RouteEntry,
    RouteSource,
};
use anyhow::Context;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Route source backed by the source code of an Axum or Actix-Web project.
///
/// Routes and exception handlers are re-extracted on every call. Syntax trees are not
/// thread-safe, so the project keeps the source text of every file that parsed and
/// re-parses it per extraction.
#[derive(Debug, Clone)]
pub struct SourceProject {
    sources: Vec<(PathBuf, String)>,
    frameworks: Vec<Framework>,
}

impl SourceProject {
    /// Scans `root`, parses every Rust file and detects the framework unless one is given.
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn load(root: &Path, framework: Option<Framework>) -> anyhow::Result<Self> {
        info!("Scanning project directory {}", root.display());
        let scan_result = FileScanner::new(root.to_path_buf()).scan()?;
        info!("Found {} Rust files", scan_result.rust_files.len());

        if scan_result.rust_files.is_empty() {
            anyhow::bail!("No Rust files found in {}", root.display());
        }

        let mut sources = Vec::new();
        let mut parsed_files = Vec::new();
        for path in &scan_result.rust_files {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            match AstParser::parse_source(path, &content) {
                Ok(parsed) => {
                    parsed_files.push(parsed);
                    sources.push((path.clone(), content));
                }
                Err(e) => warn!("Skipping file: {}", e),
            }
        }
        info!("Successfully parsed {} files", parsed_files.len());

        let frameworks = resolve_frameworks(&parsed_files, framework)?;
        Ok(Self {
            sources,
            frameworks,
        })
    }

    /// Builds a project from in-memory sources. Every source must be valid Rust.
    pub fn from_sources<P: AsRef<Path>>(
        sources: &[(P, &str)],
        framework: Option<Framework>,
    ) -> Result<Self> {
        let mut owned = Vec::new();
        let mut parsed_files = Vec::new();
        for (path, content) in sources {
            parsed_files.push(AstParser::parse_source(path.as_ref(), content)?);
            owned.push((path.as_ref().to_path_buf(), content.to_string()));
        }

        let frameworks = resolve_frameworks(&parsed_files, framework)?;
        Ok(Self {
            sources: owned,
            frameworks,
        })
    }

    /// Frameworks whose extractors run over this project
    pub fn frameworks(&self) -> &[Framework] {
        &self.frameworks
    }

    pub fn file_count(&self) -> usize {
        self.sources.len()
    }

    fn parse(&self) -> Vec<ParsedFile> {
        self.sources
            .iter()
            .filter_map(|(path, content)| match AstParser::parse_source(path, content) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!("Skipping file: {}", e);
                    None
                }
            })
            .collect()
    }

    fn extractors(&self) -> Vec<(Framework, Box<dyn RouteExtractor>)> {
        self.frameworks
            .iter()
            .map(|framework| {
                let extractor: Box<dyn RouteExtractor> = match framework {
                    Framework::Axum => Box::new(AxumExtractor),
                    Framework::ActixWeb => Box::new(ActixExtractor),
                };
                (*framework, extractor)
            })
            .collect()
    }
}

fn resolve_frameworks(
    parsed_files: &[ParsedFile],
    framework: Option<Framework>,
) -> Result<Vec<Framework>> {
    if let Some(framework) = framework {
        info!("Using user-specified framework: {}", framework);
        return Ok(vec![framework]);
    }

    let detection = FrameworkDetector::detect(parsed_files);
    if detection.frameworks.is_empty() {
        return Err(Error::FrameworkNotDetected);
    }
    info!("Detected frameworks: {:?}", detection.frameworks);
    Ok(detection.frameworks)
}

impl RouteSource for SourceProject {
    fn routes(&self) -> Vec<RouteEntry> {
        let parsed_files = self.parse();
        let mut entries = Vec::new();

        for (framework, extractor) in self.extractors() {
            let routes = extractor.extract_routes(&parsed_files);
            debug!("Extracted {} routes for {}", routes.len(), framework);

            entries.extend(routes.into_iter().map(|route| {
                let handler = HandlerDoc {
                    name: route.handler_name,
                    doc: route.doc,
                };
                RouteEntry::new(route.path, vec![route.method], handler)
            }));
        }

        entries
    }
}

impl ExceptionHandlerSource for SourceProject {
    fn exception_handlers(&self) -> Vec<ExceptionHandlerEntry> {
        let parsed_files = self.parse();
        let mut entries = Vec::new();

        for (framework, extractor) in self.extractors() {
            let handlers = extractor.extract_exception_handlers(&parsed_files);
            debug!("Extracted {} exception handlers for {}", handlers.len(), framework);

            entries.extend(handlers.into_iter().map(|handler| ExceptionHandlerEntry {
                key: HandlerKey::Status(handler.status_code),
                handler: HandlerDoc {
                    name: handler.handler_name,
                    doc: handler.doc,
                },
            }));
        }

        entries
    }
}
