use crate::error::{Error, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Parses Rust source files into `syn` syntax trees for the route extractors.
///
/// # Example
///
/// ```no_run
/// use swagger_from_source::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/main.rs")).unwrap();
/// println!("Parsed {} items", parsed.syntax_tree.items.len());
/// ```
pub struct AstParser;

/// A successfully parsed Rust file with its abstract syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

/// Outcome of parsing a batch of files.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub files: Vec<ParsedFile>,
    /// Files that could not be read or parsed, with the reason
    pub failures: Vec<(PathBuf, String)>,
}

impl AstParser {
    /// Reads and parses a single Rust source file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IoError`] when the file cannot be read and [`Error::ParseError`] when
    /// it is not valid Rust.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse_source(path, &content)
    }

    /// Parses in-memory source text as if it were read from `path`.
    pub fn parse_source(path: &Path, content: &str) -> Result<ParsedFile> {
        let syntax_tree = syn::parse_file(content).map_err(|e| Error::ParseError {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(ParsedFile {
            path: path.to_path_buf(),
            syntax_tree,
        })
    }

    /// Parses multiple Rust source files, continuing past the ones that fail.
    ///
    /// A project with a few broken files still gets documentation for the rest; failures are
    /// logged as warnings and reported in [`ParseOutcome::failures`].
    pub fn parse_files(paths: &[PathBuf]) -> ParseOutcome {
        debug!("Parsing {} files", paths.len());

        let mut outcome = ParseOutcome::default();
        for path in paths {
            match Self::parse_file(path) {
                Ok(parsed) => outcome.files.push(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    outcome.failures.push((path.clone(), e.to_string()));
                }
            }
        }

        debug!(
            "Parsing complete: {} succeeded, {} failed",
            outcome.files.len(),
            outcome.failures.len()
        );

        outcome
    }
}
