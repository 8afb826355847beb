use anyhow::{bail, Result};
use log::{debug, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Directory names never descended into, on top of hidden directories.
const DEFAULT_EXCLUDES: &[&str] = &["target"];

/// Collects the Rust source files of a web project.
///
/// Walks the project directory recursively and skips build output (`target`), hidden
/// directories (those starting with `.`) and any extra directory names passed to
/// [`FileScanner::exclude`]. Files come back sorted so that documents built from them are
/// stable between runs.
///
/// # Example
///
/// ```no_run
/// use swagger_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-api")).exclude("benches");
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    excludes: Vec<String>,
}

/// Result of a project scan.
pub struct ScanResult {
    /// Sorted paths of all discovered `.rs` files
    pub rust_files: Vec<PathBuf>,
    /// Entries that could not be read; the scan continues past them
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Also skip directories with this name (e.g. `benches`, `vendor`).
    pub fn exclude(mut self, dir_name: impl Into<String>) -> Self {
        self.excludes.push(dir_name.into());
        self
    }

    /// Scans the directory tree and collects all `.rs` files.
    ///
    /// Inaccessible entries are logged and recorded in [`ScanResult::warnings`].
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not an existing directory.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.is_dir() {
            bail!(
                "Project path is not a directory: {}",
                self.root_path.display()
            );
        }

        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.depth() == 0 {
                    return true;
                }
                if !e.file_type().is_dir() {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let skip = file_name.starts_with('.')
                    || self.excludes.iter().any(|name| *name == file_name);
                if skip {
                    debug!("Skipping directory: {}", e.path().display());
                }
                !skip
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_file()
                        && path.extension().and_then(|s| s.to_str()) == Some("rs")
                    {
                        rust_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        rust_files.sort();
        debug!(
            "Scanned {}: {} Rust files",
            self.root_path.display(),
            rust_files.len()
        );

        Ok(ScanResult {
            rust_files,
            warnings,
        })
    }
}
