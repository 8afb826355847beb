use crate::parser::ParsedFile;
use clap::ValueEnum;
use log::debug;
use std::collections::BTreeSet;
use std::fmt;
use syn::{visit::Visit, Item, UseTree};

/// Web frameworks whose routing code can be analyzed.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Framework {
    /// Axum framework
    Axum,
    /// Actix-Web framework
    #[value(name = "actix-web")]
    ActixWeb,
}

impl Framework {
    /// Crate name as it appears in `use` paths
    pub fn crate_name(&self) -> &'static str {
        match self {
            Framework::Axum => "axum",
            Framework::ActixWeb => "actix_web",
        }
    }

    fn from_crate_name(name: &str) -> Option<Framework> {
        match name {
            "axum" => Some(Framework::Axum),
            "actix_web" => Some(Framework::ActixWeb),
            _ => None,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Framework::Axum => f.write_str("axum"),
            Framework::ActixWeb => f.write_str("actix-web"),
        }
    }
}

/// Detects which web frameworks a project uses.
///
/// Looks at `use` items (`use axum::Router;`, `use actix_web as web;`) and at
/// fully-qualified attribute paths such as `#[actix_web::get("/")]` or
/// `#[actix_web::main]`, which projects often use without importing the crate.
pub struct FrameworkDetector;

/// Result of framework detection.
pub struct DetectionResult {
    /// Detected frameworks, in a stable order
    pub frameworks: Vec<Framework>,
}

impl FrameworkDetector {
    /// Detects web frameworks used in the provided parsed files.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swagger_from_source::detector::FrameworkDetector;
    /// use swagger_from_source::parser::AstParser;
    /// use std::path::Path;
    ///
    /// let parsed = AstParser::parse_file(Path::new("src/main.rs")).unwrap();
    /// let result = FrameworkDetector::detect(&[parsed]);
    /// println!("Detected {} framework(s)", result.frameworks.len());
    /// ```
    pub fn detect(parsed_files: &[ParsedFile]) -> DetectionResult {
        debug!("Detecting frameworks in {} files", parsed_files.len());

        let mut visitor = DetectVisitor::default();
        for parsed_file in parsed_files {
            for item in &parsed_file.syntax_tree.items {
                if let Item::Use(use_item) = item {
                    check_use_tree(&use_item.tree, &mut visitor.detected);
                }
            }
            visitor.visit_file(&parsed_file.syntax_tree);
        }

        let frameworks: Vec<Framework> = visitor.detected.into_iter().collect();
        debug!("Detected frameworks: {:?}", frameworks);

        DetectionResult { frameworks }
    }
}

/// Recursively check use tree for framework imports
fn check_use_tree(tree: &UseTree, detected: &mut BTreeSet<Framework>) {
    match tree {
        UseTree::Path(path) => {
            detected.extend(Framework::from_crate_name(&path.ident.to_string()));
            check_use_tree(&path.tree, detected);
        }
        UseTree::Group(group) => {
            for item in &group.items {
                check_use_tree(item, detected);
            }
        }
        UseTree::Rename(rename) => {
            detected.extend(Framework::from_crate_name(&rename.ident.to_string()));
        }
        UseTree::Name(name) => {
            detected.extend(Framework::from_crate_name(&name.ident.to_string()));
        }
        // Glob imports don't tell us the crate on their own
        UseTree::Glob(_) => {}
    }
}

#[derive(Default)]
struct DetectVisitor {
    detected: BTreeSet<Framework>,
}

impl<'ast> Visit<'ast> for DetectVisitor {
    fn visit_attribute(&mut self, node: &'ast syn::Attribute) {
        if let Some(first) = node.path().segments.first() {
            if node.path().segments.len() > 1 {
                self.detected
                    .extend(Framework::from_crate_name(&first.ident.to_string()));
            }
        }
        syn::visit::visit_attribute(self, node);
    }
}
