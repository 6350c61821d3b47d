//! Repo-local architectural lint for enforcing hexagonal boundaries.
//!
//! The healthcore crate keeps its hexagon at the Rust module level: `domain`
//! owns entities, services and ports, `outbound` holds the repository
//! adapters, and `config` plus the binary form the composition root. The
//! lint parses every file under `backend/src/domain` and
//! `backend/src/outbound` and rejects:
//!
//! - `domain` imports of `outbound` or `config`
//! - `outbound` imports of `config`
//! - either layer naming a composition-root crate (settings loading, CLI
//!   parsing, report handlers, subscriber setup)
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;
use thiserror::Error;

/// Name under which integration tests and binaries import the library.
const CRATE_NAME: &str = "healthcore";

/// Crates reserved for the composition root.
const COMPOSITION_CRATES: &[&str] = &["clap", "color_eyre", "ortho_config", "tracing_subscriber"];

/// Top-level modules of the library that a path may resolve into.
const CRATE_MODULES: &[&str] = &["config", "domain", "outbound"];

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `backend/src`.
    pub file: PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),
    /// Rust source parsing failed, or the file sits outside a known layer.
    #[error("cannot lint {}: {message}", file.display())]
    Parse { file: PathBuf, message: String },
    /// One or more boundary violations were found.
    #[error("architecture boundary violations:\n{}", render(.0))]
    Violations(Vec<Violation>),
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("- {violation}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`.
    pub file: PathBuf,
    pub contents: String,
}

/// Hexagon layer owning a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Outbound,
}

impl Layer {
    const ALL: [Self; 2] = [Self::Domain, Self::Outbound];

    const fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Outbound => "outbound",
        }
    }

    fn owning(relative_path: &Path) -> Option<Self> {
        let top = relative_path.components().next()?.as_os_str();
        Self::ALL.into_iter().find(|layer| top == layer.dir())
    }

    /// Library modules this layer must not reach into.
    const fn sealed_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["config", "outbound"],
            Self::Outbound => &["config"],
        }
    }
}

/// Where an imported path leads.
#[derive(Debug, PartialEq, Eq)]
enum Target<'a> {
    Module(&'a str),
    Crate(&'a str),
}

fn target_of(segments: &[String]) -> Option<Target<'_>> {
    let first = segments.first()?.as_str();
    if CRATE_MODULES.contains(&first) {
        return Some(Target::Module(first));
    }
    match first {
        "crate" | "self" | "super" => segments
            .iter()
            .map(String::as_str)
            .find(|segment| !matches!(*segment, "crate" | "self" | "super"))
            .map(Target::Module),
        CRATE_NAME => segments.get(1).map(|segment| Target::Module(segment.as_str())),
        _ => Some(Target::Crate(first)),
    }
}

fn check(file: &Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let mut imports = ImportCollector::default();
    imports.visit_file(parsed);

    let layer_name = layer.dir();
    let messages: BTreeSet<String> = imports
        .paths
        .iter()
        .filter_map(|segments| match target_of(segments)? {
            Target::Module(module) if layer.sealed_modules().contains(&module) => Some(format!(
                "{layer_name} module must not depend on crate::{module}"
            )),
            Target::Crate(name) if COMPOSITION_CRATES.contains(&name) => Some(format!(
                "{layer_name} module must not depend on external crate `{name}`"
            )),
            _ => None,
        })
        .collect();

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

/// Every path mentioned in a file, split into segments.
#[derive(Default)]
struct ImportCollector {
    paths: BTreeSet<Vec<String>>,
}

impl ImportCollector {
    fn collect_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.collect_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.collect_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for ImportCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.collect_tree(&node.tree, Vec::new());
    }
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let unlintable = |message: String| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message,
        };
        let layer = Layer::owning(&source.file)
            .ok_or_else(|| unlintable("file is outside the domain and outbound layers".to_owned()))?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| unlintable(err.to_string()))?;
        violations.extend(check(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// Lint the backend crate sources on disk.
///
/// `backend_dir` must be the `backend/` directory at the repository root.
pub fn lint_backend_sources(backend_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = backend_dir.join("src");
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let dir = src_dir.join(layer.dir());
        if dir.is_dir() {
            read_sources(&src_dir, &dir, &mut sources)?;
        }
    }
    lint_sources(&sources)
}

fn read_sources(
    src_dir: &Path,
    dir: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            read_sources(src_dir, &path, sources)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            let file = path
                .strip_prefix(src_dir)
                .map_err(|err| ArchitectureLintError::Parse {
                    file: path.clone(),
                    message: err.to_string(),
                })?
                .to_path_buf();
            let contents = fs::read_to_string(&path)?;
            sources.push(LintSource { file, contents });
        }
    }
    Ok(())
}
