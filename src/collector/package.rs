use anyhow::Context;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Fatal collection failures.
///
/// Anything below the package level (a broken module file, an unresolvable
/// `mod` declaration) is recovered from; these are the cases where there is
/// no package to collect from at all.
#[derive(Debug)]
pub enum CollectError {
    /// The locator does not point at a directory
    PackageNotFound { path: PathBuf },
    /// `Cargo.toml` exists but cannot be read or parsed
    Manifest { path: PathBuf, message: String },
    /// Neither `<package>/src` nor the package directory holds Rust sources
    NoSourceDirectory { path: PathBuf },
    /// The source directory could not be listed
    Unreadable { path: PathBuf, message: String },
    /// The crate name does not form a Rust identifier
    InvalidCrateName { name: String },
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectError::PackageNotFound { path } => {
                write!(f, "package not found: {}", path.display())
            }
            CollectError::Manifest { path, message } => {
                write!(f, "invalid manifest {}: {}", path.display(), message)
            }
            CollectError::NoSourceDirectory { path } => {
                write!(f, "no source directory in package {}", path.display())
            }
            CollectError::Unreadable { path, message } => {
                write!(f, "cannot read source directory {}: {}", path.display(), message)
            }
            CollectError::InvalidCrateName { name } => {
                write!(f, "crate name `{name}` is not a valid Rust identifier")
            }
        }
    }
}

impl std::error::Error for CollectError {}

/// How a package's files were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Followed the module tree from the crate root
    ModuleTree,
    /// Parsed every source file in the source directory
    Directory,
}

/// One parsed source file and the module it defines.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub module: Vec<String>,
    pub syntax: syn::File,
}

impl SourceFile {
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// A located library package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub dir: PathBuf,
    pub src_dir: PathBuf,
    pub root_file: PathBuf,
    /// Crate identifier used in `use ::<crate_ident> as <alias>;`
    pub crate_ident: String,
}

#[derive(serde::Deserialize, Default)]
struct Manifest {
    package: Option<ManifestPackage>,
    lib: Option<ManifestLib>,
}

#[derive(serde::Deserialize)]
struct ManifestPackage {
    name: String,
}

#[derive(serde::Deserialize)]
struct ManifestLib {
    name: Option<String>,
    path: Option<PathBuf>,
}

impl Package {
    /// Resolve a package locator.
    ///
    /// A directory holding `Cargo.toml` is a crate: its name comes from
    /// `[lib].name` or `[package].name` and its root from `[lib].path` or
    /// `src/lib.rs`. Any other directory is a bare source tree whose crate name
    /// must be supplied (falling back to the directory name).
    pub fn locate(path: &Path, crate_name: Option<&str>) -> Result<Package, CollectError> {
        if !path.is_dir() {
            return Err(CollectError::PackageNotFound {
                path: path.to_path_buf(),
            });
        }
        let manifest_path = path.join("Cargo.toml");
        let manifest = if manifest_path.is_file() {
            let contents =
                fs::read_to_string(&manifest_path).map_err(|e| CollectError::Manifest {
                    path: manifest_path.clone(),
                    message: e.to_string(),
                })?;
            Some(
                toml::from_str::<Manifest>(&contents).map_err(|e| CollectError::Manifest {
                    path: manifest_path.clone(),
                    message: e.to_string(),
                })?,
            )
        } else {
            None
        };

        let src_dir = if path.join("src").is_dir() {
            path.join("src")
        } else if manifest.is_none() {
            path.to_path_buf()
        } else {
            return Err(CollectError::NoSourceDirectory {
                path: path.to_path_buf(),
            });
        };

        let manifest = manifest.unwrap_or_default();
        let root_file = manifest
            .lib
            .as_ref()
            .and_then(|lib| lib.path.as_ref())
            .map(|p| path.join(p))
            .unwrap_or_else(|| src_dir.join("lib.rs"));
        let name = crate_name
            .map(str::to_string)
            .or_else(|| manifest.lib.and_then(|lib| lib.name))
            .or_else(|| manifest.package.map(|p| p.name))
            .map(|name| name.replace('-', "_"))
            .unwrap_or_else(|| directory_ident(path));
        if !is_crate_ident(&name) {
            return Err(CollectError::InvalidCrateName { name });
        }

        Ok(Package {
            dir: path.to_path_buf(),
            src_dir,
            root_file,
            crate_ident: name,
        })
    }

    /// Load every source file of the package, in visitation order.
    ///
    /// The module tree is tried first. If any part of it cannot be loaded the
    /// whole source directory is parsed file by file instead, skipping files
    /// that do not parse or that the module tree could not reach.
    pub fn load(&self) -> Result<(LoadMode, Vec<SourceFile>), CollectError> {
        match self.load_module_tree() {
            Ok(files) => Ok((LoadMode::ModuleTree, files)),
            Err(err) => {
                warn!(
                    package = %self.dir.display(),
                    error = %format!("{err:#}"),
                    "module tree unavailable, parsing source directory"
                );
                self.load_directory().map(|files| (LoadMode::Directory, files))
            }
        }
    }

    fn load_module_tree(&self) -> anyhow::Result<Vec<SourceFile>> {
        let mut files = Vec::new();
        let child_dir = self
            .root_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.src_dir.clone());
        load_module_file(&self.root_file, &child_dir, Vec::new(), &mut files)?;
        Ok(files)
    }

    /// Parse every source file under the source directory.
    ///
    /// The crate root comes first and the rest follow in file-name order.
    /// Files under a module that a parsed parent declares without `pub`, and
    /// `main.rs` next to a library root, are left out as the module tree would.
    fn load_directory(&self) -> Result<Vec<SourceFile>, CollectError> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.src_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(entry.depth() == 1 && entry.file_name() == "bin"));
        for entry in walker {
            let entry = entry.map_err(|e| CollectError::Unreadable {
                path: self.src_dir.clone(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "rs") {
                continue;
            }
            match parse_file(path) {
                Ok(syntax) => files.push(SourceFile {
                    path: path.to_path_buf(),
                    module: module_path_for(&self.src_dir, path),
                    syntax,
                }),
                Err(err) => warn!(
                    file = %path.display(),
                    error = %format!("{err:#}"),
                    "skipping unparsable file"
                ),
            }
        }

        if self.root_file.is_file() {
            files.retain(|file| !file.module.is_empty() || file.path == self.root_file);
        }
        let hidden: HashSet<Vec<String>> = files.iter().flat_map(private_children).collect();
        files.retain(|file| {
            let reachable = !(1..=file.module.len()).any(|len| hidden.contains(&file.module[..len]));
            if !reachable {
                debug!(file = %file.path.display(), "module is private, skipping");
            }
            reachable
        });
        // stable: the root moves to the front, the rest keep file-name order
        files.sort_by_key(|file| file.path != self.root_file);
        Ok(files)
    }
}

/// Module paths of the out-of-line `mod name;` declarations a file keeps
/// private, including `#[cfg(test)]` ones.
fn private_children(file: &SourceFile) -> Vec<Vec<String>> {
    file.syntax
        .items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Mod(item_mod)
                if item_mod.content.is_none()
                    && (!matches!(item_mod.vis, syn::Visibility::Public(_))
                        || is_cfg_test(&item_mod.attrs)) =>
            {
                let mut module = file.module.clone();
                module.push(item_mod.ident.to_string());
                Some(module)
            }
            _ => None,
        })
        .collect()
}

/// Whether `name` can follow `use ::` in generated code.
pub fn is_crate_ident(name: &str) -> bool {
    !name.starts_with("r#") && syn::parse_str::<syn::Ident>(name).is_ok()
}

/// Crate name for a bare source tree, derived from its directory name.
fn directory_ident(path: &Path) -> String {
    let stem = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("library");
    let mut ident: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if !ident.starts_with(|c: char| c.is_ascii_alphabetic()) {
        ident.insert_str(0, "lib_");
    }
    ident
}

fn parse_file(path: &Path) -> anyhow::Result<syn::File> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    syn::parse_file(&source).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Module path of a file relative to the source directory.
pub(crate) fn module_path_for(src_dir: &Path, path: &Path) -> Vec<String> {
    let relative = path.strip_prefix(src_dir).unwrap_or(path);
    let mut module: Vec<String> = relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .map(str::to_string)
        .collect();
    if let Some(last) = module.pop() {
        let stem = last.strip_suffix(".rs").unwrap_or(&last);
        if !matches!(stem, "lib" | "main" | "mod") {
            module.push(stem.to_string());
        }
    }
    module
}

pub(crate) fn is_cfg_test(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| match &attr.meta {
        syn::Meta::List(list) => list.path.is_ident("cfg") && list.tokens.to_string() == "test",
        _ => false,
    })
}

/// Parse one module file, then recurse into its `pub mod name;` children.
fn load_module_file(
    path: &Path,
    child_dir: &Path,
    module: Vec<String>,
    files: &mut Vec<SourceFile>,
) -> anyhow::Result<()> {
    let syntax = parse_file(path)?;
    let children: Vec<String> = syntax
        .items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Mod(item_mod)
                if item_mod.content.is_none()
                    && matches!(item_mod.vis, syn::Visibility::Public(_))
                    && !is_cfg_test(&item_mod.attrs) =>
            {
                Some(item_mod.ident.to_string())
            }
            _ => None,
        })
        .collect();
    debug!(file = %path.display(), module = %module.join("::"), "loaded module");
    files.push(SourceFile {
        path: path.to_path_buf(),
        module: module.clone(),
        syntax,
    });

    for child in children {
        let flat = child_dir.join(format!("{child}.rs"));
        let nested = child_dir.join(&child).join("mod.rs");
        let (child_path, grandchild_dir) = if flat.is_file() {
            (flat, child_dir.join(&child))
        } else if nested.is_file() {
            (nested, child_dir.join(&child))
        } else {
            anyhow::bail!(
                "module `{}` declared in {} has no file",
                child,
                path.display()
            );
        };
        let mut child_module = module.clone();
        child_module.push(child);
        load_module_file(&child_path, &grandchild_dir, child_module, files)?;
    }
    Ok(())
}
