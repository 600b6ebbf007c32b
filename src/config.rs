//! Generator configuration
//!
//! An optional `sigroute.toml` next to the wrapped library's `Cargo.toml`
//! tunes a generation run. Every key has a default, so an empty or missing
//! file behaves exactly like the built-in settings.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::collector::is_crate_ident;
use crate::policy::ExclusionPolicy;
use crate::printer::{TypePrinter, DEFAULT_WIRE_SUFFIXES};

/// File name looked up in the package directory.
pub const CONFIG_FILE_NAME: &str = "sigroute.toml";

/// Default local alias of the wrapped library inside the generated module.
pub const DEFAULT_ALIAS: &str = "lib";

/// Default listen address baked into generated servers.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Function names whose single result is already a wire payload.
pub const DEFAULT_PREFORMATTED: &[&str] = &["raw_json", "export_json"];

/// Settings loaded from `sigroute.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Local alias of the wrapped library (`use ::<crate> as <alias>;`)
    pub alias: String,
    /// Crate identifier of the wrapped library; read from `Cargo.toml` when unset
    pub crate_name: Option<String>,
    /// Default listen address of the generated server
    pub bind_addr: String,
    /// Suffixes of wire-format type names that are never qualified
    pub wire_suffixes: Vec<String>,
    /// Names whose result bypasses the envelope
    pub preformatted: Vec<String>,
    pub exclusions: ExclusionPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            alias: DEFAULT_ALIAS.to_string(),
            crate_name: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            wire_suffixes: DEFAULT_WIRE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            preformatted: DEFAULT_PREFORMATTED.iter().map(|s| s.to_string()).collect(),
            exclusions: ExclusionPolicy::default(),
        }
    }
}

impl GeneratorConfig {
    /// Printer configured with this alias and these wire suffixes.
    pub fn printer(&self) -> TypePrinter {
        TypePrinter::new(self.alias.clone()).with_wire_suffixes(self.wire_suffixes.clone())
    }

    pub fn policy(&self) -> &ExclusionPolicy {
        &self.exclusions
    }

    pub fn is_preformatted(&self, name: &str) -> bool {
        self.preformatted.iter().any(|p| p == name)
    }

    /// Check values that would produce an uncompilable module.
    pub fn validate(&self) -> anyhow::Result<()> {
        if syn::parse_str::<syn::Ident>(&self.alias).is_err() {
            anyhow::bail!("alias `{}` is not a valid Rust identifier", self.alias);
        }
        if let Some(name) = &self.crate_name {
            if !is_crate_ident(&name.replace('-', "_")) {
                anyhow::bail!("crate_name `{name}` is not a valid crate name");
            }
        }
        Ok(())
    }
}

/// Load a configuration file.
///
/// Returns `Ok(None)` if the file doesn't exist and `Err` if it exists but
/// cannot be read or parsed.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    let config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    Ok(Some(config))
}

/// `sigroute.toml` inside the package directory, if present.
pub fn auto_detect_config_path(package_dir: &Path) -> Option<PathBuf> {
    let config_path = package_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Resolve the config path
///
/// Priority:
/// 1. Explicitly provided path (via CLI)
/// 2. Auto-detected in the package directory
/// 3. None (defaults)
pub fn resolve_config_path(explicit_path: Option<&Path>, package_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    auto_detect_config_path(package_dir)
}

/// Resolve and load, falling back to defaults when no file is found.
///
/// An explicit path that does not exist is an error; a missing
/// auto-detected file is not.
pub fn load_or_default(
    explicit_path: Option<&Path>,
    package_dir: &Path,
) -> anyhow::Result<GeneratorConfig> {
    let Some(path) = resolve_config_path(explicit_path, package_dir) else {
        return Ok(GeneratorConfig::default());
    };
    match load_config(&path)? {
        Some(config) => {
            config.validate()?;
            tracing::debug!(config = %path.display(), "loaded generator config");
            Ok(config)
        }
        None => anyhow::bail!("config file not found: {}", path.display()),
    }
}
