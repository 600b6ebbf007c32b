//! # Generator
//!
//! Turns a wrapped library's call signatures into one server module.
//!
//! ## Architecture
//!
//! ```text
//! Collector ──▶ Vec<CallSignature> ──▶ HandlerPlan (per signature)
//!                                          │   decode record, call expression,
//!                                          │   ResultMapping
//!                                          ▼
//!                                  handler.rs.txt (askama) ──┐
//!                                  RouteEntry (per plan) ────┴─▶ main.rs.txt
//!                                                                   │
//!                                              temp file + rename ◀─┘
//! ```
//!
//! Every decision is made on the plan; the templates only print. Rendering
//! is a pure function of the signatures and the [`GeneratorConfig`], so two
//! runs against an unchanged package produce byte-identical output.
//!
//! ## Generated module
//!
//! ```text
//! // @generated header listing every route
//! use ::<crate> as <alias>;
//! use sigroute::runtime::{...};
//! const DEFAULT_ADDR: &str = "...";
//! fn handle_<name>(method: &str, body: &mut dyn Read) -> Reply { ... }   // one per signature
//! pub const ROUTES: &[Route] = &[ ... ];
//! fn main() -> runtime::Result<()> { ... runtime::serve(DEFAULT_ADDR, ROUTES) }
//! ```
//!
//! The handler protocol: reject non-POST with 405, read the body (400 on
//! failure), decode the argument record (400 with the decode error), invoke,
//! then map results per [`ResultMapping`].

mod entry;
mod format;
mod handler;
mod templates;

pub use entry::{route_entries, to_snake_case, RouteEntry};
pub use format::format_file;
pub use handler::{capitalize, rust_ident, DecodeField, HandlerPlan, ResultMapping};
pub use templates::{HandlerTemplateData, MainRsTemplateData};

use anyhow::Context;
use askama::Template;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::collector::{is_crate_ident, Collector, Package};
use crate::config::GeneratorConfig;
use crate::signature::CallSignature;

/// Inputs of one generator run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Package locator: a crate directory or a bare source directory
    pub package: PathBuf,
    /// Output file; defaults to `<crate>_server/src/main.rs`
    pub output: Option<PathBuf>,
    pub config: GeneratorConfig,
    /// Render only; nothing is written
    pub dry_run: bool,
    /// Run rustfmt over the written file
    pub format: bool,
}

impl GenerateOptions {
    pub fn new(package: impl Into<PathBuf>) -> Self {
        GenerateOptions {
            package: package.into(),
            output: None,
            config: GeneratorConfig::default(),
            dry_run: false,
            format: false,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub crate_ident: String,
    /// Written file, `None` on a dry run
    pub output: Option<PathBuf>,
    /// Registered paths, in route table order
    pub routes: Vec<String>,
    /// The rendered module (before formatting)
    pub rendered: String,
}

/// Default output path for a wrapped crate.
pub fn default_output_path(crate_ident: &str) -> PathBuf {
    PathBuf::from(format!("{crate_ident}_server"))
        .join("src")
        .join("main.rs")
}

/// Collect, render and write.
///
/// Collection failures abort the run before anything is written, and the
/// output file is replaced atomically, so a failed run never leaves partial
/// output behind.
pub fn generate_module(options: &GenerateOptions) -> anyhow::Result<GenerationReport> {
    let config = &options.config;
    config.validate()?;
    let printer = config.printer();
    let collector = Collector::new(config.policy(), &printer);
    let (package, signatures) = collector
        .collect_path(&options.package, config.crate_name.as_deref())
        .with_context(|| format!("Failed to collect {}", options.package.display()))?;

    let plans = plan_handlers(&signatures, config);
    let rendered = render_plans(&package, &plans, config)?;
    let routes: Vec<String> = plans.iter().map(|p| p.route.clone()).collect();

    if options.dry_run {
        info!(routes = routes.len(), "dry run, nothing written");
        return Ok(GenerationReport {
            crate_ident: package.crate_ident,
            output: None,
            routes,
            rendered,
        });
    }

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&package.crate_ident));
    write_atomic(&output, &rendered)?;
    info!(output = %output.display(), routes = routes.len(), "generated server module");
    if options.format {
        format_file(&output)?;
    }

    Ok(GenerationReport {
        crate_ident: package.crate_ident,
        output: Some(output),
        routes,
        rendered,
    })
}

/// Plan one handler per signature, in collection order.
pub fn plan_handlers(signatures: &[CallSignature], config: &GeneratorConfig) -> Vec<HandlerPlan> {
    let printer = config.printer();
    let mut seen = HashSet::new();
    signatures
        .iter()
        .map(|signature| {
            let handler_ident = entry::unique_handler_name(&mut seen, &signature.name);
            HandlerPlan::build(
                signature,
                handler_ident,
                &printer,
                config.is_preformatted(&signature.name),
            )
        })
        .collect()
}

/// Render the server module for already-collected signatures.
pub fn render_module(
    package: &Package,
    signatures: &[CallSignature],
    config: &GeneratorConfig,
) -> anyhow::Result<String> {
    render_plans(package, &plan_handlers(signatures, config), config)
}

fn render_plans(
    package: &Package,
    plans: &[HandlerPlan],
    config: &GeneratorConfig,
) -> anyhow::Result<String> {
    if !is_crate_ident(&package.crate_ident) {
        anyhow::bail!(
            "crate name `{}` is not a valid Rust identifier",
            package.crate_ident
        );
    }
    let handlers = plans
        .iter()
        .map(|plan| {
            HandlerTemplateData::from(plan)
                .render()
                .map(|text| text.trim_end().to_string())
                .with_context(|| format!("Failed to render handler for {}", plan.name))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut rendered = MainRsTemplateData {
        version: env!("CARGO_PKG_VERSION"),
        crate_ident: package.crate_ident.clone(),
        alias: config.alias.clone(),
        bind_addr: format!("{:?}", config.bind_addr),
        handlers,
        routes: route_entries(plans),
    }
    .render()
    .context("Failed to render server module")?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
pub fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid output path {}", path.display()))?;
    let tmp = parent.join(format!(".{file_name}.{}.tmp", std::process::id()));
    fs::write(&tmp, contents).with_context(|| format!("Failed to write {}", tmp.display()))?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err).with_context(|| format!("Failed to replace {}", path.display()));
    }
    Ok(())
}
