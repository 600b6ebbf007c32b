use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::collector::Collector;
use crate::config::{load_or_default, GeneratorConfig};
use crate::generator::{generate_module, GenerateOptions, ResultMapping};
use crate::logging::init_logging;

/// Command-line interface for the handler generator
#[derive(Parser, Debug)]
#[command(name = "sigroute-gen")]
#[command(about = "Generate JSON-over-HTTP handlers from a library's exported functions", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the server module for a library
    Generate {
        /// Crate directory (with Cargo.toml) or bare source directory to wrap
        #[arg(short, long)]
        package: PathBuf,

        /// Output file (default: <crate>_server/src/main.rs)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to the generator config (sigroute.toml)
        /// If not provided, will auto-detect inside the package directory
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Local alias of the wrapped library inside the generated module
        #[arg(long)]
        alias: Option<String>,

        /// Print the generated module on stdout instead of writing it
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Run rustfmt over the written file
        #[arg(long, default_value_t = false)]
        format: bool,
    },
    /// List the signatures a library exposes, without writing anything
    Inspect {
        /// Crate directory (with Cargo.toml) or bare source directory to wrap
        #[arg(short, long)]
        package: PathBuf,

        /// Path to the generator config (sigroute.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Emit JSON instead of one line per signature
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// One collected signature as reported by `inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectEntry {
    pub name: String,
    pub route: String,
    /// Declaring module, `::`-joined (empty for the crate root)
    pub module: String,
    pub receiver: Option<String>,
    /// `name: type` pairs in declaration order
    pub parameters: Vec<String>,
    pub results: Vec<String>,
    pub mapping: &'static str,
}

/// Parse the process arguments, set up logging and run.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}

/// Execute one parsed command, writing user-facing output to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Generate {
            package,
            output,
            config,
            alias,
            dry_run,
            format,
        } => {
            let mut generator_config = load_or_default(config.as_deref(), package)?;
            if let Some(alias) = alias {
                generator_config.alias = alias.clone();
            }
            let options = GenerateOptions {
                package: package.clone(),
                output: output.clone(),
                config: generator_config,
                dry_run: *dry_run,
                format: *format,
            };
            let report = generate_module(&options)?;
            match &report.output {
                None => out.write_all(report.rendered.as_bytes())?,
                Some(path) => writeln!(
                    out,
                    "Generated {} route(s) for `{}` in {}",
                    report.routes.len(),
                    report.crate_ident,
                    path.display()
                )?,
            }
            Ok(())
        }
        Commands::Inspect {
            package,
            config,
            json,
        } => {
            let generator_config = load_or_default(config.as_deref(), package)?;
            let entries = inspect_package(package, &generator_config)?;
            if *json {
                let text = serde_json::to_string_pretty(&entries)
                    .context("Failed to serialize inspect output")?;
                writeln!(out, "{text}")?;
            } else if entries.is_empty() {
                writeln!(out, "No eligible functions found")?;
            } else {
                for entry in &entries {
                    writeln!(out, "{}", describe(entry))?;
                }
            }
            Ok(())
        }
    }
}

/// Collect `package` and describe each signature with its result mapping.
pub fn inspect_package(
    package: &Path,
    config: &GeneratorConfig,
) -> anyhow::Result<Vec<InspectEntry>> {
    config.validate()?;
    let printer = config.printer();
    let collector = Collector::new(config.policy(), &printer);
    let (_, signatures) = collector
        .collect_path(package, config.crate_name.as_deref())
        .with_context(|| format!("Failed to collect {}", package.display()))?;

    Ok(signatures
        .iter()
        .map(|sig| InspectEntry {
            name: sig.name.clone(),
            route: sig.route(),
            module: sig.module.join("::"),
            receiver: sig.receiver.as_ref().map(|r| printer.print(r)),
            parameters: sig
                .parameters
                .iter()
                .map(|p| format!("{}: {}", p.name, printer.print(&p.ty)))
                .collect(),
            results: sig.results.iter().map(|r| printer.print(r)).collect(),
            mapping: ResultMapping::decide(sig, config.is_preformatted(&sig.name)).kind(),
        })
        .collect())
}

fn describe(entry: &InspectEntry) -> String {
    let mut params = Vec::with_capacity(entry.parameters.len() + 1);
    if let Some(receiver) = &entry.receiver {
        params.push(format!("self: {receiver}"));
    }
    params.extend(entry.parameters.iter().cloned());
    let results = match entry.results.as_slice() {
        [] => String::new(),
        [single] => format!(" -> {single}"),
        many => format!(" -> ({})", many.join(", ")),
    };
    format!(
        "{:<32} {}({}){} [{}]",
        entry.route,
        entry.name,
        params.join(", "),
        results,
        entry.mapping
    )
}
