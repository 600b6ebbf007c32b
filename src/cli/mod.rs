//! # CLI Module
//!
//! Command-line front end of the generator, shipped as the `sigroute-gen`
//! binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Collect a library's exported functions and write the server module:
//!
//! ```bash
//! sigroute-gen generate --package demos/wallet --output demos/wallet_server/src/main.rs --format
//! ```
//!
//! Options:
//! - `--package <DIR>` - Crate directory (or bare source directory) to wrap (required)
//! - `--output <FILE>` - Output file (default: `<crate>_server/src/main.rs`)
//! - `--config <FILE>` - Generator config (default: `sigroute.toml` in the package)
//! - `--alias <NAME>` - Local alias of the wrapped library
//! - `--dry-run` - Print the module on stdout instead of writing it
//! - `--format` - Run rustfmt over the written file
//!
//! ### `inspect`
//!
//! List the collected signatures and how each one is mapped:
//!
//! ```bash
//! sigroute-gen inspect --package demos/wallet --json
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use clap::Parser;
//! use sigroute::cli::{run, Cli};
//!
//! let cli = Cli::parse();
//! run(&cli, &mut std::io::stdout())?;
//! ```

mod commands;


pub use commands::{inspect_package, run, run_cli, Cli, Commands, InspectEntry};
