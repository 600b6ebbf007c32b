//! # sigroute
//!
//! **sigroute** turns the exported functions of a Rust library into a
//! JSON-over-HTTP service. It reads the library's source, records the call
//! shape of every eligible function, and writes one server module in which
//! each function is reachable as `POST /api/<name>`.
//!
//! ## Architecture
//!
//! - **[`signature`]** - The call-shape model shared by every stage
//! - **[`policy`]** - Which declarations are exposed
//! - **[`printer`]** - Lowering of `syn` types into signatures and printing them back as Rust text
//! - **[`collector`]** - Package loading and declaration collection
//! - **[`generator`]** - Handler and entry-point emission, plus the driver that writes the module
//! - **[`runtime`]** - What generated servers link against: the envelope, routing and the HTTP server
//! - **[`config`]** - `sigroute.toml` generator settings
//! - **[`cli`]** - The `sigroute-gen` binary
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(sigroute-gen)
//!     participant Collector as collector::Collector
//!     participant Printer as printer::TypePrinter
//!     participant Emitter as generator
//!     participant FS as File System
//!
//!     User->>CLI: sigroute-gen generate --package demos/wallet
//!     CLI->>Collector: collect_path(package)
//!     Collector->>Collector: locate crate, parse module tree<br/>(flat fallback on parse failure)
//!     Collector->>Printer: lower(param / result types)
//!     Printer-->>Collector: TypeSignature
//!     Collector-->>CLI: Vec<CallSignature>
//!     CLI->>Emitter: plan handlers, render templates
//!     Emitter->>FS: write main.rs (temp file + rename)
//!     Emitter-->>User: routes, output path
//! ```
//!
//! ### Request Flow in a Generated Server
//!
//! ```text
//! POST /api/get_balance {"account": "main"}
//!   └─▶ RouteTable (exact path match, 404 otherwise)
//!         └─▶ handle_get_balance
//!               ├─ 405 unless POST
//!               ├─ read body, decode Args        (400 on failure)
//!               ├─ lib::get_balance(args.account)
//!               └─ map results into the envelope (500 on a returned error)
//!   ◀── {"code":200,"data":42,"error":"","success":true}
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! sigroute-gen inspect --package demos/wallet
//! sigroute-gen generate --package demos/wallet \
//!     --output demos/wallet_server/src/main.rs --format
//! cargo run -p wallet_server
//! curl -X POST localhost:8080/api/get_balance -d '{"account":"main"}'
//! ```
//!
//! ## Environment Variables
//!
//! Generated servers read:
//!
//! - `SIGROUTE_ADDR` - Listen address (overrides the generated default)
//! - `SIGROUTE_STACK_SIZE` - Coroutine stack size, decimal or `0x` hex (default `0x8000`)
//! - `SIGROUTE_LOG_LEVEL`, `SIGROUTE_LOG_FORMAT`, `SIGROUTE_LOG_TARGET_FILTER` - see [`logging`]

pub mod cli;
pub mod collector;
pub mod config;
pub mod generator;
pub mod logging;
pub mod policy;
pub mod printer;
pub mod runtime;
pub mod runtime_config;
pub mod signature;

pub use collector::{CollectError, Collector, Package};
pub use config::GeneratorConfig;
pub use generator::{generate_module, GenerateOptions, GenerationReport};
pub use policy::{Eligibility, ExclusionPolicy, ExportRule};
pub use printer::TypePrinter;
pub use signature::{CallSignature, Parameter, TypeSignature};
