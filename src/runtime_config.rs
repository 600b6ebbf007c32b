//! # Runtime Configuration
//!
//! Environment based settings read by generated servers at startup.
//!
//! ### `SIGROUTE_ADDR`
//!
//! Listen address, overriding the `DEFAULT_ADDR` baked into the generated
//! module (e.g. `127.0.0.1:9000`).
//!
//! ### `SIGROUTE_STACK_SIZE`
//!
//! Coroutine stack size in bytes, decimal (`32768`) or hexadecimal
//! (`0x8000`). Default: `0x8000` (32 KB). Each connection runs on its own
//! coroutine, so memory use is roughly stack size times open connections.
//! Wrapped functions with deep call chains may need more.
//!
//! ```bash
//! SIGROUTE_ADDR=127.0.0.1:9000 SIGROUTE_STACK_SIZE=0x10000 ./wallet_server
//! ```

use std::env;

/// Default coroutine stack size (32 KB).
pub const DEFAULT_STACK_SIZE: usize = 0x8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
    /// Listen address override
    pub addr: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            stack_size: DEFAULT_STACK_SIZE,
            addr: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let stack_size = lookup("SIGROUTE_STACK_SIZE")
            .and_then(|val| parse_size(&val))
            .unwrap_or(DEFAULT_STACK_SIZE);
        let addr = lookup("SIGROUTE_ADDR").filter(|addr| !addr.trim().is_empty());
        RuntimeConfig { stack_size, addr }
    }

    /// The address to bind: the override if set, else `default_addr`.
    pub fn bind_addr<'a>(&'a self, default_addr: &'a str) -> &'a str {
        self.addr.as_deref().unwrap_or(default_addr)
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    let size = match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok()?,
        None => val.parse().ok()?,
    };
    (size > 0).then_some(size)
}
