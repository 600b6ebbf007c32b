//! Fixtures shared by tests. Excluded from generation in `sigroute.toml`.

use crate::Wallet;

pub fn funded_wallet(owner: &str, balance: u64) -> Wallet {
    Wallet {
        owner: owner.to_string(),
        balance,
    }
}
