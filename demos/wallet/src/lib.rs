//! A toy wallet. `wallet_server` serves every exported function in here.

pub mod keys;
#[doc(hidden)]
pub mod testutil;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    EmptyAccount,
    InsufficientFunds { balance: u64, requested: u64 },
    InvalidAmount(String),
    Encode(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::EmptyAccount => write!(f, "account name is empty"),
            WalletError::InsufficientFunds { balance, requested } => {
                write!(f, "insufficient funds: balance {balance}, requested {requested}")
            }
            WalletError::InvalidAmount(text) => write!(f, "invalid amount `{text}`"),
            WalletError::Encode(msg) => write!(f, "encode failed: {msg}"),
        }
    }
}

impl std::error::Error for WalletError {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub owner: String,
    pub balance: u64,
}

impl Wallet {
    pub fn new(owner: String) -> Wallet {
        Wallet { owner, balance: 0 }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn deposit(&mut self, amount: u64) -> u64 {
        self.balance += amount;
        self.balance
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from: Wallet,
    pub to: Wallet,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    pub from: Wallet,
    pub to: Wallet,
}

pub fn ping() {}

/// Balance of a well-known account; unknown accounts hold nothing.
pub fn get_balance(account: &str) -> u64 {
    match account {
        "main" => 42,
        "savings" => 1_000,
        _ => 0,
    }
}

/// Total of `values`, labelled.
pub fn sum(label: String, values: impl IntoIterator<Item = u64>) -> (String, u64) {
    (label, values.into_iter().sum())
}

pub fn validate_account(account: &str) -> Result<(), WalletError> {
    if account.trim().is_empty() {
        return Err(WalletError::EmptyAccount);
    }
    Ok(())
}

pub fn withdraw(wallet: Wallet, amount: u64) -> Result<Wallet, WalletError> {
    if amount > wallet.balance {
        return Err(WalletError::InsufficientFunds {
            balance: wallet.balance,
            requested: amount,
        });
    }
    Ok(Wallet {
        balance: wallet.balance - amount,
        ..wallet
    })
}

pub fn transfer(request: TransferRequest) -> Result<TransferResponse, WalletError> {
    let TransferRequest {
        mut from,
        mut to,
        amount,
    } = request;
    from = withdraw(from, amount)?;
    to.deposit(amount);
    Ok(TransferResponse { from, to })
}

/// `"10 sat"` -> `(10, "sat")`; a bare number is in `sat`.
pub fn parse_amount(text: &str) -> Result<(u64, String), WalletError> {
    let mut parts = text.split_whitespace();
    let value = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| WalletError::InvalidAmount(text.to_string()))?;
    let unit = parts.next().unwrap_or("sat").to_string();
    Ok((value, unit))
}

pub fn label(r#type: String, name: Option<String>) -> String {
    match name {
        Some(name) => format!("{}:{}", r#type, name),
        None => r#type,
    }
}

/// Node status, already encoded as JSON.
pub fn raw_json() -> String {
    r#"{"network":"regtest","height":101}"#.to_string()
}

pub fn export_json(wallet: &Wallet) -> Result<String, WalletError> {
    serde_json::to_string(wallet).map_err(|e| WalletError::Encode(e.to_string()))
}

pub fn init() {}

pub fn shutdown() {}

pub async fn sync_remote() {}

#[allow(dead_code)]
fn checksum(data: &[u8]) -> u32 {
    data.iter().fold(0u32, |acc, b| acc.rotate_left(5) ^ u32::from(*b))
}
