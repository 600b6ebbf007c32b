// @generated by sigroute-gen 0.1.0-alpha.1 from the `wallet` crate. Do not edit.
//
// Routes:
//   POST /api/new -> lib::Wallet::new
//   POST /api/balance -> lib::Wallet::balance
//   POST /api/deposit -> lib::Wallet::deposit
//   POST /api/ping -> lib::ping
//   POST /api/get_balance -> lib::get_balance
//   POST /api/sum -> lib::sum
//   POST /api/validate_account -> lib::validate_account
//   POST /api/withdraw -> lib::withdraw
//   POST /api/transfer -> lib::transfer
//   POST /api/parse_amount -> lib::parse_amount
//   POST /api/label -> lib::label
//   POST /api/raw_json -> lib::raw_json
//   POST /api/export_json -> lib::export_json
//   POST /api/derive_key -> lib::keys::derive_key
//   POST /api/key_labels -> lib::keys::key_labels

use ::wallet as lib;
#[allow(unused_imports)]
use lib::*;
#[allow(unused_imports)]
use sigroute::runtime::{self, serde::Deserialize, Reply, Route, Value};
#[allow(unused_imports)]
use std::io::Read;

/// Listen address used unless `SIGROUTE_ADDR` is set.
const DEFAULT_ADDR: &str = "0.0.0.0:8080";

/// `POST /api/new` -> `lib::Wallet::new`
fn handle_new(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(rename = "owner", alias = "Owner")]
        owner: String,
    }
    let args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    let r0 = lib::Wallet::new(args.owner);
    Reply::indexed([runtime::encode(&r0)])
}

/// `POST /api/balance` -> `lib::Wallet::balance`
fn handle_balance(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(default)]
        #[serde(rename = "receiver")]
        receiver: lib::Wallet,
    }
    let args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    let r0 = args.receiver.balance();
    Reply::indexed([runtime::encode(&r0)])
}

/// `POST /api/deposit` -> `lib::Wallet::deposit`
fn handle_deposit(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(default)]
        #[serde(rename = "receiver")]
        receiver: lib::Wallet,
        #[serde(rename = "amount", alias = "Amount")]
        amount: u64,
    }
    let mut args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    let r0 = args.receiver.deposit(args.amount);
    Reply::indexed([runtime::encode(&r0)])
}

/// `POST /api/ping` -> `lib::ping`
fn handle_ping(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {}
    let _args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    lib::ping();
    Reply::empty()
}

/// `POST /api/get_balance` -> `lib::get_balance`
fn handle_get_balance(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(rename = "account", alias = "Account")]
        account: String,
    }
    let args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    let r0 = lib::get_balance(&args.account);
    Reply::indexed([runtime::encode(&r0)])
}

/// `POST /api/sum` -> `lib::sum`
fn handle_sum(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(rename = "label", alias = "Label")]
        label: String,
        #[serde(rename = "values", alias = "Values")]
        values: Vec<u64>,
    }
    let args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    let (r0, r1) = lib::sum(args.label, args.values.into_iter());
    Reply::indexed([runtime::encode(&r0), runtime::encode(&r1)])
}

/// `POST /api/validate_account` -> `lib::validate_account`
fn handle_validate_account(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(rename = "account", alias = "Account")]
        account: String,
    }
    let args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    match lib::validate_account(&args.account) {
        Ok(_) => Reply::empty(),
        Err(err) => Reply::failure(err),
    }
}

/// `POST /api/withdraw` -> `lib::withdraw`
fn handle_withdraw(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(rename = "wallet", alias = "Wallet")]
        wallet: lib::Wallet,
        #[serde(rename = "amount", alias = "Amount")]
        amount: u64,
    }
    let args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    match lib::withdraw(args.wallet, args.amount) {
        Ok(value) => Reply::data(&value),
        Err(err) => Reply::failure(err),
    }
}

/// `POST /api/transfer` -> `lib::transfer`
fn handle_transfer(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(rename = "request", alias = "Request")]
        request: TransferRequest,
    }
    let args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    match lib::transfer(args.request) {
        Ok(value) => Reply::data(&value),
        Err(err) => Reply::failure(err),
    }
}

/// `POST /api/parse_amount` -> `lib::parse_amount`
fn handle_parse_amount(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(rename = "text", alias = "Text")]
        text: String,
    }
    let args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    match lib::parse_amount(&args.text) {
        Ok((r0, r1)) => Reply::indexed([runtime::encode(&r0), runtime::encode(&r1)]),
        Err(err) => Reply::failure(err),
    }
}

/// `POST /api/label` -> `lib::label`
fn handle_label(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(rename = "type", alias = "Type")]
        r#type: String,
        #[serde(rename = "name", alias = "Name")]
        name: Option<String>,
    }
    let args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    let r0 = lib::label(args.r#type, args.name);
    Reply::indexed([runtime::encode(&r0)])
}

/// `POST /api/raw_json` -> `lib::raw_json`
fn handle_raw_json(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {}
    let _args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    Reply::preformatted(lib::raw_json())
}

/// `POST /api/export_json` -> `lib::export_json`
fn handle_export_json(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(rename = "wallet", alias = "Wallet")]
        wallet: lib::Wallet,
    }
    let args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    match lib::export_json(&args.wallet) {
        Ok(payload) => Reply::preformatted(payload),
        Err(err) => Reply::failure(err),
    }
}

/// `POST /api/derive_key` -> `lib::keys::derive_key`
fn handle_derive_key(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(rename = "seed", alias = "Seed")]
        seed: Vec<u8>,
        #[serde(rename = "index", alias = "Index")]
        index: u32,
    }
    let args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    let r0 = lib::keys::derive_key(&args.seed, args.index);
    Reply::indexed([runtime::encode(&r0)])
}

/// `POST /api/key_labels` -> `lib::keys::key_labels`
fn handle_key_labels(method: &str, body: &mut dyn Read) -> Reply {
    if method != "POST" {
        return Reply::method_not_allowed();
    }
    let bytes = match runtime::read_body(body) {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    #[derive(Deserialize)]
    #[serde(crate = "sigroute::runtime::serde")]
    struct Args {
        #[serde(rename = "keys", alias = "Keys")]
        keys: std::collections::BTreeMap<String, u32>,
    }
    let args: Args = match runtime::decode(&bytes) {
        Ok(args) => args,
        Err(reply) => return reply,
    };

    let r0 = lib::keys::key_labels(args.keys);
    Reply::indexed([runtime::encode(&r0)])
}

/// Route table, in collection order.
pub const ROUTES: &[Route] = &[
    Route::new("/api/new", handle_new),
    Route::new("/api/balance", handle_balance),
    Route::new("/api/deposit", handle_deposit),
    Route::new("/api/ping", handle_ping),
    Route::new("/api/get_balance", handle_get_balance),
    Route::new("/api/sum", handle_sum),
    Route::new("/api/validate_account", handle_validate_account),
    Route::new("/api/withdraw", handle_withdraw),
    Route::new("/api/transfer", handle_transfer),
    Route::new("/api/parse_amount", handle_parse_amount),
    Route::new("/api/label", handle_label),
    Route::new("/api/raw_json", handle_raw_json),
    Route::new("/api/export_json", handle_export_json),
    Route::new("/api/derive_key", handle_derive_key),
    Route::new("/api/key_labels", handle_key_labels),
];

fn main() -> runtime::Result<()> {
    runtime::init_logging()?;
    runtime::tracing::info!(
        count = ROUTES.len(),
        paths = %runtime::route_paths(ROUTES),
        "registered routes"
    );
    runtime::serve(DEFAULT_ADDR, ROUTES)
}
