#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

fn printer() -> TypePrinter {
    TypePrinter::new("lib")
}

fn print_in(src: &str, scope: &Scope) -> String {
    let ty: syn::Type = syn::parse_str(src).unwrap();
    printer().print_syn(&ty, scope)
}

fn print_root(src: &str) -> String {
    print_in(src, &Scope::default())
}

fn results_of(src: &str) -> Vec<String> {
    let item: syn::ItemFn = syn::parse_str(src).unwrap();
    let p = printer();
    p.lower_results(&item.sig.output, &Scope::default())
        .iter()
        .map(|r| p.print(r))
        .collect()
}

#[test]
fn test_builtin_scalars_print_unchanged() {
    for name in ["bool", "u8", "i64", "u128", "f32", "char", "str", "String", "usize"] {
        assert_eq!(print_root(name), name);
    }
}

#[test]
fn test_wire_suffixed_names_stay_unqualified() {
    assert_eq!(print_root("SendPaymentRequest"), "SendPaymentRequest");
    assert_eq!(print_root("ListUnspentResponse"), "ListUnspentResponse");
    // the suffix alone is an ordinary library type
    assert_eq!(print_root("Request"), "lib::Request");
}

#[test]
fn test_custom_wire_suffixes() {
    let p = TypePrinter::new("lib").with_wire_suffixes(["Msg"]);
    assert_eq!(p.print(&TypeSignature::ident("InvoiceMsg")), "InvoiceMsg");
    assert_eq!(p.print(&TypeSignature::ident("InvoiceRequest")), "lib::InvoiceRequest");
}

#[test]
fn test_bare_library_types_are_qualified() {
    assert_eq!(print_root("Wallet"), "lib::Wallet");
    assert_eq!(print_root("&Wallet"), "&lib::Wallet");
    assert_eq!(print_root("&mut Wallet"), "&mut lib::Wallet");
}

#[test]
fn test_bare_types_in_submodules_use_the_module_path() {
    let scope = Scope::new(vec!["keys".to_string()]);
    assert_eq!(print_in("KeyPair", &scope), "lib::keys::KeyPair");
    assert_eq!(print_in("u32", &scope), "u32");
    assert_eq!(print_in("SignRequest", &scope), "SignRequest");
}

#[test]
fn test_qualified_selectors() {
    assert_eq!(print_root("bitcoin::Txid"), "bitcoin::Txid");
    assert_eq!(print_root("crate::keys::KeyPair"), "lib::keys::KeyPair");
    assert_eq!(print_root("lib::Wallet"), "lib::Wallet");
    assert_eq!(print_root("std::path::Path"), "std::path::Path");
    assert_eq!(print_root("std::string::String"), "String");
}

#[test]
fn test_self_and_super_paths_resolve_to_the_crate() {
    let scope = Scope::new(vec!["wallet".to_string(), "coins".to_string()]);
    assert_eq!(print_in("self::Coin", &scope), "lib::wallet::coins::Coin");
    assert_eq!(print_in("super::Wallet", &scope), "lib::wallet::Wallet");
}

#[test]
fn test_slices_and_vectors() {
    assert_eq!(print_root("Vec<u8>"), "Vec<u8>");
    assert_eq!(print_root("&[u8]"), "&Vec<u8>");
    assert_eq!(print_root("Vec<Vec<Wallet>>"), "Vec<Vec<lib::Wallet>>");
}

#[test]
fn test_mappings() {
    assert_eq!(
        print_root("HashMap<String, u64>"),
        "std::collections::HashMap<String, u64>"
    );
    assert_eq!(
        print_root("std::collections::BTreeMap<String, Vec<Wallet>>"),
        "std::collections::BTreeMap<String, Vec<lib::Wallet>>"
    );
}

#[test]
fn test_optional() {
    assert_eq!(print_root("Option<String>"), "Option<String>");
    assert_eq!(print_root("Option<Wallet>"), "Option<lib::Wallet>");
}

#[test]
fn test_dynamic_interface() {
    assert_eq!(print_root("serde_json::Value"), "Value");
    assert_eq!(print_root("Value"), "Value");
    assert_eq!(print_root("Box<dyn std::any::Any>"), "Value");
    assert_eq!(print_root("&dyn Signer"), "&Value");
}

#[test]
fn test_unsupported_shapes_fall_back_to_dynamic() {
    assert_eq!(print_root("[u8; 32]"), "Value");
    assert_eq!(print_root("fn(u8) -> u8"), "Value");
    assert_eq!(print_root("(u8, u8)"), "Value");
    assert_eq!(print_root("Arc<Wallet>"), "Value");
    assert_eq!(print_root("<Wallet as Trait>::Output"), "Value");
}

#[test]
fn test_repeated_prints_as_slice() {
    let ty: syn::Type = syn::parse_str("impl IntoIterator<Item = u64>").unwrap();
    let lowered = printer().lower(&ty, &Scope::default());
    assert_eq!(
        lowered,
        TypeSignature::repeated(TypeSignature::ident("u64"))
    );
    assert_eq!(printer().print(&lowered), "Vec<u64>");
    assert_eq!(
        print_root("impl Iterator<Item = Wallet>"),
        "Vec<lib::Wallet>"
    );
    assert_eq!(print_root("impl Fn(u8)"), "Value");
}

#[test]
fn test_self_resolves_to_the_impl_type() {
    let scope = Scope::default().with_self(TypeSignature::ident("Wallet"));
    assert_eq!(print_in("Self", &scope), "lib::Wallet");
    assert_eq!(print_in("&mut Self", &scope), "&mut lib::Wallet");
    assert_eq!(print_root("Self"), "Value");
}

#[test]
fn test_imports_qualify_bare_names() {
    let file: syn::File = syn::parse_str(
        r#"
        use bitcoin::{Txid, Amount as Sats};
        use crate::keys::KeyPair;
        use super::fees;
        use serde_json::Value;
        use std::collections::HashMap;
        "#,
    )
    .unwrap();
    let scope = Scope::for_items(vec!["wallet".to_string()], &file.items);
    assert_eq!(print_in("Txid", &scope), "bitcoin::Txid");
    assert_eq!(print_in("Sats", &scope), "bitcoin::Amount");
    assert_eq!(print_in("KeyPair", &scope), "lib::keys::KeyPair");
    assert_eq!(print_in("fees::FeeRate", &scope), "lib::fees::FeeRate");
    assert_eq!(print_in("Value", &scope), "Value");
    assert_eq!(
        print_in("HashMap<String, Txid>", &scope),
        "std::collections::HashMap<String, bitcoin::Txid>"
    );
}

#[test]
fn test_storage_types_are_owned() {
    let p = printer();
    let storage = |src: &str| {
        let ty: syn::Type = syn::parse_str(src).unwrap();
        p.storage(&p.lower(&ty, &Scope::default()))
    };
    assert_eq!(storage("&str"), "String");
    assert_eq!(storage("&mut String"), "String");
    assert_eq!(storage("&[u8]"), "Vec<u8>");
    assert_eq!(storage("&Wallet"), "lib::Wallet");
    assert_eq!(storage("&std::path::Path"), "std::path::PathBuf");
    assert_eq!(storage("u64"), "u64");
    assert_eq!(storage("impl IntoIterator<Item = u64>"), "Vec<u64>");
}

#[test]
fn test_results_lowering() {
    assert!(results_of("fn f() {}").is_empty());
    assert!(results_of("fn f() -> () {}").is_empty());
    assert_eq!(results_of("fn f() -> u64 {}"), ["u64"]);
    assert_eq!(results_of("fn f() -> (u64, String) {}"), ["u64", "String"]);
    assert_eq!(results_of("fn f() -> Result<(), Error> {}"), ["error"]);
    assert_eq!(results_of("fn f() -> Result<Wallet, Error> {}"), ["lib::Wallet", "error"]);
    assert_eq!(results_of("fn f() -> anyhow::Result<u64> {}"), ["u64", "error"]);
    assert_eq!(results_of("fn f() -> std::fmt::Result {}"), ["error"]);
    assert_eq!(
        results_of("fn f() -> Result<(u64, u64), Error> {}"),
        ["u64", "u64", "error"]
    );
    // only the outermost Result is a fallible return
    assert_eq!(
        results_of("fn f() -> Option<Result<u8, Error>> {}"),
        ["Option<Value>"]
    );
}
