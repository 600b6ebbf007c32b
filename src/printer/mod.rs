//! # Type Printer
//!
//! Converts type expressions into canonical Rust text.
//!
//! Printing is a two step affair:
//!
//! ```text
//! syn::Type ──lower()──▶ TypeSignature ──print()──▶ "lib::keys::KeyPair"
//! ```
//!
//! [`TypePrinter::lower`] resolves a syntax node against the [`Scope`] of the
//! file it was declared in (imports, module path, `Self`). [`TypePrinter::print`]
//! is a pure, total function over [`TypeSignature`].
//!
//! ## Qualification rules
//!
//! | Shape                          | Printed as                          |
//! |--------------------------------|-------------------------------------|
//! | built-in scalar (`u64`, `str`) | unchanged                           |
//! | wire-format name (`*Request`)  | unchanged                           |
//! | other bare name `Foo`          | `<alias>::Foo`                      |
//! | `&T` / `&mut T`                | `&T` / `&mut T`                     |
//! | `pkg::Name`                    | `pkg::Name`                         |
//! | `crate::m::Name`               | `<alias>::m::Name`                  |
//! | `Vec<T>` / `[T]`               | `Vec<T>`                            |
//! | `HashMap<K, V>`                | `std::collections::HashMap<K, V>`   |
//! | `BTreeMap<K, V>`               | `std::collections::BTreeMap<K, V>`  |
//! | `Option<T>`                    | `Option<T>`                         |
//! | dynamic / unsupported          | `Value`                             |
//! | `impl IntoIterator<Item = T>`  | `Vec<T>`                            |

mod lower;

pub use lower::Scope;
pub(crate) use lower::repeated_item;

use crate::signature::{is_builtin_scalar, TypeSignature, DYNAMIC_MARKER};

/// Default suffixes of generated wire-format type names left unqualified.
pub const DEFAULT_WIRE_SUFFIXES: &[&str] = &["Request", "Response"];

/// Prints type signatures relative to the wrapped library's local alias.
#[derive(Debug, Clone)]
pub struct TypePrinter {
    alias: String,
    wire_suffixes: Vec<String>,
}

impl TypePrinter {
    pub fn new(alias: impl Into<String>) -> Self {
        TypePrinter {
            alias: alias.into(),
            wire_suffixes: DEFAULT_WIRE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_wire_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wire_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// True if `name` looks like a generated wire-format type.
    pub fn is_wire_type(&self, name: &str) -> bool {
        self.wire_suffixes
            .iter()
            .any(|suffix| name.len() > suffix.len() && name.ends_with(suffix.as_str()))
    }

    /// Canonical text of a type signature.
    pub fn print(&self, ty: &TypeSignature) -> String {
        match ty {
            TypeSignature::Identifier(name) => {
                if is_builtin_scalar(name) || self.is_wire_type(name) {
                    name.clone()
                } else {
                    format!("{}::{}", self.alias, name)
                }
            }
            TypeSignature::Pointer { mutable, inner } => {
                let marker = if *mutable { "&mut " } else { "&" };
                format!("{marker}{}", self.print(inner))
            }
            TypeSignature::QualifiedSelector { package, name } => {
                format!("{}::{}", self.requalify(package), name)
            }
            TypeSignature::Slice(element) | TypeSignature::Repeated(element) => {
                format!("Vec<{}>", self.print(element))
            }
            TypeSignature::Mapping {
                ordered,
                key,
                value,
            } => {
                let map = if *ordered { "BTreeMap" } else { "HashMap" };
                format!(
                    "std::collections::{map}<{}, {}>",
                    self.print(key),
                    self.print(value)
                )
            }
            TypeSignature::Optional(inner) => format!("Option<{}>", self.print(inner)),
            TypeSignature::DynamicInterface => DYNAMIC_MARKER.to_string(),
        }
    }

    /// Owned form used for a decode-record field.
    ///
    /// References decode into their owned referent (`&str` -> `String`,
    /// `&[T]` -> `Vec<T>`, `&Path` -> `PathBuf`); everything else decodes as
    /// printed.
    pub fn storage(&self, ty: &TypeSignature) -> String {
        match ty {
            TypeSignature::Pointer { inner, .. } => match inner.as_ref() {
                TypeSignature::Identifier(name) if name == "str" => "String".to_string(),
                TypeSignature::QualifiedSelector { package, name }
                    if name == "Path" && package == "std::path" =>
                {
                    "std::path::PathBuf".to_string()
                }
                other => self.storage(other),
            },
            other => self.print(other),
        }
    }

    /// Print a syntax node directly.
    pub fn print_syn(&self, ty: &syn::Type, scope: &Scope) -> String {
        self.print(&self.lower(ty, scope))
    }

    fn requalify(&self, package: &str) -> String {
        let mut segments = package.split("::");
        match segments.next() {
            Some(first) if first == "crate" || first == self.alias => {
                std::iter::once(self.alias.as_str())
                    .chain(segments)
                    .collect::<Vec<_>>()
                    .join("::")
            }
            _ => package.to_string(),
        }
    }
}

#[cfg(test)]
mod tests;
