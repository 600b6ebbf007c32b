//! # Declaration Collector
//!
//! Walks a library package's source files and produces the ordered,
//! de-duplicated list of [`CallSignature`]s that the emitters turn into routes.
//!
//! ## Visitation
//!
//! ```text
//! Package::locate ─▶ Package::load ─┬─ module tree (lib.rs + pub mod files)
//!                                   └─ fallback: root file, then every
//!                                      *.rs under src/ not behind a private mod
//!                       │
//!                       ▼
//!     for file in files (skip excluded file names)
//!       for item in file (declaration order)
//!         fn            ─▶ policy ─▶ signature
//!         impl Type {}  ─▶ policy ─▶ signature (receiver iff `self`)
//!         pub mod m {}  ─▶ recurse with module path + m
//! ```
//!
//! Both loading branches yield the same kind of file list, so visitation is
//! identical whichever one ran. The first declaration of a name wins; later
//! declarations with the same name are dropped.
//!
//! Beyond the [`ExclusionPolicy`], only plainly callable functions qualify:
//! `async`, `unsafe` and `extern` functions, functions with type or const
//! generics, `impl Trait` arguments other than the iterator forms, trait
//! impls, generic impls and `#[cfg(test)]` items are skipped.

mod package;

pub use package::{is_crate_ident, CollectError, LoadMode, Package, SourceFile};

use std::collections::HashSet;
use std::path::Path;
use syn::ext::IdentExt;
use tracing::{debug, info};

use crate::policy::{Eligibility, ExclusionPolicy};
use crate::printer::{repeated_item, Scope, TypePrinter};
use crate::signature::{CallSignature, Parameter, TypeSignature};
use package::is_cfg_test;

/// Collects call signatures under one policy and printer configuration.
#[derive(Debug, Clone)]
pub struct Collector<'a> {
    policy: &'a ExclusionPolicy,
    printer: &'a TypePrinter,
}

/// Running state of one collection pass.
#[derive(Default)]
struct Accumulator {
    seen: HashSet<String>,
    signatures: Vec<CallSignature>,
}

impl Accumulator {
    fn push(&mut self, signature: CallSignature) {
        if self.seen.insert(signature.name.clone()) {
            debug!(name = %signature.name, "collected");
            self.signatures.push(signature);
        } else {
            debug!(name = %signature.name, "duplicate name, keeping first declaration");
        }
    }
}

impl<'a> Collector<'a> {
    pub fn new(policy: &'a ExclusionPolicy, printer: &'a TypePrinter) -> Self {
        Collector { policy, printer }
    }

    /// Locate, load and collect a package in one step.
    pub fn collect_path(
        &self,
        locator: &Path,
        crate_name: Option<&str>,
    ) -> Result<(Package, Vec<CallSignature>), CollectError> {
        let package = Package::locate(locator, crate_name)?;
        let signatures = self.collect(&package)?;
        Ok((package, signatures))
    }

    pub fn collect(&self, package: &Package) -> Result<Vec<CallSignature>, CollectError> {
        let (mode, files) = package.load()?;
        let signatures = self.collect_files(&files);
        info!(
            package = %package.crate_ident,
            ?mode,
            files = files.len(),
            signatures = signatures.len(),
            "collected declarations"
        );
        Ok(signatures)
    }

    /// Visit already-parsed files in order.
    pub fn collect_files(&self, files: &[SourceFile]) -> Vec<CallSignature> {
        let mut acc = Accumulator::default();
        for file in files {
            if self.policy.excludes_file(file.file_name()) {
                debug!(file = %file.path.display(), "excluded file");
                continue;
            }
            self.visit_items(&file.syntax.items, file.module.clone(), &mut acc);
        }
        acc.signatures
    }

    fn visit_items(&self, items: &[syn::Item], module: Vec<String>, acc: &mut Accumulator) {
        let scope = Scope::for_items(module, items);
        for item in items {
            match item {
                syn::Item::Fn(item_fn) => {
                    if is_cfg_test(&item_fn.attrs) {
                        continue;
                    }
                    let public = matches!(item_fn.vis, syn::Visibility::Public(_));
                    if let Some(signature) = self.function(&item_fn.sig, public, &scope, None) {
                        acc.push(signature);
                    }
                }
                syn::Item::Impl(item_impl) => self.visit_impl(item_impl, &scope, acc),
                syn::Item::Mod(item_mod) => {
                    let Some((_, content)) = &item_mod.content else {
                        continue;
                    };
                    if !matches!(item_mod.vis, syn::Visibility::Public(_))
                        || is_cfg_test(&item_mod.attrs)
                    {
                        continue;
                    }
                    let mut nested = scope.module().to_vec();
                    nested.push(item_mod.ident.to_string());
                    self.visit_items(content, nested, acc);
                }
                _ => {}
            }
        }
    }

    fn visit_impl(&self, item_impl: &syn::ItemImpl, scope: &Scope, acc: &mut Accumulator) {
        if item_impl.trait_.is_some()
            || has_type_generics(&item_impl.generics)
            || is_cfg_test(&item_impl.attrs)
        {
            return;
        }
        let self_ty = self.printer.lower(&item_impl.self_ty, scope);
        if self_ty == TypeSignature::DynamicInterface {
            return;
        }
        let scope = scope.with_self(self_ty.clone());
        for impl_item in &item_impl.items {
            let syn::ImplItem::Fn(method) = impl_item else {
                continue;
            };
            if is_cfg_test(&method.attrs) {
                continue;
            }
            let public = matches!(method.vis, syn::Visibility::Public(_));
            if let Some(signature) = self.function(&method.sig, public, &scope, Some(&self_ty)) {
                acc.push(signature);
            }
        }
    }

    /// Build the signature of one declaration, or `None` if it is not eligible.
    fn function(
        &self,
        sig: &syn::Signature,
        public: bool,
        scope: &Scope,
        self_ty: Option<&TypeSignature>,
    ) -> Option<CallSignature> {
        let name = sig.ident.unraw().to_string();
        let eligibility = self.policy.check(&name, public);
        if eligibility != Eligibility::Eligible {
            debug!(%name, reason = %eligibility, "skipped");
            return None;
        }
        if let Some(reason) = not_callable(sig) {
            debug!(%name, reason, "skipped");
            return None;
        }

        let mut signature = CallSignature::new(name);
        signature.module = scope.module().to_vec();
        for (index, input) in sig.inputs.iter().enumerate() {
            match input {
                syn::FnArg::Receiver(receiver) => {
                    let self_ty = self_ty?.clone();
                    signature.receiver = Some(if receiver.reference.is_some() {
                        TypeSignature::pointer(self_ty, receiver.mutability.is_some())
                    } else {
                        self_ty
                    });
                }
                syn::FnArg::Typed(pat_type) => {
                    let param_name = match pat_type.pat.as_ref() {
                        syn::Pat::Ident(pat_ident) => pat_ident.ident.unraw().to_string(),
                        _ => format!("arg{index}"),
                    };
                    let ty = self.printer.lower(&pat_type.ty, scope);
                    signature.parameters.push(Parameter::new(param_name, ty));
                }
            }
        }
        if signature.receiver.is_none() {
            signature.owner = self_ty.cloned();
        }
        signature.results = self.printer.lower_results(&sig.output, scope);
        Some(signature)
    }
}

fn has_type_generics(generics: &syn::Generics) -> bool {
    generics
        .params
        .iter()
        .any(|param| !matches!(param, syn::GenericParam::Lifetime(_)))
}

fn not_callable(sig: &syn::Signature) -> Option<&'static str> {
    if sig.asyncness.is_some() {
        Some("async")
    } else if sig.unsafety.is_some() {
        Some("unsafe")
    } else if sig.abi.is_some() {
        Some("extern abi")
    } else if has_type_generics(&sig.generics) {
        Some("generic")
    } else if sig.variadic.is_some() {
        Some("c variadic")
    } else if has_opaque_argument(sig) {
        Some("impl trait argument")
    } else {
        None
    }
}

/// Argument-position `impl Trait` is an anonymous type parameter. Only a bare
/// `impl IntoIterator<Item = T>` or `impl Iterator<Item = T>` can be fed from
/// a decoded `Vec<T>`.
fn has_opaque_argument(sig: &syn::Signature) -> bool {
    sig.inputs.iter().any(|input| match input {
        syn::FnArg::Typed(pat_type) => match pat_type.ty.as_ref() {
            syn::Type::ImplTrait(impl_trait) => repeated_item(&impl_trait.bounds).is_none(),
            ty => contains_impl_trait(ty),
        },
        syn::FnArg::Receiver(_) => false,
    })
}

fn contains_impl_trait(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::ImplTrait(_) => true,
        syn::Type::Reference(reference) => contains_impl_trait(&reference.elem),
        syn::Type::Slice(slice) => contains_impl_trait(&slice.elem),
        syn::Type::Array(array) => contains_impl_trait(&array.elem),
        syn::Type::Paren(paren) => contains_impl_trait(&paren.elem),
        syn::Type::Group(group) => contains_impl_trait(&group.elem),
        syn::Type::Tuple(tuple) => tuple.elems.iter().any(contains_impl_trait),
        syn::Type::Path(type_path) => type_path.path.segments.iter().any(|segment| {
            let syn::PathArguments::AngleBracketed(angle) = &segment.arguments else {
                return false;
            };
            angle.args.iter().any(|arg| match arg {
                syn::GenericArgument::Type(ty) => contains_impl_trait(ty),
                _ => false,
            })
        }),
        _ => false,
    }
}
