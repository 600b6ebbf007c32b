use quote::ToTokens;
use std::collections::BTreeMap;
use syn::{GenericArgument, PathArguments, ReturnType, Type, TypeParamBound, UseTree};
use tracing::debug;

use super::TypePrinter;
use crate::signature::{is_builtin_scalar, TypeSignature, DYNAMIC_MARKER};

/// Name resolution context of one source file (or inline module).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    module: Vec<String>,
    imports: BTreeMap<String, Vec<String>>,
    self_ty: Option<TypeSignature>,
}

impl Scope {
    pub fn new(module: Vec<String>) -> Self {
        Scope {
            module,
            ..Scope::default()
        }
    }

    /// Scope of a module body: its path plus every `use` item it contains.
    pub fn for_items(module: Vec<String>, items: &[syn::Item]) -> Self {
        let mut scope = Scope::new(module);
        for item in items {
            if let syn::Item::Use(item_use) = item {
                scope.collect_use(&item_use.tree, &mut Vec::new());
            }
        }
        scope
    }

    /// The same scope with `Self` bound, for items of an `impl` block.
    pub fn with_self(&self, self_ty: TypeSignature) -> Self {
        Scope {
            self_ty: Some(self_ty),
            ..self.clone()
        }
    }

    pub fn module(&self) -> &[String] {
        &self.module
    }

    pub fn self_ty(&self) -> Option<&TypeSignature> {
        self.self_ty.as_ref()
    }

    /// Absolute path a bare name was imported from, if any.
    pub fn import(&self, name: &str) -> Option<&[String]> {
        self.imports.get(name).map(Vec::as_slice)
    }

    fn collect_use(&mut self, tree: &UseTree, prefix: &mut Vec<String>) {
        match tree {
            UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.collect_use(&path.tree, prefix);
                prefix.pop();
            }
            UseTree::Name(name) => {
                let ident = name.ident.to_string();
                if ident == "self" {
                    if let Some(last) = prefix.last().cloned() {
                        let full = self.absolutize(prefix);
                        self.imports.insert(last, full);
                    }
                } else {
                    let mut full = prefix.clone();
                    full.push(ident.clone());
                    let full = self.absolutize(&full);
                    self.imports.insert(ident, full);
                }
            }
            UseTree::Rename(rename) => {
                let mut full = prefix.clone();
                full.push(rename.ident.to_string());
                let full = self.absolutize(&full);
                self.imports.insert(rename.rename.to_string(), full);
            }
            UseTree::Group(group) => {
                for item in &group.items {
                    self.collect_use(item, prefix);
                }
            }
            UseTree::Glob(_) => {}
        }
    }

    /// Rewrite `self::`/`super::` prefixes into `crate::` paths.
    fn absolutize(&self, path: &[String]) -> Vec<String> {
        let mut segments = path.iter().peekable();
        let mut base = match segments.peek().map(|s| s.as_str()) {
            Some("self") => {
                segments.next();
                self.module.clone()
            }
            Some("super") => self.module.clone(),
            _ => return path.to_vec(),
        };
        while segments.peek().map(|s| s.as_str()) == Some("super") {
            segments.next();
            base.pop();
        }
        std::iter::once("crate".to_string())
            .chain(base)
            .chain(segments.cloned())
            .collect()
    }
}

fn type_args(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(angle) => angle
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `Item = T` of an `impl IntoIterator<Item = T>` / `impl Iterator<Item = T>` bound.
pub(crate) fn repeated_item(
    bounds: &syn::punctuated::Punctuated<TypeParamBound, syn::Token![+]>,
) -> Option<&Type> {
    bounds.iter().find_map(|bound| {
        let TypeParamBound::Trait(trait_bound) = bound else {
            return None;
        };
        let segment = trait_bound.path.segments.last()?;
        if segment.ident != "IntoIterator" && segment.ident != "Iterator" {
            return None;
        }
        let PathArguments::AngleBracketed(angle) = &segment.arguments else {
            return None;
        };
        angle.args.iter().find_map(|arg| match arg {
            GenericArgument::AssocType(assoc) if assoc.ident == "Item" => Some(&assoc.ty),
            _ => None,
        })
    })
}

impl TypePrinter {
    /// Lower a syntax node into a [`TypeSignature`].
    ///
    /// Total: anything the model has no shape for becomes
    /// [`TypeSignature::DynamicInterface`].
    pub fn lower(&self, ty: &Type, scope: &Scope) -> TypeSignature {
        match ty {
            Type::Path(type_path) if type_path.qself.is_none() => {
                let segments: Vec<_> = type_path.path.segments.iter().collect();
                let Some(last) = segments.last() else {
                    return TypeSignature::DynamicInterface;
                };
                if !last.arguments.is_none() {
                    return self.lower_generic(&last.ident.to_string(), &last.arguments, scope);
                }
                let mut names: Vec<String> =
                    segments.iter().map(|s| s.ident.to_string()).collect();
                if type_path.path.leading_colon.is_some() {
                    self.lower_path(&names)
                } else if names.len() == 1 {
                    self.lower_bare(&names[0], scope)
                } else {
                    let expanded: Vec<String> = match scope.import(&names[0]) {
                        Some(import) => {
                            import.iter().cloned().chain(names.drain(1..)).collect()
                        }
                        None => scope.absolutize(&names),
                    };
                    self.lower_path(&expanded)
                }
            }
            Type::Reference(reference) => TypeSignature::pointer(
                self.lower(&reference.elem, scope),
                reference.mutability.is_some(),
            ),
            Type::Slice(slice) => TypeSignature::slice(self.lower(&slice.elem, scope)),
            Type::ImplTrait(impl_trait) => match repeated_item(&impl_trait.bounds) {
                Some(item) => TypeSignature::repeated(self.lower(item, scope)),
                None => TypeSignature::DynamicInterface,
            },
            Type::Paren(paren) => self.lower(&paren.elem, scope),
            Type::Group(group) => self.lower(&group.elem, scope),
            Type::TraitObject(_) => TypeSignature::DynamicInterface,
            other => {
                debug!(ty = %other.to_token_stream(), "unsupported type shape, using dynamic");
                TypeSignature::DynamicInterface
            }
        }
    }

    /// Lower a return type into its ordered result list.
    ///
    /// `()` and a missing return yield no results, tuples yield one result per
    /// element, and `Result<T, E>` yields the results of `T` followed by the
    /// error marker.
    pub fn lower_results(&self, output: &ReturnType, scope: &Scope) -> Vec<TypeSignature> {
        match output {
            ReturnType::Default => Vec::new(),
            ReturnType::Type(_, ty) => self.lower_result_type(ty, scope, true),
        }
    }

    fn lower_result_type(&self, ty: &Type, scope: &Scope, outermost: bool) -> Vec<TypeSignature> {
        match ty {
            Type::Paren(paren) => self.lower_result_type(&paren.elem, scope, outermost),
            Type::Group(group) => self.lower_result_type(&group.elem, scope, outermost),
            Type::Tuple(tuple) => tuple.elems.iter().map(|e| self.lower(e, scope)).collect(),
            Type::Path(type_path) if outermost && type_path.qself.is_none() => {
                match type_path.path.segments.last() {
                    Some(last) if last.ident == "Result" => {
                        let mut results = type_args(&last.arguments)
                            .first()
                            .map(|ok| self.lower_result_type(ok, scope, false))
                            .unwrap_or_default();
                        results.push(TypeSignature::error());
                        results
                    }
                    _ => vec![self.lower(ty, scope)],
                }
            }
            other => vec![self.lower(other, scope)],
        }
    }

    fn lower_bare(&self, name: &str, scope: &Scope) -> TypeSignature {
        if name == "Self" {
            return scope
                .self_ty()
                .cloned()
                .unwrap_or(TypeSignature::DynamicInterface);
        }
        if name == DYNAMIC_MARKER {
            match scope.import(name) {
                None => return TypeSignature::DynamicInterface,
                Some(path) => return self.lower_path(path),
            }
        }
        if is_builtin_scalar(name) {
            return TypeSignature::ident(name);
        }
        if let Some(path) = scope.import(name) {
            return self.lower_path(path);
        }
        if self.is_wire_type(name) || scope.module().is_empty() {
            return TypeSignature::ident(name);
        }
        TypeSignature::qualified(format!("crate::{}", scope.module().join("::")), name)
    }

    fn lower_path(&self, path: &[String]) -> TypeSignature {
        let Some((name, package)) = path.split_last() else {
            return TypeSignature::DynamicInterface;
        };
        let package: Vec<&str> = package.iter().map(String::as_str).collect();
        if package.is_empty() {
            return TypeSignature::ident(name.as_str());
        }
        if package == ["serde_json"] && name == DYNAMIC_MARKER {
            return TypeSignature::DynamicInterface;
        }
        if matches!(package[0], "std" | "core" | "alloc") && is_builtin_scalar(name) {
            return TypeSignature::ident(name.as_str());
        }
        TypeSignature::qualified(package.join("::"), name.as_str())
    }

    fn lower_generic(&self, name: &str, arguments: &PathArguments, scope: &Scope) -> TypeSignature {
        let args = type_args(arguments);
        match (name, args.as_slice()) {
            ("Vec", [element]) => TypeSignature::slice(self.lower(element, scope)),
            ("Option", [inner]) => TypeSignature::optional(self.lower(inner, scope)),
            ("HashMap", [key, value]) => {
                TypeSignature::mapping(self.lower(key, scope), self.lower(value, scope), false)
            }
            ("BTreeMap", [key, value]) => {
                TypeSignature::mapping(self.lower(key, scope), self.lower(value, scope), true)
            }
            _ => {
                debug!(%name, "unsupported generic type, using dynamic");
                TypeSignature::DynamicInterface
            }
        }
    }
}
