//! Handler planning: every decision a handler needs, made before any text is
//! rendered.

use tracing::warn;

use crate::printer::TypePrinter;
use crate::signature::{CallSignature, TypeSignature};

/// How an invocation's return values become the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultMapping {
    /// The single value already is the wire payload; a trailing error still
    /// maps to the failure envelope
    Preformatted { fallible: bool },
    /// No results: empty success envelope
    Empty,
    /// Error alone: empty success or failure
    ErrorOnly,
    /// Value and error: the value is `data` directly
    ValueOrError,
    /// Plain values mapped to `result0..result{arity-1}`; `fallible` when a
    /// trailing error follows two or more values
    Indexed { arity: usize, fallible: bool },
}

impl ResultMapping {
    /// Decide the mapping for a signature. Order matters: the preformatted
    /// names first, then the result count, then the trailing error.
    pub fn decide(signature: &CallSignature, preformatted: bool) -> ResultMapping {
        let results = &signature.results;
        let fallible = signature.has_trailing_error();
        let values = if fallible {
            results.len() - 1
        } else {
            results.len()
        };

        if preformatted {
            if values == 1 {
                return ResultMapping::Preformatted { fallible };
            }
            warn!(
                name = %signature.name,
                results = results.len(),
                "preformatted name does not return a single payload, using the envelope"
            );
        }

        match (values, fallible) {
            (0, false) => ResultMapping::Empty,
            (0, true) => ResultMapping::ErrorOnly,
            (1, true) => ResultMapping::ValueOrError,
            (arity, false) => ResultMapping::Indexed {
                arity,
                fallible: false,
            },
            (arity, true) => {
                warn!(
                    name = %signature.name,
                    values = arity,
                    "multiple values with a trailing error, mapping values to resultN"
                );
                ResultMapping::Indexed {
                    arity,
                    fallible: true,
                }
            }
        }
    }

    /// Template selector.
    pub fn kind(&self) -> &'static str {
        match self {
            ResultMapping::Preformatted { .. } => "preformatted",
            ResultMapping::Empty => "empty",
            ResultMapping::ErrorOnly => "error_only",
            ResultMapping::ValueOrError => "value_or_error",
            ResultMapping::Indexed { .. } => "indexed",
        }
    }

    pub fn is_fallible(&self) -> bool {
        match self {
            ResultMapping::Preformatted { fallible } | ResultMapping::Indexed { fallible, .. } => {
                *fallible
            }
            ResultMapping::ErrorOnly | ResultMapping::ValueOrError => true,
            ResultMapping::Empty => false,
        }
    }

    /// Local names bound to the values of an indexed mapping.
    pub fn bindings(&self) -> Vec<String> {
        match self {
            ResultMapping::Indexed { arity, .. } => (0..*arity).map(|i| format!("r{i}")).collect(),
            _ => Vec::new(),
        }
    }
}

/// One field of a handler's decode record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeField {
    /// Rust field identifier (raw if the name is a keyword)
    pub ident: String,
    /// Primary wire key: the declared parameter name, or its capitalized form
    /// when a method parameter is itself called `receiver`
    pub wire_name: String,
    /// Capitalized wire key accepted as well; empty when identical
    pub alias: String,
    /// Owned storage type
    pub ty: String,
    /// Missing field decodes to `Default::default()`
    pub default: bool,
}

/// Everything needed to render one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerPlan {
    pub name: String,
    pub route: String,
    pub handler_ident: String,
    /// Display form of the invoked function
    pub target: String,
    pub fields: Vec<DecodeField>,
    /// `args`, `mut args`, or `_args` when there is nothing to read
    pub args_binding: String,
    pub call: String,
    pub mapping: ResultMapping,
}

/// Name of the synthetic field holding the decoded receiver.
pub const RECEIVER_FIELD: &str = "receiver";

impl HandlerPlan {
    pub fn build(
        signature: &CallSignature,
        handler_ident: String,
        printer: &TypePrinter,
        preformatted: bool,
    ) -> HandlerPlan {
        let mut fields = Vec::with_capacity(signature.parameters.len() + 1);
        let mut needs_mut = false;

        if let Some(receiver) = &signature.receiver {
            needs_mut |= receiver.pointer_mutability() == Some(true);
            fields.push(DecodeField {
                ident: RECEIVER_FIELD.to_string(),
                wire_name: RECEIVER_FIELD.to_string(),
                alias: String::new(),
                ty: printer.storage(receiver),
                default: true,
            });
        }

        let mut arguments = Vec::with_capacity(signature.parameters.len());
        for param in &signature.parameters {
            let mut ident = rust_ident(&param.name);
            let mut wire_name = param.name.clone();
            let mut capitalized = capitalize(&param.name);
            if signature.receiver.is_some() && ident == RECEIVER_FIELD {
                // The receiver owns the `receiver` key; the parameter moves to
                // its capitalized key alone.
                ident = format!("{RECEIVER_FIELD}_arg");
                while signature.parameters.iter().any(|p| rust_ident(&p.name) == ident) {
                    ident.push('_');
                }
                wire_name = capitalized.clone();
                capitalized.clear();
            }
            let argument = match &param.ty {
                TypeSignature::Pointer { mutable: true, .. } => {
                    needs_mut = true;
                    format!("&mut args.{ident}")
                }
                TypeSignature::Pointer { mutable: false, .. } => format!("&args.{ident}"),
                TypeSignature::Repeated(_) => format!("args.{ident}.into_iter()"),
                _ => format!("args.{ident}"),
            };
            arguments.push(argument);
            fields.push(DecodeField {
                alias: if !capitalized.is_empty() && capitalized != wire_name {
                    capitalized
                } else {
                    String::new()
                },
                ident,
                wire_name,
                ty: printer.storage(&param.ty),
                default: false,
            });
        }

        let function = rust_ident(&signature.name);
        let arguments = arguments.join(", ");
        let (call, target) = if signature.receiver.is_some() {
            (
                format!("args.{RECEIVER_FIELD}.{function}({arguments})"),
                format!("{}::{}", printer.print(&receiver_owner(signature)), signature.name),
            )
        } else if let Some(owner) = &signature.owner {
            let owner = printer.print(owner);
            (
                format!("{owner}::{function}({arguments})"),
                format!("{owner}::{}", signature.name),
            )
        } else {
            let mut path = vec![printer.alias().to_string()];
            path.extend(signature.module.iter().map(|m| rust_ident(m)));
            path.push(function);
            let path = path.join("::");
            (format!("{path}({arguments})"), path)
        };

        let args_binding = if fields.is_empty() {
            "_args"
        } else if needs_mut {
            "mut args"
        } else {
            "args"
        };

        HandlerPlan {
            name: signature.name.clone(),
            route: signature.route(),
            handler_ident,
            target,
            fields,
            args_binding: args_binding.to_string(),
            call,
            mapping: ResultMapping::decide(signature, preformatted),
        }
    }
}

fn receiver_owner(signature: &CallSignature) -> TypeSignature {
    match &signature.receiver {
        Some(TypeSignature::Pointer { inner, .. }) => inner.as_ref().clone(),
        Some(other) => other.clone(),
        None => TypeSignature::DynamicInterface,
    }
}

/// Identifier usable in generated code; keywords become raw identifiers.
pub fn rust_ident(name: &str) -> String {
    if syn::parse_str::<syn::Ident>(name).is_ok() {
        name.to_string()
    } else {
        format!("r#{name}")
    }
}

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
