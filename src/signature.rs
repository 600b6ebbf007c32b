//! # Call Signatures
//!
//! The intermediate representation shared by the collector and the emitters.
//!
//! A [`CallSignature`] is the structural shape of one library function: its
//! name, parameters, results and optional receiver. Every type position holds
//! a [`TypeSignature`], a small recursive tree that the
//! [`printer`](crate::printer) turns back into canonical Rust text.
//!
//! Signatures are built fresh on every generator run and dropped once the
//! output module is written; nothing here is persisted.

use std::fmt;

/// Printed form of the distinguished trailing-error result.
///
/// `Result<T, E>` returns lower to `[T..., error]`; the handler emitter keys
/// its result mapping off this marker rather than the concrete error type.
pub const ERROR_MARKER: &str = "error";

/// Printed form of the fully unconstrained type (`serde_json::Value`).
pub const DYNAMIC_MARKER: &str = "Value";

/// Bare identifiers that print unchanged.
pub const BUILTIN_SCALARS: &[&str] = &[
    "bool", "char", "str", "String", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16",
    "u32", "u64", "u128", "usize", "f32", "f64", DYNAMIC_MARKER, ERROR_MARKER,
];

/// Returns true if `name` is one of the [`BUILTIN_SCALARS`].
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// A type expression, recursively composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    /// Bare name: a built-in scalar or a type declared by the wrapped library
    Identifier(String),
    /// `&T` or `&mut T`
    Pointer {
        mutable: bool,
        inner: Box<TypeSignature>,
    },
    /// Package-qualified name, e.g. `bitcoin::Txid` or `crate::keys::KeyPair`
    QualifiedSelector { package: String, name: String },
    /// `Vec<T>` or `[T]`
    Slice(Box<TypeSignature>),
    /// `HashMap<K, V>` (unordered) or `BTreeMap<K, V>` (ordered)
    Mapping {
        ordered: bool,
        key: Box<TypeSignature>,
        value: Box<TypeSignature>,
    },
    /// `Option<T>`
    Optional(Box<TypeSignature>),
    /// `serde_json::Value`, `dyn Trait`, and every shape the printer does not model
    DynamicInterface,
    /// Trailing `impl IntoIterator<Item = T>`; travels on the wire as an array
    Repeated(Box<TypeSignature>),
}

impl TypeSignature {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeSignature::Identifier(name.into())
    }

    pub fn error() -> Self {
        TypeSignature::Identifier(ERROR_MARKER.to_string())
    }

    pub fn pointer(inner: TypeSignature, mutable: bool) -> Self {
        TypeSignature::Pointer {
            mutable,
            inner: Box::new(inner),
        }
    }

    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeSignature::QualifiedSelector {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn slice(element: TypeSignature) -> Self {
        TypeSignature::Slice(Box::new(element))
    }

    pub fn mapping(key: TypeSignature, value: TypeSignature, ordered: bool) -> Self {
        TypeSignature::Mapping {
            ordered,
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn optional(inner: TypeSignature) -> Self {
        TypeSignature::Optional(Box::new(inner))
    }

    pub fn repeated(element: TypeSignature) -> Self {
        TypeSignature::Repeated(Box::new(element))
    }

    /// True for the distinguished trailing-error marker.
    pub fn is_error(&self) -> bool {
        matches!(self, TypeSignature::Identifier(name) if name == ERROR_MARKER)
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, TypeSignature::Repeated(_))
    }

    /// Mutability of a pointer shape, `None` for everything else.
    pub fn pointer_mutability(&self) -> Option<bool> {
        match self {
            TypeSignature::Pointer { mutable, .. } => Some(*mutable),
            _ => None,
        }
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeSignature,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeSignature) -> Self {
        Parameter {
            name: name.into(),
            ty,
        }
    }
}

/// The call shape of one eligible library function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSignature {
    /// Declared name; unique across one collection run
    pub name: String,
    /// Module path inside the wrapped library (`[]` for the crate root)
    pub module: Vec<String>,
    /// Owning type of an associated function declared without a receiver
    pub owner: Option<TypeSignature>,
    pub parameters: Vec<Parameter>,
    pub results: Vec<TypeSignature>,
    /// Present iff the declaration bound `self`; `&self` and `&mut self`
    /// are pointer shapes over the impl's self type
    pub receiver: Option<TypeSignature>,
}

impl CallSignature {
    pub fn new(name: impl Into<String>) -> Self {
        CallSignature {
            name: name.into(),
            module: Vec::new(),
            owner: None,
            parameters: Vec::new(),
            results: Vec::new(),
            receiver: None,
        }
    }

    /// True iff the final parameter is a repeated (variadic) shape.
    pub fn is_variadic_last(&self) -> bool {
        self.parameters
            .last()
            .map(|p| p.ty.is_repeated())
            .unwrap_or(false)
    }

    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }

    /// True when the trailing result is the error marker.
    pub fn has_trailing_error(&self) -> bool {
        self.results.last().map(|r| r.is_error()).unwrap_or(false)
    }

    /// The HTTP path this signature is served on.
    pub fn route(&self) -> String {
        format!("/api/{}", self.name)
    }
}

impl fmt::Display for CallSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.module.is_empty() {
            write!(f, "{}::", self.module.join("::"))?;
        }
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variadic_last_only_checks_final_parameter() {
        let mut sig = CallSignature::new("sum");
        assert!(!sig.is_variadic_last());

        sig.parameters
            .push(Parameter::new("amounts", TypeSignature::repeated(TypeSignature::ident("u64"))));
        assert!(sig.is_variadic_last());

        sig.parameters
            .push(Parameter::new("label", TypeSignature::ident("String")));
        assert!(!sig.is_variadic_last());
    }

    #[test]
    fn test_route_preserves_declared_case() {
        assert_eq!(CallSignature::new("GetInfo").route(), "/api/GetInfo");
        assert_eq!(CallSignature::new("get_info").route(), "/api/get_info");
    }

    #[test]
    fn test_trailing_error() {
        let mut sig = CallSignature::new("spend");
        assert!(!sig.has_trailing_error());
        sig.results = vec![TypeSignature::ident("u64"), TypeSignature::error()];
        assert!(sig.has_trailing_error());
        sig.results = vec![TypeSignature::error(), TypeSignature::ident("u64")];
        assert!(!sig.has_trailing_error());
    }

    #[test]
    fn test_display_includes_module_path() {
        let mut sig = CallSignature::new("derive_key");
        sig.module = vec!["keys".to_string()];
        assert_eq!(sig.to_string(), "keys::derive_key");
    }
}
