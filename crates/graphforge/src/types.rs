//! Deferred type references and resolver signatures.
//!
//! Declarations never hold engine types directly: a field's type is a
//! [`TypeExpr`] placeholder resolved against the registry during
//! compilation, so types may freely reference types declared later.

use std::fmt;
use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ResolverContext, SubscriptionFieldFuture, TypeRef};

/// The built-in GraphQL scalars, usable as a type reference without any
/// registry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinScalar {
    /// UTF-8 string.
    String,
    /// Signed 32-bit integer.
    Int,
    /// IEEE 754 double.
    Float,
    /// True or false.
    Boolean,
    /// Opaque identifier, serialized as a string.
    Id,
}

impl BuiltinScalar {
    /// Returns the GraphQL name of the scalar.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinScalar::String => TypeRef::STRING,
            BuiltinScalar::Int => TypeRef::INT,
            BuiltinScalar::Float => TypeRef::FLOAT,
            BuiltinScalar::Boolean => TypeRef::BOOLEAN,
            BuiltinScalar::Id => TypeRef::ID,
        }
    }
}

/// A deferred reference to the type of a field, argument or operation.
///
/// Resolution happens once, inside `build()`, after every declaration is in
/// the registry. Until then the reference is inert, which makes declaration
/// order irrelevant.
#[derive(Clone)]
pub enum TypeExpr {
    /// A built-in scalar supplied directly.
    Builtin(BuiltinScalar),
    /// A reference by type or enum name.
    Named(String),
    /// A thunk producing a name, for references the caller can only supply
    /// late (mutually-referential declarations).
    Deferred(Arc<dyn Fn() -> String + Send + Sync>),
}

impl TypeExpr {
    /// The built-in `String` scalar.
    pub fn string() -> Self {
        TypeExpr::Builtin(BuiltinScalar::String)
    }

    /// The built-in `Int` scalar.
    pub fn int() -> Self {
        TypeExpr::Builtin(BuiltinScalar::Int)
    }

    /// The built-in `Float` scalar.
    pub fn float() -> Self {
        TypeExpr::Builtin(BuiltinScalar::Float)
    }

    /// The built-in `Boolean` scalar.
    pub fn boolean() -> Self {
        TypeExpr::Builtin(BuiltinScalar::Boolean)
    }

    /// The built-in `ID` scalar.
    pub fn id() -> Self {
        TypeExpr::Builtin(BuiltinScalar::Id)
    }

    /// A reference by name, resolved at build time.
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named(name.into())
    }

    /// A thunked reference, invoked at build time.
    pub fn deferred(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        TypeExpr::Deferred(Arc::new(f))
    }
}

impl fmt::Debug for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Builtin(s) => write!(f, "TypeExpr::Builtin({})", s.name()),
            TypeExpr::Named(n) => write!(f, "TypeExpr::Named({n})"),
            TypeExpr::Deferred(_) => write!(f, "TypeExpr::Deferred(..)"),
        }
    }
}

/// A deferred reference to an interface a type declares it implements.
///
/// Resolved only when the compiler materializes the implementing object, so
/// an interface may be declared after the types that implement it.
#[derive(Clone)]
pub enum InterfaceRef {
    /// Reference by interface name.
    Named(String),
    /// Thunked reference, invoked at build time.
    Deferred(Arc<dyn Fn() -> String + Send + Sync>),
}

impl InterfaceRef {
    /// A reference by name.
    pub fn named(name: impl Into<String>) -> Self {
        InterfaceRef::Named(name.into())
    }

    /// A thunked reference.
    pub fn deferred(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        InterfaceRef::Deferred(Arc::new(f))
    }

    pub(crate) fn resolve_name(&self) -> String {
        match self {
            InterfaceRef::Named(name) => name.clone(),
            InterfaceRef::Deferred(f) => f(),
        }
    }
}

impl From<&str> for InterfaceRef {
    fn from(name: &str) -> Self {
        InterfaceRef::Named(name.to_string())
    }
}

impl From<String> for InterfaceRef {
    fn from(name: String) -> Self {
        InterfaceRef::Named(name)
    }
}

impl fmt::Debug for InterfaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceRef::Named(n) => write!(f, "InterfaceRef::Named({n})"),
            InterfaceRef::Deferred(_) => write!(f, "InterfaceRef::Deferred(..)"),
        }
    }
}

/// A field or operation resolver, `(source, args, context, info)` packed
/// into the engine's [`ResolverContext`].
pub type ResolverFn =
    Arc<dyn for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync>;

/// A subscription event-source hook. The core forwards it to the engine
/// verbatim; event production and filtering belong to the caller's pub/sub
/// layer.
pub type SubscribeFn =
    Arc<dyn for<'a> Fn(ResolverContext<'a>) -> SubscriptionFieldFuture<'a> + Send + Sync>;

/// Maps a runtime value to the name of its concrete object type.
pub type ResolveTypeFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Tests whether a runtime value belongs to a given object type.
pub type IsTypeOfFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Validates values flowing through a custom scalar.
pub type ScalarValidatorFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scalar_names() {
        assert_eq!(BuiltinScalar::String.name(), "String");
        assert_eq!(BuiltinScalar::Int.name(), "Int");
        assert_eq!(BuiltinScalar::Float.name(), "Float");
        assert_eq!(BuiltinScalar::Boolean.name(), "Boolean");
        assert_eq!(BuiltinScalar::Id.name(), "ID");
    }

    #[test]
    fn test_deferred_type_expr_resolves_late() {
        let expr = TypeExpr::deferred(|| "User".to_string());
        match expr {
            TypeExpr::Deferred(f) => assert_eq!(f(), "User"),
            _ => panic!("expected deferred variant"),
        }
    }

    #[test]
    fn test_interface_ref_from_str() {
        let iref: InterfaceRef = "Node".into();
        assert_eq!(iref.resolve_name(), "Node");
    }
}
