//! Registry records: the declarative intermediate representation.
//!
//! Nothing here is engine-native. Records accumulate facts as declarations
//! run and are only read back during compilation.

use async_graphql::Value;
use indexmap::IndexMap;

use crate::types::{
    InterfaceRef, IsTypeOfFn, ResolveTypeFn, ResolverFn, ScalarValidatorFn, SubscribeFn, TypeExpr,
};

/// The kind a type was declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// A concrete output object type.
    Object,
    /// An abstract interface type.
    Interface,
    /// An input object type.
    Input,
    /// A custom scalar type.
    Scalar,
}

impl TypeKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Object => "object",
            TypeKind::Interface => "interface",
            TypeKind::Input => "input",
            TypeKind::Scalar => "scalar",
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything declared about one named type.
///
/// `kind` stays `None` for shells created as a side effect of a field
/// declaration; such records contribute fields through inheritance but are
/// never materialized themselves.
pub struct TypeRecord {
    /// Unique type name.
    pub name: String,
    /// Declared kind, if any kind-level declaration ran.
    pub kind: Option<TypeKind>,
    /// Type description.
    pub description: Option<String>,
    /// Name of the parent type whose fields this one inherits.
    pub extends: Option<String>,
    /// Interfaces this type declares it implements, resolved lazily.
    pub interfaces: Vec<InterfaceRef>,
    /// Polymorphism hook mapping a runtime value to a concrete type name.
    pub resolve_type: Option<ResolveTypeFn>,
    /// Polymorphism hook testing membership of a runtime value.
    pub is_type_of: Option<IsTypeOfFn>,
    /// Value validator for scalar kinds.
    pub scalar_validator: Option<ScalarValidatorFn>,
    /// Fields declared directly on this type.
    pub fields: IndexMap<String, FieldRecord>,
    /// Query operations declared under this type's namespace.
    pub queries: IndexMap<String, OperationRecord>,
    /// Mutation operations declared under this type's namespace.
    pub mutations: IndexMap<String, OperationRecord>,
    /// Subscription operations declared under this type's namespace.
    pub subscriptions: IndexMap<String, OperationRecord>,
}

impl TypeRecord {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            description: None,
            extends: None,
            interfaces: Vec::new(),
            resolve_type: None,
            is_type_of: None,
            scalar_validator: None,
            fields: IndexMap::new(),
            queries: IndexMap::new(),
            mutations: IndexMap::new(),
            subscriptions: IndexMap::new(),
        }
    }
}

/// One declared field on one type.
impl std::fmt::Debug for TypeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRecord")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("description", &self.description)
            .field("extends", &self.extends)
            .field("interfaces", &self.interfaces)
            .field("resolve_type", &self.resolve_type.as_ref().map(|_| ".."))
            .field("is_type_of", &self.is_type_of.as_ref().map(|_| ".."))
            .field(
                "scalar_validator",
                &self.scalar_validator.as_ref().map(|_| ".."),
            )
            .field("fields", &self.fields)
            .field("queries", &self.queries)
            .field("mutations", &self.mutations)
            .field("subscriptions", &self.subscriptions)
            .finish()
    }
}

pub struct FieldRecord {
    /// Field name.
    pub name: String,
    /// Deferred field type; `None` until a type-bearing declaration runs.
    pub ty: Option<TypeExpr>,
    /// Field description.
    pub description: Option<String>,
    /// Wrap the type in a list.
    pub list: bool,
    /// Wrap the outermost type in non-null.
    pub non_null: bool,
    /// Wrap the list item type in non-null; only meaningful with `list`.
    pub non_null_items: bool,
    /// Declared arguments.
    pub arguments: IndexMap<String, ArgumentRecord>,
    /// Resolver override; absent fields resolve by property lookup.
    pub resolver: Option<ResolverFn>,
}

impl FieldRecord {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            description: None,
            list: false,
            non_null: false,
            non_null_items: false,
            arguments: IndexMap::new(),
            resolver: None,
        }
    }
}

impl std::fmt::Debug for FieldRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRecord")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("description", &self.description)
            .field("list", &self.list)
            .field("non_null", &self.non_null)
            .field("non_null_items", &self.non_null_items)
            .field("arguments", &self.arguments)
            .field("resolver", &self.resolver.as_ref().map(|_| ".."))
            .finish()
    }
}

/// One declared argument of a field or operation.
#[derive(Debug)]
pub struct ArgumentRecord {
    /// Deferred argument type, resolved via input-type rules.
    pub ty: TypeExpr,
    /// Argument description.
    pub description: Option<String>,
    /// Default value applied when the argument is omitted.
    pub default_value: Option<Value>,
    /// Wrap the type in a list.
    pub list: bool,
    /// Wrap the outermost type in non-null.
    pub non_null: bool,
}

/// One declared root operation (query, mutation or subscription).
///
/// The declaring type's name is only a namespace; operations are hoisted
/// onto the root types during compilation.
pub struct OperationRecord {
    /// Operation name.
    pub name: String,
    /// Deferred return type.
    pub ty: TypeExpr,
    /// Wrap the return type in a list.
    pub list: bool,
    /// Wrap the outermost return type in non-null.
    pub non_null: bool,
    /// Wrap the list item type in non-null; only meaningful with `list`.
    pub non_null_items: bool,
    /// Operation description.
    pub description: Option<String>,
    /// Declared arguments.
    pub arguments: IndexMap<String, ArgumentRecord>,
    /// The operation body, for queries and mutations.
    pub resolver: Option<ResolverFn>,
    /// The event-source hook, for subscriptions.
    pub subscribe: Option<SubscribeFn>,
}

impl std::fmt::Debug for OperationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRecord")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("list", &self.list)
            .field("non_null", &self.non_null)
            .field("non_null_items", &self.non_null_items)
            .field("description", &self.description)
            .field("arguments", &self.arguments)
            .field("resolver", &self.resolver.as_ref().map(|_| ".."))
            .field("subscribe", &self.subscribe.as_ref().map(|_| ".."))
            .finish()
    }
}

/// One registered enum, keyed by its caller-supplied name.
#[derive(Debug)]
pub struct EnumRecord {
    /// Unique enum name.
    pub name: String,
    /// Enum description.
    pub description: Option<String>,
    /// Whitelisted values. Values never registered here stay invisible to
    /// the schema.
    pub values: IndexMap<String, EnumValueRecord>,
}

impl EnumRecord {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values: IndexMap::new(),
        }
    }
}

/// One whitelisted enum value.
#[derive(Debug)]
pub struct EnumValueRecord {
    /// The underlying value resolvers may return in place of the name.
    pub value: Value,
    /// Value description.
    pub description: Option<String>,
    /// Deprecation reason, if the value is deprecated.
    pub deprecation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_kind_as_str() {
        assert_eq!(TypeKind::Object.as_str(), "object");
        assert_eq!(TypeKind::Interface.as_str(), "interface");
        assert_eq!(TypeKind::Input.as_str(), "input");
        assert_eq!(TypeKind::Scalar.as_str(), "scalar");
    }

    #[test]
    fn test_new_type_record_is_shell() {
        let record = TypeRecord::new("User");
        assert_eq!(record.name, "User");
        assert!(record.kind.is_none());
        assert!(record.fields.is_empty());
    }
}
