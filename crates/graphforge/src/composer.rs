//! The declaration API: the sole write path into the registry.
//!
//! Each method performs one registry mutation keyed by its target's
//! identity, mirroring an annotation applied at definition time. Writes are
//! per-field last-write-wins; decorations touching disjoint attributes are
//! order-independent.

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ResolverContext, SubscriptionFieldFuture};
use std::sync::Arc;
use tracing::{trace, warn};

use crate::config::ComposerConfig;
use crate::error::ConfigurationError;
use crate::registry::{ArgumentRecord, OperationRecord, Registry, TypeKind};
use crate::types::{InterfaceRef, ResolverFn, SubscribeFn, TypeExpr};

/// Options recognized by [`SchemaComposer::object`].
#[derive(Default)]
pub struct ObjectOptions {
    description: Option<String>,
    extends: Option<String>,
    interfaces: Vec<InterfaceRef>,
    is_type_of: Option<crate::types::IsTypeOfFn>,
}

impl ObjectOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the type description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Names the parent type whose fields this one inherits.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Declares an implemented interface; may be repeated.
    pub fn implements(mut self, interface: impl Into<InterfaceRef>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Supplies the membership probe used for interface type resolution.
    pub fn is_type_of(mut self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.is_type_of = Some(Arc::new(f));
        self
    }
}

/// Options recognized by [`SchemaComposer::interface`].
#[derive(Default)]
pub struct InterfaceOptions {
    description: Option<String>,
    extends: Option<String>,
    resolve_type: Option<crate::types::ResolveTypeFn>,
}

impl InterfaceOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the interface description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Names the parent type whose fields this one inherits.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Supplies the hook mapping a runtime value to its concrete type name.
    pub fn resolve_type(
        mut self,
        f: impl Fn(&Value) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.resolve_type = Some(Arc::new(f));
        self
    }
}

/// Options recognized by [`SchemaComposer::input`].
#[derive(Default)]
pub struct InputOptions {
    description: Option<String>,
    extends: Option<String>,
}

impl InputOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input type description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Names the parent type whose fields this one inherits.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }
}

/// Options recognized by [`SchemaComposer::scalar`].
#[derive(Default)]
pub struct ScalarOptions {
    description: Option<String>,
    validator: Option<crate::types::ScalarValidatorFn>,
}

impl ScalarOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scalar description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Supplies a value validator forwarded to the engine.
    pub fn validator(mut self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(f));
        self
    }
}

/// Options recognized when declaring an argument.
#[derive(Default)]
pub struct ArgumentOptions {
    description: Option<String>,
    default_value: Option<Value>,
    list: bool,
    non_null: bool,
}

impl ArgumentOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the argument description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the default applied when the argument is omitted.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Wraps the argument type in a list.
    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// Marks the argument non-null.
    pub fn non_null(mut self) -> Self {
        self.non_null = true;
        self
    }
}

/// Options recognized by [`SchemaComposer::field`].
#[derive(Default)]
pub struct FieldOptions {
    description: Option<String>,
    list: bool,
    non_null: bool,
    non_null_items: bool,
    arguments: Vec<(String, TypeExpr, ArgumentOptions)>,
    resolver: Option<ResolverFn>,
}

impl FieldOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Wraps the field type in a list.
    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// Marks the outermost field type non-null.
    pub fn non_null(mut self) -> Self {
        self.non_null = true;
        self
    }

    /// Marks the list item type non-null.
    pub fn non_null_items(mut self) -> Self {
        self.non_null_items = true;
        self
    }

    /// Declares an argument with default options.
    pub fn arg(self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.argument(name, ty, ArgumentOptions::new())
    }

    /// Declares an argument.
    pub fn argument(
        mut self,
        name: impl Into<String>,
        ty: TypeExpr,
        opts: ArgumentOptions,
    ) -> Self {
        self.arguments.push((name.into(), ty, opts));
        self
    }

    /// Supplies a resolver override for the field.
    pub fn resolver(
        mut self,
        f: impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    ) -> Self {
        self.resolver = Some(Arc::new(f));
        self
    }
}

/// Options recognized by [`SchemaComposer::query`], [`mutation`] and
/// [`subscription`].
///
/// [`mutation`]: SchemaComposer::mutation
/// [`subscription`]: SchemaComposer::subscription
#[derive(Default)]
pub struct OperationOptions {
    description: Option<String>,
    list: bool,
    non_null: bool,
    non_null_items: bool,
    arguments: Vec<(String, TypeExpr, ArgumentOptions)>,
}

impl OperationOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Wraps the return type in a list.
    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// Marks the outermost return type non-null.
    pub fn non_null(mut self) -> Self {
        self.non_null = true;
        self
    }

    /// Marks the list item type non-null.
    pub fn non_null_items(mut self) -> Self {
        self.non_null_items = true;
        self
    }

    /// Declares an argument with default options.
    pub fn arg(self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.argument(name, ty, ArgumentOptions::new())
    }

    /// Declares an argument.
    pub fn argument(
        mut self,
        name: impl Into<String>,
        ty: TypeExpr,
        opts: ArgumentOptions,
    ) -> Self {
        self.arguments.push((name.into(), ty, opts));
        self
    }
}

/// One whitelisted value in an enum registration.
pub struct EnumValue {
    value: Value,
    description: Option<String>,
    deprecation: Option<String>,
}

impl EnumValue {
    /// Creates a value entry carrying its underlying value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            description: None,
            deprecation: None,
        }
    }

    /// Sets the value description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the value deprecated with a reason.
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation = Some(reason.into());
        self
    }
}

/// Options recognized by [`SchemaComposer::register_enum`].
#[derive(Default)]
pub struct EnumOptions {
    description: Option<String>,
    values: Vec<(String, EnumValue)>,
}

impl EnumOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the enum description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whitelists a value; may be repeated.
    pub fn value(mut self, name: impl Into<String>, value: EnumValue) -> Self {
        self.values.push((name.into(), value));
        self
    }
}

/// Accumulates declarations and compiles them into an executable schema.
///
/// All declaration methods run synchronously and mutate only this
/// composer's registry. Once every declaration is in,
/// [`build`](Self::build) performs the one-shot compilation.
///
/// # Example
///
/// ```ignore
/// let mut composer = SchemaComposer::new();
/// composer.object("User", ObjectOptions::new());
/// composer.field("User", "name", TypeExpr::string(), FieldOptions::new().non_null());
/// composer.query("User", "currentUser", TypeExpr::named("User"),
///     OperationOptions::new(), my_resolver);
/// let schema = composer.build()?;
/// ```
pub struct SchemaComposer {
    registry: Registry,
    config: ComposerConfig,
}

impl Default for SchemaComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaComposer {
    /// Creates a composer with default configuration.
    pub fn new() -> Self {
        Self::with_config(ComposerConfig::default())
    }

    /// Creates a composer with the given configuration.
    pub fn with_config(config: ComposerConfig) -> Self {
        Self {
            registry: Registry::new(),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Read access to the accumulated registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether a type record exists for `name`.
    pub fn has_type(&self, name: &str) -> bool {
        self.registry.has_type(name)
    }

    /// Whether an enum record exists for `name`.
    pub fn has_enum(&self, name: &str) -> bool {
        self.registry.has_enum(name)
    }

    fn set_kind(&mut self, name: &str, kind: TypeKind) {
        let record = self.registry.type_record(name);
        if let Some(previous) = record.kind
            && previous != kind
        {
            // Known gap: kind conflicts are not validated.
            warn!(
                type_name = %name,
                previous = %previous,
                next = %kind,
                "type kind re-declared; last declaration wins"
            );
        }
        record.kind = Some(kind);
    }

    /// Declares `name` as an object type.
    pub fn object(&mut self, name: impl Into<String>, opts: ObjectOptions) -> &mut Self {
        let name = name.into();
        self.set_kind(&name, TypeKind::Object);
        let record = self.registry.type_record(&name);
        if let Some(d) = opts.description {
            record.description = Some(d);
        }
        if let Some(parent) = opts.extends {
            record.extends = Some(parent);
        }
        record.interfaces.extend(opts.interfaces);
        if let Some(f) = opts.is_type_of {
            record.is_type_of = Some(f);
        }
        trace!(type_name = %name, "Declared object type");
        self
    }

    /// Declares `name` as an interface type.
    pub fn interface(&mut self, name: impl Into<String>, opts: InterfaceOptions) -> &mut Self {
        let name = name.into();
        self.set_kind(&name, TypeKind::Interface);
        let record = self.registry.type_record(&name);
        if let Some(d) = opts.description {
            record.description = Some(d);
        }
        if let Some(parent) = opts.extends {
            record.extends = Some(parent);
        }
        if let Some(f) = opts.resolve_type {
            record.resolve_type = Some(f);
        }
        trace!(type_name = %name, "Declared interface type");
        self
    }

    /// Declares `name` as an input object type.
    pub fn input(&mut self, name: impl Into<String>, opts: InputOptions) -> &mut Self {
        let name = name.into();
        self.set_kind(&name, TypeKind::Input);
        let record = self.registry.type_record(&name);
        if let Some(d) = opts.description {
            record.description = Some(d);
        }
        if let Some(parent) = opts.extends {
            record.extends = Some(parent);
        }
        trace!(type_name = %name, "Declared input type");
        self
    }

    /// Declares `name` as a custom scalar type.
    pub fn scalar(&mut self, name: impl Into<String>, opts: ScalarOptions) -> &mut Self {
        let name = name.into();
        self.set_kind(&name, TypeKind::Scalar);
        let record = self.registry.type_record(&name);
        if let Some(d) = opts.description {
            record.description = Some(d);
        }
        if let Some(v) = opts.validator {
            record.scalar_validator = Some(v);
        }
        trace!(type_name = %name, "Declared scalar type");
        self
    }

    /// Declares a field of `type_name` with its type and options.
    pub fn field(
        &mut self,
        type_name: &str,
        field_name: &str,
        ty: TypeExpr,
        opts: FieldOptions,
    ) -> &mut Self {
        let record = self.registry.field_record(type_name, field_name);
        record.ty = Some(ty);
        if let Some(d) = opts.description {
            record.description = Some(d);
        }
        if opts.list {
            record.list = true;
        }
        if opts.non_null {
            record.non_null = true;
        }
        if opts.non_null_items {
            record.non_null_items = true;
        }
        for (arg_name, arg_ty, arg_opts) in opts.arguments {
            record.arguments.insert(
                arg_name,
                ArgumentRecord {
                    ty: arg_ty,
                    description: arg_opts.description,
                    default_value: arg_opts.default_value,
                    list: arg_opts.list,
                    non_null: arg_opts.non_null,
                },
            );
        }
        if let Some(r) = opts.resolver {
            record.resolver = Some(r);
        }
        trace!(type_name, field_name, "Declared field");
        self
    }

    /// Sets a field's description without touching other attributes.
    pub fn describe_field(
        &mut self,
        type_name: &str,
        field_name: &str,
        description: impl Into<String>,
    ) -> &mut Self {
        self.registry.field_record(type_name, field_name).description = Some(description.into());
        self
    }

    /// Marks a field as a list without touching other attributes.
    pub fn list_field(&mut self, type_name: &str, field_name: &str) -> &mut Self {
        self.registry.field_record(type_name, field_name).list = true;
        self
    }

    /// Marks a field non-null without touching other attributes.
    pub fn non_null_field(&mut self, type_name: &str, field_name: &str) -> &mut Self {
        self.registry.field_record(type_name, field_name).non_null = true;
        self
    }

    /// Marks a field's list items non-null without touching other
    /// attributes.
    pub fn non_null_items(&mut self, type_name: &str, field_name: &str) -> &mut Self {
        self.registry.field_record(type_name, field_name).non_null_items = true;
        self
    }

    /// Sets a field's resolver without touching other attributes.
    pub fn field_resolver(
        &mut self,
        type_name: &str,
        field_name: &str,
        resolver: impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    ) -> &mut Self {
        self.registry.field_record(type_name, field_name).resolver = Some(Arc::new(resolver));
        self
    }

    /// Registers a root query operation under `owner`'s namespace.
    pub fn query(
        &mut self,
        owner: &str,
        name: impl Into<String>,
        ty: TypeExpr,
        opts: OperationOptions,
        resolver: impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    ) -> &mut Self {
        let name = name.into();
        let op = operation_record(&name, ty, opts, Some(Arc::new(resolver)), None);
        trace!(owner, operation = %name, "Registered query");
        self.registry.type_record(owner).queries.insert(name, op);
        self
    }

    /// Registers a root mutation operation under `owner`'s namespace.
    pub fn mutation(
        &mut self,
        owner: &str,
        name: impl Into<String>,
        ty: TypeExpr,
        opts: OperationOptions,
        resolver: impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    ) -> &mut Self {
        let name = name.into();
        let op = operation_record(&name, ty, opts, Some(Arc::new(resolver)), None);
        trace!(owner, operation = %name, "Registered mutation");
        self.registry.type_record(owner).mutations.insert(name, op);
        self
    }

    /// Registers a root subscription operation under `owner`'s namespace.
    ///
    /// `subscribe` is the event-source hook; it is forwarded to the engine
    /// verbatim and must yield the already-mapped event values.
    pub fn subscription(
        &mut self,
        owner: &str,
        name: impl Into<String>,
        ty: TypeExpr,
        opts: OperationOptions,
        subscribe: impl for<'a> Fn(ResolverContext<'a>) -> SubscriptionFieldFuture<'a>
        + Send
        + Sync
        + 'static,
    ) -> &mut Self {
        let name = name.into();
        let op = operation_record(&name, ty, opts, None, Some(Arc::new(subscribe)));
        trace!(owner, operation = %name, "Registered subscription");
        self.registry
            .type_record(owner)
            .subscriptions
            .insert(name, op);
        self
    }

    /// Registers an enum under `name`, exposing exactly the whitelisted
    /// values.
    ///
    /// Re-registering the same name merges per-field: values and
    /// description already present survive unless overwritten here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyEnumName`] if `name` is empty.
    pub fn register_enum(
        &mut self,
        name: impl Into<String>,
        opts: EnumOptions,
    ) -> Result<&mut Self, ConfigurationError> {
        let name = name.into();
        let record = self.registry.enum_record(&name)?;
        if let Some(d) = opts.description {
            record.description = Some(d);
        }
        for (value_name, value) in opts.values {
            record.values.insert(
                value_name,
                crate::registry::EnumValueRecord {
                    value: value.value,
                    description: value.description,
                    deprecation: value.deprecation,
                },
            );
        }
        trace!(enum_name = %name, "Registered enum");
        Ok(self)
    }
}

fn operation_record(
    name: &str,
    ty: TypeExpr,
    opts: OperationOptions,
    resolver: Option<ResolverFn>,
    subscribe: Option<SubscribeFn>,
) -> OperationRecord {
    let mut arguments = indexmap::IndexMap::new();
    for (arg_name, arg_ty, arg_opts) in opts.arguments {
        arguments.insert(
            arg_name,
            ArgumentRecord {
                ty: arg_ty,
                description: arg_opts.description,
                default_value: arg_opts.default_value,
                list: arg_opts.list,
                non_null: arg_opts.non_null,
            },
        );
    }
    OperationRecord {
        name: name.to_string(),
        ty,
        list: opts.list,
        non_null: opts.non_null,
        non_null_items: opts.non_null_items,
        description: opts.description,
        arguments,
        resolver,
        subscribe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_decorations_are_order_independent() {
        let mut a = SchemaComposer::new();
        a.field("User", "tags", TypeExpr::string(), FieldOptions::new());
        a.list_field("User", "tags");
        a.non_null_field("User", "tags");
        a.describe_field("User", "tags", "labels");

        let mut b = SchemaComposer::new();
        b.describe_field("User", "tags", "labels");
        b.non_null_field("User", "tags");
        b.list_field("User", "tags");
        b.field("User", "tags", TypeExpr::string(), FieldOptions::new());

        for composer in [&a, &b] {
            let record = &composer.registry().get_type("User").unwrap().fields["tags"];
            assert!(record.list);
            assert!(record.non_null);
            assert!(!record.non_null_items);
            assert_eq!(record.description.as_deref(), Some("labels"));
            assert!(record.ty.is_some());
        }
    }

    #[test]
    fn test_kind_redeclaration_last_write_wins() {
        let mut composer = SchemaComposer::new();
        composer.object("Thing", ObjectOptions::new());
        composer.input("Thing", InputOptions::new());

        let record = composer.registry().get_type("Thing").unwrap();
        assert_eq!(record.kind, Some(TypeKind::Input));
    }

    #[test]
    fn test_register_enum_rejects_empty_name() {
        let mut composer = SchemaComposer::new();
        let err = composer
            .register_enum("", EnumOptions::new())
            .err()
            .unwrap();
        assert_eq!(err, ConfigurationError::EmptyEnumName);
    }

    #[test]
    fn test_register_enum_merges_values() {
        let mut composer = SchemaComposer::new();
        composer
            .register_enum(
                "Episode",
                EnumOptions::new().value("NEWHOPE", EnumValue::new(4u32)),
            )
            .unwrap();
        composer
            .register_enum(
                "Episode",
                EnumOptions::new().value("EMPIRE", EnumValue::new(5u32)),
            )
            .unwrap();

        let record = composer.registry().get_enum("Episode").unwrap();
        assert_eq!(record.values.len(), 2);
    }

    #[test]
    fn test_operations_are_namespaced_by_declaring_type() {
        let mut composer = SchemaComposer::new();
        composer.query(
            "User",
            "currentUser",
            TypeExpr::named("User"),
            OperationOptions::new(),
            |_ctx| FieldFuture::new(async { Ok(None::<Value>) }),
        );

        let record = composer.registry().get_type("User").unwrap();
        assert!(record.queries.contains_key("currentUser"));
        assert!(record.mutations.is_empty());
    }
}
