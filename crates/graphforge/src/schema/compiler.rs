//! The compile pass: a single-pass, order-independent projection of the
//! registry into an engine schema.
//!
//! Enums first (they have no forward references), then scalars, interfaces,
//! objects and inputs, then the root operation types. All deferred
//! references resolve here; the first dangling one aborts the build.

use std::sync::Arc;

use async_graphql::dynamic::{
    Enum, EnumItem, Field, InputObject, InputValue, Interface, InterfaceField, Object, Scalar,
    Schema, Subscription, SubscriptionField,
};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::composer::SchemaComposer;
use crate::config::ComposerConfig;
use crate::error::SchemaError;
use crate::registry::{
    ArgumentRecord, EnumRecord, FieldRecord, OperationRecord, Registry, TypeKind, TypeRecord,
    ancestor_chain,
};
use crate::types::ResolverFn;

use super::adapt::{OutputAdapter, TypeDiscriminator, adapted_resolver, property_resolver};
use super::resolve::{resolve_input, resolve_output, wrap_modifiers};

impl SchemaComposer {
    /// Compiles the accumulated registry into an executable schema.
    ///
    /// Read-only over the registry: calling it again on an unchanged
    /// composer produces an identical schema.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] on the first unresolvable type or
    /// interface reference; there is no partial schema.
    pub fn build(&self) -> Result<Schema, SchemaError> {
        Compiler::new(self.registry(), self.config()).compile()
    }
}

pub(crate) struct Compiler<'a> {
    registry: &'a Registry,
    config: &'a ComposerConfig,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(registry: &'a Registry, config: &'a ComposerConfig) -> Self {
        Self { registry, config }
    }

    pub(crate) fn compile(&self) -> Result<Schema, SchemaError> {
        debug!("Starting schema compilation");

        let has_mutations = self.registry.types().any(|t| !t.mutations.is_empty());
        let has_subscriptions = self.registry.types().any(|t| !t.subscriptions.is_empty());

        let mut builder = Schema::build(
            "Query",
            has_mutations.then_some("Mutation"),
            has_subscriptions.then_some("Subscription"),
        );

        for record in self.registry.enums() {
            trace!(enum_name = %record.name, "Materializing enum");
            builder = builder.register(materialize_enum(record));
        }

        for record in self.kind_records(TypeKind::Scalar) {
            trace!(type_name = %record.name, "Materializing scalar");
            builder = builder.register(materialize_scalar(record));
        }

        for record in self.kind_records(TypeKind::Interface) {
            trace!(type_name = %record.name, "Materializing interface");
            builder = builder.register(self.materialize_interface(record)?);
        }

        for record in self.kind_records(TypeKind::Object) {
            trace!(type_name = %record.name, "Materializing object type");
            builder = builder.register(self.materialize_object(record)?);
        }

        for record in self.kind_records(TypeKind::Input) {
            trace!(type_name = %record.name, "Materializing input type");
            builder = builder.register(self.materialize_input(record)?);
        }

        builder = builder.register(self.materialize_root("Query", |t| &t.queries)?);
        if has_mutations {
            builder = builder.register(self.materialize_root("Mutation", |t| &t.mutations)?);
        }
        if has_subscriptions {
            builder = builder.register(self.materialize_subscription_root()?);
        }

        let mut builder = builder
            .limit_depth(self.config.max_depth)
            .limit_complexity(self.config.max_complexity);
        if !self.config.introspection {
            builder = builder.disable_introspection();
        }

        let schema = builder
            .finish()
            .map_err(|e| SchemaError::Finish(e.to_string()))?;

        debug!("Schema compilation complete");
        Ok(schema)
    }

    fn kind_records(&self, kind: TypeKind) -> impl Iterator<Item = &'a TypeRecord> {
        self.registry
            .types()
            .filter(move |record| record.kind == Some(kind))
    }

    /// Folds the ancestor chain root-to-self so the most-derived
    /// declaration of a field name wins.
    fn effective_fields(
        &self,
        type_name: &str,
    ) -> Result<IndexMap<&'a str, &'a FieldRecord>, SchemaError> {
        let chain = ancestor_chain(self.registry, type_name)?;
        let mut merged: IndexMap<&'a str, &'a FieldRecord> = IndexMap::new();
        for ancestor in chain.iter().rev() {
            for (name, field) in &ancestor.fields {
                merged.insert(name.as_str(), field);
            }
        }
        Ok(merged)
    }

    fn materialize_interface(&self, record: &TypeRecord) -> Result<Interface, SchemaError> {
        let mut interface = Interface::new(record.name.as_str());
        if let Some(d) = &record.description {
            interface = interface.description(d.as_str());
        }

        for (field_name, field) in self.effective_fields(&record.name)? {
            let ty = field.ty.as_ref().ok_or_else(|| SchemaError::UntypedField {
                type_name: record.name.clone(),
                field_name: field_name.to_string(),
            })?;
            let base = resolve_output(self.registry, ty)?;
            let ty_ref = wrap_modifiers(&base, field.list, field.non_null, field.non_null_items);

            let mut iface_field = InterfaceField::new(field_name, ty_ref);
            if let Some(d) = &field.description {
                iface_field = iface_field.description(d.as_str());
            }
            for (arg_name, arg) in &field.arguments {
                iface_field = iface_field.argument(self.materialize_argument(arg_name, arg));
            }
            interface = interface.field(iface_field);
        }

        Ok(interface)
    }

    fn materialize_object(&self, record: &TypeRecord) -> Result<Object, SchemaError> {
        let mut object = Object::new(record.name.as_str());
        if let Some(d) = &record.description {
            object = object.description(d.as_str());
        }

        // Declared-interface references stay lazy until this point, so an
        // interface may be declared after its implementors.
        for interface_ref in &record.interfaces {
            let name = interface_ref.resolve_name();
            match self.registry.get_type(&name).and_then(|r| r.kind) {
                Some(TypeKind::Interface) => object = object.implement(name),
                _ => return Err(SchemaError::InterfaceNotDefined(name)),
            }
        }

        for (field_name, field) in self.effective_fields(&record.name)? {
            object = object.field(self.materialize_field(&record.name, field_name, field)?);
        }

        Ok(object)
    }

    fn materialize_input(&self, record: &TypeRecord) -> Result<InputObject, SchemaError> {
        let mut input = InputObject::new(record.name.as_str());
        if let Some(d) = &record.description {
            input = input.description(d.as_str());
        }

        // Input fields resolve via input rules and never carry resolvers.
        for (field_name, field) in self.effective_fields(&record.name)? {
            let ty = field.ty.as_ref().ok_or_else(|| SchemaError::UntypedField {
                type_name: record.name.clone(),
                field_name: field_name.to_string(),
            })?;
            let base = resolve_input(self.registry, ty);
            let ty_ref = wrap_modifiers(&base, field.list, field.non_null, field.non_null_items);

            let mut value = InputValue::new(field_name, ty_ref);
            if let Some(d) = &field.description {
                value = value.description(d.as_str());
            }
            input = input.field(value);
        }

        Ok(input)
    }

    fn materialize_field(
        &self,
        type_name: &str,
        field_name: &str,
        field: &FieldRecord,
    ) -> Result<Field, SchemaError> {
        let ty = field.ty.as_ref().ok_or_else(|| SchemaError::UntypedField {
            type_name: type_name.to_string(),
            field_name: field_name.to_string(),
        })?;
        let base = resolve_output(self.registry, ty)?;
        let ty_ref = wrap_modifiers(&base, field.list, field.non_null, field.non_null_items);

        let resolver = self.erased_resolver(field_name, field.resolver.as_ref(), &base);
        let mut out = Field::new(field_name, ty_ref, move |ctx| resolver(ctx));
        if let Some(d) = &field.description {
            out = out.description(d.as_str());
        }
        for (arg_name, arg) in &field.arguments {
            out = out.argument(self.materialize_argument(arg_name, arg));
        }
        Ok(out)
    }

    fn materialize_argument(&self, name: &str, arg: &ArgumentRecord) -> InputValue {
        let base = resolve_input(self.registry, &arg.ty);
        let ty_ref = wrap_modifiers(&base, arg.list, arg.non_null, false);

        let mut value = InputValue::new(name, ty_ref);
        if let Some(d) = &arg.description {
            value = value.description(d.as_str());
        }
        if let Some(default) = &arg.default_value {
            value = value.default_value(default.clone());
        }
        value
    }

    /// Flattens every record's operations of one kind into a root type.
    fn materialize_root(
        &self,
        root_name: &str,
        select: impl Fn(&TypeRecord) -> &IndexMap<String, OperationRecord>,
    ) -> Result<Object, SchemaError> {
        let mut operations: IndexMap<&str, (&str, &OperationRecord)> = IndexMap::new();
        for record in self.registry.types() {
            for (op_name, op) in select(record) {
                operations.insert(op_name.as_str(), (record.name.as_str(), op));
            }
        }

        let mut root = Object::new(root_name);
        for (op_name, (declaring_type, op)) in operations {
            trace!(operation = op_name, declaring_type, root = root_name, "Adding root operation");
            let base = resolve_output(self.registry, &op.ty)?;
            let ty_ref = wrap_modifiers(&base, op.list, op.non_null, op.non_null_items);

            let resolver = self.erased_resolver(op_name, op.resolver.as_ref(), &base);
            let mut field = Field::new(op_name, ty_ref, move |ctx| resolver(ctx));
            if let Some(d) = &op.description {
                field = field.description(d.as_str());
            }
            for (arg_name, arg) in &op.arguments {
                field = field.argument(self.materialize_argument(arg_name, arg));
            }
            root = root.field(field);
        }
        Ok(root)
    }

    fn materialize_subscription_root(&self) -> Result<Subscription, SchemaError> {
        let mut operations: IndexMap<&str, &OperationRecord> = IndexMap::new();
        for record in self.registry.types() {
            for (op_name, op) in &record.subscriptions {
                operations.insert(op_name.as_str(), op);
            }
        }

        let mut root = Subscription::new("Subscription");
        for (op_name, op) in operations {
            let Some(subscribe) = op.subscribe.clone() else {
                continue;
            };
            trace!(operation = op_name, "Adding subscription operation");
            let base = resolve_output(self.registry, &op.ty)?;
            let ty_ref = wrap_modifiers(&base, op.list, op.non_null, op.non_null_items);

            // The event-source hook is forwarded verbatim.
            let mut field = SubscriptionField::new(op_name, ty_ref, move |ctx| subscribe(ctx));
            if let Some(d) = &op.description {
                field = field.description(d.as_str());
            }
            for (arg_name, arg) in &op.arguments {
                field = field.argument(self.materialize_argument(arg_name, arg));
            }
            root = root.field(field);
        }
        Ok(root)
    }

    /// Erases a declared or default resolver to [`ResolverFn`], threading
    /// it through the output adapter the resolved type calls for.
    fn erased_resolver(
        &self,
        field_name: &str,
        declared: Option<&ResolverFn>,
        base_type: &str,
    ) -> ResolverFn {
        let resolver: ResolverFn = match declared {
            Some(r) => r.clone(),
            None => Arc::new(property_resolver(field_name)),
        };
        match self.output_adapter(base_type) {
            Some(adapter) => Arc::new(adapted_resolver(resolver, adapter)),
            None => resolver,
        }
    }

    fn output_adapter(&self, base_type: &str) -> Option<Arc<OutputAdapter>> {
        if let Some(record) = self.registry.get_enum(base_type) {
            let values = record
                .values
                .iter()
                .map(|(name, value)| (name.clone(), value.value.clone()))
                .collect();
            return Some(Arc::new(OutputAdapter::Enum(values)));
        }

        let record = self.registry.get_type(base_type)?;
        if record.kind != Some(TypeKind::Interface) {
            return None;
        }

        let candidates = self
            .kind_records(TypeKind::Object)
            .filter(|object| {
                object
                    .interfaces
                    .iter()
                    .any(|iref| iref.resolve_name() == base_type)
            })
            .filter_map(|object| {
                object
                    .is_type_of
                    .clone()
                    .map(|probe| (object.name.clone(), probe))
            })
            .collect();

        let discriminator = TypeDiscriminator {
            resolve_type: record.resolve_type.clone(),
            candidates,
        };
        if discriminator.is_empty() {
            return None;
        }
        Some(Arc::new(OutputAdapter::Interface(discriminator)))
    }
}

fn materialize_enum(record: &EnumRecord) -> Enum {
    let mut en = Enum::new(record.name.as_str());
    if let Some(d) = &record.description {
        en = en.description(d.as_str());
    }
    for (value_name, value) in &record.values {
        let mut item = EnumItem::new(value_name.as_str());
        if let Some(d) = &value.description {
            item = item.description(d.as_str());
        }
        if let Some(reason) = &value.deprecation {
            item = item.deprecation(Some(reason.as_str()));
        }
        en = en.item(item);
    }
    en
}

fn materialize_scalar(record: &TypeRecord) -> Scalar {
    let mut scalar = Scalar::new(record.name.as_str());
    if let Some(d) = &record.description {
        scalar = scalar.description(d.as_str());
    }
    if let Some(validator) = record.scalar_validator.clone() {
        scalar = scalar.validator(move |value| validator(value));
    }
    scalar
}
