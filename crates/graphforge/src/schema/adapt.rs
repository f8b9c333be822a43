//! Resolver adaptation.
//!
//! The dynamic engine wants one resolver per field and learns concrete
//! types of abstract values from `FieldValue::with_type`. This module
//! supplies the default property resolver and wraps declared resolvers so
//! enum underlying values map back to their exposed names and
//! interface-typed results carry their concrete type name.

use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use async_graphql::{Name, Value};
use indexmap::IndexMap;

use crate::types::{IsTypeOfFn, ResolveTypeFn, ResolverFn};

/// Resolves a field by looking its name up in the parent object value.
pub(crate) fn property_resolver(
    field_name: &str,
) -> impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static {
    let field_name = field_name.to_string();
    move |ctx| {
        let field_name = field_name.clone();
        FieldFuture::new(async move {
            if let Some(parent) = ctx.parent_value.as_value()
                && let Value::Object(obj) = parent
                && let Some(value) = obj.get(&Name::new(&field_name))
            {
                return Ok(Some(value.clone()));
            }
            Ok(None)
        })
    }
}

/// Picks the concrete type name for a value of an interface-typed field.
///
/// The interface's `resolve_type` hook wins; otherwise the `is_type_of`
/// probes of implementing objects are tried in declaration order.
pub(crate) struct TypeDiscriminator {
    pub resolve_type: Option<ResolveTypeFn>,
    pub candidates: Vec<(String, IsTypeOfFn)>,
}

impl TypeDiscriminator {
    pub(crate) fn is_empty(&self) -> bool {
        self.resolve_type.is_none() && self.candidates.is_empty()
    }

    fn discriminate(&self, value: &Value) -> Option<String> {
        if let Some(resolve) = &self.resolve_type
            && let Some(name) = resolve(value)
        {
            return Some(name);
        }
        self.candidates
            .iter()
            .find(|(_, probe)| probe(value))
            .map(|(name, _)| name.clone())
    }
}

/// Post-resolution adjustment applied to a resolver's output, chosen from
/// the field's resolved output type.
pub(crate) enum OutputAdapter {
    /// Map underlying enum values back to their exposed names.
    Enum(IndexMap<String, Value>),
    /// Attach concrete type names to interface-typed values.
    Interface(TypeDiscriminator),
}

impl OutputAdapter {
    fn apply<'a>(&self, value: FieldValue<'a>) -> FieldValue<'a> {
        let adapted: Option<FieldValue<'a>> = match value.as_value() {
            Some(Value::List(items)) => {
                let items = items.clone();
                Some(FieldValue::list(
                    items.into_iter().map(|item| self.adapt_item(item)),
                ))
            }
            Some(single) => {
                let single = single.clone();
                Some(self.adapt_item(single))
            }
            None => None,
        };
        adapted.unwrap_or(value)
    }

    fn adapt_item<'a>(&self, value: Value) -> FieldValue<'a> {
        match self {
            OutputAdapter::Enum(values) => {
                let mapped = values
                    .iter()
                    .find(|(_, underlying)| **underlying == value)
                    .map(|(name, _)| Value::Enum(Name::new(name)));
                FieldValue::value(mapped.unwrap_or(value))
            }
            OutputAdapter::Interface(discriminator) => {
                match discriminator.discriminate(&value) {
                    Some(type_name) => FieldValue::value(value).with_type(type_name),
                    None => FieldValue::value(value),
                }
            }
        }
    }
}

/// Wraps `inner` so its output passes through `adapter`.
pub(crate) fn adapted_resolver(
    inner: ResolverFn,
    adapter: Arc<OutputAdapter>,
) -> impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static {
    move |ctx| {
        let adapter = adapter.clone();
        match inner(ctx) {
            FieldFuture::Value(value) => {
                FieldFuture::Value(value.map(|v| adapter.apply(v)))
            }
            FieldFuture::Future(future) => FieldFuture::Future(Box::pin(async move {
                Ok(future.await?.map(|v| adapter.apply(v)))
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enum_adapter() -> OutputAdapter {
        let mut values = IndexMap::new();
        values.insert("NEWHOPE".to_string(), Value::from(4u32));
        values.insert("EMPIRE".to_string(), Value::from(5u32));
        OutputAdapter::Enum(values)
    }

    #[test]
    fn test_enum_adapter_maps_underlying_value() {
        let adapter = enum_adapter();
        let adapted = adapter.adapt_item(Value::from(4u32));
        assert_eq!(
            adapted.as_value(),
            Some(&Value::Enum(Name::new("NEWHOPE")))
        );
    }

    #[test]
    fn test_enum_adapter_passes_unknown_values_through() {
        let adapter = enum_adapter();
        let adapted = adapter.adapt_item(Value::from(9u32));
        assert_eq!(adapted.as_value(), Some(&Value::from(9u32)));
    }

    #[test]
    fn test_discriminator_prefers_resolve_type() {
        let resolve: ResolveTypeFn = Arc::new(|_| Some("User".to_string()));
        let probe: IsTypeOfFn = Arc::new(|_| true);
        let discriminator = TypeDiscriminator {
            resolve_type: Some(resolve),
            candidates: vec![("Robot".to_string(), probe)],
        };
        assert_eq!(
            discriminator.discriminate(&Value::Null),
            Some("User".to_string())
        );
    }

    #[test]
    fn test_discriminator_falls_back_to_is_type_of() {
        let never: IsTypeOfFn = Arc::new(|_| false);
        let always: IsTypeOfFn = Arc::new(|_| true);
        let discriminator = TypeDiscriminator {
            resolve_type: None,
            candidates: vec![("Robot".to_string(), never), ("User".to_string(), always)],
        };
        assert_eq!(
            discriminator.discriminate(&Value::Null),
            Some("User".to_string())
        );
    }
}
