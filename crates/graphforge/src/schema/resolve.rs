//! Deferred-reference resolution and modifier wrapping.

use async_graphql::dynamic::TypeRef;
use tracing::trace;

use crate::error::SchemaError;
use crate::registry::{Registry, TypeKind};
use crate::types::TypeExpr;

/// Resolves a deferred reference in output position to a type name.
///
/// Name lookup order: enums, then interfaces, scalars and object types.
/// Input-kind and shell records are not valid output types.
///
/// # Errors
///
/// Returns [`SchemaError::TypeNotDefined`] for names with no
/// output-capable record.
pub(crate) fn resolve_output(registry: &Registry, expr: &TypeExpr) -> Result<String, SchemaError> {
    let name = match expr {
        TypeExpr::Builtin(scalar) => return Ok(scalar.name().to_string()),
        TypeExpr::Named(name) => name.clone(),
        TypeExpr::Deferred(thunk) => thunk(),
    };

    if registry.has_enum(&name) {
        return Ok(name);
    }
    match registry.get_type(&name).and_then(|record| record.kind) {
        Some(TypeKind::Interface) | Some(TypeKind::Scalar) | Some(TypeKind::Object) => Ok(name),
        _ => Err(SchemaError::TypeNotDefined(name)),
    }
}

/// Resolves a deferred reference in input position to a type name.
///
/// Name lookup order: enums, then scalars and input types. Unlike output
/// resolution this never fails: a name with no input-capable record is
/// passed through and rejected by engine validation at `finish()`.
pub(crate) fn resolve_input(registry: &Registry, expr: &TypeExpr) -> String {
    let name = match expr {
        TypeExpr::Builtin(scalar) => return scalar.name().to_string(),
        TypeExpr::Named(name) => name.clone(),
        TypeExpr::Deferred(thunk) => thunk(),
    };

    let known = registry.has_enum(&name)
        || matches!(
            registry.get_type(&name).and_then(|record| record.kind),
            Some(TypeKind::Scalar) | Some(TypeKind::Input)
        );
    if !known {
        trace!(type_name = %name, "input reference not materialized; deferring to schema validation");
    }
    name
}

/// Applies list/non-null modifiers around a resolved type name.
///
/// Order is fixed: item non-null first, then list, then outer non-null
/// unless the type is already non-null.
pub(crate) fn wrap_modifiers(
    name: &str,
    list: bool,
    non_null: bool,
    non_null_items: bool,
) -> TypeRef {
    let mut ty = TypeRef::Named(name.to_string().into());
    if non_null_items {
        ty = TypeRef::NonNull(Box::new(ty));
    }
    if list {
        ty = TypeRef::List(Box::new(ty));
    }
    if non_null && !matches!(ty, TypeRef::NonNull(_)) {
        ty = TypeRef::NonNull(Box::new(ty));
    }
    ty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_no_modifiers() {
        let ty = wrap_modifiers("User", false, false, false);
        assert_eq!(ty.to_string(), "User");
    }

    #[test]
    fn test_wrap_non_null_list_of_non_null_items() {
        let ty = wrap_modifiers("User", true, true, true);
        assert_eq!(ty.to_string(), "[User!]!");
    }

    #[test]
    fn test_wrap_non_null_list_of_nullable_items() {
        let ty = wrap_modifiers("User", true, true, false);
        assert_eq!(ty.to_string(), "[User]!");
    }

    #[test]
    fn test_wrap_outer_non_null_skipped_when_already_non_null() {
        // Without a list, item non-null and outer non-null collapse to one
        // wrapper.
        let ty = wrap_modifiers("User", false, true, true);
        assert_eq!(ty.to_string(), "User!");
    }

    #[test]
    fn test_resolve_output_checks_enums_first() {
        let mut registry = Registry::new();
        registry.enum_record("Episode").unwrap();

        let name = resolve_output(&registry, &TypeExpr::named("Episode")).unwrap();
        assert_eq!(name, "Episode");
    }

    #[test]
    fn test_resolve_output_rejects_unknown_names() {
        let registry = Registry::new();
        let err = resolve_output(&registry, &TypeExpr::named("Droid")).unwrap_err();
        assert_eq!(err, SchemaError::TypeNotDefined("Droid".into()));
    }

    #[test]
    fn test_resolve_output_rejects_input_kinds() {
        let mut registry = Registry::new();
        registry.type_record("Filter").kind = Some(TypeKind::Input);

        let err = resolve_output(&registry, &TypeExpr::named("Filter")).unwrap_err();
        assert_eq!(err, SchemaError::TypeNotDefined("Filter".into()));
    }

    #[test]
    fn test_resolve_input_passes_unknown_names_through() {
        let registry = Registry::new();
        let name = resolve_input(&registry, &TypeExpr::named("Filter"));
        assert_eq!(name, "Filter");
    }

    #[test]
    fn test_resolve_deferred_thunk() {
        let mut registry = Registry::new();
        registry.type_record("User").kind = Some(TypeKind::Object);

        let expr = TypeExpr::deferred(|| "User".to_string());
        assert_eq!(resolve_output(&registry, &expr).unwrap(), "User");
    }
}
