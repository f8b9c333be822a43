//! Ancestor chain resolution over explicit `extends` declarations.

use std::collections::HashSet;

use crate::error::SchemaError;

use super::Registry;
use super::records::TypeRecord;

/// Returns the ancestor chain for `name`, starting with the type itself and
/// ending at the root of its `extends` edges.
///
/// The walk stops at the first parent name with no registry record. A type
/// with no parent yields a single-element chain; an unknown `name` yields an
/// empty one.
///
/// # Errors
///
/// Returns [`SchemaError::InheritanceCycle`] if the explicit parent graph
/// revisits a type.
pub fn ancestor_chain<'a>(
    registry: &'a Registry,
    name: &str,
) -> Result<Vec<&'a TypeRecord>, SchemaError> {
    let mut chain = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    let mut current = registry.get_type(name);
    while let Some(record) = current {
        if !seen.insert(record.name.as_str()) {
            return Err(SchemaError::InheritanceCycle(record.name.clone()));
        }
        chain.push(record);
        current = record
            .extends
            .as_deref()
            .and_then(|parent| registry.get_type(parent));
    }

    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_without_parent_is_single_element() {
        let mut registry = Registry::new();
        registry.type_record("Node");

        let chain = ancestor_chain(&registry, "Node").unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].name, "Node");
    }

    #[test]
    fn test_chain_is_self_first() {
        let mut registry = Registry::new();
        registry.type_record("Node");
        registry.type_record("User").extends = Some("Node".into());
        registry.type_record("Admin").extends = Some("User".into());

        let chain = ancestor_chain(&registry, "Admin").unwrap();
        let names: Vec<&str> = chain.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Admin", "User", "Node"]);
    }

    #[test]
    fn test_chain_stops_at_unknown_parent() {
        let mut registry = Registry::new();
        registry.type_record("User").extends = Some("Missing".into());

        let chain = ancestor_chain(&registry, "User").unwrap();
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_cycle_is_an_error() {
        let mut registry = Registry::new();
        registry.type_record("A").extends = Some("B".into());
        registry.type_record("B").extends = Some("A".into());

        let err = ancestor_chain(&registry, "A").unwrap_err();
        assert!(matches!(err, SchemaError::InheritanceCycle(name) if name == "A"));
    }

    #[test]
    fn test_unknown_type_yields_empty_chain() {
        let registry = Registry::new();
        assert!(ancestor_chain(&registry, "Ghost").unwrap().is_empty());
    }
}
