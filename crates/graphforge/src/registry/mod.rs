//! The metadata registry: the mutable store of declared facts.
//!
//! Records are created on first reference and only ever added to. Writes
//! are immediate; `build()` reads the whole store without mutating it.

mod inheritance;
mod records;

pub use inheritance::ancestor_chain;
pub use records::{
    ArgumentRecord, EnumRecord, EnumValueRecord, FieldRecord, OperationRecord, TypeKind,
    TypeRecord,
};

use indexmap::IndexMap;

use crate::error::ConfigurationError;

/// The store behind one [`SchemaComposer`](crate::SchemaComposer).
///
/// Scoped to its composer; independent composers never share records.
#[derive(Default)]
pub struct Registry {
    types: IndexMap<String, TypeRecord>,
    enums: IndexMap<String, EnumRecord>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the record for `name`, creating an empty shell on first
    /// reference.
    pub fn type_record(&mut self, name: &str) -> &mut TypeRecord {
        self.types
            .entry(name.to_string())
            .or_insert_with(|| TypeRecord::new(name))
    }

    /// Fetches the field record for `type_name.field_name`, auto-creating
    /// the owning type shell and the field shell as needed.
    pub fn field_record(&mut self, type_name: &str, field_name: &str) -> &mut FieldRecord {
        self.type_record(type_name)
            .fields
            .entry(field_name.to_string())
            .or_insert_with(|| FieldRecord::new(field_name))
    }

    /// Fetches the enum record for `name`, creating it on first reference.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyEnumName`] if `name` is empty.
    pub fn enum_record(&mut self, name: &str) -> Result<&mut EnumRecord, ConfigurationError> {
        if name.is_empty() {
            return Err(ConfigurationError::EmptyEnumName);
        }
        Ok(self
            .enums
            .entry(name.to_string())
            .or_insert_with(|| EnumRecord::new(name)))
    }

    /// Whether a type record exists for `name`.
    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Whether an enum record exists for `name`.
    pub fn has_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    /// Read access to a type record.
    pub fn get_type(&self, name: &str) -> Option<&TypeRecord> {
        self.types.get(name)
    }

    /// Read access to an enum record.
    pub fn get_enum(&self, name: &str) -> Option<&EnumRecord> {
        self.enums.get(name)
    }

    /// All type records, in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeRecord> {
        self.types.values()
    }

    /// All enum records, in registration order.
    pub fn enums(&self) -> impl Iterator<Item = &EnumRecord> {
        self.enums.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_record_upsert_is_idempotent() {
        let mut registry = Registry::new();
        registry.type_record("User").description = Some("a user".into());

        // A second fetch returns the same record without clearing it.
        let record = registry.type_record("User");
        assert_eq!(record.description.as_deref(), Some("a user"));
    }

    #[test]
    fn test_field_record_auto_creates_owner_shell() {
        let mut registry = Registry::new();
        assert!(!registry.has_type("User"));

        registry.field_record("User", "name");
        assert!(registry.has_type("User"));
        assert!(registry.get_type("User").unwrap().kind.is_none());
    }

    #[test]
    fn test_enum_record_requires_name() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.enum_record("").unwrap_err(),
            ConfigurationError::EmptyEnumName
        );
        assert!(registry.enum_record("Episode").is_ok());
        assert!(registry.has_enum("Episode"));
    }

    #[test]
    fn test_enum_reregistration_keeps_existing_values() {
        let mut registry = Registry::new();
        registry.enum_record("Episode").unwrap().description = Some("first".into());

        let record = registry.enum_record("Episode").unwrap();
        assert_eq!(record.description.as_deref(), Some("first"));
    }
}
