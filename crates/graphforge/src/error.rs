//! Error types for schema declaration and compilation.
//!
//! Declaration-time failures surface as [`ConfigurationError`] at the
//! offending registration call; compile-time failures surface as
//! [`SchemaError`] from [`build`](crate::SchemaComposer::build). Neither is
//! retried or swallowed internally.

use std::fmt;

/// Errors raised at declaration time, before any schema is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// An enum was registered without a usable name.
    EmptyEnumName,

    /// A configuration limit is out of range.
    InvalidLimit(String),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEnumName => {
                write!(f, "enum registration requires a non-empty name")
            }
            Self::InvalidLimit(msg) => {
                write!(f, "invalid configuration: {msg}")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Errors raised while compiling the registry into a schema.
///
/// `build()` is all-or-nothing: the first unresolved reference aborts the
/// compilation and no partial schema is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A field, argument or operation referenced a type name with no
    /// registry record of an output-capable kind.
    TypeNotDefined(String),

    /// An object declared an interface that is not registered as one.
    InterfaceNotDefined(String),

    /// A field record was created by a composable decoration but never
    /// received a type declaration.
    UntypedField {
        /// Name of the declaring type.
        type_name: String,
        /// Name of the field.
        field_name: String,
    },

    /// The explicit `extends` graph loops back on itself.
    InheritanceCycle(String),

    /// The schema engine rejected the assembled graph.
    Finish(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeNotDefined(name) => {
                write!(f, "Type '{name}' not defined")
            }
            Self::InterfaceNotDefined(name) => {
                write!(f, "Interface '{name}' not defined")
            }
            Self::UntypedField {
                type_name,
                field_name,
            } => {
                write!(f, "Field '{type_name}.{field_name}' has no declared type")
            }
            Self::InheritanceCycle(name) => {
                write!(f, "Inheritance chain for '{name}' is cyclic")
            }
            Self::Finish(msg) => {
                write!(f, "Failed to build GraphQL schema: {msg}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_not_defined_message() {
        let err = SchemaError::TypeNotDefined("Droid".into());
        assert_eq!(err.to_string(), "Type 'Droid' not defined");
    }

    #[test]
    fn test_interface_not_defined_message() {
        let err = SchemaError::InterfaceNotDefined("Node".into());
        assert_eq!(err.to_string(), "Interface 'Node' not defined");
    }

    #[test]
    fn test_untyped_field_message() {
        let err = SchemaError::UntypedField {
            type_name: "User".into(),
            field_name: "name".into(),
        };
        assert_eq!(err.to_string(), "Field 'User.name' has no declared type");
    }

    #[test]
    fn test_empty_enum_name_message() {
        let err = ConfigurationError::EmptyEnumName;
        assert!(err.to_string().contains("non-empty name"));
    }
}
