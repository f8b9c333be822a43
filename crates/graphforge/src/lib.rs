//! # graphforge
//!
//! Code-first GraphQL schema construction: describe types, fields, enums
//! and root operations through declaration calls, then compile the
//! accumulated metadata into an executable schema in one step.
//!
//! The crate is a small compiler. Declarations populate a metadata
//! registry — a declarative intermediate representation with no engine
//! types in it — and [`SchemaComposer::build`] performs a single-pass,
//! order-independent conversion into an
//! [`async_graphql::dynamic::Schema`], resolving forward references,
//! merging inherited fields and wiring interface/enum/scalar
//! cross-references.
//!
//! ## Overview
//!
//! - Declarations run synchronously and in any order; types may reference
//!   types declared later, by name or through a thunk.
//! - Field sets merge along explicit `extends` chains, most-derived
//!   declaration winning on name collisions.
//! - Enums expose exactly the whitelisted values registered for them.
//! - `build()` either returns a fully-wired schema or fails with the first
//!   dangling reference; there is no partial result.
//!
//! Query execution, subscription event delivery and transport belong to
//! the engine and the caller's pub/sub layer; this crate only assembles
//! the schema graph.
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`composer`] - The declaration API
//! - [`registry`] - The metadata registry records
//! - [`types`] - Deferred type references and resolver signatures
//! - [`error`] - Error types for declaration and compilation

pub mod composer;
pub mod config;
pub mod error;
pub mod registry;
pub mod types;

mod schema;

// Re-export main types
pub use composer::{
    ArgumentOptions, EnumOptions, EnumValue, FieldOptions, InputOptions, InterfaceOptions,
    ObjectOptions, OperationOptions, ScalarOptions, SchemaComposer,
};
pub use config::ComposerConfig;
pub use error::{ConfigurationError, SchemaError};
pub use types::{BuiltinScalar, InterfaceRef, TypeExpr};

/// Result type for schema compilation.
pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
