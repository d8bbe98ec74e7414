//! Executor module
//!
//! Walks a validated query tree, invokes resolvers, and assembles the response.
//!
//! The executor is split into several sub-modules:
//! - `core`: Operation orchestration and the public entry points
//! - `field_resolver`: Field resolution, value completion and fan-out
//! - `arguments`: Variable substitution and argument defaults
//! - `response`: Result tree folding, null propagation and error collection

mod arguments;
mod core;
mod field_resolver;
mod response;

pub use self::core::{Executor, execute};
pub use field_resolver::TYPENAME_FIELD;
pub use response::{ErrorExtensions, GraphQLError, Response};

/// Variable values supplied with an operation
pub type Variables = serde_json::Map<String, serde_json::Value>;
