//! # Resolvent
//!
//! A field resolver execution engine. Given a validated query tree and a
//! registry of per-field resolvers, it produces a response tree by invoking
//! resolvers in the order the query nests them.
//!
//! ## Features
//!
//! - **Fail-fast Registry**: Partial resolver maps merge into one immutable table
//! - **Default Resolver**: Fields without a resolver read a same-named member of the parent
//! - **Uniform Async**: Resolvers return a ready value, a pending value, or a failure
//! - **Concurrent Fan-out**: Sibling fields and list items resolve concurrently
//! - **Null Propagation**: Non-null violations bubble to the nearest nullable ancestor
//! - **Deterministic Output**: Field and error order follow the query, not completion order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use resolvent::prelude::*;
//! use serde_json::json;
//!
//! let resolvers = ResolverMap::new()
//!     .resolver("Query", "numberSix", Resolver::constant(6));
//! let registry = Arc::new(Registry::merge(vec![resolvers])?);
//!
//! let operation = Operation::query("Query")
//!     .select(FieldNode::new("numberSix", TypeRef::named("Int").non_null()));
//!
//! let response = Executor::new(registry)
//!     .execute(&operation, json!({}), &OperationContext::empty(), Variables::new())
//!     .await;
//!
//! assert_eq!(response.data, Some(json!({ "numberSix": 6 })));
//! ```

pub mod config;
pub mod core;
pub mod executor;
pub mod resolvers;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Data Model ===
    pub use crate::core::{
        context::{ContextFactory, OperationContext},
        path::{PathSegment, ResponsePath},
        query::{FieldNode, InputValue, Operation, OperationKind, TypeRef},
        resolver::{Arguments, FieldCoordinate, ResolveInfo, Resolver, ResolverParams},
        value::{Member, ObjectValue, Resolution, ResolvedValue},
    };

    // === Errors ===
    pub use crate::core::error::{ConfigError, DuplicateResolverError, ErrorCode, FieldError};

    // === Resolvers ===
    pub use crate::resolvers::{Registry, ResolverMap, default_resolver};

    // === Executor ===
    pub use crate::executor::{Executor, GraphQLError, Response, Variables, execute};

    // === Config ===
    pub use crate::config::{ExecutorConfig, MergePolicy};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
