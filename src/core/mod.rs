//! Core module containing the data model shared by the registry and the executor

pub mod context;
pub mod error;
pub mod path;
pub mod query;
pub mod resolver;
pub mod value;

pub use context::{ContextFactory, OperationContext};
pub use error::{ConfigError, DuplicateResolverError, ErrorCode, FieldError};
pub use path::{PathSegment, ResponsePath};
pub use query::{FieldNode, InputValue, Operation, OperationKind, TypeRef};
pub use resolver::{Arguments, FieldCoordinate, ResolveInfo, Resolver, ResolverParams};
pub use value::{Member, MemberFn, ObjectValue, Resolution, ResolvedValue};
