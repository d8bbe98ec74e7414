//! Resolver lookup: the merged registry and the fallback default resolver

pub mod default;
pub mod registry;

pub use default::{default_resolver, resolve_default};
pub use registry::{Registry, ResolverMap};
