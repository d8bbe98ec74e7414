//! The resolver contract implemented by application code

use anyhow::{Result, anyhow};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::context::OperationContext;
use super::path::ResponsePath;
use super::query::{FieldNode, TypeRef};
use super::value::{Resolution, ResolvedValue};

/// Finalized arguments of one field, variables already substituted
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Arguments(IndexMap<String, Value>);

impl Arguments {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Deserialize an argument. Missing and null arguments yield `None`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| anyhow!("Invalid argument '{}': {}", name, e)),
        }
    }

    /// Deserialize an argument that must be present and non-null
    pub fn require<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        self.get_as(name)?
            .ok_or_else(|| anyhow!("Missing required argument '{}'", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub(crate) fn insert(&mut self, name: String, value: Value) {
        self.0.insert(name, value);
    }
}

impl From<IndexMap<String, Value>> for Arguments {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Metadata about the field being resolved
#[derive(Debug, Clone)]
pub struct ResolveInfo<'a> {
    pub field_name: &'a str,
    /// Alias if present, else the field name
    pub response_key: &'a str,
    pub parent_type: &'a str,
    pub return_type: &'a TypeRef,
    pub path: ResponsePath,
    pub root_type: &'a str,
    pub operation_name: Option<&'a str>,
    /// The field node itself, for look-ahead into its child selections
    pub field: &'a FieldNode,
}

/// `(type name, field name)` pair identifying a resolver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldCoordinate {
    pub type_name: String,
    pub field_name: String,
}

impl FieldCoordinate {
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }
}

impl fmt::Display for FieldCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field_name)
    }
}

/// Owned inputs handed to async resolvers
///
/// The future of an async resolver may outlive the call that created it, so
/// it receives its inputs by value.
#[derive(Debug, Clone)]
pub struct ResolverParams {
    pub parent: ResolvedValue,
    pub args: Arguments,
    pub context: OperationContext,
    pub path: ResponsePath,
}

type ResolverFn = dyn Fn(&ResolvedValue, &Arguments, &OperationContext, &ResolveInfo<'_>) -> Resolution
    + Send
    + Sync;

/// Handle to a resolver function
///
/// Cloning is cheap. Two handles are the same resolver when they share the
/// underlying allocation.
#[derive(Clone)]
pub struct Resolver(Arc<ResolverFn>);

impl Resolver {
    /// A resolver returning a tagged [`Resolution`]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ResolvedValue, &Arguments, &OperationContext, &ResolveInfo<'_>) -> Resolution
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    /// A synchronous resolver returning a value or an error
    pub fn from_fn<F, T>(f: F) -> Self
    where
        F: Fn(&ResolvedValue, &Arguments, &OperationContext, &ResolveInfo<'_>) -> Result<T>
            + Send
            + Sync
            + 'static,
        T: Into<ResolvedValue>,
    {
        Self::new(move |parent, args, ctx, info| f(parent, args, ctx, info).into())
    }

    /// An asynchronous resolver
    ///
    /// ```rust,ignore
    /// Resolver::from_async(|params: ResolverParams| async move {
    ///     let db = params.context.data::<Db>()?;
    ///     db.find_user(params.args.require::<String>("id")?).await
    /// })
    /// ```
    pub fn from_async<F, Fut, T>(f: F) -> Self
    where
        F: Fn(ResolverParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Into<ResolvedValue>,
    {
        Self::new(move |parent, args, ctx, info| {
            Resolution::pending(f(ResolverParams {
                parent: parent.clone(),
                args: args.clone(),
                context: ctx.clone(),
                path: info.path.clone(),
            }))
        })
    }

    /// A resolver that always yields the same value
    pub fn constant(value: impl Into<ResolvedValue>) -> Self {
        let value = value.into();
        Self::new(move |_, _, _, _| Resolution::Ready(value.clone()))
    }

    pub fn call(
        &self,
        parent: &ResolvedValue,
        args: &Arguments,
        context: &OperationContext,
        info: &ResolveInfo<'_>,
    ) -> Resolution {
        (self.0)(parent, args, context, info)
    }

    /// Whether both handles point at the same function
    pub fn same_as(&self, other: &Resolver) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resolver({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}
