//! Values flowing through the resolver chain
//!
//! A resolver produces a [`Resolution`]: an immediate value, a pending value,
//! or a failure. Once settled, the value is a [`ResolvedValue`], which becomes
//! the parent of the next level of the chain.

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::context::OperationContext;
use super::resolver::{Arguments, ResolveInfo};

/// Capability query against an application value
///
/// The default resolver asks the parent for a member named like the field.
/// Implement this for application types that should satisfy fields without
/// explicit resolvers.
///
/// # Example
///
/// ```rust,ignore
/// struct Author { name: String }
///
/// impl ObjectValue for Author {
///     fn member(&self, name: &str) -> Option<Member> {
///         match name {
///             "name" => Some(Member::value(self.name.clone())),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait ObjectValue: Send + Sync {
    /// Look up a member by field name. `None` means the value has no such member.
    fn member(&self, name: &str) -> Option<Member>;
}

/// Invocable member of an [`ObjectValue`]
pub type MemberFn =
    Arc<dyn Fn(&Arguments, &OperationContext, &ResolveInfo<'_>) -> Resolution + Send + Sync>;

/// A member exposed by an [`ObjectValue`]
#[derive(Clone)]
pub enum Member {
    /// Plain data, returned as-is
    Value(ResolvedValue),
    /// Invoked with `(args, context, info)` and its resolution used
    Method(MemberFn),
}

impl Member {
    pub fn value(value: impl Into<ResolvedValue>) -> Self {
        Member::Value(value.into())
    }

    pub fn method<F>(f: F) -> Self
    where
        F: Fn(&Arguments, &OperationContext, &ResolveInfo<'_>) -> Resolution + Send + Sync + 'static,
    {
        Member::Method(Arc::new(f))
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Member::Method(_) => f.write_str("Method(..)"),
        }
    }
}

/// Settled value of a resolver
#[derive(Clone, Default)]
pub enum ResolvedValue {
    Null,
    /// The parent had no member for the field
    #[default]
    Undefined,
    Json(Value),
    List(Vec<ResolvedValue>),
    Object(Arc<dyn ObjectValue>),
}

impl ResolvedValue {
    pub fn object<T: ObjectValue + 'static>(value: T) -> Self {
        ResolvedValue::Object(Arc::new(value))
    }

    /// Null, undefined, and JSON null are all treated as absent
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            ResolvedValue::Null | ResolvedValue::Undefined | ResolvedValue::Json(Value::Null)
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ResolvedValue::List(_) | ResolvedValue::Json(Value::Array(_))
        )
    }

    /// Short description of the value's shape, used in type mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            ResolvedValue::Null | ResolvedValue::Json(Value::Null) => "null",
            ResolvedValue::Undefined => "undefined",
            ResolvedValue::List(_) | ResolvedValue::Json(Value::Array(_)) => "a list",
            ResolvedValue::Object(_) | ResolvedValue::Json(Value::Object(_)) => "an object",
            ResolvedValue::Json(_) => "a scalar",
        }
    }

    /// Split a list value into its items, or hand the value back unchanged
    pub fn into_list(self) -> Result<Vec<ResolvedValue>, ResolvedValue> {
        match self {
            ResolvedValue::List(items) => Ok(items),
            ResolvedValue::Json(Value::Array(items)) => {
                Ok(items.into_iter().map(ResolvedValue::Json).collect())
            }
            other => Err(other),
        }
    }
}

impl fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedValue::Null => f.write_str("Null"),
            ResolvedValue::Undefined => f.write_str("Undefined"),
            ResolvedValue::Json(value) => f.debug_tuple("Json").field(value).finish(),
            ResolvedValue::List(items) => f.debug_tuple("List").field(items).finish(),
            ResolvedValue::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl From<Value> for ResolvedValue {
    fn from(value: Value) -> Self {
        ResolvedValue::Json(value)
    }
}

impl<T: Into<ResolvedValue>> From<Vec<T>> for ResolvedValue {
    fn from(items: Vec<T>) -> Self {
        ResolvedValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ResolvedValue>> From<Option<T>> for ResolvedValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ResolvedValue::Null)
    }
}

impl From<Arc<dyn ObjectValue>> for ResolvedValue {
    fn from(value: Arc<dyn ObjectValue>) -> Self {
        ResolvedValue::Object(value)
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ResolvedValue {
                fn from(value: $ty) -> Self {
                    ResolvedValue::Json(Value::from(value))
                }
            }
        )*
    };
}

impl_from_scalar!(bool, i32, i64, u32, u64, f64, String, &str);

/// Outcome of invoking a resolver
pub enum Resolution {
    Ready(ResolvedValue),
    Pending(BoxFuture<'static, anyhow::Result<ResolvedValue>>),
    Failed(anyhow::Error),
}

impl Resolution {
    pub fn ready(value: impl Into<ResolvedValue>) -> Self {
        Resolution::Ready(value.into())
    }

    pub fn pending<F, T>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Into<ResolvedValue>,
    {
        Resolution::Pending(future.map(|result| result.map(Into::into)).boxed())
    }

    pub fn failed(err: impl Into<anyhow::Error>) -> Self {
        Resolution::Failed(err.into())
    }

    /// Wait for the outcome. This is the only point where field execution suspends.
    pub async fn settle(self) -> anyhow::Result<ResolvedValue> {
        match self {
            Resolution::Ready(value) => Ok(value),
            Resolution::Pending(future) => future.await,
            Resolution::Failed(err) => Err(err),
        }
    }
}

impl<T: Into<ResolvedValue>> From<anyhow::Result<T>> for Resolution {
    fn from(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(value) => Resolution::Ready(value.into()),
            Err(err) => Resolution::Failed(err),
        }
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Resolution::Pending(_) => f.write_str("Pending(..)"),
            Resolution::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}
