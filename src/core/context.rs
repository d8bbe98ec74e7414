//! Operation context shared by every resolver of one operation

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::any::{Any, type_name};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Application value created once per operation
///
/// Resolvers receive it by shared reference. It is read-mostly by contract:
/// the engine never mutates it and does not guard against resolvers that do
/// (use interior mutability inside your own type if you need it).
#[derive(Clone)]
pub struct OperationContext {
    data: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl OperationContext {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            data: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// A context carrying no application data
    pub fn empty() -> Self {
        Self::new(())
    }

    /// Borrow the application value if it is a `T`
    pub fn try_data<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    /// Borrow the application value as a `T`, failing if it is something else
    pub fn data<T: Any>(&self) -> Result<&T> {
        self.try_data::<T>().ok_or_else(|| {
            anyhow!(
                "Operation context holds {}, not {}",
                self.type_name,
                type_name::<T>()
            )
        })
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for OperationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationContext")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Produces the [`OperationContext`] of an operation
///
/// Called exactly once per operation, before any field resolves. Implemented
/// for async closures returning `anyhow::Result<T>` and for a ready context.
///
/// # Example
///
/// ```rust,ignore
/// let factory = move || {
///     let db = pool.clone();
///     async move { Ok(AppContext { db }) }
/// };
/// executor.execute(&operation, json!({}), &factory, Variables::new()).await;
/// ```
#[async_trait]
pub trait ContextFactory: Send + Sync {
    async fn create(&self) -> Result<OperationContext>;
}

#[async_trait]
impl<F, Fut, T> ContextFactory for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Any + Send + Sync,
{
    async fn create(&self) -> Result<OperationContext> {
        let value = (self)().await?;
        Ok(OperationContext::new(value))
    }
}

#[async_trait]
impl ContextFactory for OperationContext {
    async fn create(&self) -> Result<OperationContext> {
        Ok(self.clone())
    }
}
