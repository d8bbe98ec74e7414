//! Core executor orchestration

use futures::StreamExt;
use futures::future::join_all;
use futures::stream;
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::Variables;
use super::field_resolver::{ExecutionMode, execute_selection_set};
use super::response::{self, Response};
use crate::config::ExecutorConfig;
use crate::core::context::{ContextFactory, OperationContext};
use crate::core::path::ResponsePath;
use crate::core::query::{Operation, OperationKind};
use crate::core::resolver::Resolver;
use crate::core::value::ResolvedValue;
use crate::resolvers::{Registry, default_resolver};

/// Executes validated operations against a resolver registry
///
/// One executor can run any number of operations concurrently; each gets its
/// own context and result tree while the registry is shared read-only.
#[derive(Debug, Clone)]
pub struct Executor {
    registry: Arc<Registry>,
    default_resolver: Resolver,
    config: ExecutorConfig,
}

/// State shared by every field task of one operation
pub(crate) struct ExecutionContext<'a> {
    pub registry: &'a Registry,
    pub default_resolver: &'a Resolver,
    pub config: &'a ExecutorConfig,
    pub operation: &'a Operation,
    pub context: &'a OperationContext,
    pub variables: &'a Variables,
}

impl ExecutionContext<'_> {
    /// Poll sibling tasks concurrently and join them, keeping input order
    pub async fn fan_out<F: Future>(&self, futures: Vec<F>) -> Vec<F::Output> {
        match self.config.max_concurrency {
            Some(limit) => {
                stream::iter(futures)
                    .buffered(limit.max(1))
                    .collect()
                    .await
            }
            None => join_all(futures).await,
        }
    }
}

impl Executor {
    /// Create an executor with the default configuration and default resolver
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            default_resolver: default_resolver(),
            config: ExecutorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the fallback used for fields without a registered resolver
    pub fn with_default_resolver(mut self, resolver: Resolver) -> Self {
        self.default_resolver = resolver;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute one operation
    ///
    /// The context factory runs once before any field resolves. Field-level
    /// failures are reported in the returned [`Response`], never as an `Err`.
    pub async fn execute(
        &self,
        operation: &Operation,
        root_value: impl Into<ResolvedValue>,
        context_factory: &dyn ContextFactory,
        variables: Variables,
    ) -> Response {
        let root_value = root_value.into();
        let span = tracing::debug_span!(
            "execute",
            operation_id = %Uuid::new_v4(),
            root_type = %operation.root_type,
            operation_name = operation.name.as_deref().unwrap_or("<anonymous>"),
        );

        self.execute_operation(operation, root_value, context_factory, variables)
            .instrument(span)
            .await
    }

    async fn execute_operation(
        &self,
        operation: &Operation,
        root_value: ResolvedValue,
        context_factory: &dyn ContextFactory,
        variables: Variables,
    ) -> Response {
        let context = match context_factory.create().await {
            Ok(context) => context,
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "Failed to create operation context");
                return Response::context_failure(&err);
            }
        };

        let ectx = ExecutionContext {
            registry: &self.registry,
            default_resolver: &self.default_resolver,
            config: &self.config,
            operation,
            context: &context,
            variables: &variables,
        };

        let mode = match operation.kind {
            OperationKind::Query => ExecutionMode::Concurrent,
            OperationKind::Mutation => ExecutionMode::Serial,
        };

        let root_path = ResponsePath::root();
        let fields = execute_selection_set(
            &ectx,
            &operation.root_type,
            &root_value,
            &operation.selection_set,
            &root_path,
            mode,
        )
        .await;

        let response = response::assemble(fields);
        tracing::debug!(
            errors = response.errors.len(),
            data_nulled = response.data.is_none(),
            "Operation executed"
        );
        response
    }
}

/// Execute one operation with a throwaway [`Executor`]
pub async fn execute(
    operation: &Operation,
    registry: Arc<Registry>,
    root_value: impl Into<ResolvedValue>,
    context_factory: &dyn ContextFactory,
    variables: Variables,
) -> Response {
    Executor::new(registry)
        .execute(operation, root_value, context_factory, variables)
        .await
}
