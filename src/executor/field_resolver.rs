//! Field resolution and value completion
//!
//! Each field resolves against its parent value, suspends once while its
//! resolver settles, then completes the settled value against the field's
//! declared type, recursing into child selections and list items.

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use super::arguments;
use super::core::ExecutionContext;
use super::response::ResultNode;
use crate::core::error::FieldError;
use crate::core::path::ResponsePath;
use crate::core::query::{FieldNode, TypeRef};
use crate::core::resolver::ResolveInfo;
use crate::core::value::ResolvedValue;

/// Meta field answered by the engine itself
pub const TYPENAME_FIELD: &str = "__typename";

/// How the fields of one selection set are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExecutionMode {
    /// Fan out and join
    Concurrent,
    /// One field at a time, in declared order (mutation root)
    Serial,
}

/// The field being completed and the type that owns it
#[derive(Clone, Copy)]
struct FieldScope<'a> {
    parent_type: &'a str,
    field: &'a FieldNode,
}

impl FieldScope<'_> {
    fn non_null_violation(&self) -> FieldError {
        FieldError::NonNullViolation {
            type_name: self.parent_type.to_string(),
            field_name: self.field.name.clone(),
        }
    }

    fn type_mismatch(&self, expected: &'static str, found: &'static str) -> FieldError {
        FieldError::TypeMismatch {
            type_name: self.parent_type.to_string(),
            field_name: self.field.name.clone(),
            expected,
            found,
        }
    }
}

/// Execute every field of a selection set against `parent`
///
/// Results come back in declared order whatever the completion order was.
pub(crate) fn execute_selection_set<'a>(
    ectx: &'a ExecutionContext<'a>,
    parent_type: &'a str,
    parent: &'a ResolvedValue,
    selections: &'a [FieldNode],
    path: &'a ResponsePath,
    mode: ExecutionMode,
) -> BoxFuture<'a, Vec<(String, ResultNode)>> {
    async move {
        let nodes = match mode {
            ExecutionMode::Concurrent => {
                let futures: Vec<BoxFuture<'a, ResultNode>> = selections
                    .iter()
                    .map(|field| execute_field(ectx, parent_type, parent, field, path))
                    .collect();
                ectx.fan_out(futures).await
            }
            ExecutionMode::Serial => {
                let mut nodes = Vec::with_capacity(selections.len());
                for field in selections {
                    nodes.push(execute_field(ectx, parent_type, parent, field, path).await);
                }
                nodes
            }
        };

        selections
            .iter()
            .map(|field| field.response_key().to_string())
            .zip(nodes)
            .collect()
    }
    .boxed()
}

fn execute_field<'a>(
    ectx: &'a ExecutionContext<'a>,
    parent_type: &'a str,
    parent: &'a ResolvedValue,
    field: &'a FieldNode,
    parent_path: &'a ResponsePath,
) -> BoxFuture<'a, ResultNode> {
    async move {
        let path = parent_path.child_key(field.response_key());
        let scope = FieldScope { parent_type, field };

        if field.name == TYPENAME_FIELD {
            let value = ResolvedValue::Json(Value::String(parent_type.to_string()));
            return complete_value(ectx, scope, &field.field_type, value, path).await;
        }

        let args = arguments::resolve_arguments(field, ectx.variables);
        let resolver = ectx
            .registry
            .lookup(parent_type, &field.name)
            .unwrap_or(ectx.default_resolver);

        let resolution = {
            let info = ResolveInfo {
                field_name: &field.name,
                response_key: field.response_key(),
                parent_type,
                return_type: &field.field_type,
                path: path.clone(),
                root_type: &ectx.operation.root_type,
                operation_name: ectx.operation.name.as_deref(),
                field,
            };
            tracing::trace!(path = %path, parent_type, field = %field.name, "Resolving field");
            resolver.call(parent, &args, ectx.context, &info)
        };

        match resolution.settle().await {
            Ok(value) => complete_value(ectx, scope, &field.field_type, value, path).await,
            Err(err) => field_error(
                path,
                field.field_type.is_non_null(),
                FieldError::resolver_failure(&err),
            ),
        }
    }
    .boxed()
}

/// Complete a settled value against `ty`
///
/// Non-null layers check for null, list layers fan out over items, and named
/// types either yield a leaf or execute the child selection set.
fn complete_value<'a>(
    ectx: &'a ExecutionContext<'a>,
    scope: FieldScope<'a>,
    ty: &'a TypeRef,
    value: ResolvedValue,
    path: ResponsePath,
) -> BoxFuture<'a, ResultNode> {
    async move {
        match ty {
            TypeRef::NonNull(inner) => {
                if value.is_null() {
                    return field_error(path, true, scope.non_null_violation());
                }
                let mut node = complete_value(ectx, scope, inner, value, path).await;
                node.non_null = true;
                node
            }
            _ if value.is_null() => ResultNode::null(path),
            TypeRef::List(item_type) => {
                let items = match value.into_list() {
                    Ok(items) => items,
                    Err(other) => {
                        return field_error(path, false, scope.type_mismatch("a list", other.kind()));
                    }
                };

                let futures: Vec<BoxFuture<'a, ResultNode>> = items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| {
                        complete_value(ectx, scope, item_type, item, path.child_index(index))
                    })
                    .collect();
                let nodes = ectx.fan_out(futures).await;
                ResultNode::list(path, nodes)
            }
            TypeRef::Named(type_name) => {
                if value.is_list() {
                    return field_error(
                        path,
                        false,
                        scope.type_mismatch("a single value", "a list"),
                    );
                }

                if scope.field.is_leaf() {
                    return match value {
                        ResolvedValue::Json(json) => ResultNode::leaf(path, json),
                        other => {
                            field_error(path, false, scope.type_mismatch("a scalar", other.kind()))
                        }
                    };
                }

                let fields = execute_selection_set(
                    ectx,
                    type_name,
                    &value,
                    &scope.field.selection_set,
                    &path,
                    ExecutionMode::Concurrent,
                )
                .await;
                ResultNode::object(path, fields)
            }
        }
    }
    .boxed()
}

fn field_error(path: ResponsePath, non_null: bool, error: FieldError) -> ResultNode {
    tracing::debug!(
        path = %path,
        code = error.error_code().as_str(),
        "Field error: {}",
        error
    );
    ResultNode::failed(path, non_null, error)
}
