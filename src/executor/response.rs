//! Response assembly
//!
//! Execution produces a tree of [`ResultNode`]s, one per executed field and
//! per list item, in query order. Assembly folds that tree into the final
//! `data` value, applying null propagation, and flattens the recorded errors
//! depth-first so their order follows the query, not completion order.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::error::{ErrorCode, FieldError};
use crate::core::path::ResponsePath;

/// Error entry of a [`Response`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQLError {
    pub message: String,
    pub path: ResponsePath,
    pub extensions: ErrorExtensions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorExtensions {
    pub code: ErrorCode,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>, path: ResponsePath, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            path,
            extensions: ErrorExtensions { code },
        }
    }

    pub fn from_field_error(error: &FieldError, path: ResponsePath) -> Self {
        Self::new(error.to_string(), path, error.error_code())
    }

    pub fn code(&self) -> ErrorCode {
        self.extensions.code
    }
}

/// Result of executing one operation
///
/// Field-level failures never abort execution; they show up here as `errors`
/// next to whatever `data` survived null propagation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub data: Option<Value>,
    pub errors: Vec<GraphQLError>,
}

impl Response {
    /// No errors were recorded
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_json(self) -> Value {
        serde_json::to_value(&self).unwrap_or(Value::Null)
    }

    pub(crate) fn context_failure(err: &anyhow::Error) -> Self {
        Self {
            data: None,
            errors: vec![GraphQLError::new(
                format!("Failed to create operation context: {:#}", err),
                ResponsePath::root(),
                ErrorCode::ContextFailure,
            )],
        }
    }
}

/// Transient per-field result, folded into the response once execution ends
#[derive(Debug)]
pub(crate) struct ResultNode {
    pub path: ResponsePath,
    pub non_null: bool,
    pub error: Option<FieldError>,
    pub kind: ResultKind,
}

#[derive(Debug)]
pub(crate) enum ResultKind {
    Null,
    Leaf(Value),
    Object(Vec<(String, ResultNode)>),
    List(Vec<ResultNode>),
}

impl ResultNode {
    pub fn null(path: ResponsePath) -> Self {
        Self {
            path,
            non_null: false,
            error: None,
            kind: ResultKind::Null,
        }
    }

    pub fn failed(path: ResponsePath, non_null: bool, error: FieldError) -> Self {
        Self {
            path,
            non_null,
            error: Some(error),
            kind: ResultKind::Null,
        }
    }

    pub fn leaf(path: ResponsePath, value: Value) -> Self {
        Self {
            path,
            non_null: false,
            error: None,
            kind: ResultKind::Leaf(value),
        }
    }

    pub fn object(path: ResponsePath, fields: Vec<(String, ResultNode)>) -> Self {
        Self {
            path,
            non_null: false,
            error: None,
            kind: ResultKind::Object(fields),
        }
    }

    pub fn list(path: ResponsePath, items: Vec<ResultNode>) -> Self {
        Self {
            path,
            non_null: false,
            error: None,
            kind: ResultKind::List(items),
        }
    }
}

/// Fold the root selection set into a [`Response`]
pub(crate) fn assemble(root: Vec<(String, ResultNode)>) -> Response {
    let mut errors = Vec::new();
    let data = fold_object(root, &mut errors).map(Value::Object);
    Response { data, errors }
}

/// `None` means the node is null in a non-null position and its parent must
/// be nulled in turn.
fn fold(node: ResultNode, errors: &mut Vec<GraphQLError>) -> Option<Value> {
    let ResultNode {
        path,
        non_null,
        error,
        kind,
    } = node;

    if let Some(error) = error {
        errors.push(GraphQLError::from_field_error(&error, path));
    }

    let value = match kind {
        ResultKind::Null => None,
        ResultKind::Leaf(value) => Some(value),
        ResultKind::Object(fields) => fold_object(fields, errors).map(Value::Object),
        ResultKind::List(items) => fold_list(items, errors).map(Value::Array),
    };

    match value {
        Some(value) => Some(value),
        None if non_null => None,
        None => Some(Value::Null),
    }
}

fn fold_object(
    fields: Vec<(String, ResultNode)>,
    errors: &mut Vec<GraphQLError>,
) -> Option<Map<String, Value>> {
    let mut map = Map::with_capacity(fields.len());
    let mut nulled = false;

    // Keep folding after a bubbled null so later errors are still collected.
    for (key, child) in fields {
        match fold(child, errors) {
            Some(value) => {
                map.insert(key, value);
            }
            None => nulled = true,
        }
    }

    if nulled { None } else { Some(map) }
}

fn fold_list(items: Vec<ResultNode>, errors: &mut Vec<GraphQLError>) -> Option<Vec<Value>> {
    let mut values = Vec::with_capacity(items.len());
    let mut nulled = false;

    for item in items {
        match fold(item, errors) {
            Some(value) => values.push(value),
            None => nulled = true,
        }
    }

    if nulled { None } else { Some(values) }
}
