//! Validated query tree handed to the executor
//!
//! The tree is produced by an external parser/validator. It is immutable once
//! built and shared read-only by every task of one operation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Type descriptor of a field as declared in the schema
///
/// `List` and `NonNull` wrap the inner type so that `[Book!]!` keeps the
/// nullability of its items apart from the nullability of the list itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// A nullable named type
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Wrap this type as non-null. Already non-null types are returned as-is.
    pub fn non_null(self) -> Self {
        match self {
            TypeRef::NonNull(_) => self,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    /// Wrap this type as a nullable list of itself
    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Whether the outermost nullable layer is a list
    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::NonNull(inner) => inner.is_list(),
            TypeRef::List(_) => true,
            TypeRef::Named(_) => false,
        }
    }

    /// The innermost named type (`Book` for `[Book!]!`)
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    /// Strip one non-null layer, if any
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// Argument value as written in the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputValue {
    Literal(Value),
    Variable(String),
    List(Vec<InputValue>),
    Object(IndexMap<String, InputValue>),
}

impl InputValue {
    pub fn variable(name: impl Into<String>) -> Self {
        InputValue::Variable(name.into())
    }
}

impl From<Value> for InputValue {
    fn from(value: Value) -> Self {
        InputValue::Literal(value)
    }
}

/// One field occurrence in the query tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNode {
    pub name: String,

    #[serde(default)]
    pub alias: Option<String>,

    /// Arguments written in the query, in query order
    #[serde(default)]
    pub arguments: IndexMap<String, InputValue>,

    /// Defaults declared by the schema for this field's arguments
    #[serde(default)]
    pub argument_defaults: IndexMap<String, Value>,

    pub field_type: TypeRef,

    /// Child selections, empty for leaf fields
    #[serde(default)]
    pub selection_set: Vec<FieldNode>,
}

impl FieldNode {
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            alias: None,
            arguments: IndexMap::new(),
            argument_defaults: IndexMap::new(),
            field_type,
            selection_set: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn argument(mut self, name: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    pub fn argument_default(mut self, name: impl Into<String>, value: Value) -> Self {
        self.argument_defaults.insert(name.into(), value);
        self
    }

    /// Append a child selection
    pub fn select(mut self, child: FieldNode) -> Self {
        self.selection_set.push(child);
        self
    }

    /// Key under which this field appears in the response
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn is_leaf(&self) -> bool {
        self.selection_set.is_empty()
    }
}

/// Kind of root operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    #[default]
    Query,
    Mutation,
}

/// A validated operation: its root type and root selection set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub kind: OperationKind,

    #[serde(default)]
    pub name: Option<String>,

    pub root_type: String,

    pub selection_set: Vec<FieldNode>,
}

impl Operation {
    /// A query rooted at `root_type`
    pub fn query(root_type: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Query,
            name: None,
            root_type: root_type.into(),
            selection_set: Vec::new(),
        }
    }

    /// A mutation rooted at `root_type`
    pub fn mutation(root_type: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Mutation,
            ..Self::query(root_type)
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn select(mut self, field: FieldNode) -> Self {
        self.selection_set.push(field);
        self
    }
}
