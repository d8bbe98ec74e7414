//! Argument resolution: variable substitution and schema defaults

use serde_json::Value;

use super::Variables;
use crate::core::query::{FieldNode, InputValue};
use crate::core::resolver::Arguments;

/// Finalize the arguments of `field`
///
/// An argument bound directly to a missing variable takes its schema default
/// or is left out. Variables missing deeper inside lists and objects become
/// null. Arguments absent from the query take their schema default.
pub(crate) fn resolve_arguments(field: &FieldNode, variables: &Variables) -> Arguments {
    let mut resolved = Arguments::new();

    for (name, input) in &field.arguments {
        match input {
            InputValue::Variable(variable) => {
                if let Some(value) = variables.get(variable) {
                    resolved.insert(name.clone(), value.clone());
                } else if let Some(default) = field.argument_defaults.get(name) {
                    resolved.insert(name.clone(), default.clone());
                }
            }
            other => resolved.insert(name.clone(), substitute(other, variables)),
        }
    }

    for (name, default) in &field.argument_defaults {
        if !resolved.contains(name) && !field.arguments.contains_key(name) {
            resolved.insert(name.clone(), default.clone());
        }
    }

    resolved
}

fn substitute(input: &InputValue, variables: &Variables) -> Value {
    match input {
        InputValue::Literal(value) => value.clone(),
        InputValue::Variable(variable) => variables.get(variable).cloned().unwrap_or(Value::Null),
        InputValue::List(items) => {
            Value::Array(items.iter().map(|item| substitute(item, variables)).collect())
        }
        InputValue::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), substitute(value, variables)))
                .collect(),
        ),
    }
}
