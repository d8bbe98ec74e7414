//! Fallback used when the registry has no entry for a field
//!
//! The parent is asked for a member named like the field (the field name, not
//! its alias):
//!
//! - no such member: `Undefined`
//! - an invocable member: invoked with `(args, context, info)`
//! - anything else: the member's value as-is
//!
//! A JSON object parent is read by key. Scalars, lists and null parents have
//! no members.

use serde_json::Value;

use crate::core::context::OperationContext;
use crate::core::resolver::{Arguments, ResolveInfo, Resolver};
use crate::core::value::{Member, Resolution, ResolvedValue};

/// The default resolver as a [`Resolver`] handle
pub fn default_resolver() -> Resolver {
    Resolver::new(resolve_default)
}

pub fn resolve_default(
    parent: &ResolvedValue,
    args: &Arguments,
    context: &OperationContext,
    info: &ResolveInfo<'_>,
) -> Resolution {
    match parent {
        ResolvedValue::Object(object) => match object.member(info.field_name) {
            Some(Member::Value(value)) => Resolution::Ready(value),
            Some(Member::Method(method)) => method(args, context, info),
            None => Resolution::Ready(ResolvedValue::Undefined),
        },
        ResolvedValue::Json(Value::Object(map)) => Resolution::Ready(
            map.get(info.field_name)
                .cloned()
                .map(ResolvedValue::Json)
                .unwrap_or(ResolvedValue::Undefined),
        ),
        _ => Resolution::Ready(ResolvedValue::Undefined),
    }
}
