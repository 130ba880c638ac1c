//! Request validation as a parse step.
//!
//! Untyped JSON bodies and path segments go in, typed task input or a
//! [`ValidationError`] comes out. Rules are checked in a fixed order
//! (title, priority, status, description) and the first failure wins.
//! Nothing here touches the store.

use serde_json::{Map, Value};

use crate::errors::ValidationError;
use crate::task::{NewTask, Priority, TaskId, TaskPatch, TaskStatus};

/// Parse a path segment into a task id.
pub fn parse_id(raw: &str) -> Result<TaskId, ValidationError> {
    raw.parse().map_err(|_| ValidationError::InvalidId)
}

/// Parse a POST body. `title` is mandatory; a supplied `status` is
/// validated but new tasks always start pending.
///
/// A falsy title (`""`, `false`, `0`) counts as missing rather than empty.
pub fn parse_new_task(body: &Value) -> Result<NewTask, ValidationError> {
    let obj = as_object(body)?;

    let title = match supplied(obj, "title").filter(|v| !is_falsy(v)) {
        Some(v) => parse_title(v)?,
        None => return Err(ValidationError::TitleMissing),
    };
    let priority = supplied(obj, "priority")
        .map(parse_priority)
        .transpose()?
        .unwrap_or_default();
    if let Some(v) = supplied(obj, "status") {
        parse_status(v)?;
    }
    let description = parse_description(obj.get("description"))?.flatten();

    Ok(NewTask {
        title,
        description,
        priority,
    })
}

/// Parse a PUT body into a presence-based patch.
///
/// Omitted fields stay `None`. `null` counts as omitted for title, status
/// and priority, and as "clear" for description.
pub fn parse_task_patch(body: &Value) -> Result<TaskPatch, ValidationError> {
    let obj = as_object(body)?;

    let title = supplied(obj, "title").map(parse_title).transpose()?;
    let priority = supplied(obj, "priority").map(parse_priority).transpose()?;
    let status = supplied(obj, "status").map(parse_status).transpose()?;
    let description = parse_description(obj.get("description"))?;

    Ok(TaskPatch {
        title,
        description,
        status,
        priority,
    })
}

/// Accepts a JSON integer (or a whole-valued float such as `2.0`) or a
/// string holding an integer, in `1..=3`.
pub fn parse_priority(value: &Value) -> Result<Priority, ValidationError> {
    let raw = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    raw.and_then(|n| Priority::try_from(n).ok())
        .ok_or(ValidationError::InvalidPriority)
}

pub fn parse_status(value: &Value) -> Result<TaskStatus, ValidationError> {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or(ValidationError::InvalidStatus)
}

fn parse_title(value: &Value) -> Result<String, ValidationError> {
    let title = value.as_str().ok_or(ValidationError::TitleNotString)?;
    if title.trim().is_empty() {
        return Err(ValidationError::TitleEmpty);
    }
    Ok(title.to_string())
}

fn parse_description(value: Option<&Value>) -> Result<Option<Option<String>>, ValidationError> {
    match value {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
        Some(_) => Err(ValidationError::DescriptionNotString),
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or(ValidationError::BodyNotObject)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Field value, treating explicit `null` as absent.
fn supplied<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}
