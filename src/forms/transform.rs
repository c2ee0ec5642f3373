//! Cleaning of exported form payloads

use serde_json::Value;

/// Top-level fields that only make sense in the environment a form came from
pub const ENVIRONMENT_FIELDS: &[&str] = &[
    "id",
    "environment",
    "_links",
    "_embedded",
    "createdAt",
    "updatedAt",
    "modifiedAt",
];

/// Strip environment-specific metadata so the payload can be created elsewhere
pub fn clean_form(mut payload: Value) -> Value {
    if let Some(object) = payload.as_object_mut() {
        for field in ENVIRONMENT_FIELDS {
            object.remove(*field);
        }
    }
    payload
}

pub fn form_name(payload: &Value) -> Option<&str> {
    payload.get("name").and_then(Value::as_str)
}

/// Overwrite the form's name. Non-object payloads are left untouched.
pub fn set_form_name(payload: &mut Value, name: &str) {
    if let Some(object) = payload.as_object_mut() {
        object.insert("name".to_string(), Value::String(name.to_string()));
    }
}
