//! Schema validation helpers for Recollect JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
///
/// Layers may be partial; only present keys are checked.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, &["$schema", "pipeline", "memory", "model"], layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("pipeline") {
        validate_pipeline(value, layer, "pipeline")?;
    }
    if let Some(value) = map.get("memory") {
        validate_memory(value, layer, "memory")?;
    }
    if let Some(value) = map.get("model") {
        validate_model(value, layer, "model")?;
    }
    Ok(())
}

/// Validate the "pipeline" block.
fn validate_pipeline(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["recall_limit", "semantic_scope"], layer, path)?;

    if let Some(value) = map.get("recall_limit") {
        expect_u64(value, layer, &join_path(path, "recall_limit"))?;
    }
    if let Some(value) = map.get("semantic_scope") {
        expect_string(value, layer, &join_path(path, "semantic_scope"))?;
    }
    Ok(())
}

/// Validate the "memory" block.
fn validate_memory(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["provider", "path", "capture"], layer, path)?;

    if let Some(value) = map.get("provider") {
        expect_string(value, layer, &join_path(path, "provider"))?;
    }
    if let Some(value) = map.get("path") {
        expect_optional_string(value, layer, &join_path(path, "path"))?;
    }
    if let Some(value) = map.get("capture") {
        validate_capture(value, layer, &join_path(path, "capture"))?;
    }
    Ok(())
}

/// Validate the memory capture block.
fn validate_capture(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &[
            "redact_patterns",
            "detect_secrets",
            "secret_entropy_threshold",
            "max_chars",
        ],
        layer,
        path,
    )?;

    if let Some(value) = map.get("redact_patterns") {
        validate_string_array(value, layer, &join_path(path, "redact_patterns"))?;
    }
    if let Some(value) = map.get("detect_secrets") {
        expect_bool(value, layer, &join_path(path, "detect_secrets"))?;
    }
    if let Some(value) = map.get("secret_entropy_threshold") {
        expect_f64(value, layer, &join_path(path, "secret_entropy_threshold"))?;
    }
    if let Some(value) = map.get("max_chars")
        && !value.is_null()
    {
        expect_u64(value, layer, &join_path(path, "max_chars"))?;
    }
    Ok(())
}

/// Validate the "model" block.
fn validate_model(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &[
            "provider",
            "name",
            "base_url",
            "api_key_env",
            "temperature",
            "max_tokens",
        ],
        layer,
        path,
    )?;

    for key in ["provider", "name", "base_url", "api_key_env"] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("temperature")
        && !value.is_null()
    {
        expect_f64(value, layer, &join_path(path, "temperature"))?;
    }
    if let Some(value) = map.get("max_tokens")
        && !value.is_null()
    {
        expect_u64(value, layer, &join_path(path, "max_tokens"))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

fn expect_optional_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() || value.is_null() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string or null"))
    }
}

fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Non-negative integers only.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

fn expect_f64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected number"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Value::Array(arr) = value else {
        return Err(invalid_field(layer, path, "expected array"));
    };
    for (idx, entry) in arr.iter().enumerate() {
        if !entry.is_string() {
            return Err(invalid_field(
                layer,
                &format!("{path}[{idx}]"),
                "expected string",
            ));
        }
    }
    Ok(())
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
