//! Tests for layered configuration loading.

use super::*;
use crate::PipelineConfig;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Options that ignore the machine's system and user layers.
fn isolated_options(cwd: &Path) -> LayeredConfigOptions {
    let mut options = LayeredConfigOptions::new(cwd);
    options.system_config_path = None;
    options.user_config_path = None;
    options
}

#[test]
fn parse_minimal_config() {
    let config = RecollectConfig::load_from_str("{}").expect("config");
    assert_eq!(config.pipeline.recall_limit, 5);
    assert_eq!(config.memory.provider, "file");
    assert_eq!(config.model.api_key_env, "OPENAI_API_KEY");
}

#[test]
fn parse_full_config() {
    let json5 = r#"{
        // comments are allowed
        pipeline: { recall_limit: 8, semantic_scope: "insurance_semantic_agent" },
        memory: {
            provider: "file",
            path: ".recollect/memory",
            capture: { redact_patterns: ["POL-\\d+"], detect_secrets: false, max_chars: 500 },
        },
        model: { name: "gpt-4.1", base_url: "http://localhost:11434", temperature: 0.2, max_tokens: 400 },
    }"#;
    let config = RecollectConfig::load_from_str(json5).expect("config");
    assert_eq!(config.pipeline.recall_limit, 8);
    assert_eq!(config.pipeline.semantic_scope, "insurance_semantic_agent");
    assert_eq!(config.memory.path.as_deref(), Some(".recollect/memory"));
    assert_eq!(config.memory.capture.redact_patterns, vec!["POL-\\d+".to_string()]);
    assert_eq!(config.memory.capture.detect_secrets, false);
    assert_eq!(config.memory.capture.max_chars, Some(500));
    assert_eq!(config.model.name, "gpt-4.1");
    assert_eq!(config.model.max_tokens, Some(400));
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = RecollectConfig::load_from_str("{ unexpected: true }").unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("unknown key"));
}

#[test]
fn rejects_wrongly_typed_recall_limit() {
    let err = RecollectConfig::load_from_str(r#"{ pipeline: { recall_limit: "five" } }"#)
        .unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("pipeline.recall_limit"));
}

#[test]
fn rejects_zero_recall_limit() {
    let err = RecollectConfig::load_from_str("{ pipeline: { recall_limit: 0 } }").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidField { ref path, .. } if path == "pipeline.recall_limit"
    ));
}

#[test]
fn rejects_blank_semantic_scope() {
    let err =
        RecollectConfig::load_from_str(r#"{ pipeline: { semantic_scope: "  " } }"#).unwrap_err();
    assert!(format!("{err}").contains("semantic_scope"));
}

#[test]
fn rejects_unsupported_providers() {
    let err = RecollectConfig::load_from_str(r#"{ memory: { provider: "qdrant" } }"#).unwrap_err();
    assert!(format!("{err}").contains("qdrant"));
    let err = RecollectConfig::load_from_str(r#"{ model: { provider: "bedrock" } }"#).unwrap_err();
    assert!(format!("{err}").contains("bedrock"));
}

#[test]
fn cwd_layer_overrides_project_layer() {
    let temp = TempDir::new().expect("tmp");
    let project_root = temp.path().join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");

    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ pipeline: { recall_limit: 3, semantic_scope: "project_agent" } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        "{ pipeline: { recall_limit: 7 } }",
    );

    let layered = RecollectConfig::load_layered_with_options(isolated_options(&cwd))
        .expect("layered");
    assert_eq!(layered.config.pipeline.recall_limit, 7);
    assert_eq!(layered.config.pipeline.semantic_scope, "project_agent");
    let sources = layered
        .layers
        .iter()
        .map(|layer| layer.source)
        .collect::<Vec<_>>();
    assert_eq!(
        sources,
        vec![ConfigLayerSource::Project, ConfigLayerSource::Cwd]
    );
}

#[test]
fn runtime_override_wins() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let system_config = root.join("system.json5");
    write_json5(&system_config, r#"{ model: { name: "system-model" } }"#);
    let user_config = root.join("user.json5");
    write_json5(&user_config, r#"{ model: { name: "user-model" } }"#);
    let runtime_config = root.join("runtime.json5");
    write_json5(&runtime_config, r#"{ model: { name: "runtime-model" } }"#);

    let mut options = isolated_options(root).with_runtime_path(&runtime_config);
    options.system_config_path = Some(system_config);
    options.user_config_path = Some(user_config);

    let layered = RecollectConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.model.name, "runtime-model");
    assert_eq!(layered.layers.len(), 3);
}

#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_runtime_path(temp.path().join("nope.json5"));
    let err = RecollectConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

#[test]
fn invalid_layer_names_its_source() {
    let temp = TempDir::new().expect("tmp");
    write_json5(
        &temp.path().join(DEFAULT_CONFIG_FILE),
        "{ memory: { capture: { detect_secrets: \"yes\" } } }",
    );
    let err = RecollectConfig::load_layered_with_options(isolated_options(temp.path()))
        .unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("));
    assert!(msg.contains("memory.capture.detect_secrets"));
}

#[test]
fn builder_replaces_sections() {
    let config = RecollectConfig::builder()
        .pipeline(PipelineConfig {
            recall_limit: 10,
            semantic_scope: "insurance_semantic_agent".to_string(),
        })
        .build();
    assert_eq!(config.pipeline.recall_limit, 10);
    assert_eq!(config.memory.provider, "file");
    config.validate().expect("valid");
}

#[test]
fn rejects_invalid_redact_pattern() {
    let err = RecollectConfig::load_from_str(
        r#"{ memory: { capture: { redact_patterns: ["POL-\\d+", "("] } } }"#,
    )
    .expect_err("unbalanced group");
    assert!(matches!(
        err,
        ConfigError::InvalidField { ref path, .. } if path == "memory.capture.redact_patterns[1]"
    ));
}
