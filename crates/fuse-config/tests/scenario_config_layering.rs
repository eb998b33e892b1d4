//! Layered loading, hashing and the secret-literal guard.

use fuse_config::{load_layered_yaml, load_layered_yaml_from_strings, GatewayConfig};

const BASE_YAML: &str = r#"
server:
  addr: "127.0.0.1:8080"
upstream:
  base_url: "https://cloud.iexapis.com/stable"
  timeout_ms: 10000
  token_env: "IEX_TOKEN"
"#;

/// Same content as BASE_YAML with keys in a different order.
const BASE_YAML_REORDERED: &str = r#"
upstream:
  token_env: "IEX_TOKEN"
  timeout_ms: 10000
  base_url: "https://cloud.iexapis.com/stable"
server:
  addr: "127.0.0.1:8080"
"#;

const OVERLAY_YAML: &str = r#"
upstream:
  timeout_ms: 2500
"#;

fn repo_config(name: &str) -> String {
    format!("{}/../../config/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
}

#[test]
fn overlay_overrides_only_what_it_names() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    let cfg = GatewayConfig::from_config_json(&loaded.config_json).unwrap();
    assert_eq!(cfg.upstream.timeout_ms, 2500);
    assert_eq!(cfg.upstream.base_url, "https://cloud.iexapis.com/stable");

    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_ne!(base.config_hash, loaded.config_hash);
}

#[test]
fn hash_is_64_hex_chars() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(loaded.config_hash.len(), 64);
    assert!(loaded.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn empty_layers_are_ignored() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML, ""]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
}

#[test]
fn literal_iex_token_is_rejected() {
    let yaml = r#"
upstream:
  token_env: "pk_0123456789abcdef0123456789abcdef"
"#;
    let err = load_layered_yaml_from_strings(&[yaml]).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("CONFIG_SECRET_DETECTED"), "{msg}");
    assert!(msg.contains("/upstream/token_env"), "{msg}");
    assert!(!msg.contains("pk_0123456789abcdef"), "{msg}");
}

#[test]
fn invalid_yaml_is_an_error() {
    assert!(load_layered_yaml_from_strings(&["server: [unterminated"]).is_err());
}

#[test]
fn shipped_config_files_load_and_layer() {
    let base = repo_config("gateway.yaml");
    let sandbox = repo_config("sandbox.yaml");

    let loaded = load_layered_yaml(&[base.as_str(), sandbox.as_str()]).unwrap();
    let cfg = GatewayConfig::from_config_json(&loaded.config_json).unwrap();
    assert_eq!(cfg.upstream.base_url, "https://sandbox.iexapis.com/stable");
    assert_eq!(cfg.routes.historical, "/iex/historicalPrice");
}

#[test]
fn missing_file_names_the_path() {
    let err = load_layered_yaml(&["/definitely/not/here.yaml"]).unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.yaml"));
}
