//! Tests for loading relay configuration from YAML files and overrides

use invoice_relay::config::{ENV_BIND_ADDR, ENV_WEBHOOK_IMAGE, ENV_WEBHOOK_PDF};
use invoice_relay::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn yaml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

#[test]
fn test_full_yaml_file() {
    let file = yaml_file(
        r#"
bind_addr: 0.0.0.0:8080
max_upload_bytes: 1048576
request_timeout_secs: 15
webhooks:
  pdf_url: https://automation.example.com/webhook/pdf
  image_url: https://automation.example.com/webhook/image
  save_url: https://script.example.com/macros/exec
"#,
    );

    let config = RelayConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.bind_addr, "0.0.0.0:8080");
    assert_eq!(config.max_upload_bytes, 1_048_576);
    assert_eq!(config.request_timeout_secs, 15);
    assert_eq!(
        config.webhooks.document_url(DocumentKind::Pdf),
        Some("https://automation.example.com/webhook/pdf")
    );
    assert_eq!(
        config.webhooks.save_url(),
        Some("https://script.example.com/macros/exec")
    );
}

#[test]
fn test_missing_file() {
    let err = RelayConfig::from_yaml_file("/nonexistent/relay.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::IoError { .. }));
}

#[test]
fn test_parse_error_names_the_file() {
    let file = yaml_file("webhooks: [not, a, map]\n");
    let path = file.path().to_str().unwrap().to_string();

    let err = RelayConfig::from_yaml_file(&path).unwrap_err();
    match err {
        ConfigError::ParseError { file: Some(name), .. } => assert_eq!(name, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_overrides_layer_on_top_of_file() {
    let file =
        yaml_file("webhooks:\n  pdf_url: https://file/pdf\n  image_url: https://file/image\n");

    let config = RelayConfig::from_yaml_file(file.path().to_str().unwrap())
        .unwrap()
        .with_overrides(|key| match key {
            k if k == ENV_WEBHOOK_IMAGE => Some("https://env/image".to_string()),
            k if k == ENV_BIND_ADDR => Some("127.0.0.1:9000".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(
        config.webhooks.document_url(DocumentKind::Pdf),
        Some("https://file/pdf")
    );
    assert_eq!(
        config.webhooks.document_url(DocumentKind::Image),
        Some("https://env/image")
    );
    assert_eq!(config.bind_addr, "127.0.0.1:9000");
}

#[test]
fn test_blank_override_unconfigures_webhook() {
    let config = RelayConfig::from_yaml_str("webhooks:\n  pdf_url: https://file/pdf\n")
        .unwrap()
        .with_overrides(|key| (key == ENV_WEBHOOK_PDF).then(String::new))
        .unwrap();

    assert_eq!(config.webhooks.document_url(DocumentKind::Pdf), None);
}
