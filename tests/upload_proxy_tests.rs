//! Tests for the upload relay route
//!
//! These tests verify that:
//! - Documents are routed to the PDF or image webhook by MIME type
//! - The raw bytes, content type and filename are forwarded
//! - Missing files, missing configuration and upstream failures map to
//!   the right statuses

mod support;

use axum::http::StatusCode;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use invoice_relay::prelude::*;
use serde_json::{Value, json};
use support::{Call, IMAGE_URL, PDF_URL, RecordingClient, Reply, full_config, relay_app};

fn server_with(config: RelayConfig, client: &RecordingClient) -> TestServer {
    TestServer::new(relay_app(config, client.clone())).expect("Failed to create test server")
}

fn file_form(name: &str, mime: &str, bytes: &'static [u8]) -> MultipartForm {
    MultipartForm::new().add_part("file", Part::bytes(bytes).file_name(name).mime_type(mime))
}

fn extracted() -> Value {
    json!({
        "output": {
            "invoice_number": "123",
            "item_name": "Paper",
            "quantity": 4,
            "total_amount": 22.68
        }
    })
}

// =============================================================================
// Routing
// =============================================================================

mod routing_tests {
    use super::*;

    #[tokio::test]
    async fn test_pdf_goes_to_pdf_webhook() {
        let client = RecordingClient::replying(Reply::Json(extracted()));
        let server = server_with(full_config(), &client);

        let response = server
            .post("/api/upload")
            .multipart(file_form("inv.pdf", "application/pdf", b"%PDF-1.7 body"))
            .await;
        response.assert_status_ok();

        assert_eq!(
            client.calls(),
            vec![Call::Document {
                url: PDF_URL.to_string(),
                file_name: "inv.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                bytes: b"%PDF-1.7 body".to_vec(),
            }]
        );
    }

    #[tokio::test]
    async fn test_image_goes_to_image_webhook() {
        let client = RecordingClient::replying(Reply::Json(extracted()));
        let server = server_with(full_config(), &client);

        server
            .post("/api/upload")
            .multipart(file_form("scan.png", "image/png", b"\x89PNG"))
            .await
            .assert_status_ok();

        match client.calls().as_slice() {
            [Call::Document { url, content_type, .. }] => {
                assert_eq!(url, IMAGE_URL);
                assert_eq!(content_type, "image/png");
            }
            other => panic!("unexpected calls: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_any_non_pdf_type_goes_to_image_webhook() {
        for mime in ["text/plain", "application/msword", "application/x-pdfish"] {
            let client = RecordingClient::replying(Reply::Json(extracted()));
            let server = server_with(full_config(), &client);

            server
                .post("/api/upload")
                .multipart(file_form("doc", mime, b"data"))
                .await
                .assert_status_ok();

            let expected = if mime.contains("pdf") { PDF_URL } else { IMAGE_URL };
            match client.calls().as_slice() {
                [Call::Document { url, .. }] => assert_eq!(url, expected, "{mime}"),
                other => panic!("unexpected calls for {mime}: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_upstream_json_is_returned_unmodified() {
        let reply = json!([{ "output": { "invoice_number": "A-1", "extra": [1, 2] } }]);
        let client = RecordingClient::replying(Reply::Json(reply.clone()));
        let server = server_with(full_config(), &client);

        let response = server
            .post("/api/upload")
            .multipart(file_form("inv.pdf", "application/pdf", b"%PDF"))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), reply);
    }

    #[tokio::test]
    async fn test_upstream_json_text_is_passed_through() {
        let reply = r#"{"output":{"total_amount":22.680,"invoice_number":"A-1","discount":1.10}}"#;
        let client = RecordingClient::replying(Reply::Raw(reply));
        let server = server_with(full_config(), &client);

        let response = server
            .post("/api/upload")
            .multipart(file_form("inv.pdf", "application/pdf", b"%PDF"))
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), reply);
    }
}

// =============================================================================
// Invalid input
// =============================================================================

mod input_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_field_is_bad_request() {
        let client = RecordingClient::replying(Reply::Json(extracted()));
        let server = server_with(full_config(), &client);

        let form = MultipartForm::new().add_part(
            "document",
            Part::bytes(b"%PDF".as_slice())
                .file_name("inv.pdf")
                .mime_type("application/pdf"),
        );
        let response = server.post("/api/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["message"], "No file uploaded or invalid file");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_text_field_named_file_is_not_a_file() {
        let client = RecordingClient::replying(Reply::Json(extracted()));
        let server = server_with(full_config(), &client);

        let form = MultipartForm::new().add_text("file", "just text");
        let response = server.post("/api/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_bad_request() {
        let client = RecordingClient::replying(Reply::Json(extracted()));
        let server = server_with(full_config(), &client);

        let response = server
            .post("/api/upload")
            .json(&json!({ "file": "inv.pdf" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "INVALID_FORM");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_forwarded_as_octet_stream() {
        let client = RecordingClient::replying(Reply::Json(extracted()));
        let server = server_with(full_config(), &client);

        let form = MultipartForm::new()
            .add_part("file", Part::bytes(b"raw".as_slice()).file_name("blob.bin"));
        server
            .post("/api/upload")
            .multipart(form)
            .await
            .assert_status_ok();

        match client.calls().as_slice() {
            [Call::Document { url, content_type, .. }] => {
                assert_eq!(url, IMAGE_URL);
                assert_eq!(content_type, "application/octet-stream");
            }
            other => panic!("unexpected calls: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let client = RecordingClient::replying(Reply::Json(extracted()));
        let config = RelayConfig {
            max_upload_bytes: 256,
            ..full_config()
        };
        let server = server_with(config, &client);

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(vec![b'x'; 4096])
                .file_name("big.pdf")
                .mime_type("application/pdf"),
        );
        let response = server.post("/api/upload").multipart(form).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert!(client.calls().is_empty());
    }
}

// =============================================================================
// Configuration and upstream failures
// =============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_pdf_webhook_makes_no_call() {
        let client = RecordingClient::replying(Reply::Json(extracted()));
        let mut config = full_config();
        config.webhooks.pdf_url = None;
        let server = server_with(config, &client);

        let response = server
            .post("/api/upload")
            .multipart(file_form("inv.pdf", "application/pdf", b"%PDF"))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>()["message"], "Webhook URL is missing");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_image_webhook_still_serves_pdf() {
        let client = RecordingClient::replying(Reply::Json(extracted()));
        let mut config = full_config();
        config.webhooks.image_url = Some("  ".to_string());
        let server = server_with(config, &client);

        server
            .post("/api/upload")
            .multipart(file_form("scan.jpg", "image/jpeg", b"jpeg"))
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        server
            .post("/api/upload")
            .multipart(file_form("inv.pdf", "application/pdf", b"%PDF"))
            .await
            .assert_status_ok();

        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_upstream_error_status_carries_text() {
        let client =
            RecordingClient::replying(Reply::Status(404, "Workflow not active".to_string()));
        let server = server_with(full_config(), &client);

        let response = server
            .post("/api/upload")
            .multipart(file_form("inv.pdf", "application/pdf", b"%PDF"))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.json::<Value>();
        assert_eq!(body["message"], "Error from webhook");
        assert_eq!(body["error"], "Workflow not active");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_server_error() {
        let client = RecordingClient::replying(Reply::Unreachable);
        let server = server_with(full_config(), &client);

        let response = server
            .post("/api/upload")
            .multipart(file_form("inv.pdf", "application/pdf", b"%PDF"))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>()["code"], "UPSTREAM_UNREACHABLE");
    }
}
