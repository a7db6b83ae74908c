use std::collections::BTreeMap;

use llm_relay::{ApiFormat, LlmConfig, RelayError, TranslationRelay, TranslationRequest};
use mockito::{Matcher, Server};
use reqwest::StatusCode;
use serde_json::json;

const SPANISH_PROMPT: &str = "Translate the following text from Spanish to English. \
                              Only return the translation, nothing else:\n\nHola mundo";

fn config(url: &str, format: Option<ApiFormat>) -> LlmConfig {
    let mut cfg = LlmConfig::new("custom-1", "Test", url, "llama3.1");
    cfg.format = format;
    cfg
}

fn request(config: LlmConfig) -> TranslationRequest {
    TranslationRequest {
        text: Some("Hola mundo".into()),
        source_lang: Some("es".into()),
        target_lang: Some("en".into()),
        config: Some(config),
    }
}

fn relay() -> TranslationRelay {
    TranslationRelay::new(None).expect("relay should build")
}

#[tokio::test]
async fn generate_format_posts_prompt_and_trims_response() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_header("content-type", "application/json")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(json!({
            "model": "llama3.1",
            "prompt": SPANISH_PROMPT,
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "response": "  Hello world\n" }).to_string())
        .create_async()
        .await;

    let mut cfg = config(&server.url(), Some(ApiFormat::Ollama));
    cfg.api_key = Some("unused".into());

    let out = relay().translate(request(cfg)).await.expect("translation");

    assert_eq!(out.translated_text, "Hello world");
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_format_sends_bearer_and_fixed_sampling() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::Json(json!({
            "model": "llama3.1",
            "messages": [{ "role": "user", "content": SPANISH_PROMPT }],
            "temperature": 0.3,
            "max_tokens": 2000
        })))
        .with_status(200)
        .with_body(
            json!({ "choices": [{ "message": { "role": "assistant", "content": "Hello world" } }] })
                .to_string(),
        )
        .create_async()
        .await;

    let mut cfg = config(&server.url(), Some(ApiFormat::OpenAi));
    cfg.api_key = Some("sk-test".into());

    let out = relay().translate(request(cfg)).await.expect("translation");

    assert_eq!(out.translated_text, "Hello world");
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_format_without_key_sends_no_authorization() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(json!({ "choices": [] }).to_string())
        .create_async()
        .await;

    let out = relay()
        .translate(request(config(&server.url(), Some(ApiFormat::OpenAi))))
        .await
        .expect("translation");

    assert_eq!(out.translated_text, "");
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_response_field_yields_empty_text() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let out = relay()
        .translate(request(config(&server.url(), Some(ApiFormat::Ollama))))
        .await
        .expect("translation");

    assert_eq!(out.translated_text, "");
}

#[tokio::test]
async fn null_choices_yield_empty_text() {
    for body in [
        json!({ "choices": null }),
        json!({ "choices": [null] }),
        json!({ "choices": [{ "message": null }] }),
    ] {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let out = relay()
            .translate(request(config(&server.url(), Some(ApiFormat::OpenAi))))
            .await
            .unwrap_or_else(|e| panic!("body {body} should translate: {e}"));

        assert_eq!(out.translated_text, "", "body {body}");
    }
}

#[tokio::test]
async fn null_generate_response_yields_empty_text() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(json!({ "response": null }).to_string())
        .create_async()
        .await;

    let out = relay()
        .translate(request(config(&server.url(), Some(ApiFormat::Ollama))))
        .await
        .expect("translation");

    assert_eq!(out.translated_text, "");
}

#[tokio::test]
async fn deterministic_format_reports_status_text() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body("{\"error\":\"invalid key\"}")
        .create_async()
        .await;

    let err = relay()
        .translate(request(config(&server.url(), Some(ApiFormat::OpenAi))))
        .await
        .unwrap_err();

    match &err {
        RelayError::Endpoint(e) => {
            assert_eq!(e.format, ApiFormat::OpenAi);
            assert_eq!(e.status, StatusCode::UNAUTHORIZED);
            assert!(e.snippet.contains("invalid key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_string(), "OpenAI API error: Unauthorized");
}

#[tokio::test]
async fn generic_url_falls_through_to_generate() {
    let mut server = Server::new_async().await;
    let chat = server
        .mock("POST", "/chat/completions")
        .with_status(404)
        .create_async()
        .await;
    let generate = server
        .mock("POST", "/api/generate")
        .match_header("authorization", "Bearer sk-generic")
        .with_status(200)
        .with_body(json!({ "response": "Hello world" }).to_string())
        .create_async()
        .await;

    // Mock server URL matches no heuristic, so the generic strategy applies.
    let mut cfg = config(&server.url(), None);
    cfg.api_key = Some("sk-generic".into());
    assert_eq!(cfg.api_format(), ApiFormat::Generic);

    let out = relay().translate(request(cfg)).await.expect("translation");

    assert_eq!(out.translated_text, "Hello world");
    chat.assert_async().await;
    generate.assert_async().await;
}

#[tokio::test]
async fn generic_success_on_first_attempt_skips_generate() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(json!({ "choices": [{ "message": { "content": "Hi" } }] }).to_string())
        .create_async()
        .await;
    let generate = server
        .mock("POST", "/api/generate")
        .expect(0)
        .create_async()
        .await;

    let out = relay()
        .translate(request(config(&server.url(), None)))
        .await
        .expect("translation");

    assert_eq!(out.translated_text, "Hi");
    generate.assert_async().await;
}

#[tokio::test]
async fn generic_undecodable_first_attempt_falls_through() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(json!({ "response": "Hello" }).to_string())
        .create_async()
        .await;

    let out = relay()
        .translate(request(config(&server.url(), Some(ApiFormat::Generic))))
        .await
        .expect("translation");

    assert_eq!(out.translated_text, "Hello");
}

#[tokio::test]
async fn generic_reports_unreachable_when_both_formats_fail() {
    let mut server = Server::new_async().await;
    let chat = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .create_async()
        .await;
    let generate = server
        .mock("POST", "/api/generate")
        .with_status(503)
        .create_async()
        .await;

    let err = relay()
        .translate(request(config(&server.url(), None)))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::UnreachableEndpoint));
    assert_eq!(
        err.to_string(),
        "Unable to connect to the LLM API with any known format"
    );
    chat.assert_async().await;
    generate.assert_async().await;
}

#[tokio::test]
async fn generic_transport_failures_are_swallowed_until_exhausted() {
    // Nothing listens on the discard port.
    let err = relay()
        .translate(request(config("http://127.0.0.1:9", None)))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::UnreachableEndpoint));
}

#[tokio::test]
async fn deterministic_transport_failure_is_propagated() {
    let err = relay()
        .translate(request(config("http://127.0.0.1:9", Some(ApiFormat::Ollama))))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Transport(_)));
}

#[tokio::test]
async fn custom_headers_reach_the_endpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Token team")
        .match_header("x-org", "acme")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body(json!({ "choices": [{ "message": { "content": "ok" } }] }).to_string())
        .create_async()
        .await;

    let mut cfg = config(&server.url(), Some(ApiFormat::OpenAi));
    cfg.api_key = Some("sk-ignored".into());
    cfg.headers = Some(BTreeMap::from([
        ("Authorization".to_string(), "Token team".to_string()),
        ("X-Org".to_string(), "acme".to_string()),
        ("Content-Type".to_string(), "text/plain".to_string()),
    ]));

    relay().translate(request(cfg)).await.expect("translation");
    mock.assert_async().await;
}

#[tokio::test]
async fn auto_source_language_reaches_prompt() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({
            "prompt": "Translate the following text from the detected language to Japanese. \
                       Only return the translation, nothing else:\n\nHello"
        })))
        .with_status(200)
        .with_body(json!({ "response": "こんにちは" }).to_string())
        .create_async()
        .await;

    let req = TranslationRequest {
        text: Some("Hello".into()),
        source_lang: Some("auto".into()),
        target_lang: Some("ja".into()),
        config: Some(config(&server.url(), Some(ApiFormat::Ollama))),
    };

    let out = relay().translate(req).await.expect("translation");
    assert_eq!(out.translated_text, "こんにちは");
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_fields_are_rejected_before_any_request() {
    let cfg = config("http://127.0.0.1:9", None);

    let cases = [
        TranslationRequest {
            text: None,
            ..request(cfg.clone())
        },
        TranslationRequest {
            text: Some(String::new()),
            ..request(cfg.clone())
        },
        TranslationRequest {
            target_lang: None,
            ..request(cfg.clone())
        },
        TranslationRequest {
            config: None,
            ..request(cfg)
        },
    ];

    for req in cases {
        let err = relay().translate(req).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingFields));
    }
}

#[tokio::test]
async fn over_long_text_is_rejected() {
    let req = TranslationRequest {
        text: Some("a".repeat(5001)),
        ..request(config("http://127.0.0.1:9", None))
    };

    let err = relay().translate(req).await.unwrap_err();
    assert!(matches!(err, RelayError::TextTooLong { len: 5001, max: 5000 }));
}
