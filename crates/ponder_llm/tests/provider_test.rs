use httpmock::{Method::POST, MockServer};
use ponder_llm::{Error, Provider as _, ProviderId, ProvidersConfig, get_provider, query::ChatQuery};
use pretty_assertions::assert_eq;
use test_log::test;

#[test(tokio::test)]
async fn glm_streams_incremental_content() {
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"你\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"好\"}}]}\n\n",
        "data: [DONE]\n\n",
    );

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer glm-key")
                .json_body_partial(r#"{"model": "glm-4", "stream": true}"#);
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(body);
        })
        .await;

    let mut config = ProvidersConfig::default();
    config.glm.api_key = "glm-key".to_owned();
    config.glm.base_url = server.url("");

    let provider = get_provider(ProviderId::Glm, &config).unwrap();
    assert!(provider.supports_streaming());

    let query = ChatQuery::default()
        .with_system("be brief")
        .with_user("say hello");

    let mut seen = vec![];
    let text = provider
        .chat_completion_stream(query, &mut |accumulated: &str| {
            seen.push(accumulated.to_owned());
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "你好");
    assert_eq!(seen, vec!["你".to_owned(), "你好".to_owned()]);
}

#[test(tokio::test)]
async fn anthropic_single_shot_round_trip() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/messages")
                .header("x-api-key", "claude-key")
                .header("anthropic-version", "2023-06-01")
                .json_body_partial(
                    r#"{"model": "claude-3-sonnet-20240229", "max_tokens": 1024, "system": "be brief"}"#,
                );
            then.status(200).json_body(serde_json::json!({
                "id": "msg_1",
                "type": "message",
                "role": "assistant",
                "content": [{"type": "text", "text": "Hello there."}],
                "stop_reason": "end_turn",
            }));
        })
        .await;

    let mut config = ProvidersConfig::default();
    config.anthropic.api_key = "claude-key".to_owned();
    config.anthropic.base_url = server.url("");

    let provider = get_provider(ProviderId::Anthropic, &config).unwrap();
    assert!(!provider.supports_streaming());

    let query = ChatQuery::default()
        .with_system("be brief")
        .with_user("say hello");

    let text = provider.chat_completion(query).await.unwrap();

    mock.assert_async().await;
    assert_eq!(text, "Hello there.");
}

#[test(tokio::test)]
async fn anthropic_error_carries_provider_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/messages");
            then.status(401).json_body(serde_json::json!({
                "type": "error",
                "error": {"type": "authentication_error", "message": "invalid x-api-key"},
            }));
        })
        .await;

    let mut config = ProvidersConfig::default();
    config.anthropic.api_key = "bad-key".to_owned();
    config.anthropic.base_url = server.url("");

    let provider = get_provider(ProviderId::Anthropic, &config).unwrap();
    let error = provider
        .chat_completion(ChatQuery::default().with_user("hi"))
        .await
        .unwrap_err();

    match error {
        Error::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid x-api-key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test(tokio::test)]
async fn non_streaming_provider_degrades_through_default_stream_impl() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/messages");
            then.status(200).json_body(serde_json::json!({
                "content": [{"type": "text", "text": "whole response"}],
            }));
        })
        .await;

    let mut config = ProvidersConfig::default();
    config.anthropic.api_key = "claude-key".to_owned();
    config.anthropic.base_url = server.url("");

    let provider = get_provider(ProviderId::Anthropic, &config).unwrap();

    let mut seen = vec![];
    let text = provider
        .chat_completion_stream(ChatQuery::default().with_user("hi"), &mut |accumulated: &str| {
            seen.push(accumulated.to_owned());
        })
        .await
        .unwrap();

    assert_eq!(text, "whole response");
    assert_eq!(seen, vec!["whole response".to_owned()]);
}
