mod common;

mod anthropic {
    use std::sync::{Arc, Mutex};

    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    use crate::common;
    use tuning_service::llm_providers::{LLMError, LLMProvider, anthropic::AnthropicProvider};

    type Seen = Arc<Mutex<Vec<(HeaderMap, Value)>>>;

    async fn mock_messages_api(
        status: StatusCode,
        reply: Value,
    ) -> Result<(String, Seen), Box<dyn std::error::Error + 'static>> {
        let seen: Seen = Arc::default();
        let recorder = seen.clone();
        let app = Router::new().route(
            "/v1/messages",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let recorder = recorder.clone();
                let reply = reply.clone();
                async move {
                    recorder.lock().unwrap().push((headers, body));
                    (status, Json(reply))
                }
            }),
        );
        let base_url = common::serve(app).await?;
        Ok((base_url, seen))
    }

    fn provider(base_url: &str) -> AnthropicProvider {
        AnthropicProvider::new(
            "test-key".into(),
            "claude-3-opus-20240229".into(),
            "Sen bir Forza Horizon 5 tuning uzmanısın.".into(),
        )
        .with_base_url(base_url)
    }

    #[tokio::test]
    async fn test_query_posts_messages_request() -> Result<(), Box<dyn std::error::Error + 'static>> {
        common::setup_logger("error");
        let reply = json!({
            "content": [{ "type": "text", "text": common::RWD_TUNING_JSON }],
            "stop_reason": "end_turn"
        });
        let (base_url, seen) = mock_messages_api(StatusCode::OK, reply).await?;

        let text = provider(&base_url).with_temperature(0.7).query("Marka: Toyota").await?;
        assert_eq!(text, common::RWD_TUNING_JSON);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (headers, body) = &seen[0];
        assert_eq!(headers["x-api-key"], "test-key");
        assert_eq!(headers["anthropic-version"], "2023-06-01");
        assert_eq!(body["model"], "claude-3-opus-20240229");
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["system"], "Sen bir Forza Horizon 5 tuning uzmanısın.");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"][0]["text"], "Marka: Toyota");
        assert!(body["temperature"].as_f64().is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_error_status_is_api_error() -> Result<(), Box<dyn std::error::Error + 'static>> {
        common::setup_logger("error");
        let reply = json!({ "type": "error", "error": { "type": "overloaded_error" } });
        let (base_url, _) = mock_messages_api(StatusCode::SERVICE_UNAVAILABLE, reply).await?;

        let result = provider(&base_url).query("Marka: Toyota").await;
        assert!(matches!(result, Err(LLMError::Api { status: 503, ref body }) if body.contains("overloaded")));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_content_is_empty_response() -> Result<(), Box<dyn std::error::Error + 'static>> {
        common::setup_logger("error");
        let (base_url, _) =
            mock_messages_api(StatusCode::OK, json!({ "content": [], "stop_reason": "max_tokens" }))
                .await?;

        let result = provider(&base_url).query("Marka: Toyota").await;
        assert!(matches!(result, Err(LLMError::EmptyResponse)));

        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        common::setup_logger("error");
        let result = provider("http://127.0.0.1:1").query("Marka: Toyota").await;
        assert!(matches!(result, Err(LLMError::Network(_))));
    }
}
