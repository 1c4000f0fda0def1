use partmatch::embedding::{Embedder, GoogleAiEmbedder};
use partmatch::services::google_ai::{
    GenerateContentRequest, GoogleAiClient, GoogleAiConfig, GoogleAiError,
};
use partmatch::services::llm::{GenerateRequest, GoogleAiAdapter, LlmClient, LlmError};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request captured by the stub server
#[derive(Debug, Clone)]
struct RecordedRequest {
    path: String,
    api_key: Option<String>,
    body: Value,
}

/// Minimal HTTP/1.1 stub that answers each connection with the next canned response
struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    async fn start(responses: Vec<(u16, Value)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut socket).await;
                recorded.lock().unwrap().push(request);

                let body = body.to_string();
                let response = format!(
                    "HTTP/1.1 {status} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn config(&self) -> GoogleAiConfig {
        GoogleAiConfig::new("test-api-key".to_string())
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0)
    }
}

async fn read_request(socket: &mut TcpStream) -> RecordedRequest {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.lines();
    let path = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string();

    let mut content_length = 0usize;
    let mut api_key = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap(),
                "x-goog-api-key" => api_key = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    while buffer.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body was complete");
        buffer.extend_from_slice(&chunk[..n]);
    }

    let body = serde_json::from_slice(&buffer[header_end..header_end + content_length])
        .unwrap_or(Value::Null);

    RecordedRequest {
        path,
        api_key,
        body,
    }
}

fn text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 40,
            "candidatesTokenCount": 12,
            "totalTokenCount": 52
        }
    })
}

#[tokio::test]
async fn test_generate_content_request_shape() {
    let server = StubServer::start(vec![(200, text_response("The match is good."))]).await;
    let client = GoogleAiClient::new(server.config()).unwrap();

    let response = client
        .generate_content(GenerateContentRequest::new("Compare these parts".to_string()))
        .await
        .unwrap();

    assert_eq!(response.extract_text().as_deref(), Some("The match is good."));
    assert_eq!(
        response
            .usage_metadata
            .as_ref()
            .and_then(|usage| usage.total_token_count),
        Some(52)
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].path,
        "/models/gemini-2.5-flash-lite:generateContent"
    );
    assert_eq!(requests[0].api_key.as_deref(), Some("test-api-key"));
    assert_eq!(
        requests[0].body["contents"][0]["parts"][0]["text"],
        "Compare these parts"
    );
    assert_eq!(requests[0].body["contents"][0]["role"], "user");
    assert!(requests[0].body["generationConfig"]["maxOutputTokens"].is_number());
}

#[tokio::test]
async fn test_batch_embed_request_shape() {
    let server = StubServer::start(vec![(
        200,
        json!({"embeddings": [{"values": [0.1, 0.2, 0.3]}, {"values": [0.4, 0.5, 0.6]}]}),
    )])
    .await;
    let client = GoogleAiClient::new(server.config()).unwrap();

    let texts = vec!["Relay 5V SPDT".to_string(), "Diode 1N4007".to_string()];
    let vectors = client
        .embed_contents("text-embedding-004", &texts, Some("SEMANTIC_SIMILARITY"))
        .await
        .unwrap();

    assert_eq!(vectors, vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]]);

    let requests = server.requests();
    assert_eq!(
        requests[0].path,
        "/models/text-embedding-004:batchEmbedContents"
    );
    let sent = requests[0].body["requests"].as_array().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0]["model"], "models/text-embedding-004");
    assert_eq!(sent[0]["taskType"], "SEMANTIC_SIMILARITY");
    assert_eq!(sent[1]["content"]["parts"][0]["text"], "Diode 1N4007");
}

fn embeddings_for(range: std::ops::Range<usize>) -> Value {
    let embeddings: Vec<Value> = range
        .map(|i| json!({"values": [i as f32, 1.0]}))
        .collect();
    json!({ "embeddings": embeddings })
}

#[tokio::test]
async fn test_large_batches_are_split_in_order() {
    let server = StubServer::start(vec![
        (200, embeddings_for(0..100)),
        (200, embeddings_for(100..101)),
    ])
    .await;
    let client = GoogleAiClient::new(server.config()).unwrap();

    let texts: Vec<String> = (0..101).map(|i| format!("part {i}")).collect();
    let vectors = client
        .embed_contents("text-embedding-004", &texts, Some("SEMANTIC_SIMILARITY"))
        .await
        .unwrap();

    assert_eq!(vectors.len(), 101);
    for (i, vector) in vectors.iter().enumerate() {
        assert_eq!(vector[0], i as f32);
    }

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    let first = requests[0].body["requests"].as_array().unwrap();
    let second = requests[1].body["requests"].as_array().unwrap();
    assert_eq!(first.len(), 100);
    assert_eq!(second.len(), 1);
    assert_eq!(first[0]["content"]["parts"][0]["text"], "part 0");
    assert_eq!(first[99]["content"]["parts"][0]["text"], "part 99");
    assert_eq!(second[0]["content"]["parts"][0]["text"], "part 100");
}

#[tokio::test]
async fn test_unhinted_service_unavailable_is_retried_promptly() {
    let server = StubServer::start(vec![
        (
            503,
            json!({"error": {"code": 503, "message": "The model is overloaded"}}),
        ),
        (200, text_response("Recovered.")),
    ])
    .await;
    let client = GoogleAiClient::new(server.config().with_max_retries(1)).unwrap();

    let started = std::time::Instant::now();
    let response = client
        .generate_content(GenerateContentRequest::new("hello".to_string()))
        .await
        .unwrap();

    assert_eq!(response.extract_text().as_deref(), Some("Recovered."));
    assert_eq!(server.requests().len(), 2);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_embedding_count_mismatch_is_invalid_response() {
    let server =
        StubServer::start(vec![(200, json!({"embeddings": [{"values": [1.0]}]}))]).await;
    let client = GoogleAiClient::new(server.config()).unwrap();

    let texts = vec!["a".to_string(), "b".to_string()];
    let err = client
        .embed_contents("text-embedding-004", &texts, None)
        .await
        .unwrap_err();

    assert!(matches!(err, GoogleAiError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_authentication_error_is_not_retried() {
    let server = StubServer::start(vec![(
        401,
        json!({"error": {"code": 401, "message": "API key not valid"}}),
    )])
    .await;
    let client =
        GoogleAiClient::new(server.config().with_max_retries(2)).unwrap();

    let err = client
        .generate_content(GenerateContentRequest::new("hello".to_string()))
        .await
        .unwrap_err();

    match err {
        GoogleAiError::AuthenticationFailed { message } => {
            assert_eq!(message, "API key not valid")
        }
        other => panic!("Expected AuthenticationFailed, got {other:?}"),
    }
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_server_error_without_retries() {
    let server = StubServer::start(vec![(
        500,
        json!({"error": {"code": 500, "message": "internal"}}),
    )])
    .await;
    let client = GoogleAiClient::new(server.config()).unwrap();

    let err = client
        .generate_content(GenerateContentRequest::new("hello".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, GoogleAiError::ServerError { status: 500, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_safety_block_maps_to_content_blocked() {
    let server = StubServer::start(vec![(
        200,
        json!({"candidates": [{"finishReason": "SAFETY"}]}),
    )])
    .await;
    let client = GoogleAiClient::new(server.config()).unwrap();

    let err = client
        .generate_content(GenerateContentRequest::new("hello".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, GoogleAiError::ContentBlocked));
}

#[tokio::test]
async fn test_adapter_returns_generated_text() {
    let server = StubServer::start(vec![(200, text_response("Spec gap: 0.003Ω."))]).await;
    let adapter = GoogleAiAdapter::from_client(GoogleAiClient::new(server.config()).unwrap());

    let response = adapter
        .generate(GenerateRequest::new("prompt".to_string()))
        .await
        .unwrap();

    assert_eq!(response.text, "Spec gap: 0.003Ω.");
    assert_eq!(
        response.token_usage.and_then(|usage| usage.total_tokens),
        Some(52)
    );
    assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
}

#[tokio::test]
async fn test_adapter_maps_quota_error() {
    let server = StubServer::start(vec![(
        403,
        json!({"error": {"code": 403, "message": "Quota exceeded for project"}}),
    )])
    .await;
    let adapter = GoogleAiAdapter::from_client(GoogleAiClient::new(server.config()).unwrap());

    let err = adapter
        .generate(GenerateRequest::new("prompt".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::QuotaExceeded { .. }));
}

#[tokio::test]
async fn test_google_embedder_through_trait() {
    let server = StubServer::start(vec![(
        200,
        json!({"embeddings": [{"values": [0.0, 1.0]}]}),
    )])
    .await;
    let embedder = GoogleAiEmbedder::new(server.config(), "text-embedding-004").unwrap();

    let vector = embedder.embed_text("Relay 5V SPDT").await.unwrap();
    assert_eq!(vector, vec![0.0, 1.0]);
    assert_eq!(embedder.model_name(), "text-embedding-004");
}
