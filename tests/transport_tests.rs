use textshape::config::{ApiKey, ApiLogLevel, ClientConfig};
use textshape::error::{Error, ErrorKind};
use textshape::{ChatClient, GenerativeClient, Shaper, ShaperConfig};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

const SUCCESS_BODY: &str = r#"{
  "id": "chatcmpl-abc",
  "object": "chat.completion",
  "created": 1715000000,
  "model": "gpt-4o-2024-05-13",
  "system_fingerprint": "fp_123",
  "choices": [
    { "index": 0,
      "message": { "role": "assistant", "content": "```\nHELLO\n```" },
      "finish_reason": "stop" }
  ],
  "usage": { "prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13 }
}"#;

fn client_for(server: &mockito::Server, log_level: ApiLogLevel) -> ChatClient
{   let _ = textshape::logging::init(log_level);
    let config = ClientConfig::default()
      .with_endpoint(format!("{}{}", server.url(), COMPLETIONS_PATH))
      .with_max_tokens(256)
      .with_log_level(log_level);
    ChatClient::new(ApiKey::new("sk-test").unwrap(), config).unwrap()
}

#[tokio::test]
async fn posts_json_with_bearer_token()
{   let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", COMPLETIONS_PATH)
      .match_header("authorization", "Bearer sk-test")
      .match_header("content-type", "application/json")
      .match_body(mockito::Matcher::PartialJsonString(
        r#"{"model":"gpt-4o","max_tokens":256,"n":1,"stream":false,
            "messages":[{"role":"user","content":"hi"}]}"#.to_string()
      ))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(SUCCESS_BODY)
      .create_async()
      .await;

    let client = client_for(&server, ApiLogLevel::Info);
    let request = client.make_chat_completion("hi");
    let completion = client.request_chat_completion(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(completion.id, "chatcmpl-abc");
    assert_eq!(completion.system_fingerprint.as_deref(), Some("fp_123"));
    assert_eq!(completion.choices.len(), 1);
    assert!(!completion.choices[0].is_truncated());
}

#[tokio::test]
async fn bad_request_surfaces_status_and_message()
{   let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("POST", COMPLETIONS_PATH)
      .with_status(400)
      .with_body(r#"{"error":{"message":"bad request"}}"#)
      .create_async()
      .await;

    let client = client_for(&server, ApiLogLevel::Debug);
    let request = client.make_chat_completion("hi");
    let err = client.request_chat_completion(&request).await.unwrap_err();

    assert!(matches!(
      err
    , Error::UnexpectedStatusCode { code: 400, ref message } if message == "bad request"
    ));
    assert_eq!(err.kind(), ErrorKind::Protocol);
    let text = err.to_string();
    assert!(text.contains("400"));
    assert!(text.contains("bad request"));
}

#[tokio::test]
async fn unparsable_error_body_is_distinct()
{   let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("POST", COMPLETIONS_PATH)
      .with_status(502)
      .with_body("<html>Bad Gateway</html>")
      .create_async()
      .await;

    let client = client_for(&server, ApiLogLevel::Off);
    let request = client.make_chat_completion("hi");
    let err = client.request_chat_completion(&request).await.unwrap_err();

    assert!(matches!(err, Error::MalformedErrorBody { code: 502, .. }));
    assert_eq!(err.kind(), ErrorKind::MalformedBody);
}

#[tokio::test]
async fn unparsable_success_body_is_distinct()
{   let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("POST", COMPLETIONS_PATH)
      .with_status(200)
      .with_body("{\"choices\": 42}")
      .create_async()
      .await;

    let client = client_for(&server, ApiLogLevel::Off);
    let request = client.make_chat_completion("hi");
    let err = client.request_chat_completion(&request).await.unwrap_err();

    assert!(matches!(err, Error::MalformedSuccessBody(_)));
}

#[tokio::test]
async fn connection_failure_is_a_transport_error()
{   let config = ClientConfig::default()
      .with_endpoint("http://127.0.0.1:9/v1/chat/completions");
    let client = ChatClient::new(ApiKey::new("sk-test").unwrap(), config)
      .unwrap();
    let request = client.make_chat_completion("hi");
    let err = client.request_chat_completion(&request).await.unwrap_err();

    assert!(matches!(err, Error::Http(_)));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn cancelled_exchange_reports_cancelled()
{   let server = mockito::Server::new_async().await;
    let client = client_for(&server, ApiLogLevel::Off);
    let request = client.make_chat_completion("hi");
    let err = client
      .request_chat_completion_until(&request, std::future::ready(()))
      .await
      .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn shaper_round_trip_over_http()
{   let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("POST", COMPLETIONS_PATH)
      .match_body(mockito::Matcher::Regex("textshape-input".to_string()))
      .with_status(200)
      .with_body(SUCCESS_BODY)
      .create_async()
      .await;

    let shaper = Shaper::new(
      client_for(&server, ApiLogLevel::Info)
    , &ShaperConfig::default()
    );
    let result = shaper.shape_text("Uppercase", "hello").await.unwrap();

    assert_eq!(result.raw_result(), "```\nHELLO\n```");
    assert_eq!(result.result(), "HELLO\n");
}

#[test]
fn client_rejects_invalid_configuration()
{   let config = ClientConfig::default().with_model("  ");
    let err = ChatClient::new(ApiKey::new("sk-test").unwrap(), config)
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn make_chat_completion_follows_config()
{   let config = ClientConfig
    {   seed: 7
      , ..ClientConfig::default().with_model("gpt-4o-mini")
    };
    let client = ChatClient::new(ApiKey::new("sk-test").unwrap(), config)
      .unwrap();
    let request = client.make_chat_completion("hi");
    assert_eq!(request.model, "gpt-4o-mini");
    assert_eq!(request.seed, 7);
    assert_eq!(request.max_tokens, None);
    assert!(!request.stream);
}
