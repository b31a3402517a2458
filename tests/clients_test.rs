use profile_follower::clients::{build_http_client, FollowClient, SearchClient};
use profile_follower::{
    ApiError, CleanName, Config, FollowOutcome, IdentifierField, ProfileFollower, ProfileSearcher,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> Config {
    Config {
        auth_token: "test-token".to_string(),
        search_api_url: format!("{}/search", server.uri()),
        follow_api_url: format!("{}/graphql", server.uri()),
        request_timeout_secs: 5,
        ..Config::default()
    }
}

fn search_client(config: &Config) -> SearchClient {
    SearchClient::new(build_http_client(config).unwrap(), config).unwrap()
}

fn follow_client(config: &Config) -> FollowClient {
    FollowClient::new(build_http_client(config).unwrap(), config).unwrap()
}

fn name(raw: &str) -> CleanName {
    CleanName::from_raw(raw).unwrap()
}

fn profiles_body(profiles: serde_json::Value) -> serde_json::Value {
    json!({ "result": { "data": { "json": { "profiles": profiles } } } })
}

// ── 搜索 ──────────────────────────────────────────────────

#[tokio::test]
async fn search_returns_matches_in_response_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("input", r#"{"json":{"text":"Alice"}}"#))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profiles_body(json!([
            { "profileId": "id-2", "handle": "alice2" },
            { "profileId": "id-1", "handle": "alice" },
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let matches = search_client(&config).search(&name("Alice")).await.unwrap();

    let ids: Vec<&str> = matches.iter().map(|m| m.identifier.as_str()).collect();
    assert_eq!(ids, vec!["id-2", "id-1"]);
    assert!(matches.iter().all(|m| m.source_name.as_str() == "Alice"));
}

#[tokio::test]
async fn search_extracts_handle_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profiles_body(json!([
            { "profileId": "id-1", "handle": "bob" },
            { "profileId": "id-2" },
        ]))))
        .mount(&server)
        .await;

    let config = Config {
        identifier_field: IdentifierField::Handle,
        ..test_config(&server)
    };
    let matches = search_client(&config).search(&name("Bob")).await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].identifier, "bob");
}

#[tokio::test]
async fn search_with_no_profiles_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": { "data": { "json": {} } } })),
        )
        .mount(&server)
        .await;

    let config = test_config(&server);
    let matches = search_client(&config).search(&name("Nobody")).await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn search_rate_limit_is_distinguished_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "12"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let err = search_client(&config).search(&name("Carol")).await.unwrap_err();

    match err {
        ApiError::RateLimited { retry_after, .. } => assert_eq!(retry_after, Some(12)),
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test]
async fn search_http_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let err = search_client(&config).search(&name("Dave")).await.unwrap_err();

    match err {
        ApiError::Http { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal");
        }
        other => panic!("expected Http, got {:?}", other),
    }
}

#[tokio::test]
async fn search_non_json_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let err = search_client(&config).search(&name("Eve")).await.unwrap_err();
    assert!(matches!(err, ApiError::Parse { .. }));
}

#[tokio::test]
async fn search_connection_failure_is_network_error() {
    // 端口 1 上没有服务监听
    let config = Config {
        auth_token: "test-token".to_string(),
        search_api_url: "http://127.0.0.1:1/search".to_string(),
        request_timeout_secs: 5,
        ..Config::default()
    };

    let err = search_client(&config).search(&name("Frank")).await.unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }));
}

// ── 关注 ──────────────────────────────────────────────────

#[tokio::test]
async fn follow_success_sends_graphql_mutation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({ "variables": { "profileId": "id-1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "follow": {
                    "__typename": "GraphQLAccountProfile",
                    "vcFollowingStatus": "FOLLOWING",
                    "id": "id-1"
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let outcome = follow_client(&config).follow("id-1").await;
    assert_eq!(outcome, FollowOutcome::Succeeded);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["query"].as_str().unwrap().contains("follow(followeeId: $profileId)"));
}

#[tokio::test]
async fn follow_already_following_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "You are already following this user" }]
        })))
        .mount(&server)
        .await;

    let config = test_config(&server);
    assert_eq!(follow_client(&config).follow("id-1").await, FollowOutcome::AlreadyFollowing);
}

#[tokio::test]
async fn follow_http_429_is_rate_limited_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let outcome = follow_client(&config).follow("id-1").await;

    assert_eq!(outcome, FollowOutcome::RateLimited);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn follow_graphql_rate_limit_message_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Rate limit exceeded" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    assert_eq!(follow_client(&config).follow("id-1").await, FollowOutcome::RateLimited);
}

#[tokio::test]
async fn follow_server_error_is_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = test_config(&server);
    assert_eq!(
        follow_client(&config).follow("id-1").await,
        FollowOutcome::Failed("HTTP 503".to_string())
    );
}

#[tokio::test]
async fn follow_invalid_json_is_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let config = test_config(&server);
    assert!(matches!(follow_client(&config).follow("id-1").await, FollowOutcome::Failed(_)));
}
