use gh_setup::error::format_error_chain;
use gh_setup::github::{AccountKind, GitHubClient, Protocol, Visibility};
use octocrab::Octocrab;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repo_body(owner: &str, name: &str, visibility: &str) -> serde_json::Value {
    json!({
        "id": 42,
        "name": name,
        "full_name": format!("{}/{}", owner, name),
        "owner": { "login": owner, "id": 7, "type": "User" },
        "visibility": visibility,
        "html_url": format!("https://github.com/{}/{}", owner, name),
        "clone_url": format!("https://github.com/{}/{}.git", owner, name),
        "ssh_url": format!("git@github.com:{}/{}.git", owner, name),
        "git_url": format!("git://github.com/{}/{}.git", owner, name),
    })
}

fn client_for(mock_server: &MockServer, protocol: Protocol) -> GitHubClient {
    let octocrab = Octocrab::builder()
        .personal_token("test-token".to_string())
        .base_uri(mock_server.uri())
        .unwrap()
        .build()
        .unwrap();
    GitHubClient::with_octocrab(octocrab, protocol)
}

#[tokio::test]
async fn test_get_repo_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/test-user/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Https);
    let repo = client
        .get_repo("test-user/missing")
        .await
        .expect("call should succeed");
    assert!(repo.is_none(), "Expected None for 404 response");
}

#[tokio::test]
async fn test_get_repo_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/test-user/project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_body(
            "test-user",
            "project",
            "private",
        )))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Https);
    let repo = client
        .get_repo("test-user/project")
        .await
        .unwrap()
        .expect("repo should exist");

    assert_eq!(repo.full_name, "test-user/project");
    assert_eq!(repo.owner.login, "test-user");
    assert_eq!(repo.visibility, Some(Visibility::Private));
    assert_eq!(repo.url, "https://github.com/test-user/project");
    assert_eq!(
        repo.remote_url(Protocol::Ssh),
        "git@github.com:test-user/project.git"
    );
}

#[tokio::test]
async fn test_get_repo_server_error_propagates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/repos/.*/.*"))
        .respond_with(
            ResponseTemplate::new(403).set_body_string(r#"{"message":"Resource not accessible"}"#),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Https);
    let err = client.get_repo("o/r").await.unwrap_err();

    let chain = format_error_chain(&err);
    assert!(chain.contains("Failed to get repository"));
    assert!(chain.contains("403"));
    assert!(chain.contains("Resource not accessible"));
}

#[tokio::test]
async fn test_current_user_merges_orgs_and_protocol() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "test-user",
            "id": 1,
            "type": "User",
            "name": "Test User"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/orgs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "login": "org1", "id": 2 },
            { "login": "org2", "id": 3 }
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Ssh);
    let user = client.current_user().await.unwrap();

    assert_eq!(user.login, "test-user");
    assert_eq!(user.name.as_deref(), Some("Test User"));
    assert_eq!(user.git_protocol, Protocol::Ssh);
    assert!(
        user.orgs
            .iter()
            .all(|org| org.kind == AccountKind::Organization)
    );
    assert_eq!(user.owner_choices(), vec!["test-user", "org1", "org2"]);
}

#[tokio::test]
async fn test_get_account_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Https);
    assert!(client.get_account("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_repo_for_user_posts_to_user_repos() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/test-user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "test-user",
            "id": 1,
            "type": "User"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .and(body_partial_json(json!({
            "name": "new-repo",
            "private": true,
            "visibility": "private"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(repo_body(
            "test-user",
            "new-repo",
            "private",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Https);
    let repo = client
        .create_repo("test-user", "new-repo", Visibility::Private)
        .await
        .unwrap();

    assert_eq!(repo.full_name, "test-user/new-repo");
    assert_eq!(
        repo.remote_url(Protocol::Https),
        "https://github.com/test-user/new-repo.git"
    );
}

#[tokio::test]
async fn test_create_repo_for_org_posts_to_org_repos() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/org1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "org1",
            "id": 2,
            "type": "Organization"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orgs/org1/repos"))
        .and(body_partial_json(json!({
            "name": "team-repo",
            "private": false,
            "visibility": "internal"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(repo_body(
            "org1",
            "team-repo",
            "internal",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Https);
    let repo = client
        .create_repo("org1", "team-repo", Visibility::Internal)
        .await
        .unwrap();

    assert_eq!(repo.visibility, Some(Visibility::Internal));
}

#[tokio::test]
async fn test_create_repo_missing_owner_does_not_post() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r".*/repos"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Https);
    let err = client
        .create_repo("ghost", "project", Visibility::Public)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("account not found: ghost"));
}

#[tokio::test]
async fn test_create_repo_rejects_unsupported_account_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/some-bot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "some-bot",
            "id": 9,
            "type": "Bot"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Https);
    let err = client
        .create_repo("some-bot", "project", Visibility::Public)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("unsupported account type"));
}

#[tokio::test]
async fn test_create_repo_invalid_name_makes_no_requests() {
    let mock_server = MockServer::start().await;

    let client = client_for(&mock_server, Protocol::Https);
    let res = client
        .create_repo("test-user", "not a name", Visibility::Public)
        .await;

    assert!(res.is_err());
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "validation must happen before any request");
}

#[tokio::test]
async fn test_create_repo_api_error_propagates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/test-user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "test-user",
            "id": 1,
            "type": "User"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(422).set_body_string(
            r#"{"message":"Repository creation failed.","errors":[{"field":"name","code":"custom","message":"name already exists on this account"}]}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Https);
    let err = client
        .create_repo("test-user", "taken", Visibility::Public)
        .await
        .unwrap_err();

    let chain = format_error_chain(&err);
    assert!(chain.contains("Failed to create repository"));
    assert!(chain.contains("Repository creation failed."));
}

#[tokio::test]
async fn test_get_repo_name_with_space_is_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Https);
    let repo = client
        .get_repo("test-user/My Project")
        .await
        .expect("call should succeed");
    assert!(repo.is_none(), "Expected None for 404 response");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/repos/test-user/My%20Project");
}

#[tokio::test]
async fn test_get_account_non_ascii_name_is_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Https);
    assert!(client.get_account("café").await.unwrap().is_none());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/users/caf%C3%A9");
}

#[tokio::test]
async fn test_current_user_follows_org_pages() {
    let mock_server = MockServer::start().await;

    let first_page: Vec<serde_json::Value> = (0..100)
        .map(|i| json!({ "login": format!("org{}", i), "id": i }))
        .collect();

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "test-user",
            "id": 1,
            "type": "User"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/orgs"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/orgs"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "login": "last-org", "id": 500 }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Protocol::Https);
    let user = client.current_user().await.unwrap();

    assert_eq!(user.orgs.len(), 101);
    assert_eq!(user.orgs[100].login, "last-org");
    assert_eq!(user.owner_choices().last().map(String::as_str), Some("last-org"));
}
