/// Profile store client against a mocked document store
use risk_profiler::{catalog, AnswerRecord, Error, ProfileSnapshot, ProfileStore};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_snapshot() -> ProfileSnapshot {
    let mut record = AnswerRecord::new();
    for q in catalog() {
        record.answer(&q.id, &q.options[1].id).unwrap();
    }
    ProfileSnapshot::build(&record)
}

fn store(server: &MockServer) -> ProfileStore {
    ProfileStore::new(&server.uri(), Some("test_key"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_save_profile_puts_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/profiles/user-1"))
        .and(header("X-API-Key", "test_key"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .save_profile("user-1", &sample_snapshot())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fetch_profile_round_trip() {
    let server = MockServer::start().await;
    let snapshot = sample_snapshot();
    Mock::given(method("GET"))
        .and(path("/profiles/user-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&snapshot))
        .mount(&server)
        .await;

    let fetched = store(&server).fetch_profile("user-1").await.unwrap();
    assert_eq!(fetched, Some(snapshot));
}

#[tokio::test]
async fn test_fetch_missing_profile_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profiles/nobody"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert_eq!(store(&server).fetch_profile("nobody").await.unwrap(), None);
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/profiles/user-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = store(&server)
        .save_profile("user-1", &sample_snapshot())
        .await
        .unwrap_err();
    match err {
        Error::Store { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_delete_profile() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/profiles/user-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/profiles/user-2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = store(&server);
    assert!(store.delete_profile("user-1").await.unwrap());
    assert!(!store.delete_profile("user-2").await.unwrap());
}

#[test]
fn test_invalid_api_key_rejected() {
    let result = ProfileStore::new("http://localhost", Some("bad\nkey"), Duration::from_secs(1));
    assert!(matches!(result, Err(Error::InvalidApiKey)));
}

#[tokio::test]
async fn test_user_id_stays_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/profiles/..%2Fadmin%3Fx=1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(store(&server).delete_profile("../admin?x=1").await.unwrap());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/profiles/..%2Fadmin%3Fx=1");
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_base_url_path_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profiles/user-1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let store = ProfileStore::new(
        &format!("{}/api/", server.uri()),
        None,
        Duration::from_secs(5),
    )
    .unwrap();
    assert_eq!(store.fetch_profile("user-1").await.unwrap(), None);
}

#[tokio::test]
async fn test_dot_segment_user_ids_rejected() {
    let server = MockServer::start().await;
    let store = store(&server);
    for id in ["", ".", ".."] {
        assert!(matches!(
            store.fetch_profile(id).await,
            Err(Error::InvalidUserId(_))
        ));
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[test]
fn test_invalid_base_url_rejected() {
    let result = ProfileStore::new("not a url", None, Duration::from_secs(1));
    assert!(matches!(result, Err(Error::InvalidStoreUrl(_))));
}
