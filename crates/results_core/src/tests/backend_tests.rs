use super::*;

use std::net::SocketAddr;

use axum::{http::StatusCode, routing::post, Json, Router};
use shared::{
    domain::ClusterId,
    error::{ApiError, ErrorCode},
    protocol::Document,
};
use tokio::net::TcpListener;

fn request(source: &str, query: &str, results: u32) -> SearchRequest {
    SearchRequest {
        source: SourceId::from(source),
        query: query.to_string(),
        results,
    }
}

fn doc(id: i64, title: &str, snippet: &str) -> Document {
    Document {
        id: DocumentId(id),
        title: title.to_string(),
        snippet: snippet.to_string(),
        url: None,
    }
}

fn corpus() -> StaticSearchBackend {
    StaticSearchBackend::new(SearchResponse {
        documents: vec![
            doc(1, "Rust language", "systems programming"),
            doc(2, "Rust fungus", "plant disease"),
            doc(3, "Tokio", "async runtime for Rust"),
            doc(4, "Wheat", "crop"),
        ],
        clusters: vec![
            Cluster {
                id: ClusterId(1),
                label: "Programming".into(),
                score: 0.9,
                documents: vec![DocumentId(1)],
                subclusters: vec![Cluster {
                    id: ClusterId(11),
                    label: "Async".into(),
                    score: 0.5,
                    documents: vec![DocumentId(3)],
                    subclusters: Vec::new(),
                }],
            },
            Cluster {
                id: ClusterId(2),
                label: "Agriculture".into(),
                score: 0.4,
                documents: vec![DocumentId(2), DocumentId(4)],
                subclusters: Vec::new(),
            },
        ],
        served_at: None,
    })
}

#[test]
fn static_backend_matches_title_or_snippet_case_insensitively() {
    let response = corpus().run(&request("web", "RUNTIME wheat", 100));
    let ids: Vec<_> = response.documents.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![DocumentId(3), DocumentId(4)]);
    assert!(response.served_at.is_some());
}

#[test]
fn static_backend_prunes_clusters_to_matched_documents() {
    let response = corpus().run(&request("web", "async", 100));
    assert_eq!(response.clusters.len(), 1);
    let programming = &response.clusters[0];
    assert!(programming.documents.is_empty());
    assert_eq!(programming.all_documents(), vec![DocumentId(3)]);
}

#[test]
fn static_backend_truncates_to_requested_count() {
    let response = corpus().run(&request("web", "", 2));
    assert_eq!(response.documents.len(), 2);
    assert_eq!(response.clusters.len(), 2);
    assert_eq!(response.clusters[1].documents, vec![DocumentId(2)]);
}

#[test]
fn sample_corpus_loads() {
    let backend = StaticSearchBackend::sample().expect("sample corpus");
    let response = backend.run(&request("web", "rust", 100));
    assert!(!response.documents.is_empty());
    assert!(!response.clusters.is_empty());
}

#[test]
fn malformed_corpus_is_rejected() {
    assert!(StaticSearchBackend::from_json("{\"documents\": 3}").is_err());
}

#[test]
fn backend_kind_parses_and_displays_its_name() {
    assert_eq!("static".parse::<BackendKind>().expect("static"), BackendKind::Static);
    assert_eq!(" HTTP ".parse::<BackendKind>().expect("http"), BackendKind::Http);
    assert!(matches!(
        "grpc".parse::<BackendKind>(),
        Err(BackendError::UnknownKind(name)) if name == "grpc"
    ));
    assert_eq!(BackendKind::default().to_string(), "static");
    assert_eq!(BackendKind::Http.to_string(), "http");
}

#[tokio::test]
async fn static_kind_serves_the_sample_corpus() -> Result<()> {
    let backend = BackendKind::Static.build(&Settings::default())?;
    let response = backend.search(&request("web", "clustering", 100)).await?;
    assert!(!response.documents.is_empty());
    Ok(())
}

#[tokio::test]
async fn http_kind_uses_the_configured_endpoints() {
    let backend = BackendKind::Http
        .build(&Settings::default())
        .expect("http backend");
    let err = backend
        .search(&request("web", "rust", 10))
        .await
        .expect_err("no endpoint configured");
    assert!(matches!(
        err.downcast_ref::<BackendError>(),
        Some(BackendError::NoEndpoint(source)) if source.as_str() == "web"
    ));
}

#[tokio::test]
async fn missing_backend_always_fails() {
    let err = MissingSearchBackend
        .search(&request("web", "rust", 10))
        .await
        .expect_err("missing");
    assert!(err.to_string().contains("web"));
}

async fn spawn_search_server(app: Router) -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

#[tokio::test]
async fn http_backend_posts_request_and_parses_response() -> Result<()> {
    let app = Router::new().route(
        "/search",
        post(|Json(req): Json<SearchRequest>| async move {
            let backend = corpus();
            Json(backend.run(&req))
        }),
    );
    let addr = spawn_search_server(app).await?;
    let backend = HttpSearchBackend::new(HashMap::from([(
        SourceId::from("web"),
        format!("http://{addr}/search"),
    )]));

    let response = backend.search(&request("web", "tokio", 10)).await?;
    assert_eq!(response.documents.len(), 1);
    assert_eq!(response.documents[0].id, DocumentId(3));
    Ok(())
}

#[tokio::test]
async fn http_backend_surfaces_api_errors() -> Result<()> {
    let app = Router::new().route(
        "/search",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ApiError::new(ErrorCode::RateLimited, "slow down")),
            )
        }),
    );
    let addr = spawn_search_server(app).await?;
    let backend = HttpSearchBackend::new(HashMap::from([(
        SourceId::from("web"),
        format!("http://{addr}/search"),
    )]));

    let err = backend
        .search(&request("web", "rust", 10))
        .await
        .expect_err("rate limited");
    match err.downcast_ref::<BackendError>() {
        Some(BackendError::Status { status, message }) => {
            assert_eq!(*status, 429);
            assert!(message.contains("slow down"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn http_backend_requires_an_endpoint_for_the_source() {
    let backend = HttpSearchBackend::new(HashMap::new());
    let err = backend
        .search(&request("pubmed", "rust", 10))
        .await
        .expect_err("no endpoint");
    assert!(matches!(
        err.downcast_ref::<BackendError>(),
        Some(BackendError::NoEndpoint(id)) if id.as_str() == "pubmed"
    ));
}
