use crate::{
    error::AppError,
    models::{DataResponse, GetUrlParams},
    AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

/// GET /geturl?url=<long url>
///
/// 200 `{"data": "<short url>"}` on success, 409 `{"message": "url is empty"}`
/// when `url` is missing or empty. The query is taken as raw pairs so a
/// repeated `url` is not a decode failure; the first one is used.
pub async fn get_url(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<DataResponse>, AppError> {
    let long_url = GetUrlParams::from_pairs(pairs).url.unwrap_or_default();
    let result = state.service.handle(&long_url).await?;
    if result.cache_hit {
        tracing::debug!("Served {} from the mapping store", long_url);
    }

    Ok(Json(DataResponse {
        data: result.short_url,
    }))
}

#[cfg(test)]
mod tests {
    use crate::{
        handlers::router,
        models::{DataResponse, MessageResponse},
        provider::Shortener,
        service::{
            testing::{FailingShortener, StubShortener},
            UrlService,
        },
        store::{JsonFileStore, MappingStore, MemoryStore},
        AppState,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(store: Arc<dyn MappingStore>, shortener: Arc<dyn Shortener>) -> Router {
        router(Arc::new(AppState {
            service: UrlService::new(store, shortener),
        }))
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn shortens_then_serves_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("url_database.txt");
        let stub = Arc::new(StubShortener::default());
        let app = app(Arc::new(JsonFileStore::new(&path)), stub.clone());

        let (status, body) = get(&app, "/geturl?url=https://example.com").await;
        assert_eq!(status, StatusCode::OK);
        let resp: DataResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(resp.data, "https://short.test/1");
        assert_eq!(stub.calls(), 1);

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            on_disk,
            serde_json::json!({"https://example.com": "https://short.test/1"})
        );

        let (status, again) = get(&app, "/geturl?url=https://example.com").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again, body);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn body_is_exactly_the_data_object() {
        let app = app(
            Arc::new(MemoryStore::new()),
            Arc::new(StubShortener::default()),
        );

        let (_, body) = get(&app, "/geturl?url=https://example.com").await;
        assert_eq!(body, br#"{"data":"https://short.test/1"}"#.to_vec());
    }

    #[tokio::test]
    async fn missing_url_is_409() {
        let stub = Arc::new(StubShortener::default());
        let app = app(Arc::new(MemoryStore::new()), stub.clone());

        for uri in ["/geturl", "/geturl?url=", "/geturl?other=1"] {
            let (status, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::CONFLICT, "{uri}");
            let resp: MessageResponse = serde_json::from_slice(&body).unwrap();
            assert_eq!(resp.message, "url is empty");
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn whitespace_url_is_shortened() {
        let stub = Arc::new(StubShortener::default());
        let app = app(Arc::new(MemoryStore::new()), stub.clone());

        let (status, body) = get(&app, "/geturl?url=%20%20").await;

        assert_eq!(status, StatusCode::OK);
        let resp: DataResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(resp.data, "https://short.test/1");
        assert_eq!(stub.seen(), vec!["  ".to_owned()]);
    }

    #[tokio::test]
    async fn repeated_url_uses_the_first_value() {
        let stub = Arc::new(StubShortener::default());
        let app = app(Arc::new(MemoryStore::new()), stub.clone());

        let (status, body) = get(
            &app,
            "/geturl?url=https://a.example&url=https://b.example",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let resp: DataResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(resp.data, "https://short.test/1");
        assert_eq!(stub.seen(), vec!["https://a.example".to_owned()]);
    }

    #[tokio::test]
    async fn encoded_long_url_is_decoded_before_use() {
        let stub = Arc::new(StubShortener::default());
        let store = MemoryStore::new();
        let app = app(Arc::new(store.clone()), stub.clone());

        let (status, _) = get(
            &app,
            "/geturl?url=https%3A%2F%2Fexample.com%2Fsearch%3Fq%3Drust%26page%3D2",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            stub.seen(),
            vec!["https://example.com/search?q=rust&page=2".to_owned()]
        );
        assert!(store
            .lookup("https://example.com/search?q=rust&page=2")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn provider_failure_is_502() {
        let app = app(
            Arc::new(MemoryStore::new()),
            Arc::new(FailingShortener::default()),
        );

        let (status, body) = get(&app, "/geturl?url=https://example.com").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let resp: MessageResponse = serde_json::from_slice(&body).unwrap();
        assert!(!resp.message.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_500() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join("url_database.txt");
        let app = app(
            Arc::new(JsonFileStore::new(path)),
            Arc::new(StubShortener::default()),
        );

        let (status, body) = get(&app, "/geturl?url=https://example.com").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let resp: MessageResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(resp.message, "storage error");
        assert!(!String::from_utf8_lossy(&body).contains("no-such-dir"));
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = app(
            Arc::new(MemoryStore::new()),
            Arc::new(FailingShortener::default()),
        );

        let (status, body) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }
}
