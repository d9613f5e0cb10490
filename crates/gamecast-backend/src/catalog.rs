//! Catalog client: fetches and orders the list of streamable titles

use async_trait::async_trait;
use reqwest::Method;

use gamecast_core::prelude::*;
use gamecast_core::{sort_games, Game};

use crate::http::HttpBackend;

/// Anything that can produce the game catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the catalog, sorted by `ordering` then `name`.
    ///
    /// # Errors
    ///
    /// [`Error::CatalogUnavailable`] on any transport, auth or backend
    /// failure. No retries are attempted.
    async fn fetch_catalog(&self) -> Result<Vec<Game>>;
}

/// Catalog served by `GET /games`
#[derive(Clone)]
pub struct HttpCatalog {
    backend: HttpBackend,
}

impl HttpCatalog {
    pub fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<Game>> {
        let credential = self
            .backend
            .credential()
            .await
            .map_err(|e| Error::catalog_unavailable(e.to_string()))?;

        let url = self.backend.endpoint(&["games"]);
        debug!("Fetching catalog from {}", url);

        let request = self.backend.request(Method::GET, &url, &credential);
        let mut games: Vec<Game> = self
            .backend
            .send_json(request)
            .await
            .map_err(|e| Error::catalog_unavailable(e.to_string()))?;

        sort_games(&mut games);
        info!("Catalog loaded: {} games", games.len());
        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MockAuthProvider, StaticTokenProvider};
    use gamecast_core::Credential;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog_for(server: &MockServer) -> HttpCatalog {
        let backend = HttpBackend::new(
            &server.uri(),
            Duration::from_secs(5),
            Arc::new(StaticTokenProvider::new("tok", "user-1")),
        )
        .unwrap();
        HttpCatalog::new(backend)
    }

    #[tokio::test]
    async fn test_fetch_catalog_sorted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/games"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"appId": "b", "groupId": "g", "name": "B", "ordering": 1},
                {"appId": "a", "groupId": "g", "name": "A", "ordering": 1},
                {"appId": "c", "groupId": "g", "name": "C", "ordering": 2}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let games = catalog_for(&server).fetch_catalog().await.unwrap();
        let names: Vec<_> = games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_fetch_catalog_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/games"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let err = catalog_for(&server).fetch_catalog().await.unwrap_err();
        assert!(matches!(err, Error::CatalogUnavailable { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_fetch_catalog_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/games"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = catalog_for(&server).fetch_catalog().await.unwrap_err();
        assert!(matches!(err, Error::CatalogUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_fetch_catalog_unreachable() {
        let backend = HttpBackend::new(
            "http://127.0.0.1:1",
            Duration::from_secs(2),
            Arc::new(StaticTokenProvider::new("tok", "user-1")),
        )
        .unwrap();
        let err = HttpCatalog::new(backend).fetch_catalog().await.unwrap_err();
        assert!(matches!(err, Error::CatalogUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_fetch_catalog_asks_for_fresh_credential() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/games"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(2)
            .mount(&server)
            .await;

        let mut auth = MockAuthProvider::new();
        auth.expect_current_credential()
            .times(2)
            .returning(|| Ok(Credential::new("tok", "user-1")));

        let backend =
            HttpBackend::new(&server.uri(), Duration::from_secs(5), Arc::new(auth)).unwrap();
        let catalog = HttpCatalog::new(backend);
        assert!(catalog.fetch_catalog().await.unwrap().is_empty());
        assert!(catalog.fetch_catalog().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_catalog_without_credential_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut auth = MockAuthProvider::new();
        auth.expect_current_credential()
            .returning(|| Err(Error::unauthenticated("expired")));

        let backend =
            HttpBackend::new(&server.uri(), Duration::from_secs(5), Arc::new(auth)).unwrap();
        let err = HttpCatalog::new(backend).fetch_catalog().await.unwrap_err();
        assert!(err.to_string().contains("sign-in required"));
    }
}
