pub mod health;
pub mod pages;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/report/*path", get(pages::handle_report))
        .route("/api/v1/placeholders", get(pages::handle_placeholders))
        .route("/api/v1/fragments/*path", get(pages::handle_fragment))
        // Everything else is a content page
        .fallback(pages::handle_page)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::hydrate::Hydrator;
    use crate::testing::{self, MemoryFetcher};

    const INDEX: &str = r#"<html><head><title>Home</title></head><body><main>
        <div><div class="hero"><div><div><p>Welcome</p></div></div></div></div>
    </main></body></html>"#;

    fn router() -> Router {
        let fetcher = MemoryFetcher::new()
            .with("/index.html", INDEX)
            .with("/nav.plain.html", "<ul><li>Home</li></ul>")
            .with("/placeholders.json", r#"{"data":[{"Key":"Add To Cart","Text":"Add"}]}"#);
        let ctx = testing::context(fetcher, testing::catalog());
        build_router(AppState::new(Hydrator::new(ctx, vec!["hero".to_string()])))
    }

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let response = router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_body("/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_root_serves_hydrated_index() {
        let (status, body) = get_body("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.contains(r#"<section status="loaded">"#));
        assert!(body.contains(r#"block-name="hero" status="loaded""#));
    }

    #[tokio::test]
    async fn test_missing_page_is_json_404() {
        let (status, body) = get_body("/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_report() {
        let (status, body) = get_body("/api/v1/report/index.html").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["hidden"], false);
        assert_eq!(json["sections"][0]["blocks"][0]["name"], "hero");
        assert_eq!(json["sections"][0]["blocks"][0]["source"], "fallback");
        let diagnostics = json["diagnostics"].as_array().unwrap();
        assert!(diagnostics.iter().any(|d| d["kind"] == "component_fallback"));
    }

    #[tokio::test]
    async fn test_placeholders() {
        let (status, body) = get_body("/api/v1/placeholders").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["addToCart"], "Add");

        let (_, body) = get_body("/api/v1/placeholders?prefix=/fr").await;
        assert_eq!(body, "{}");
    }

    #[tokio::test]
    async fn test_fragment() {
        let (status, body) = get_body("/api/v1/fragments/nav").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<ul><li>Home</li></ul>");

        let (_, body) = get_body("/api/v1/fragments/footer").await;
        assert!(body.is_empty());
    }
}
