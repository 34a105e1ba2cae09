use axum::{
    extract::{Path, Query, State},
    http::Uri,
    response::Html,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::content::Placeholders;
use crate::errors::AppError;
use crate::hydrate::PageReport;
use crate::page::Page;
use crate::render::render_page;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PlaceholdersQuery {
    pub prefix: Option<String>,
}

/// GET /*path
/// Fetches the raw page, hydrates it and returns the resulting markup.
pub async fn handle_page(State(state): State<AppState>, uri: Uri) -> Result<Html<String>, AppError> {
    let page = hydrate_path(&state, uri.path()).await?;
    Ok(Html(render_page(&page)))
}

/// GET /api/v1/report/*path
pub async fn handle_report(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<PageReport>, AppError> {
    let page = hydrate_path(&state, &format!("/{path}")).await?;
    Ok(Json(PageReport::from_page(&page)))
}

/// GET /api/v1/placeholders?prefix=
pub async fn handle_placeholders(
    State(state): State<AppState>,
    Query(params): Query<PlaceholdersQuery>,
) -> Json<Placeholders> {
    let prefix = params.prefix.unwrap_or_else(|| "default".to_string());
    let placeholders = state
        .hydrator
        .context()
        .content
        .fetch_placeholders(&prefix)
        .await;
    Json(placeholders.as_ref().clone())
}

/// GET /api/v1/fragments/*path
/// Plain HTML of a fragment such as `/nav`; empty when it does not exist.
pub async fn handle_fragment(State(state): State<AppState>, Path(path): Path<String>) -> Html<String> {
    let fragment = state
        .hydrator
        .context()
        .content
        .fetch_fragment(&format!("/{path}"))
        .await;
    Html(fragment)
}

async fn hydrate_path(state: &AppState, path: &str) -> Result<Page, AppError> {
    let source = page_source(path);
    info!("Hydrating {source}");
    let raw = state.hydrator.context().fetcher.fetch(&source).await?;
    Ok(state.hydrator.hydrate(&String::from_utf8_lossy(&raw)).await)
}

/// Maps a request path to the raw document: directories get `index.html`,
/// extensionless paths get `.html`.
fn page_source(path: &str) -> String {
    if path.is_empty() || path.ends_with('/') {
        return format!("{path}index.html");
    }
    let last = path.rsplit('/').next().unwrap_or_default();
    if last.contains('.') {
        path.to_string()
    } else {
        format!("{path}.html")
    }
}
