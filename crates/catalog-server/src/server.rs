use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderValue, Method, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use catalog_core::{ItemId, NewItem};
use catalog_engine::Catalog;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;

/// Largest accepted upload (multipart body)
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

pub struct CatalogServer;

#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    keyword: String,
}

impl CatalogServer {
    /// Build the HTTP router. `front_url` is the single origin allowed by CORS.
    pub fn router(catalog: Arc<Catalog>, front_url: &str) -> anyhow::Result<Router> {
        let origin: HeaderValue = front_url
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid front url {front_url:?}: {e}"))?;

        let cors = CorsLayer::new().allow_origin(origin).allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
        ]);

        let app = Router::new()
            .route("/", get(handle_root))
            .route("/items", get(list_items).post(add_item))
            .route("/items/:id", get(get_item))
            .route("/search", get(search_items))
            .route("/image/:id", get(get_image))
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(AppState { catalog });

        Ok(app)
    }

    pub async fn serve(
        catalog: Arc<Catalog>,
        host: &str,
        port: u16,
        front_url: &str,
    ) -> anyhow::Result<()> {
        let app = Self::router(catalog, front_url)?;

        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr).await?;

        info!("catalog server listening on {}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// GET / - liveness
async fn handle_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello, world!" }))
}

/// POST /items - multipart `name`, `category`, `image`
async fn add_item(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut name = String::new();
    let mut category = String::new();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = field.text().await?,
            "category" => category = field.text().await?,
            "image" => image = Some(field.bytes().await?),
            _ => {}
        }
    }

    let new_item = NewItem {
        name: &name,
        category: &category,
        image: image.as_deref(),
    };
    let id = state.catalog.add_item(new_item).await?;
    let item = state.catalog.get_item(id).await?;

    Ok(Json(serde_json::json!({
        "id": id,
        "message": format!(
            "item received: name={},category={},images={}",
            item.name, item.category, item.image_name
        )
    })))
}

/// GET /items - all items in insertion order
async fn list_items(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let items = state.catalog.list_items().await?;
    Ok(Json(serde_json::json!({ "item": items })))
}

/// GET /items/:id
async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: ItemId = id.parse()?;
    let item = state.catalog.get_item(id).await?;
    Ok(Json(item).into_response())
}

/// GET /search?keyword=
async fn search_items(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let items = state.catalog.search_items(&params.keyword).await?;
    Ok(Json(serde_json::json!({ "item": items })))
}

/// GET /image/:id - item photo, or the placeholder when it cannot be resolved
async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: ItemId = id.parse()?;
    let image = state.catalog.fetch_image(id).await?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], image.bytes).into_response())
}
