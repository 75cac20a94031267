pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{CorsConfig, StorageBackend, StorageConfig};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FEChannel API",
        version = "1.0.0",
        description = "Catalog, storage and Roku feed API for the FEChannel video site"
    ),
    tags(
        (name = "Health", description = "Service status"),
        (name = "Auth", description = "Admin authentication"),
        (name = "Videos", description = "Video catalog browsing and management"),
        (name = "Categories", description = "Video categories"),
        (name = "Search", description = "Full-text video search"),
        (name = "Admin", description = "Admin dashboard"),
        (name = "Analytics", description = "Network and storage analytics"),
        (name = "Storage", description = "Object storage for media and feeds"),
        (name = "Roku", description = "Roku feed generation, validation and publishing"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// An empty origin list allows any origin.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(config.max_age));

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Path the filesystem backend's public URLs live under, if it can be served from here.
fn media_mount(storage: &StorageConfig) -> Option<String> {
    if storage.backend != StorageBackend::Filesystem {
        return None;
    }
    let base = &storage.filesystem.public_base_url;
    match reqwest::Url::parse(base) {
        Ok(url) => {
            let path = url.path().trim_end_matches('/');
            (!path.is_empty()).then(|| path.to_string())
        }
        Err(e) => {
            tracing::warn!(%base, error = %e, "Not serving stored objects: bad public base URL");
            None
        }
    }
}

/// Keep `.meta/` sidecars and `.tmp/` staging files out of the static route.
async fn hide_internal_objects(req: Request, next: Next) -> Response {
    let hidden = req
        .uri()
        .path()
        .split('/')
        .any(|segment| segment.starts_with('.'));
    if hidden {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(req).await
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);
    let media = media_mount(&state.config.storage)
        .map(|mount| (mount, state.config.storage.filesystem.root.clone()));

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes(&state.config))
        .split_for_parts();

    let mut router = router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api));

    if let Some((mount, root)) = media {
        tracing::info!(%mount, root = %root.display(), "Serving stored objects");
        let objects = axum::Router::new()
            .fallback_service(ServeDir::new(root))
            .layer(middleware::from_fn(hide_internal_objects));
        router = router.nest_service(&mount, objects);
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}
