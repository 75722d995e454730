mod error;
mod handlers;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::db::Database;

pub use error::ApiError;
pub use handlers::{ListMeta, ProjectList, TaskList};

/// Router with permissive CORS, as used for local development and tests.
pub fn create_router(db: Database) -> Router {
    create_router_with_config(db, &Config::default())
}

pub fn create_router_with_config(db: Database, config: &Config) -> Router {
    let api = Router::new()
        // Projects
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/{project_id}/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        // Tasks
        .route(
            "/tasks/{id}",
            patch(handlers::update_task).delete(handlers::delete_task),
        )
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config)),
        )
        .with_state(db)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let Some(origins) = &config.cors_origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
