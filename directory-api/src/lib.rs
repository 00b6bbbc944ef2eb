use crate::{
    arguments::AppConfig,
    handlers::{auth_handlers, blog_handlers, report_handlers, resource_handlers},
    middleware::{MakeRequestUuid, RequestLogger},
    types::{handler::Store, jwt::Claims},
};
use axum::{
    extract::{Extension, Json, Path, Query},
    http::{
        header::{HeaderName, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, patch, post},
    Router,
};
use directory_database::{
    database::DirectoryStore,
    resource::{resource, ResourceSpec, RESOURCES},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    classify::StatusInRangeAsFailures, compression::CompressionLayer, cors::CorsLayer,
    propagate_header::PropagateHeaderLayer, request_id::SetRequestIdLayer, trace::TraceLayer,
};

pub mod arguments;
mod extractors;
mod handlers;
mod middleware;
pub mod types;

/// Tracing target for the directory API.
pub const DIRECTORY_API_TARGET: &str = "directory-api";
/// Header name for correlation request identifier.
pub const REQ_ID_HEADER: &str = "x-request-id";

/// CRUD routes shared by every resource family. List and get stay
/// public; every mutation goes through the bearer guard.
fn resource_routes(spec: &'static ResourceSpec) -> Router {
    let list = if spec.paged {
        get(
            move |store: Store, Query(params): Query<resource_handlers::PageParams>| {
                resource_handlers::page_resources(spec, store, params)
            },
        )
    } else {
        get(move |store: Store| resource_handlers::list_resources(spec, store))
    };

    let list_create = list.post(
        move |store: Store, claims: Claims, Json(payload): Json<Value>| {
            resource_handlers::create_resource(spec, store, claims, payload)
        },
    );

    let by_id = get(move |store: Store, Path(id): Path<String>| {
        resource_handlers::get_resource(spec, store, id)
    })
    .put(
        move |store: Store, claims: Claims, Path(id): Path<String>, Json(payload): Json<Value>| {
            resource_handlers::update_resource(spec, store, claims, id, payload)
        },
    )
    .patch(
        move |store: Store, claims: Claims, Path(id): Path<String>, Json(payload): Json<Value>| {
            resource_handlers::update_resource(spec, store, claims, id, payload)
        },
    )
    .delete(
        move |store: Store, claims: Claims, Path(id): Path<String>| {
            resource_handlers::delete_resource(spec, store, claims, id)
        },
    );

    Router::new()
        .route(&format!("/{}", spec.path), list_create)
        .route(&format!("/{}/{{id}}", spec.path), by_id)
}

/// Extra operations layered on the blog and disaster-report repositories.
fn sub_resource_routes() -> Router {
    let blogs = resource("blogs").expect("blogs family registered");
    let reports = resource("disaster-reports").expect("disaster-reports family registered");

    Router::new()
        .route(
            "/blogs/{id}/like",
            post(
                move |store: Store,
                      claims: Claims,
                      Path(id): Path<String>,
                      Json(request): Json<blog_handlers::LikeRequest>| {
                    blog_handlers::like_blog(blogs, store, claims, id, request)
                },
            ),
        )
        .route(
            "/blogs/{id}/comments",
            get(move |store: Store, Path(id): Path<String>| {
                blog_handlers::list_comments(blogs, store, id)
            })
            .post(
                move |store: Store,
                      claims: Claims,
                      Path(id): Path<String>,
                      Json(request): Json<blog_handlers::CommentRequest>| {
                    blog_handlers::add_comment(blogs, store, claims, id, request)
                },
            ),
        )
        .route(
            "/disaster-reports/{id}/status",
            patch(
                move |store: Store,
                      claims: Claims,
                      Path(id): Path<String>,
                      Json(request): Json<report_handlers::StatusRequest>| {
                    report_handlers::set_status(reports, store, claims, id, request)
                },
            ),
        )
}

/// Builds the routes and the layered middleware.
pub fn build_app(store: Arc<dyn DirectoryStore>, app_config: AppConfig) -> Router {
    let cors = cors_layer(&app_config);

    let tower_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQ_ID_HEADER),
            MakeRequestUuid,
        ))
        .layer(PropagateHeaderLayer::new(HeaderName::from_static(
            REQ_ID_HEADER,
        )))
        .layer(
            TraceLayer::new(
                StatusInRangeAsFailures::new_for_client_and_server_errors().into_make_classifier(),
            )
            .make_span_with(RequestLogger)
            .on_request(RequestLogger)
            .on_failure(RequestLogger)
            .on_response(RequestLogger),
        )
        .layer(Extension(store))
        .layer(Extension(Arc::new(app_config)))
        .layer(cors)
        .layer(CompressionLayer::new());

    let mut app = Router::new()
        .route("/", get(root))
        .route("/login", post(auth_handlers::login));

    for spec in RESOURCES {
        app = app.merge(resource_routes(spec));
    }

    app.merge(sub_resource_routes()).layer(tower_middleware)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(config.allowed_origins().to_vec())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

/// Liveness probe.
async fn root() -> &'static str {
    "directory service is up"
}
