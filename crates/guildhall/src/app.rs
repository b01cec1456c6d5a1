use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        group_requests::{
            accept_group_request, create_group_request, delete_group_request,
            list_group_requests,
        },
        groups::{create_group, delete_group, list_groups, remove_player, update_group},
        health::{healthz, livez},
        passwords::{forgot_password, reset_password},
        users::{create_user, update_user},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let timeout = state.config.request_timeout();

    Router::new()
        // Health routes
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        // User routes
        .route("/users", post(create_user))
        .route("/users/{id}", put(update_user))
        // Password reset routes
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        // Group routes
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/{id}", patch(update_group).delete(delete_group))
        .route(
            "/groups/{group_id}/players/{player_id}",
            delete(remove_player),
        )
        // Group request routes
        .route("/group-requests", get(list_group_requests))
        .route("/groups/{group_id}/requests", post(create_group_request))
        .route(
            "/groups/{group_id}/requests/{request_id}",
            delete(delete_group_request),
        )
        .route(
            "/groups/{group_id}/requests/{request_id}/accept",
            post(accept_group_request),
        )
        // Session routes
        .merge(guildhall_auth::auth_routes().with_state::<AppState>(state.auth.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}
