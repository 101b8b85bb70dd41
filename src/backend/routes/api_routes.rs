/**
 * API Routes
 *
 * # Public
 * - `POST /api/auth/signup`
 * - `POST /api/auth/login`
 *
 * # Protected (bearer token)
 * - `GET /api/auth/session`, `POST /api/auth/logout`
 * - `/api/friends/...`
 * - `/api/texts/...`
 * - `/api/annotations/...`
 */

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::backend::annotations::handlers as annotations;
use crate::backend::auth::{login, logout, session, signup};
use crate::backend::friends::{
    list_friend_requests, list_friends, respond_to_friend_request, send_friend_request,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;
use crate::backend::texts::{create_text, delete_text, get_text, list_texts};

/// Routes that need an authenticated caller
fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/session", get(session))
        .route("/api/auth/logout", post(logout))
        // Friends
        .route("/api/friends/request", post(send_friend_request))
        .route("/api/friends/request/respond", post(respond_to_friend_request))
        .route("/api/friends/list", get(list_friends))
        .route("/api/friends/requests", get(list_friend_requests))
        // Texts
        .route("/api/texts", get(list_texts))
        .route("/api/texts/create", post(create_text))
        .route("/api/texts/{id}", get(get_text).delete(delete_text))
        // Annotations
        .route("/api/annotations/create", post(annotations::create_annotation))
        .route("/api/annotations/reply", post(annotations::create_reply))
        .route("/api/annotations/{id}", get(annotations::list_annotations))
        .route("/api/annotations/{id}/vote", post(annotations::vote_annotation))
        .route("/api/annotations/{id}/reply-vote", post(annotations::vote_reply))
        .route("/api/annotations/{id}/delete", delete(annotations::delete_annotation))
        .route("/api/annotations/reply/{id}/delete", delete(annotations::delete_reply))
}

/// Add the API routes to `router`
///
/// The auth middleware is applied with `route_layer`, so it only runs for
/// requests that matched a protected route.
pub fn configure_api_routes(router: Router<AppState>, app_state: AppState) -> Router<AppState> {
    router
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .merge(
            protected_routes()
                .route_layer(middleware::from_fn_with_state(app_state, auth_middleware)),
        )
}
