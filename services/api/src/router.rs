use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;

use skillshare_core::health::healthz;
use skillshare_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    admin,
    auth::{login, logout, refresh, register},
    feedback::{create_feedback, list_feedback},
    health::readyz,
    notification::{list_unread, mark_all_read, mark_read},
    oauth::{google_callback, google_login},
    session::{
        create_session, delete_session, export_ics, get_session, join_session, joined_sessions,
        leave_session, list_participants, list_sessions, moderator_delete_session, my_sessions,
        recommended_sessions, update_session,
    },
    user::{change_password, get_me, get_user, list_users, update_me},
};
use crate::state::AppState;

/// Allow the frontend origin with credentials. An unparsable origin allows none.
pub fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);
    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(frontend_url, error = %e, "invalid FRONTEND_URL, CORS origin disabled");
            layer
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.frontend_url);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback))
        .route("/api/logout", post(logout))
        // Users
        .route("/api/users", get(list_users))
        .route("/api/users/me", get(get_me).put(update_me))
        .route("/api/users/me/password", put(change_password))
        .route("/api/users/{id}", get(get_user))
        // Admin
        .route("/api/admin/users", get(admin::list_users))
        .route(
            "/api/admin/users/{id}",
            get(admin::get_user).delete(admin::delete_user),
        )
        .route("/api/admin/users/{id}/role", put(admin::update_role))
        // Sessions
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/my", get(my_sessions))
        .route("/api/sessions/joined", get(joined_sessions))
        .route("/api/sessions/recommended", get(recommended_sessions))
        .route(
            "/api/sessions/{id}",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/api/sessions/{id}/participants", get(list_participants))
        .route("/api/sessions/{id}/join", post(join_session))
        .route("/api/sessions/{id}/leave", post(leave_session))
        .route("/api/sessions/{id}/ics", get(export_ics))
        .route("/api/moderator/sessions/{id}", delete(moderator_delete_session))
        // Feedback
        .route(
            "/api/sessions/{id}/feedback",
            get(list_feedback).post(create_feedback),
        )
        // Notifications
        .route("/api/notifications/unread", get(list_unread))
        .route("/api/notifications/read-all", post(mark_all_read))
        .route("/api/notifications/{id}/read", post(mark_read))
        .layer(cors)
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
