use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod attendees;
pub mod booths;
pub mod concierge;
pub mod error;
pub mod exhibitors;
pub mod expos;
pub mod feedback;
pub mod middleware;
pub mod response;
pub mod state;
pub mod users;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(expos::routes(state.clone()))
        .merge(booths::routes())
        .merge(exhibitors::routes(state.clone()))
        .merge(attendees::routes())
        .merge(users::routes())
        .merge(feedback::routes())
        .merge(concierge::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
