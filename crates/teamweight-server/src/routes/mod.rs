//! HTTP routes for teamweight.
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | GET | `/health` | none |
//! | POST | `/api/weight` | none |
//! | GET | `/api/weights` | none |
//! | GET | `/api/users/{id}` | none |
//! | POST | `/api/users` | none |
//! | POST | `/api/admin/login` | password |
//! | GET, PATCH | `/api/admin/users` | admin session |
//! | POST | `/api/admin/notify` | admin session |
//! | GET | `/api/cron/remind` | cron secret |
//! | POST | `/api/webhook` | LINE signature |

mod admin;
mod cron;
mod error;
mod extract;
mod health;
mod users;
mod webhook;
mod weights;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use teamweight_core::Config;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::auth::AdminGate;
use crate::line::Messenger;
use crate::records::RecordService;

pub use error::ApiError;
pub use extract::AdminSession;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub records: RecordService,
    pub gate: Arc<AdminGate>,
    pub messenger: Arc<dyn Messenger>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        records: RecordService,
        gate: AdminGate,
        messenger: Arc<dyn Messenger>,
        config: Config,
    ) -> Self {
        Self {
            records,
            gate: Arc::new(gate),
            messenger,
            config: Arc::new(config),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    let router = Router::new()
        .route("/health", get(health::health))
        .route("/api/weight", post(weights::submit_weight))
        .route("/api/weights", get(weights::list_weights))
        .route("/api/users", post(users::register_user))
        .route("/api/users/{id}", get(users::get_user))
        .route("/api/admin/login", post(admin::login))
        .route(
            "/api/admin/users",
            get(admin::list_players).patch(admin::update_target_weight),
        )
        .route("/api/admin/notify", post(admin::notify_players))
        .route("/api/cron/remind", get(cron::remind))
        .route("/api/webhook", post(webhook::receive))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// CORS for the configured origins, or `None` for same-origin only.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods([Method::GET, Method::POST, Method::PATCH])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
}
