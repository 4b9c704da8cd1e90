//! HTTP route table.

pub mod auth;
pub mod health;
pub mod produto;
pub mod venda;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
///
/// ```text
/// POST  /api/auth/login        public
/// GET   /api/auth/session      session
/// POST  /api/auth/logout       public
/// GET   /api/produto           session
/// POST  /api/produto           session   → 201
/// PATCH /api/produto           session
/// GET   /api/produto/{codigo}  session
/// POST  /api/venda             session   → 201
/// GET   /api/venda             session
/// GET   /health                public
/// ```
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/session", get(auth::session))
        .route("/auth/logout", post(auth::logout))
        .route(
            "/produto",
            get(produto::list)
                .post(produto::register)
                .patch(produto::adjust_stock),
        )
        .route("/produto/{codigo}", get(produto::find_by_barcode))
        .route("/venda", get(venda::list).post(venda::submit));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
