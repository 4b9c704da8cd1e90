//! Shared application state handed to every handler.

use std::sync::Arc;

use sabor_db::Database;
use sabor_engine::{
    AuthService, CatalogService, EngineResult, SaleEngine, SalesReportService, SessionManager,
    StockAdjustmentService,
};

use crate::config::ApiConfig;

/// Session cookie attributes.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
    pub max_age_secs: i64,
}

/// Services are cheap handles over the same pool; cloning the state per
/// request only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: Arc<AuthService>,
    pub catalog: CatalogService,
    pub stock: StockAdjustmentService,
    pub sales: SaleEngine,
    pub reports: SalesReportService,
    pub cookie: CookieSettings,
}

impl AppState {
    pub fn new(db: Database, auth_secret: &str, cookie: CookieSettings) -> EngineResult<Self> {
        let sessions = SessionManager::new(auth_secret, cookie.max_age_secs)?;

        Ok(AppState {
            auth: Arc::new(AuthService::new(db.clone(), sessions)),
            catalog: CatalogService::new(db.clone()),
            stock: StockAdjustmentService::new(db.clone()),
            sales: SaleEngine::new(db.clone()),
            reports: SalesReportService::new(db.clone()),
            db,
            cookie,
        })
    }

    pub fn from_config(db: Database, config: &ApiConfig) -> EngineResult<Self> {
        AppState::new(
            db,
            &config.auth_secret,
            CookieSettings {
                secure: config.cookie_secure,
                max_age_secs: config.session_max_age_secs,
            },
        )
    }
}
