//! Shared application state
//!
//! Este módulo define o estado compartilhado da aplicação, passado
//! através do router do Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::jwt_service::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            jwt: Arc::new(JwtService::new()),
        }
    }
}
