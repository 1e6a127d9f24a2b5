mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Carregar variáveis de ambiente
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("📅 Gestão de Escalas - API");
    info!("==========================");

    let config = EnvironmentConfig::default();

    // Inicializar banco de dados
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Erro conectando ao banco de dados: {}", e);
            return Err(e);
        }
    };

    if let Err(e) = database::run_migrations(&pool).await {
        error!("❌ Erro rodando migrations: {}", e);
        return Err(e);
    }
    info!("✅ Banco de dados pronto");

    // CORS restrito em produção, permissivo em desenvolvimento
    let cors = if config.is_production() && !config.cors_origins.is_empty() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };
    let timeout = TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs));

    let app_state = AppState::new(pool, config.clone());
    info!("🔧 Ambiente: {}", app_state.config.environment);

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .nest("/api/user", routes::user_routes::create_user_router())
        .nest(
            "/api/solicitacoes",
            routes::solicitacao_routes::create_solicitacao_router(),
        )
        .nest("/api/escalas", routes::escala_routes::create_escala_router())
        .nest(
            "/api/dashboard",
            routes::dashboard_routes::create_dashboard_router(),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(timeout),
        )
        .with_state(app_state);

    let addr: SocketAddr = config.server_addr().parse()?;

    info!("🌐 Servidor iniciando em http://{}", addr);
    info!("🔍 Endpoints disponíveis:");
    info!("   GET  /test - Endpoint de teste");
    info!("🔑 Autenticação:");
    info!("   POST /api/auth/login - Login por matrícula e senha");
    info!("   GET  /api/user/profile - Perfil do usuário autenticado");
    info!("📋 Solicitações de alteração:");
    info!("   POST /api/solicitacoes - Criar solicitação (supervisor/treinamento)");
    info!("   GET  /api/solicitacoes - Listar com escopo por papel");
    info!("   GET  /api/solicitacoes/:id - Detalhar solicitação");
    info!("   PUT  /api/solicitacoes/:id - Aprovar/rejeitar (analista/gerência)");
    info!("📅 Escalas:");
    info!("   POST /api/escalas - Listagem mensal paginada");
    info!("   POST /api/escalas/alterar - Alteração direta (analista/gerência)");
    info!("   POST /api/escalas/upload - Importação CSV do mês (substitui)");
    info!("📊 Dashboard:");
    info!("   GET  /api/dashboard/stats - Contadores agregados");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Erro do servidor: {}", e);
            e
        })?;

    info!("👋 Servidor encerrado");
    Ok(())
}

/// Endpoint de teste simples
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "API de Gestão de Escalas funcionando corretamente!",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Sinal de desligamento gracioso
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C recebido, desligando servidor...");
        },
        _ = terminate => {
            info!("🛑 Sinal de término recebido, desligando servidor...");
        },
    }
}
