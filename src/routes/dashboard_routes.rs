use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::DashboardStatsResponse;
use crate::models::auth::UsuarioAutenticado;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}

async fn stats(
    State(state): State<AppState>,
    usuario: UsuarioAutenticado,
) -> Result<Json<DashboardStatsResponse>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let response = controller.stats(&usuario).await?;
    Ok(Json(response))
}
