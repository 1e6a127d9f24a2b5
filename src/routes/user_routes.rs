use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::PerfilResponse;
use crate::models::auth::UsuarioAutenticado;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router() -> Router<AppState> {
    Router::new().route("/profile", get(perfil))
}

async fn perfil(
    State(state): State<AppState>,
    usuario: UsuarioAutenticado,
) -> Result<Json<PerfilResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.jwt.clone());
    let response = controller.perfil(&usuario).await?;
    Ok(Json(response))
}
