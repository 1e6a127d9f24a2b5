use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::solicitacao_controller::SolicitacaoController;
use crate::dto::solicitacao_dto::{
    CriarSolicitacaoRequest, DecisaoRequest, ListaSolicitacoesResponse, ListagemParams,
    SolicitacaoDetalheResponse, SolicitacaoResponse,
};
use crate::models::auth::UsuarioAutenticado;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_solicitacao_router() -> Router<AppState> {
    Router::new()
        .route("/", post(criar))
        .route("/", get(listar))
        .route("/:id", get(detalhar))
        .route("/:id", put(decidir))
}

async fn criar(
    State(state): State<AppState>,
    usuario: UsuarioAutenticado,
    Json(request): Json<CriarSolicitacaoRequest>,
) -> Result<(StatusCode, Json<SolicitacaoResponse>), AppError> {
    let controller = SolicitacaoController::new(state.pool.clone());
    let response = controller.criar(&usuario, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn listar(
    State(state): State<AppState>,
    usuario: UsuarioAutenticado,
    Query(params): Query<ListagemParams>,
) -> Result<Json<ListaSolicitacoesResponse>, AppError> {
    let controller = SolicitacaoController::new(state.pool.clone());
    let response = controller.listar(&usuario, params).await?;
    Ok(Json(response))
}

async fn detalhar(
    State(state): State<AppState>,
    usuario: UsuarioAutenticado,
    Path(id): Path<Uuid>,
) -> Result<Json<SolicitacaoDetalheResponse>, AppError> {
    let controller = SolicitacaoController::new(state.pool.clone());
    let response = controller.detalhar(&usuario, id).await?;
    Ok(Json(response))
}

async fn decidir(
    State(state): State<AppState>,
    usuario: UsuarioAutenticado,
    Path(id): Path<Uuid>,
    Json(request): Json<DecisaoRequest>,
) -> Result<Json<SolicitacaoResponse>, AppError> {
    let controller = SolicitacaoController::new(state.pool.clone());
    let response = controller.decidir(&usuario, id, request).await?;
    Ok(Json(response))
}
