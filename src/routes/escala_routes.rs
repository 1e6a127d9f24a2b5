use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};

use crate::controllers::escala_controller::EscalaController;
use crate::dto::escala_dto::{
    AlteracaoDiretaRequest, AlteracaoDiretaResponse, EscalasRequest, EscalasResponse,
    UploadResponse,
};
use crate::models::auth::UsuarioAutenticado;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_escala_router() -> Router<AppState> {
    Router::new()
        .route("/", post(listar))
        .route("/alterar", post(alterar))
        .route("/upload", post(upload))
}

async fn listar(
    State(state): State<AppState>,
    _usuario: UsuarioAutenticado,
    Json(params): Json<EscalasRequest>,
) -> Result<Json<EscalasResponse>, AppError> {
    let controller = EscalaController::new(state.pool.clone());
    let response = controller.listar_mes(params).await?;
    Ok(Json(response))
}

async fn alterar(
    State(state): State<AppState>,
    usuario: UsuarioAutenticado,
    Json(request): Json<AlteracaoDiretaRequest>,
) -> Result<Json<AlteracaoDiretaResponse>, AppError> {
    let controller = EscalaController::new(state.pool.clone());
    let response = controller.alterar_direto(&usuario, request).await?;
    Ok(Json(response))
}

async fn upload(
    State(state): State<AppState>,
    usuario: UsuarioAutenticado,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut arquivo: Option<(String, String)> = None;
    let mut mes: Option<i32> = None;
    let mut ano: Option<i32> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Upload inválido: {}", e)))?
    {
        let nome_campo = field.name().map(str::to_string);
        match nome_campo.as_deref() {
            Some("file") => {
                let nome_arquivo = field
                    .file_name()
                    .unwrap_or("escala.csv")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Internal(format!("Erro ao ler arquivo: {}", e)))?;
                let conteudo = String::from_utf8_lossy(&bytes).into_owned();
                arquivo = Some((nome_arquivo, conteudo));
            }
            Some("mes") => {
                mes = field.text().await.ok().and_then(|t| t.trim().parse().ok());
            }
            Some("ano") => {
                ano = field.text().await.ok().and_then(|t| t.trim().parse().ok());
            }
            _ => {}
        }
    }

    let (nome_arquivo, conteudo) =
        arquivo.ok_or_else(|| AppError::Validation("Arquivo não fornecido".to_string()))?;
    let (mes, ano) = mes.zip(ano).ok_or_else(|| {
        AppError::Validation("Mês e ano são obrigatórios e devem ser válidos".to_string())
    })?;

    let controller = EscalaController::new(state.pool.clone());
    let response = controller
        .importar(&usuario, &nome_arquivo, &conteudo, mes, ano)
        .await?;
    Ok(Json(response))
}
