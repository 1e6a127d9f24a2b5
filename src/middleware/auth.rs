//! Extração do usuário autenticado
//!
//! `UsuarioAutenticado` funciona como extractor do Axum: lê o header
//! `Authorization: Bearer`, valida o JWT e entrega os claims tipados
//! ao handler. Sem token ou com token inválido o request morre em 401
//! antes de chegar ao controller.

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};

use crate::models::auth::UsuarioAutenticado;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[async_trait]
impl FromRequestParts<AppState> for UsuarioAutenticado {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Token não fornecido".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Token não fornecido".to_string()))?;

        state.jwt.usuario_do_token(token)
    }
}
