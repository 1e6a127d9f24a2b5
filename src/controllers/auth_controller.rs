//! Controller de autenticação
//!
//! Login por matrícula e senha (bcrypt) com emissão de JWT,
//! e o perfil do usuário autenticado.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, PerfilResponse};
use crate::models::auth::UsuarioAutenticado;
use crate::repositories::user_repository::{PgUserRepository, UserRepository};
use crate::services::jwt_service::JwtService;
use crate::utils::errors::{AppError, AppResult};

pub struct AuthController {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt: Arc<JwtService>) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool)),
            jwt,
        }
    }

    #[cfg(test)]
    pub fn com_repositorios(users: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self { users, jwt }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let (Some(matricula), Some(senha)) = (
            request.matricula.as_deref().filter(|m| !m.is_empty()),
            request.senha.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Err(AppError::Validation(
                "Matrícula e senha são obrigatórios".to_string(),
            ));
        };

        let user = self
            .users
            .buscar_ativo_por_matricula(matricula)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("Usuário não encontrado ou inativo".to_string())
            })?;

        let senha_valida = bcrypt::verify(senha, &user.senha_hash)
            .map_err(|e| AppError::Hash(format!("Hash de senha inválido: {}", e)))?;

        if !senha_valida {
            return Err(AppError::Unauthorized("Senha incorreta".to_string()));
        }

        let token = self.jwt.gerar_token(&user)?;

        info!("Login de {} ({})", user.matricula, user.role);

        Ok(LoginResponse {
            message: "Login realizado com sucesso".to_string(),
            token,
            user: user.into(),
        })
    }

    pub async fn perfil(&self, usuario: &UsuarioAutenticado) -> AppResult<PerfilResponse> {
        let user = self
            .users
            .buscar_por_id(usuario.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuário não encontrado".to_string()))?;

        Ok(PerfilResponse { user: user.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memoria::MemoriaStore;

    fn controller(store: &Arc<MemoriaStore>) -> AuthController {
        AuthController::com_repositorios(store.clone(), Arc::new(JwtService::new()))
    }

    fn request(matricula: Option<&str>, senha: Option<&str>) -> LoginRequest {
        LoginRequest {
            matricula: matricula.map(str::to_string),
            senha: senha.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn login_emite_token_com_claims_do_usuario() {
        let store = Arc::new(MemoriaStore::new());
        let id = store.inserir_usuario("12345", "segredo", "supervisor");
        let controller = controller(&store);

        let resposta = controller
            .login(request(Some("12345"), Some("segredo")))
            .await
            .unwrap();

        assert_eq!(resposta.user.id, id);
        assert_eq!(resposta.user.role, "supervisor");

        let autenticado = JwtService::new().usuario_do_token(&resposta.token).unwrap();
        assert_eq!(autenticado.id, id);
        assert_eq!(autenticado.matricula, "12345");
    }

    #[tokio::test]
    async fn senha_errada_e_401() {
        let store = Arc::new(MemoriaStore::new());
        store.inserir_usuario("12345", "segredo", "supervisor");
        let controller = controller(&store);

        let erro = controller
            .login(request(Some("12345"), Some("outra")))
            .await
            .unwrap_err();
        assert!(matches!(erro, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn usuario_inativo_ou_desconhecido_e_401() {
        let store = Arc::new(MemoriaStore::new());
        let id = store.inserir_usuario("12345", "segredo", "supervisor");
        store.desativar_usuario(id);
        let controller = controller(&store);

        let erro = controller
            .login(request(Some("12345"), Some("segredo")))
            .await
            .unwrap_err();
        assert!(matches!(erro, AppError::Unauthorized(_)));

        let erro = controller
            .login(request(Some("99999"), Some("segredo")))
            .await
            .unwrap_err();
        assert!(matches!(erro, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn credenciais_ausentes_e_400() {
        let store = Arc::new(MemoriaStore::new());
        let controller = controller(&store);

        for (matricula, senha) in [(None, Some("x")), (Some("123"), None), (Some(""), Some("x"))] {
            let erro = controller.login(request(matricula, senha)).await.unwrap_err();
            assert!(matches!(erro, AppError::Validation(_)));
        }
    }
}
