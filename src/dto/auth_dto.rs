use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::auth::User;

/// Request de login por matrícula e senha
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub matricula: Option<String>,
    pub senha: Option<String>,
}

/// Usuário sem o hash de senha
#[derive(Debug, Serialize)]
pub struct UsuarioResponse {
    pub id: Uuid,
    pub matricula: String,
    pub nome: String,
    pub email: Option<String>,
    pub role: String,
    pub ativo: bool,
}

impl From<User> for UsuarioResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            matricula: user.matricula,
            nome: user.nome,
            email: user.email,
            role: user.role,
            ativo: user.ativo,
        }
    }
}

/// Response de login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UsuarioResponse,
}

/// Response do perfil do usuário autenticado
#[derive(Debug, Serialize)]
pub struct PerfilResponse {
    pub user: UsuarioResponse,
}
