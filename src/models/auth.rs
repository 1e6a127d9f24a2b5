//! Modelos de autenticação
//!
//! Papéis do sistema, claims do JWT e o usuário autenticado
//! extraído do token em cada request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Papéis do sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Supervisor,
    Analista,
    Gerencia,
    Treinamento,
    Rh,
    Qhse,
    Occ,
    Ponto,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Supervisor => "supervisor",
            UserRole::Analista => "analista",
            UserRole::Gerencia => "gerencia",
            UserRole::Treinamento => "treinamento",
            UserRole::Rh => "rh",
            UserRole::Qhse => "qhse",
            UserRole::Occ => "occ",
            UserRole::Ponto => "ponto",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "supervisor" => Some(UserRole::Supervisor),
            "analista" => Some(UserRole::Analista),
            "gerencia" => Some(UserRole::Gerencia),
            "treinamento" => Some(UserRole::Treinamento),
            "rh" => Some(UserRole::Rh),
            "qhse" => Some(UserRole::Qhse),
            "occ" => Some(UserRole::Occ),
            "ponto" => Some(UserRole::Ponto),
            _ => None,
        }
    }
}

/// Usuário do sistema (linha da tabela `users`)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub matricula: String,
    pub nome: String,
    pub email: Option<String>,
    pub senha_hash: String,
    pub role: String,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
}

/// Claims do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // user_id
    pub matricula: String,
    pub nome: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Usuário autenticado, extraído do bearer token
#[derive(Debug, Clone)]
pub struct UsuarioAutenticado {
    pub id: Uuid,
    pub matricula: String,
    pub nome: String,
    pub role: UserRole,
}
