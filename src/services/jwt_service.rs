use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::env;

use crate::models::auth::{JwtClaims, User, UserRole, UsuarioAutenticado};
use crate::utils::errors::AppError;
use uuid::Uuid;

/// Configuração JWT
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_token_duration: Duration,
}

impl JwtConfig {
    pub fn new() -> Self {
        let secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "escala-dev-secret-trocar-em-producao".to_string());

        Self {
            secret,
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::hours(24),
        }
    }
}

/// Serviço JWT
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        let config = JwtConfig::new();
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Gera o token de acesso de um usuário
    pub fn gerar_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now + self.config.access_token_duration;

        let claims = JwtClaims {
            sub: user.id.to_string(),
            matricula: user.matricula.clone(),
            nome: user.nome.clone(),
            role: user.role.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Jwt(format!("Erro ao gerar token: {}", e)))
    }

    /// Valida e decodifica um token
    pub fn validar_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let validation = Validation::new(self.config.algorithm);

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))
    }

    /// Extrai o usuário autenticado dos claims de um token válido
    pub fn usuario_do_token(&self, token: &str) -> Result<UsuarioAutenticado, AppError> {
        let claims = self.validar_token(token)?;

        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;
        let role = UserRole::from_str(&claims.role)
            .ok_or_else(|| AppError::Unauthorized("Papel inválido no token".to_string()))?;

        Ok(UsuarioAutenticado {
            id,
            matricula: claims.matricula,
            nome: claims.nome,
            role,
        })
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}
