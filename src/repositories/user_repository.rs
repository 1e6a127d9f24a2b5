use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::auth::User;
use crate::utils::errors::AppResult;

/// Acesso aos usuários do sistema
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn buscar_ativo_por_matricula(&self, matricula: &str) -> AppResult<Option<User>>;
    async fn buscar_por_id(&self, id: Uuid) -> AppResult<Option<User>>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn buscar_ativo_por_matricula(&self, matricula: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE matricula = $1 AND ativo = TRUE",
        )
        .bind(matricula)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn buscar_por_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
