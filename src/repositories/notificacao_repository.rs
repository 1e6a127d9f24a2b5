use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::utils::errors::AppResult;

/// Acesso às notificações; o dashboard só precisa da contagem
#[async_trait]
pub trait NotificacaoRepository: Send + Sync {
    async fn contar_nao_lidas(&self, usuario_id: Uuid) -> AppResult<i64>;
}

pub struct PgNotificacaoRepository {
    pool: PgPool,
}

impl PgNotificacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificacaoRepository for PgNotificacaoRepository {
    async fn contar_nao_lidas(&self, usuario_id: Uuid) -> AppResult<i64> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notificacoes WHERE usuario_id = $1 AND lida = FALSE",
        )
        .bind(usuario_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
