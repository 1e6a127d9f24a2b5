//! Repositório de solicitações de alteração
//!
//! A conclusão (aprovar/rejeitar) é a transição terminal da máquina de
//! estados: o UPDATE é condicionado a `status = 'pendente'`, e quando a
//! decisão é de aprovação a mutação do dia roda na mesma transação.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::models::escala::AlteracaoDia;
use crate::models::solicitacao::{Decisao, NovaSolicitacao, Solicitacao, StatusSolicitacao};
use crate::repositories::escala_repository::aplicar_dia_em;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::permissions::EscopoListagem;

/// Filtros da listagem de solicitações
#[derive(Debug, Clone)]
pub struct FiltroSolicitacoes {
    pub status: Option<StatusSolicitacao>,
    pub escopo: EscopoListagem,
    pub limite: i64,
    pub offset: i64,
}

/// Solicitação com os nomes do solicitante, colaborador e aprovador
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SolicitacaoDetalhada {
    #[sqlx(flatten)]
    pub solicitacao: Solicitacao,
    pub solicitante_nome: String,
    pub solicitante_matricula: String,
    pub colaborador_nome: String,
    pub colaborador_matricula: String,
    pub colaborador_departamento: Option<String>,
    pub colaborador_funcao: Option<String>,
    pub aprovador_nome: Option<String>,
    pub aprovador_matricula: Option<String>,
}

const SELECT_DETALHADA: &str = r#"
    SELECT s.*,
           u.nome AS solicitante_nome,
           u.matricula AS solicitante_matricula,
           c.nome AS colaborador_nome,
           c.matricula AS colaborador_matricula,
           c.departamento AS colaborador_departamento,
           c.funcao AS colaborador_funcao,
           a.nome AS aprovador_nome,
           a.matricula AS aprovador_matricula
    FROM solicitacoes_alteracao s
    JOIN users u ON u.id = s.solicitante_id
    JOIN colaboradores c ON c.id = s.colaborador_id
    LEFT JOIN users a ON a.id = s.aprovado_por
"#;

/// Acesso às solicitações de alteração
#[async_trait]
pub trait SolicitacaoRepository: Send + Sync {
    async fn criar(&self, nova: &NovaSolicitacao) -> AppResult<Solicitacao>;

    async fn buscar_por_id(&self, id: Uuid) -> AppResult<Option<Solicitacao>>;

    async fn buscar_detalhada(&self, id: Uuid) -> AppResult<Option<SolicitacaoDetalhada>>;

    async fn existe_pendente(&self, colaborador_id: Uuid, data_escala: &str) -> AppResult<bool>;

    /// Transição terminal. Quando aprovada, `alteracao` carrega a
    /// mutação do dia, aplicada na mesma transação da decisão.
    async fn concluir(
        &self,
        id: Uuid,
        decisao: &Decisao,
        alteracao: Option<&AlteracaoDia>,
    ) -> AppResult<Solicitacao>;

    async fn listar(&self, filtro: &FiltroSolicitacoes) -> AppResult<Vec<SolicitacaoDetalhada>>;

    async fn contar(&self, filtro: &FiltroSolicitacoes) -> AppResult<i64>;

    async fn contar_pendentes(&self) -> AppResult<i64>;
}

pub struct PgSolicitacaoRepository {
    pool: PgPool,
}

impl PgSolicitacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn aplicar_filtros(qb: &mut QueryBuilder<'_, sqlx::Postgres>, filtro: &FiltroSolicitacoes) {
        qb.push(" WHERE 1 = 1");

        if let Some(status) = filtro.status {
            qb.push(" AND s.status = ").push_bind(status.as_str());
        }

        match filtro.escopo {
            EscopoListagem::Proprias(solicitante_id) => {
                qb.push(" AND s.solicitante_id = ").push_bind(solicitante_id);
            }
            EscopoListagem::Aprovadas => {
                qb.push(" AND s.status = 'aprovado'");
            }
            EscopoListagem::Todas => {}
        }
    }
}

#[async_trait]
impl SolicitacaoRepository for PgSolicitacaoRepository {
    async fn criar(&self, nova: &NovaSolicitacao) -> AppResult<Solicitacao> {
        let solicitacao = sqlx::query_as::<_, Solicitacao>(
            r#"
            INSERT INTO solicitacoes_alteracao
                (solicitante_id, colaborador_id, escala_dia_id, data_escala,
                 valor_atual, valor_novo, motivo, justificativa, status,
                 aprovado_por, aprovado_em)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(nova.solicitante_id)
        .bind(nova.colaborador_id)
        .bind(nova.escala_dia_id)
        .bind(&nova.data_escala)
        .bind(&nova.valor_atual)
        .bind(&nova.valor_novo)
        .bind(&nova.motivo)
        .bind(&nova.justificativa)
        .bind(nova.status.as_str())
        .bind(nova.aprovado_por)
        .bind(nova.aprovado_em)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // O índice único parcial segura escritores concorrentes que
            // passaram juntos pela checagem de pendência
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::Conflict(
                        "Já existe uma solicitação pendente para este colaborador nesta data"
                            .to_string(),
                    );
                }
            }
            AppError::Database(e)
        })?;

        Ok(solicitacao)
    }

    async fn buscar_por_id(&self, id: Uuid) -> AppResult<Option<Solicitacao>> {
        let solicitacao =
            sqlx::query_as::<_, Solicitacao>("SELECT * FROM solicitacoes_alteracao WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(solicitacao)
    }

    async fn buscar_detalhada(&self, id: Uuid) -> AppResult<Option<SolicitacaoDetalhada>> {
        let sql = format!("{} WHERE s.id = $1", SELECT_DETALHADA);
        let solicitacao = sqlx::query_as::<_, SolicitacaoDetalhada>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(solicitacao)
    }

    async fn existe_pendente(&self, colaborador_id: Uuid, data_escala: &str) -> AppResult<bool> {
        let (existe,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM solicitacoes_alteracao
                WHERE colaborador_id = $1 AND data_escala = $2 AND status = 'pendente'
            )
            "#,
        )
        .bind(colaborador_id)
        .bind(data_escala)
        .fetch_one(&self.pool)
        .await?;

        Ok(existe)
    }

    async fn concluir(
        &self,
        id: Uuid,
        decisao: &Decisao,
        alteracao: Option<&AlteracaoDia>,
    ) -> AppResult<Solicitacao> {
        let mut tx = self.pool.begin().await?;

        // Condicionado ao estado pendente: a segunda decisão concorrente
        // não encontra linha e cai no ramo de conflito
        let atualizada = sqlx::query_as::<_, Solicitacao>(
            r#"
            UPDATE solicitacoes_alteracao
            SET status = $2,
                comentario_aprovador = $3,
                aprovado_por = $4,
                aprovado_em = $5
            WHERE id = $1 AND status = 'pendente'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(decisao.status.as_str())
        .bind(&decisao.comentario)
        .bind(decisao.aprovador_id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(solicitacao) = atualizada else {
            let existente = sqlx::query_as::<_, Solicitacao>(
                "SELECT * FROM solicitacoes_alteracao WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

            return Err(match existente {
                Some(s) => AppError::Conflict(format!("Solicitação já foi {}", s.status)),
                None => AppError::NotFound("Solicitação não encontrada".to_string()),
            });
        };

        if let Some(alteracao) = alteracao {
            aplicar_dia_em(&mut tx, alteracao).await?;
        }

        tx.commit().await?;

        Ok(solicitacao)
    }

    async fn listar(&self, filtro: &FiltroSolicitacoes) -> AppResult<Vec<SolicitacaoDetalhada>> {
        let mut qb = QueryBuilder::new(SELECT_DETALHADA);
        Self::aplicar_filtros(&mut qb, filtro);
        qb.push(" ORDER BY s.created_at DESC LIMIT ")
            .push_bind(filtro.limite)
            .push(" OFFSET ")
            .push_bind(filtro.offset);

        let solicitacoes = qb
            .build_query_as::<SolicitacaoDetalhada>()
            .fetch_all(&self.pool)
            .await?;

        Ok(solicitacoes)
    }

    async fn contar(&self, filtro: &FiltroSolicitacoes) -> AppResult<i64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM solicitacoes_alteracao s");
        Self::aplicar_filtros(&mut qb, filtro);

        let (total,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;

        Ok(total)
    }

    async fn contar_pendentes(&self) -> AppResult<i64> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM solicitacoes_alteracao WHERE status = 'pendente'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
