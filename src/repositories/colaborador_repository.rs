use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::colaborador::{Colaborador, NovoColaborador};
use crate::utils::errors::AppResult;

/// Acesso aos colaboradores
#[async_trait]
pub trait ColaboradorRepository: Send + Sync {
    async fn buscar_por_id(&self, id: Uuid) -> AppResult<Option<Colaborador>>;

    /// Insere ou atualiza pelo conflito em `matricula`; reativa o
    /// colaborador quando ele reaparece numa importação
    async fn upsert_por_matricula(&self, dados: &NovoColaborador) -> AppResult<Uuid>;

    async fn contar_ativos(&self) -> AppResult<i64>;
}

pub struct PgColaboradorRepository {
    pool: PgPool,
}

impl PgColaboradorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ColaboradorRepository for PgColaboradorRepository {
    async fn buscar_por_id(&self, id: Uuid) -> AppResult<Option<Colaborador>> {
        let colaborador =
            sqlx::query_as::<_, Colaborador>("SELECT * FROM colaboradores WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(colaborador)
    }

    async fn upsert_por_matricula(&self, dados: &NovoColaborador) -> AppResult<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO colaboradores
                (matricula, nome, responsavel, departamento, grupo, funcao, cod_escala, horario_trabalho, ativo)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
            ON CONFLICT (matricula) DO UPDATE SET
                nome = EXCLUDED.nome,
                responsavel = EXCLUDED.responsavel,
                departamento = EXCLUDED.departamento,
                grupo = EXCLUDED.grupo,
                funcao = EXCLUDED.funcao,
                cod_escala = EXCLUDED.cod_escala,
                horario_trabalho = EXCLUDED.horario_trabalho,
                ativo = TRUE
            RETURNING id
            "#,
        )
        .bind(&dados.matricula)
        .bind(&dados.nome)
        .bind(&dados.responsavel)
        .bind(&dados.departamento)
        .bind(&dados.grupo)
        .bind(&dados.funcao)
        .bind(&dados.cod_escala)
        .bind(&dados.horario_trabalho)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn contar_ativos(&self) -> AppResult<i64> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM colaboradores WHERE ativo = TRUE")
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }
}
