//! Repositório de escalas
//!
//! Leituras e upserts de escalas e dias, mais as duas operações
//! compostas que precisam de transação: a mutação de um dia (que cria a
//! escala do mês sob demanda) e a substituição destrutiva de um mês
//! inteiro antes de uma importação.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::escala::{AlteracaoDia, Escala, EscalaDia, ValorDia};
use crate::utils::errors::AppResult;

/// Tamanho dos lotes nas deleções em cascata, para limitar o tamanho
/// de cada statement
const TAMANHO_LOTE: usize = 50;

/// Escala de um mês com os dados do colaborador, para a listagem
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EscalaComColaborador {
    pub id: Uuid,
    pub mes: i32,
    pub ano: i32,
    pub colaborador_id: Uuid,
    pub colaborador_matricula: String,
    pub colaborador_nome: String,
    pub colaborador_grupo: Option<String>,
    pub colaborador_funcao: Option<String>,
    pub colaborador_cod_escala: Option<String>,
    pub colaborador_horario_trabalho: Option<String>,
}

/// Opções distintas para os filtros da tela de escalas
#[derive(Debug, Clone, Default)]
pub struct OpcoesFiltro {
    pub grupos: Vec<String>,
    pub funcoes: Vec<String>,
    pub cod_escalas: Vec<String>,
}

/// Acesso às escalas mensais e seus dias
#[async_trait]
pub trait EscalaRepository: Send + Sync {
    async fn buscar_escala(
        &self,
        colaborador_id: Uuid,
        mes: i32,
        ano: i32,
    ) -> AppResult<Option<Escala>>;

    async fn buscar_dia_id(&self, escala_id: Uuid, dia: i32) -> AppResult<Option<Uuid>>;

    /// Mutação de um dia: cria a escala do mês se necessário e faz o
    /// upsert do dia com carimbo de alteração. Transacional.
    async fn aplicar_dia(&self, alteracao: &AlteracaoDia) -> AppResult<EscalaDia>;

    /// Remove todo o mês antes de uma importação: solicitações que
    /// referenciam os dias, depois os dias, depois as escalas, em lotes
    /// e dentro de uma única transação. Retorna quantas escalas saíram.
    async fn substituir_mes(&self, mes: i32, ano: i32) -> AppResult<u64>;

    async fn upsert_escala_importada(
        &self,
        colaborador_id: Uuid,
        mes: i32,
        ano: i32,
        arquivo: &str,
        usuario_id: Uuid,
    ) -> AppResult<Uuid>;

    /// Upsert de um dia vindo da planilha; importação não conta como
    /// alteração manual
    async fn upsert_dia_importado(
        &self,
        escala_id: Uuid,
        dia: i32,
        valor: &ValorDia,
    ) -> AppResult<()>;

    async fn listar_mes(
        &self,
        mes: i32,
        ano: i32,
        limite: i64,
        offset: i64,
    ) -> AppResult<Vec<EscalaComColaborador>>;

    async fn dias_das_escalas(&self, escala_ids: &[Uuid]) -> AppResult<Vec<EscalaDia>>;

    async fn contar_mes(&self, mes: i32, ano: i32) -> AppResult<i64>;

    /// Dias marcados como alterados dentro do mês, para o dashboard
    async fn contar_alterados_mes(&self, mes: i32, ano: i32) -> AppResult<i64>;

    async fn opcoes_filtro(&self) -> AppResult<OpcoesFiltro>;
}

/// Aplica a mutação de um dia usando a conexão/transação recebida.
///
/// Compartilhada entre a alteração direta e a aprovação de solicitação,
/// que embute a mutação na mesma transação da decisão.
pub(crate) async fn aplicar_dia_em(
    conn: &mut PgConnection,
    alteracao: &AlteracaoDia,
) -> Result<EscalaDia, sqlx::Error> {
    let (escala_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO escalas (colaborador_id, mes, ano, uploaded_by)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (colaborador_id, mes, ano)
            DO UPDATE SET colaborador_id = EXCLUDED.colaborador_id
        RETURNING id
        "#,
    )
    .bind(alteracao.colaborador_id)
    .bind(alteracao.data.mes)
    .bind(alteracao.data.ano)
    .bind(alteracao.usuario_id)
    .fetch_one(&mut *conn)
    .await?;

    let (status, horario) = alteracao.valor.colunas();

    let dia = sqlx::query_as::<_, EscalaDia>(
        r#"
        INSERT INTO escala_dias (escala_id, dia, status, horario, alterado, alterado_por, alterado_em)
        VALUES ($1, $2, $3, $4, TRUE, $5, $6)
        ON CONFLICT (escala_id, dia) DO UPDATE SET
            status = EXCLUDED.status,
            horario = EXCLUDED.horario,
            alterado = TRUE,
            alterado_por = EXCLUDED.alterado_por,
            alterado_em = EXCLUDED.alterado_em
        RETURNING *
        "#,
    )
    .bind(escala_id)
    .bind(alteracao.data.dia)
    .bind(status)
    .bind(horario)
    .bind(alteracao.usuario_id)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    Ok(dia)
}

pub struct PgEscalaRepository {
    pool: PgPool,
}

impl PgEscalaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EscalaRepository for PgEscalaRepository {
    async fn buscar_escala(
        &self,
        colaborador_id: Uuid,
        mes: i32,
        ano: i32,
    ) -> AppResult<Option<Escala>> {
        let escala = sqlx::query_as::<_, Escala>(
            "SELECT * FROM escalas WHERE colaborador_id = $1 AND mes = $2 AND ano = $3",
        )
        .bind(colaborador_id)
        .bind(mes)
        .bind(ano)
        .fetch_optional(&self.pool)
        .await?;

        Ok(escala)
    }

    async fn buscar_dia_id(&self, escala_id: Uuid, dia: i32) -> AppResult<Option<Uuid>> {
        let id: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM escala_dias WHERE escala_id = $1 AND dia = $2")
                .bind(escala_id)
                .bind(dia)
                .fetch_optional(&self.pool)
                .await?;

        Ok(id.map(|(id,)| id))
    }

    async fn aplicar_dia(&self, alteracao: &AlteracaoDia) -> AppResult<EscalaDia> {
        let mut tx = self.pool.begin().await?;
        let dia = aplicar_dia_em(&mut tx, alteracao).await?;
        tx.commit().await?;

        Ok(dia)
    }

    async fn substituir_mes(&self, mes: i32, ano: i32) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let escala_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM escalas WHERE mes = $1 AND ano = $2")
                .bind(mes)
                .bind(ano)
                .fetch_all(&mut *tx)
                .await?;

        if escala_ids.is_empty() {
            return Ok(0);
        }

        // Ordem: solicitações que apontam para os dias, dias, escalas.
        for lote in escala_ids.chunks(TAMANHO_LOTE) {
            let dia_ids: Vec<Uuid> =
                sqlx::query_scalar("SELECT id FROM escala_dias WHERE escala_id = ANY($1)")
                    .bind(lote.to_vec())
                    .fetch_all(&mut *tx)
                    .await?;

            for lote_dias in dia_ids.chunks(TAMANHO_LOTE) {
                sqlx::query("DELETE FROM solicitacoes_alteracao WHERE escala_dia_id = ANY($1)")
                    .bind(lote_dias.to_vec())
                    .execute(&mut *tx)
                    .await?;
            }
        }

        for lote in escala_ids.chunks(TAMANHO_LOTE) {
            sqlx::query("DELETE FROM escala_dias WHERE escala_id = ANY($1)")
                .bind(lote.to_vec())
                .execute(&mut *tx)
                .await?;
        }

        for lote in escala_ids.chunks(TAMANHO_LOTE) {
            sqlx::query("DELETE FROM escalas WHERE id = ANY($1)")
                .bind(lote.to_vec())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(escala_ids.len() as u64)
    }

    async fn upsert_escala_importada(
        &self,
        colaborador_id: Uuid,
        mes: i32,
        ano: i32,
        arquivo: &str,
        usuario_id: Uuid,
    ) -> AppResult<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO escalas (colaborador_id, mes, ano, upload_file_name, uploaded_by)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (colaborador_id, mes, ano) DO UPDATE SET
                upload_file_name = EXCLUDED.upload_file_name,
                uploaded_by = EXCLUDED.uploaded_by
            RETURNING id
            "#,
        )
        .bind(colaborador_id)
        .bind(mes)
        .bind(ano)
        .bind(arquivo)
        .bind(usuario_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn upsert_dia_importado(
        &self,
        escala_id: Uuid,
        dia: i32,
        valor: &ValorDia,
    ) -> AppResult<()> {
        let (status, horario) = valor.colunas();

        sqlx::query(
            r#"
            INSERT INTO escala_dias (escala_id, dia, status, horario, alterado)
            VALUES ($1, $2, $3, $4, FALSE)
            ON CONFLICT (escala_id, dia) DO UPDATE SET
                status = EXCLUDED.status,
                horario = EXCLUDED.horario,
                alterado = FALSE,
                alterado_por = NULL,
                alterado_em = NULL
            "#,
        )
        .bind(escala_id)
        .bind(dia)
        .bind(status)
        .bind(horario)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn listar_mes(
        &self,
        mes: i32,
        ano: i32,
        limite: i64,
        offset: i64,
    ) -> AppResult<Vec<EscalaComColaborador>> {
        let escalas = sqlx::query_as::<_, EscalaComColaborador>(
            r#"
            SELECT e.id, e.mes, e.ano,
                   c.id AS colaborador_id,
                   c.matricula AS colaborador_matricula,
                   c.nome AS colaborador_nome,
                   c.grupo AS colaborador_grupo,
                   c.funcao AS colaborador_funcao,
                   c.cod_escala AS colaborador_cod_escala,
                   c.horario_trabalho AS colaborador_horario_trabalho
            FROM escalas e
            JOIN colaboradores c ON c.id = e.colaborador_id
            WHERE e.mes = $1 AND e.ano = $2
            ORDER BY e.id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(mes)
        .bind(ano)
        .bind(limite)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(escalas)
    }

    async fn dias_das_escalas(&self, escala_ids: &[Uuid]) -> AppResult<Vec<EscalaDia>> {
        let dias = sqlx::query_as::<_, EscalaDia>(
            "SELECT * FROM escala_dias WHERE escala_id = ANY($1) ORDER BY dia",
        )
        .bind(escala_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(dias)
    }

    async fn contar_mes(&self, mes: i32, ano: i32) -> AppResult<i64> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM escalas WHERE mes = $1 AND ano = $2")
                .bind(mes)
                .bind(ano)
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }

    async fn contar_alterados_mes(&self, mes: i32, ano: i32) -> AppResult<i64> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM escala_dias d
            JOIN escalas e ON e.id = d.escala_id
            WHERE d.alterado = TRUE AND e.mes = $1 AND e.ano = $2
            "#,
        )
        .bind(mes)
        .bind(ano)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn opcoes_filtro(&self) -> AppResult<OpcoesFiltro> {
        let grupos: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT grupo FROM colaboradores WHERE ativo = TRUE AND grupo IS NOT NULL ORDER BY grupo",
        )
        .fetch_all(&self.pool)
        .await?;

        let funcoes: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT funcao FROM colaboradores WHERE ativo = TRUE AND funcao IS NOT NULL ORDER BY funcao",
        )
        .fetch_all(&self.pool)
        .await?;

        let cod_escalas: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT cod_escala FROM colaboradores WHERE ativo = TRUE AND cod_escala IS NOT NULL ORDER BY cod_escala",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(OpcoesFiltro {
            grupos,
            funcoes,
            cod_escalas,
        })
    }
}
