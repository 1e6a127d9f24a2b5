use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Colaborador (linha da tabela `colaboradores`)
///
/// Identificado pela matrícula; nunca é removido fisicamente,
/// apenas desativado via `ativo`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Colaborador {
    pub id: Uuid,
    pub matricula: String,
    pub nome: String,
    pub responsavel: Option<String>,
    pub departamento: Option<String>,
    pub grupo: Option<String>,
    pub funcao: Option<String>,
    pub cod_escala: Option<String>,
    pub horario_trabalho: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
}

/// Dados de colaborador vindos de uma linha da planilha de importação
#[derive(Debug, Clone)]
pub struct NovoColaborador {
    pub matricula: String,
    pub nome: String,
    pub responsavel: Option<String>,
    pub departamento: Option<String>,
    pub grupo: Option<String>,
    pub funcao: Option<String>,
    pub cod_escala: Option<String>,
    pub horario_trabalho: Option<String>,
}
