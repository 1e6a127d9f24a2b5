use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::escala::EscalaDia;

/// Request de alteração direta de um dia de escala
#[derive(Debug, Deserialize)]
pub struct AlteracaoDiretaRequest {
    pub colaborador_id: Option<Uuid>,
    pub data_escala: Option<String>,
    pub valor_atual: Option<String>,
    /// String vazia é válida e significa DT; ausente é erro
    pub valor_novo: Option<String>,
    pub justificativa: Option<String>,
}

/// Response da alteração direta, com resumo legível
#[derive(Debug, Serialize)]
pub struct AlteracaoDiretaResponse {
    pub message: String,
    pub escala_dia: EscalaDia,
    pub colaborador: String,
    pub data: String,
    pub alteracao: String,
    /// Preenchido quando o registro de auditoria falhou; a mutação
    /// em si já foi aplicada
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aviso: Option<String>,
}

/// Contadores acumulados de uma importação
#[derive(Debug, Serialize, Default)]
pub struct UploadStats {
    pub colaboradores: u32,
    pub dias: u32,
    pub errors: Vec<String>,
    #[serde(rename = "replacedExisting")]
    pub replaced_existing: bool,
    #[serde(rename = "removedEscalas")]
    pub removed_escalas: u64,
}

/// Response da importação; `success = false` sinaliza apenas que houve
/// erros por linha, os dados das linhas boas já foram gravados
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub stats: UploadStats,
    #[serde(rename = "replacedExisting")]
    pub replaced_existing: bool,
}

/// Parâmetros da listagem mensal de escalas
#[derive(Debug, Deserialize)]
pub struct EscalasRequest {
    pub mes: Option<i32>,
    pub ano: Option<i32>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct EscalaDiaView {
    pub id: Uuid,
    pub dia: i32,
    pub status: Option<String>,
    pub horario: Option<String>,
    pub alterado: bool,
}

impl From<EscalaDia> for EscalaDiaView {
    fn from(dia: EscalaDia) -> Self {
        Self {
            id: dia.id,
            dia: dia.dia,
            status: dia.status,
            horario: dia.horario,
            alterado: dia.alterado,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ColaboradorEscalaView {
    pub id: Uuid,
    pub matricula: String,
    pub nome: String,
    pub grupo: Option<String>,
    pub funcao: Option<String>,
    pub cod_escala: Option<String>,
    pub horario_trabalho: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EscalaView {
    pub id: Uuid,
    pub mes: i32,
    pub ano: i32,
    pub colaboradores: ColaboradorEscalaView,
    pub escala_dias: Vec<EscalaDiaView>,
}

#[derive(Debug, Serialize)]
pub struct FiltrosEscala {
    pub grupos: Vec<String>,
    pub funcoes: Vec<String>,
    pub cod_escalas: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PaginacaoEscalas {
    #[serde(rename = "currentPage")]
    pub current_page: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    #[serde(rename = "totalRecords")]
    pub total_records: i64,
    #[serde(rename = "recordsPerPage")]
    pub records_per_page: i64,
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "hasPrevPage")]
    pub has_prev_page: bool,
}

#[derive(Debug, Serialize)]
pub struct EscalasResponse {
    pub success: bool,
    pub escalas: Vec<EscalaView>,
    pub filters: FiltrosEscala,
    pub pagination: PaginacaoEscalas,
}
