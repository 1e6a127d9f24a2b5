//! Modelos de solicitação de alteração
//!
//! Uma solicitação nasce `pendente` e transiciona exatamente uma vez
//! para `aprovado` ou `rejeitado`. Estados terminais não transicionam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Estados de uma solicitação de alteração
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSolicitacao {
    Pendente,
    Aprovado,
    Rejeitado,
}

impl StatusSolicitacao {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusSolicitacao::Pendente => "pendente",
            StatusSolicitacao::Aprovado => "aprovado",
            StatusSolicitacao::Rejeitado => "rejeitado",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pendente" => Some(StatusSolicitacao::Pendente),
            "aprovado" => Some(StatusSolicitacao::Aprovado),
            "rejeitado" => Some(StatusSolicitacao::Rejeitado),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, StatusSolicitacao::Pendente)
    }
}

/// Solicitação de alteração (linha da tabela `solicitacoes_alteracao`)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Solicitacao {
    pub id: Uuid,
    pub solicitante_id: Uuid,
    pub colaborador_id: Uuid,
    pub escala_dia_id: Option<Uuid>,
    /// Data alvo no formato literal YYYY-MM-DD; fonte da verdade do dia
    pub data_escala: String,
    pub valor_atual: Option<String>,
    pub valor_novo: String,
    pub motivo: String,
    pub justificativa: String,
    pub status: String,
    pub aprovado_por: Option<Uuid>,
    pub aprovado_em: Option<DateTime<Utc>>,
    pub comentario_aprovador: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Dados para inserir uma solicitação
#[derive(Debug, Clone)]
pub struct NovaSolicitacao {
    pub solicitante_id: Uuid,
    pub colaborador_id: Uuid,
    pub escala_dia_id: Option<Uuid>,
    pub data_escala: String,
    pub valor_atual: Option<String>,
    pub valor_novo: String,
    pub motivo: String,
    pub justificativa: String,
    /// Alteração direta insere o registro já aprovado, para auditoria
    pub status: StatusSolicitacao,
    pub aprovado_por: Option<Uuid>,
    pub aprovado_em: Option<DateTime<Utc>>,
}

/// Decisão terminal sobre uma solicitação pendente
#[derive(Debug, Clone)]
pub struct Decisao {
    pub status: StatusSolicitacao,
    pub aprovador_id: Uuid,
    pub comentario: Option<String>,
}
