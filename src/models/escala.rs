//! Modelos de escala
//!
//! Escala mensal, dias de escala e o valor canônico de um dia.
//! O "DT" chega do frontend como string vazia ou como a tag literal;
//! toda a classificação passa pelo enum `ValorDia` na entrada,
//! nunca por comparação de strings espalhada pelos handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::datas::DataEscala;

/// Códigos de status de um dia não trabalhado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusDia {
    /// Folga Remunerada
    FR,
    /// Falta
    FT,
    /// Treinamento
    TR,
    /// Folga Compensatória
    FC,
}

impl StatusDia {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusDia::FR => "FR",
            StatusDia::FT => "FT",
            StatusDia::TR => "TR",
            StatusDia::FC => "FC",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "FR" => Some(StatusDia::FR),
            "FT" => Some(StatusDia::FT),
            "TR" => Some(StatusDia::TR),
            "FC" => Some(StatusDia::FC),
            _ => None,
        }
    }
}

/// Valor canônico de um dia de escala
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValorDia {
    /// DT — dia trabalhado conforme a escala original; limpa status e horário
    Trabalhado,
    /// Um dos códigos fechados FR/FT/TR/FC
    Status(StatusDia),
    /// Faixa de horário em texto livre, ex.: "08:00-16:00"
    Horario(String),
}

impl ValorDia {
    /// Classifica o valor cru vindo da borda.
    ///
    /// String vazia e "DT" (qualquer caixa) significam dia trabalhado;
    /// códigos FR/FT/TR/FC são status; qualquer outro texto é horário.
    pub fn parse(cru: &str) -> ValorDia {
        let valor = cru.trim();
        let maiusculo = valor.to_uppercase();
        if valor.is_empty() || maiusculo == "DT" {
            return ValorDia::Trabalhado;
        }
        match StatusDia::from_str(&maiusculo) {
            Some(status) => ValorDia::Status(status),
            None => ValorDia::Horario(valor.to_string()),
        }
    }

    /// Valor das colunas `(status, horario)` do dia: exatamente uma
    /// não nula, ou ambas nulas para DT.
    pub fn colunas(&self) -> (Option<String>, Option<String>) {
        match self {
            ValorDia::Trabalhado => (None, None),
            ValorDia::Status(s) => (Some(s.as_str().to_string()), None),
            ValorDia::Horario(h) => (None, Some(h.clone())),
        }
    }

    /// Forma canônica persistida em `valor_novo` das solicitações
    pub fn canonico(&self) -> String {
        match self {
            ValorDia::Trabalhado => "DT".to_string(),
            ValorDia::Status(s) => s.as_str().to_string(),
            ValorDia::Horario(h) => h.clone(),
        }
    }
}

/// Escala mensal de um colaborador (linha da tabela `escalas`)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Escala {
    pub id: Uuid,
    pub colaborador_id: Uuid,
    pub mes: i32,
    pub ano: i32,
    pub upload_file_name: Option<String>,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Um dia dentro de uma escala mensal (linha da tabela `escala_dias`)
///
/// Invariante: `status` e `horario` nunca são ambos não nulos.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EscalaDia {
    pub id: Uuid,
    pub escala_id: Uuid,
    pub dia: i32,
    pub status: Option<String>,
    pub horario: Option<String>,
    pub alterado: bool,
    pub alterado_por: Option<Uuid>,
    pub alterado_em: Option<DateTime<Utc>>,
}

/// Mutação de um dia de escala, compartilhada entre a aprovação
/// de solicitação e a alteração direta
#[derive(Debug, Clone)]
pub struct AlteracaoDia {
    pub colaborador_id: Uuid,
    pub data: DataEscala,
    pub valor: ValorDia,
    pub usuario_id: Uuid,
}
