use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::solicitacao::Solicitacao;
use crate::repositories::solicitacao_repository::SolicitacaoDetalhada;

/// Request de criação de solicitação de alteração
///
/// Campos obrigatórios chegam como `Option` para que a ausência vire
/// um 400 com mensagem própria, não uma rejeição de deserialização.
#[derive(Debug, Deserialize, Validate)]
pub struct CriarSolicitacaoRequest {
    #[validate(required(message = "Colaborador é obrigatório"))]
    pub colaborador_id: Option<Uuid>,
    #[validate(
        required(message = "Data da escala é obrigatória"),
        length(min = 1, message = "Data da escala é obrigatória")
    )]
    pub data_escala: Option<String>,
    pub valor_atual: Option<String>,
    /// String vazia é válida e significa DT; ausente é erro
    pub valor_novo: Option<String>,
    #[validate(
        required(message = "Motivo é obrigatório"),
        length(min = 1, message = "Motivo é obrigatório")
    )]
    pub motivo: Option<String>,
    #[validate(
        required(message = "Justificativa é obrigatória"),
        length(min = 1, message = "Justificativa é obrigatória")
    )]
    pub justificativa: Option<String>,
}

/// Request de aprovação/rejeição
#[derive(Debug, Deserialize)]
pub struct DecisaoRequest {
    pub status: String,
    pub comentario_aprovador: Option<String>,
}

/// Parâmetros de consulta da listagem
#[derive(Debug, Deserialize)]
pub struct ListagemParams {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ResumoUsuario {
    pub id: Uuid,
    pub nome: String,
    pub matricula: String,
}

#[derive(Debug, Serialize)]
pub struct ResumoColaborador {
    pub id: Uuid,
    pub nome: String,
    pub matricula: String,
    pub departamento: Option<String>,
    pub funcao: Option<String>,
}

/// Solicitação com solicitante, colaborador e aprovador embutidos
#[derive(Debug, Serialize)]
pub struct SolicitacaoView {
    #[serde(flatten)]
    pub solicitacao: Solicitacao,
    pub solicitante: ResumoUsuario,
    pub colaborador: ResumoColaborador,
    pub aprovador: Option<ResumoUsuario>,
}

impl From<SolicitacaoDetalhada> for SolicitacaoView {
    fn from(detalhada: SolicitacaoDetalhada) -> Self {
        let aprovador = detalhada.solicitacao.aprovado_por.map(|id| ResumoUsuario {
            id,
            nome: detalhada.aprovador_nome.unwrap_or_default(),
            matricula: detalhada.aprovador_matricula.unwrap_or_default(),
        });

        Self {
            solicitante: ResumoUsuario {
                id: detalhada.solicitacao.solicitante_id,
                nome: detalhada.solicitante_nome,
                matricula: detalhada.solicitante_matricula,
            },
            colaborador: ResumoColaborador {
                id: detalhada.solicitacao.colaborador_id,
                nome: detalhada.colaborador_nome,
                matricula: detalhada.colaborador_matricula,
                departamento: detalhada.colaborador_departamento,
                funcao: detalhada.colaborador_funcao,
            },
            aprovador,
            solicitacao: detalhada.solicitacao,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Paginacao {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct ListaSolicitacoesResponse {
    pub solicitacoes: Vec<SolicitacaoView>,
    pub pagination: Paginacao,
}

#[derive(Debug, Serialize)]
pub struct SolicitacaoResponse {
    pub message: String,
    pub solicitacao: Solicitacao,
}

#[derive(Debug, Serialize)]
pub struct SolicitacaoDetalheResponse {
    pub solicitacao: SolicitacaoView,
}
