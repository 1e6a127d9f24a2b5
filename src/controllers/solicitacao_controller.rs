//! Controller de solicitações de alteração
//!
//! Criação pelo papel solicitante, decisão terminal pelo papel
//! aprovador e as listagens com escopo por papel. A mutação do dia
//! aprovado acontece na mesma transação da decisão, dentro do
//! repositório.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::solicitacao_dto::{
    CriarSolicitacaoRequest, DecisaoRequest, ListaSolicitacoesResponse, ListagemParams,
    Paginacao, SolicitacaoDetalheResponse, SolicitacaoResponse, SolicitacaoView,
};
use crate::models::auth::UsuarioAutenticado;
use crate::models::escala::{AlteracaoDia, ValorDia};
use crate::models::solicitacao::{Decisao, NovaSolicitacao, StatusSolicitacao};
use crate::repositories::colaborador_repository::{ColaboradorRepository, PgColaboradorRepository};
use crate::repositories::escala_repository::{EscalaRepository, PgEscalaRepository};
use crate::repositories::solicitacao_repository::{
    FiltroSolicitacoes, PgSolicitacaoRepository, SolicitacaoRepository,
};
use crate::utils::datas::DataEscala;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::permissions::{
    escopo_listagem, papel_pode, pode_ver_solicitacao, valor_permitido, Operacao,
};

pub struct SolicitacaoController {
    solicitacoes: Arc<dyn SolicitacaoRepository>,
    colaboradores: Arc<dyn ColaboradorRepository>,
    escalas: Arc<dyn EscalaRepository>,
}

impl SolicitacaoController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            solicitacoes: Arc::new(PgSolicitacaoRepository::new(pool.clone())),
            colaboradores: Arc::new(PgColaboradorRepository::new(pool.clone())),
            escalas: Arc::new(PgEscalaRepository::new(pool)),
        }
    }

    #[cfg(test)]
    pub fn com_repositorios(
        solicitacoes: Arc<dyn SolicitacaoRepository>,
        colaboradores: Arc<dyn ColaboradorRepository>,
        escalas: Arc<dyn EscalaRepository>,
    ) -> Self {
        Self {
            solicitacoes,
            colaboradores,
            escalas,
        }
    }

    /// Cria uma solicitação pendente para um dia de escala
    pub async fn criar(
        &self,
        usuario: &UsuarioAutenticado,
        request: CriarSolicitacaoRequest,
    ) -> AppResult<SolicitacaoResponse> {
        if !papel_pode(usuario.role, Operacao::CriarSolicitacao) {
            return Err(AppError::Forbidden(
                "Acesso negado. Apenas supervisores e treinamento podem criar solicitações."
                    .to_string(),
            ));
        }

        // Ausente é erro; string vazia é DT
        let valor_cru = request
            .valor_novo
            .as_deref()
            .ok_or_else(|| AppError::Validation("Novo valor é obrigatório".to_string()))?;
        let valor = ValorDia::parse(valor_cru);

        if !valor_permitido(usuario.role, &valor) {
            return Err(AppError::Forbidden(
                "Usuários de treinamento só podem marcar colaboradores como \"TR - Treinamento\" ou \"DT - Dia Trabalhado\"."
                    .to_string(),
            ));
        }

        request.validate()?;

        let colaborador_id = request
            .colaborador_id
            .ok_or_else(|| AppError::Validation("Colaborador é obrigatório".to_string()))?;
        let data_escala = request
            .data_escala
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| AppError::Validation("Data da escala é obrigatória".to_string()))?
            .to_string();
        let data = DataEscala::parse(&data_escala)?;

        let colaborador = self
            .colaboradores
            .buscar_por_id(colaborador_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Colaborador não encontrado".to_string()))?;

        if self
            .solicitacoes
            .existe_pendente(colaborador.id, &data_escala)
            .await?
        {
            return Err(AppError::Conflict(
                "Já existe uma solicitação pendente para este colaborador nesta data".to_string(),
            ));
        }

        // Resolve (sem criar) o dia alvo; pode ainda não existir
        let escala_dia_id = match self
            .escalas
            .buscar_escala(colaborador.id, data.mes, data.ano)
            .await?
        {
            Some(escala) => self.escalas.buscar_dia_id(escala.id, data.dia).await?,
            None => None,
        };

        let nova = NovaSolicitacao {
            solicitante_id: usuario.id,
            colaborador_id: colaborador.id,
            escala_dia_id,
            data_escala,
            valor_atual: request.valor_atual.filter(|v| !v.trim().is_empty()),
            valor_novo: valor.canonico(),
            motivo: request.motivo.unwrap_or_default(),
            justificativa: request.justificativa.unwrap_or_default(),
            status: StatusSolicitacao::Pendente,
            aprovado_por: None,
            aprovado_em: None,
        };

        let solicitacao = self.solicitacoes.criar(&nova).await?;

        info!(
            "Solicitação {} criada por {} para colaborador {} em {}",
            solicitacao.id, usuario.matricula, colaborador.matricula, solicitacao.data_escala
        );

        Ok(SolicitacaoResponse {
            message: "Solicitação criada com sucesso".to_string(),
            solicitacao,
        })
    }

    /// Aprova ou rejeita uma solicitação pendente (transição terminal)
    pub async fn decidir(
        &self,
        usuario: &UsuarioAutenticado,
        id: Uuid,
        request: DecisaoRequest,
    ) -> AppResult<SolicitacaoResponse> {
        if !papel_pode(usuario.role, Operacao::DecidirSolicitacao) {
            return Err(AppError::Forbidden(
                "Acesso negado. Apenas analistas e gerência podem aprovar/rejeitar solicitações."
                    .to_string(),
            ));
        }

        let status = StatusSolicitacao::from_str(&request.status)
            .filter(|s| s.is_terminal())
            .ok_or_else(|| AppError::Validation("Status inválido".to_string()))?;

        let solicitacao = self
            .solicitacoes
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Solicitação não encontrada".to_string()))?;

        if solicitacao.status != StatusSolicitacao::Pendente.as_str() {
            return Err(AppError::Conflict(format!(
                "Solicitação já foi {}",
                solicitacao.status
            )));
        }

        // A data re-parseada da solicitação é a fonte da verdade, não o
        // escala_dia_id resolvido na criação: o dia pode não existir ainda
        let alteracao = if status == StatusSolicitacao::Aprovado {
            let data = DataEscala::parse(&solicitacao.data_escala)?;
            Some(AlteracaoDia {
                colaborador_id: solicitacao.colaborador_id,
                data,
                valor: ValorDia::parse(&solicitacao.valor_novo),
                usuario_id: usuario.id,
            })
        } else {
            None
        };

        let decisao = Decisao {
            status,
            aprovador_id: usuario.id,
            comentario: request.comentario_aprovador,
        };

        let atualizada = self
            .solicitacoes
            .concluir(id, &decisao, alteracao.as_ref())
            .await?;

        info!(
            "Solicitação {} {} por {}",
            atualizada.id,
            status.as_str(),
            usuario.matricula
        );

        Ok(SolicitacaoResponse {
            message: format!("Solicitação {} com sucesso", status.as_str()),
            solicitacao: atualizada,
        })
    }

    /// Lista solicitações com escopo por papel e paginação
    pub async fn listar(
        &self,
        usuario: &UsuarioAutenticado,
        params: ListagemParams,
    ) -> AppResult<ListaSolicitacoesResponse> {
        let escopo = escopo_listagem(usuario.role, usuario.id)
            .ok_or_else(|| AppError::Forbidden("Acesso negado".to_string()))?;

        let status = params
            .status
            .as_deref()
            .and_then(StatusSolicitacao::from_str);
        let page = params.page.unwrap_or(1).max(1);
        let limite = params.limit.unwrap_or(20).max(1);

        let filtro = FiltroSolicitacoes {
            status,
            escopo,
            limite,
            offset: (page - 1) * limite,
        };

        let solicitacoes = self.solicitacoes.listar(&filtro).await?;
        let total = self.solicitacoes.contar(&filtro).await?;

        Ok(ListaSolicitacoesResponse {
            solicitacoes: solicitacoes.into_iter().map(SolicitacaoView::from).collect(),
            pagination: Paginacao {
                page,
                limit: limite,
                total,
                total_pages: (total + limite - 1) / limite,
            },
        })
    }

    /// Busca uma solicitação individual, com checagem de escopo
    pub async fn detalhar(
        &self,
        usuario: &UsuarioAutenticado,
        id: Uuid,
    ) -> AppResult<SolicitacaoDetalheResponse> {
        let detalhada = self
            .solicitacoes
            .buscar_detalhada(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Solicitação não encontrada".to_string()))?;

        if !pode_ver_solicitacao(usuario.role, usuario.id, detalhada.solicitacao.solicitante_id) {
            return Err(AppError::Forbidden("Acesso negado".to_string()));
        }

        Ok(SolicitacaoDetalheResponse {
            solicitacao: SolicitacaoView::from(detalhada),
        })
    }
}
