//! Controller do dashboard
//!
//! Contagens agregadas: colaboradores ativos, solicitações pendentes,
//! alterações do mês corrente e notificações não lidas do usuário.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use sqlx::PgPool;

use crate::dto::dashboard_dto::DashboardStatsResponse;
use crate::models::auth::UsuarioAutenticado;
use crate::repositories::colaborador_repository::{ColaboradorRepository, PgColaboradorRepository};
use crate::repositories::escala_repository::{EscalaRepository, PgEscalaRepository};
use crate::repositories::notificacao_repository::{NotificacaoRepository, PgNotificacaoRepository};
use crate::repositories::solicitacao_repository::{PgSolicitacaoRepository, SolicitacaoRepository};
use crate::utils::errors::AppResult;

pub struct DashboardController {
    colaboradores: Arc<dyn ColaboradorRepository>,
    escalas: Arc<dyn EscalaRepository>,
    solicitacoes: Arc<dyn SolicitacaoRepository>,
    notificacoes: Arc<dyn NotificacaoRepository>,
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            colaboradores: Arc::new(PgColaboradorRepository::new(pool.clone())),
            escalas: Arc::new(PgEscalaRepository::new(pool.clone())),
            solicitacoes: Arc::new(PgSolicitacaoRepository::new(pool.clone())),
            notificacoes: Arc::new(PgNotificacaoRepository::new(pool)),
        }
    }

    pub async fn stats(&self, usuario: &UsuarioAutenticado) -> AppResult<DashboardStatsResponse> {
        let agora = Utc::now();
        let mes = agora.month() as i32;
        let ano = agora.year();

        // Contagens independentes, disparadas em paralelo
        let (total_colaboradores, solicitacoes_pendentes, alteracoes_mes, notificacoes_nao_lidas) =
            futures::try_join!(
                self.colaboradores.contar_ativos(),
                self.solicitacoes.contar_pendentes(),
                self.escalas.contar_alterados_mes(mes, ano),
                self.notificacoes.contar_nao_lidas(usuario.id),
            )?;

        Ok(DashboardStatsResponse {
            success: true,
            total_colaboradores,
            solicitacoes_pendentes,
            alteracoes_mes,
            notificacoes_nao_lidas,
        })
    }
}
