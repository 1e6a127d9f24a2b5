use serde::Serialize;

/// Contadores agregados do dashboard
#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub success: bool,
    pub total_colaboradores: i64,
    pub solicitacoes_pendentes: i64,
    pub alteracoes_mes: i64,
    pub notificacoes_nao_lidas: i64,
}
