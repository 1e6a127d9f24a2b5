//! Controller de escalas
//!
//! Alteração direta (atalho privilegiado com trilha de auditoria),
//! importação em massa da planilha mensal e a listagem paginada do mês.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::escala_dto::{
    AlteracaoDiretaRequest, AlteracaoDiretaResponse, ColaboradorEscalaView, EscalaDiaView,
    EscalaView, EscalasRequest, EscalasResponse, FiltrosEscala, PaginacaoEscalas,
    UploadResponse, UploadStats,
};
use crate::models::auth::UsuarioAutenticado;
use crate::models::colaborador::NovoColaborador;
use crate::models::escala::{AlteracaoDia, ValorDia};
use crate::models::solicitacao::{NovaSolicitacao, StatusSolicitacao};
use crate::repositories::colaborador_repository::{ColaboradorRepository, PgColaboradorRepository};
use crate::repositories::escala_repository::{EscalaRepository, PgEscalaRepository};
use crate::repositories::solicitacao_repository::{PgSolicitacaoRepository, SolicitacaoRepository};
use crate::services::planilha_service::Planilha;
use crate::utils::datas::{dias_no_mes, DataEscala};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::permissions::{papel_pode, valor_permitido, Operacao};

pub struct EscalaController {
    colaboradores: Arc<dyn ColaboradorRepository>,
    escalas: Arc<dyn EscalaRepository>,
    solicitacoes: Arc<dyn SolicitacaoRepository>,
}

impl EscalaController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            colaboradores: Arc::new(PgColaboradorRepository::new(pool.clone())),
            escalas: Arc::new(PgEscalaRepository::new(pool.clone())),
            solicitacoes: Arc::new(PgSolicitacaoRepository::new(pool)),
        }
    }

    #[cfg(test)]
    pub fn com_repositorios(
        colaboradores: Arc<dyn ColaboradorRepository>,
        escalas: Arc<dyn EscalaRepository>,
        solicitacoes: Arc<dyn SolicitacaoRepository>,
    ) -> Self {
        Self {
            colaboradores,
            escalas,
            solicitacoes,
        }
    }

    /// Aplica uma alteração direta: mesma mutação de dia da aprovação,
    /// sem passar pelo estado pendente, com registro de auditoria
    pub async fn alterar_direto(
        &self,
        usuario: &UsuarioAutenticado,
        request: AlteracaoDiretaRequest,
    ) -> AppResult<AlteracaoDiretaResponse> {
        if !papel_pode(usuario.role, Operacao::AlteracaoDireta) {
            return Err(AppError::Forbidden(
                "Acesso negado. Apenas analistas e gerência podem fazer alterações diretas."
                    .to_string(),
            ));
        }

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

        let (Some(colaborador_id), Some(data_escala)) = (
            request.colaborador_id,
            request
                .data_escala
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty()),
        ) else {
            return Err(AppError::Validation(
                "Colaborador e data da escala são obrigatórios".to_string(),
            ));
        };
        let data = DataEscala::parse(data_escala)?;
        let data_escala = data_escala.to_string();

        let colaborador = self
            .colaboradores
            .buscar_por_id(colaborador_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Colaborador não encontrado".to_string()))?;

        let dia = self
            .escalas
            .aplicar_dia(&AlteracaoDia {
                colaborador_id: colaborador.id,
                data,
                valor: valor.clone(),
                usuario_id: usuario.id,
            })
            .await?;

        info!(
            "Alteração direta de {} ({}) para colaborador {} em {}",
            usuario.nome,
            usuario.matricula,
            colaborador.matricula,
            data.formatada()
        );

        // Trilha de auditoria: solicitação já nascida aprovada. A mutação
        // já foi aplicada; falha aqui não desfaz nem derruba a operação,
        // mas vira um aviso visível na resposta.
        let valor_atual = request.valor_atual.filter(|v| !v.trim().is_empty());
        let auditoria = NovaSolicitacao {
            solicitante_id: usuario.id,
            colaborador_id: colaborador.id,
            escala_dia_id: Some(dia.id),
            data_escala,
            valor_atual: valor_atual.clone(),
            valor_novo: valor.canonico(),
            motivo: "Alteração direta por analista".to_string(),
            justificativa: request
                .justificativa
                .filter(|j| !j.trim().is_empty())
                .unwrap_or_else(|| "Alteração aplicada diretamente pelo analista".to_string()),
            status: StatusSolicitacao::Aprovado,
            aprovado_por: Some(usuario.id),
            aprovado_em: Some(Utc::now()),
        };

        let aviso = match self.solicitacoes.criar(&auditoria).await {
            Ok(_) => None,
            Err(e) => {
                warn!("Falha ao registrar auditoria da alteração direta: {}", e);
                Some(
                    "Alteração aplicada, mas o registro de auditoria não pôde ser gravado"
                        .to_string(),
                )
            }
        };

        Ok(AlteracaoDiretaResponse {
            message: "Alteração aplicada com sucesso".to_string(),
            alteracao: format!(
                "{} → {}",
                valor_atual.as_deref().unwrap_or("-"),
                valor.canonico()
            ),
            escala_dia: dia,
            colaborador: colaborador.nome,
            data: data.formatada(),
            aviso,
        })
    }

    /// Importa a planilha mensal, substituindo integralmente o mês
    /// quando ele já existe
    pub async fn importar(
        &self,
        usuario: &UsuarioAutenticado,
        nome_arquivo: &str,
        conteudo: &str,
        mes: i32,
        ano: i32,
    ) -> AppResult<UploadResponse> {
        if !papel_pode(usuario.role, Operacao::UploadEscala) {
            return Err(AppError::Forbidden(
                "Acesso negado. Apenas analistas podem fazer upload de escalas.".to_string(),
            ));
        }

        if !(1..=12).contains(&mes) || ano < 1 {
            return Err(AppError::Validation(
                "Mês e ano são obrigatórios e devem ser válidos".to_string(),
            ));
        }

        let planilha = Planilha::parse(conteudo)?;
        tracing::debug!(
            "Planilha com separador '{}' e {} colunas de dia",
            planilha.separador,
            planilha.colunas_dia.len()
        );

        // Substituição destrutiva do mês inteiro, não um merge
        let removidas = self.escalas.substituir_mes(mes, ano).await?;
        if removidas > 0 {
            info!(
                "Escalas anteriores de {}/{} removidas antes da importação: {}",
                mes, ano, removidas
            );
        }

        let mut stats = UploadStats {
            replaced_existing: removidas > 0,
            removed_escalas: removidas,
            ..Default::default()
        };

        let ultimo_dia = dias_no_mes(mes, ano);

        for linha in &planilha.linhas {
            let matricula = planilha.campo(linha, "MATRICULA").unwrap_or("");
            let nome = planilha.campo(linha, "NOME").unwrap_or("");

            if matricula.is_empty() || nome.is_empty() {
                stats
                    .errors
                    .push(format!("Linha {}: Matrícula e nome são obrigatórios", linha.numero));
                continue;
            }

            let campo_opcional = |coluna: &str| {
                planilha
                    .campo(linha, coluna)
                    .filter(|v| !v.is_empty())
                    .map(|v| v.to_string())
            };

            let cod_escala = campo_opcional("COD_ESCALA");
            let novo = NovoColaborador {
                matricula: matricula.to_string(),
                nome: nome.to_string(),
                responsavel: campo_opcional("RESPONSAVEL"),
                departamento: campo_opcional("DEPART"),
                grupo: campo_opcional("GRUPO"),
                funcao: campo_opcional("FUNÇÃO"),
                horario_trabalho: cod_escala.clone(),
                cod_escala,
            };

            let colaborador_id = match self.colaboradores.upsert_por_matricula(&novo).await {
                Ok(id) => id,
                Err(e) => {
                    stats.errors.push(format!(
                        "Linha {}: Erro ao salvar colaborador: {}",
                        linha.numero, e
                    ));
                    continue;
                }
            };
            stats.colaboradores += 1;

            let escala_id = match self
                .escalas
                .upsert_escala_importada(colaborador_id, mes, ano, nome_arquivo, usuario.id)
                .await
            {
                Ok(id) => id,
                Err(e) => {
                    stats.errors.push(format!(
                        "Linha {}: Erro ao salvar escala: {}",
                        linha.numero, e
                    ));
                    continue;
                }
            };

            for coluna in &planilha.colunas_dia {
                let Some(celula) = planilha.celula_dia(linha, coluna) else {
                    continue;
                };

                if coluna.dia > ultimo_dia {
                    stats.errors.push(format!(
                        "Linha {}, Dia {}: dia inexistente em {}/{}",
                        linha.numero, coluna.dia, mes, ano
                    ));
                    continue;
                }

                let valor = ValorDia::parse(celula);
                match self
                    .escalas
                    .upsert_dia_importado(escala_id, coluna.dia, &valor)
                    .await
                {
                    Ok(()) => stats.dias += 1,
                    Err(e) => stats
                        .errors
                        .push(format!("Linha {}, Dia {}: {}", linha.numero, coluna.dia, e)),
                }
            }
        }

        let houve_erros = !stats.errors.is_empty();
        let message = if stats.replaced_existing {
            if houve_erros {
                format!(
                    "⚠️ ESCALA SUBSTITUÍDA: Upload concluído com {} erros. Escala anterior para {}/{} foi removida ({} registros), incluindo todas as solicitações de alteração. {} colaboradores e {} dias processados.",
                    stats.errors.len(), mes, ano, stats.removed_escalas, stats.colaboradores, stats.dias
                )
            } else {
                format!(
                    "✅ ESCALA SUBSTITUÍDA: Upload realizado com sucesso! Escala anterior para {}/{} foi removida ({} registros), incluindo todas as solicitações de alteração. {} colaboradores e {} dias importados.",
                    mes, ano, stats.removed_escalas, stats.colaboradores, stats.dias
                )
            }
        } else if houve_erros {
            format!(
                "Upload concluído com {} erros. {} colaboradores e {} dias processados.",
                stats.errors.len(),
                stats.colaboradores,
                stats.dias
            )
        } else {
            format!(
                "Upload realizado com sucesso! {} colaboradores e {} dias importados.",
                stats.colaboradores, stats.dias
            )
        };

        info!(
            "Importação de {}/{} por {}: {} colaboradores, {} dias, {} erros",
            mes,
            ano,
            usuario.matricula,
            stats.colaboradores,
            stats.dias,
            stats.errors.len()
        );

        Ok(UploadResponse {
            success: !houve_erros,
            replaced_existing: stats.replaced_existing,
            message,
            stats,
        })
    }

    /// Lista as escalas de um mês com colaborador e dias embutidos
    pub async fn listar_mes(&self, params: EscalasRequest) -> AppResult<EscalasResponse> {
        let agora = Utc::now();
        let mes = params.mes.unwrap_or(agora.month() as i32);
        let ano = params.ano.unwrap_or(agora.year());
        let page = params.page.unwrap_or(1).max(1);
        let limite = params.limit.unwrap_or(200).max(1);

        let total = self.escalas.contar_mes(mes, ano).await?;
        let escalas = self
            .escalas
            .listar_mes(mes, ano, limite, (page - 1) * limite)
            .await?;

        let ids: Vec<Uuid> = escalas.iter().map(|e| e.id).collect();
        let mut dias_por_escala: HashMap<Uuid, Vec<EscalaDiaView>> = HashMap::new();
        if !ids.is_empty() {
            for dia in self.escalas.dias_das_escalas(&ids).await? {
                dias_por_escala
                    .entry(dia.escala_id)
                    .or_default()
                    .push(EscalaDiaView::from(dia));
            }
        }

        let escalas = escalas
            .into_iter()
            .map(|e| EscalaView {
                colaboradores: ColaboradorEscalaView {
                    id: e.colaborador_id,
                    matricula: e.colaborador_matricula,
                    nome: e.colaborador_nome,
                    grupo: e.colaborador_grupo,
                    funcao: e.colaborador_funcao,
                    cod_escala: e.colaborador_cod_escala,
                    horario_trabalho: e.colaborador_horario_trabalho,
                },
                escala_dias: dias_por_escala.remove(&e.id).unwrap_or_default(),
                id: e.id,
                mes: e.mes,
                ano: e.ano,
            })
            .collect();

        let mut filtros = self.escalas.opcoes_filtro().await?;
        let ordenar = |valores: &mut Vec<String>| {
            valores.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
        };
        ordenar(&mut filtros.grupos);
        ordenar(&mut filtros.funcoes);
        ordenar(&mut filtros.cod_escalas);

        let total_pages = (total + limite - 1) / limite;

        Ok(EscalasResponse {
            success: true,
            escalas,
            filters: FiltrosEscala {
                grupos: filtros.grupos,
                funcoes: filtros.funcoes,
                cod_escalas: filtros.cod_escalas,
            },
            pagination: PaginacaoEscalas {
                current_page: page,
                total_pages,
                total_records: total,
                records_per_page: limite,
                has_next_page: page < total_pages,
                has_prev_page: page > 1,
            },
        })
    }
}
