//! Fake em memória dos repositórios
//!
//! Implementa as interfaces de colaborador, escala e solicitação sobre
//! vetores protegidos por mutex, com a mesma semântica de upsert e de
//! unicidade do PostgreSQL, para os testes dos controllers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::auth::User;
use crate::models::colaborador::{Colaborador, NovoColaborador};
use crate::models::escala::{AlteracaoDia, Escala, EscalaDia, ValorDia};
use crate::models::solicitacao::{Decisao, NovaSolicitacao, Solicitacao, StatusSolicitacao};
use crate::repositories::colaborador_repository::ColaboradorRepository;
use crate::repositories::escala_repository::{
    EscalaComColaborador, EscalaRepository, OpcoesFiltro,
};
use crate::repositories::solicitacao_repository::{
    FiltroSolicitacoes, SolicitacaoDetalhada, SolicitacaoRepository,
};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::permissions::EscopoListagem;

#[derive(Default)]
pub struct MemoriaStore {
    users: Mutex<Vec<User>>,
    colaboradores: Mutex<Vec<Colaborador>>,
    escalas: Mutex<Vec<Escala>>,
    dias: Mutex<Vec<EscalaDia>>,
    solicitacoes: Mutex<Vec<Solicitacao>>,
    falha_solicitacao: AtomicBool,
}

impl MemoriaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inserir_usuario(&self, matricula: &str, senha: &str, role: &str) -> Uuid {
        let id = Uuid::new_v4();
        // Custo mínimo do bcrypt para os testes não arrastarem
        let senha_hash = bcrypt::hash(senha, 4).unwrap();
        self.users.lock().unwrap().push(User {
            id,
            matricula: matricula.to_string(),
            nome: "Usuária Teste".to_string(),
            email: None,
            senha_hash,
            role: role.to_string(),
            ativo: true,
            created_at: Utc::now(),
        });
        id
    }

    pub fn desativar_usuario(&self, id: Uuid) {
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            user.ativo = false;
        }
    }

    pub fn inserir_colaborador(&self, matricula: &str, nome: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.colaboradores.lock().unwrap().push(Colaborador {
            id,
            matricula: matricula.to_string(),
            nome: nome.to_string(),
            responsavel: None,
            departamento: None,
            grupo: None,
            funcao: None,
            cod_escala: None,
            horario_trabalho: None,
            ativo: true,
            created_at: Utc::now(),
        });
        id
    }

    pub fn colaborador_por_matricula(&self, matricula: &str) -> Option<Uuid> {
        self.colaboradores
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.matricula == matricula)
            .map(|c| c.id)
    }

    pub fn total_solicitacoes(&self) -> usize {
        self.solicitacoes.lock().unwrap().len()
    }

    pub fn total_dias(&self) -> usize {
        self.dias.lock().unwrap().len()
    }

    pub fn escalas_do_mes(&self, mes: i32, ano: i32) -> usize {
        self.escalas
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.mes == mes && e.ano == ano)
            .count()
    }

    pub fn ultima_solicitacao(&self) -> Option<Solicitacao> {
        self.solicitacoes.lock().unwrap().last().cloned()
    }

    pub fn solicitacao_por_id(&self, id: Uuid) -> Option<Solicitacao> {
        self.solicitacoes
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub fn dia_de(&self, colaborador_id: Uuid, mes: i32, ano: i32, dia: i32) -> Option<EscalaDia> {
        let escala_id = self.escala_id_de(colaborador_id, mes, ano)?;
        self.dias
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.escala_id == escala_id && d.dia == dia)
            .cloned()
    }

    pub fn semear_dia(
        &self,
        colaborador_id: Uuid,
        mes: i32,
        ano: i32,
        dia: i32,
        status: Option<&str>,
        horario: Option<&str>,
    ) {
        let escala_id = self.garantir_escala(colaborador_id, mes, ano, None);
        self.dias.lock().unwrap().push(EscalaDia {
            id: Uuid::new_v4(),
            escala_id,
            dia,
            status: status.map(str::to_string),
            horario: horario.map(str::to_string),
            alterado: false,
            alterado_por: None,
            alterado_em: None,
        });
    }

    pub fn semear_solicitacao_para_dia(&self, colaborador_id: Uuid, mes: i32, ano: i32, dia: i32) {
        let escala_dia = self
            .dia_de(colaborador_id, mes, ano, dia)
            .expect("dia inexistente para semear solicitação");
        self.solicitacoes.lock().unwrap().push(Solicitacao {
            id: Uuid::new_v4(),
            solicitante_id: Uuid::new_v4(),
            colaborador_id,
            escala_dia_id: Some(escala_dia.id),
            data_escala: format!("{}-{:02}-{:02}", ano, mes, dia),
            valor_atual: None,
            valor_novo: "FR".to_string(),
            motivo: "Teste".to_string(),
            justificativa: "Teste".to_string(),
            status: "pendente".to_string(),
            aprovado_por: None,
            aprovado_em: None,
            comentario_aprovador: None,
            created_at: Utc::now(),
        });
    }

    pub fn falhar_proxima_solicitacao(&self) {
        self.falha_solicitacao.store(true, Ordering::SeqCst);
    }

    fn escala_id_de(&self, colaborador_id: Uuid, mes: i32, ano: i32) -> Option<Uuid> {
        self.escalas
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.colaborador_id == colaborador_id && e.mes == mes && e.ano == ano)
            .map(|e| e.id)
    }

    fn garantir_escala(
        &self,
        colaborador_id: Uuid,
        mes: i32,
        ano: i32,
        uploaded_by: Option<Uuid>,
    ) -> Uuid {
        if let Some(id) = self.escala_id_de(colaborador_id, mes, ano) {
            return id;
        }
        let id = Uuid::new_v4();
        self.escalas.lock().unwrap().push(Escala {
            id,
            colaborador_id,
            mes,
            ano,
            upload_file_name: None,
            uploaded_by,
            created_at: Utc::now(),
        });
        id
    }

    fn upsert_dia(
        &self,
        escala_id: Uuid,
        dia: i32,
        valor: &ValorDia,
        alterado_por: Option<Uuid>,
    ) -> EscalaDia {
        let (status, horario) = valor.colunas();
        let alterado = alterado_por.is_some();
        let alterado_em = alterado_por.map(|_| Utc::now());

        let mut dias = self.dias.lock().unwrap();
        if let Some(existente) = dias
            .iter_mut()
            .find(|d| d.escala_id == escala_id && d.dia == dia)
        {
            existente.status = status;
            existente.horario = horario;
            existente.alterado = alterado;
            existente.alterado_por = alterado_por;
            existente.alterado_em = alterado_em;
            return existente.clone();
        }

        let novo = EscalaDia {
            id: Uuid::new_v4(),
            escala_id,
            dia,
            status,
            horario,
            alterado,
            alterado_por,
            alterado_em,
        };
        dias.push(novo.clone());
        novo
    }

    fn detalhar(&self, solicitacao: Solicitacao) -> SolicitacaoDetalhada {
        let colaboradores = self.colaboradores.lock().unwrap();
        let colaborador = colaboradores
            .iter()
            .find(|c| c.id == solicitacao.colaborador_id);
        SolicitacaoDetalhada {
            solicitante_nome: "Solicitante".to_string(),
            solicitante_matricula: "00000".to_string(),
            colaborador_nome: colaborador.map(|c| c.nome.clone()).unwrap_or_default(),
            colaborador_matricula: colaborador.map(|c| c.matricula.clone()).unwrap_or_default(),
            colaborador_departamento: colaborador.and_then(|c| c.departamento.clone()),
            colaborador_funcao: colaborador.and_then(|c| c.funcao.clone()),
            aprovador_nome: solicitacao.aprovado_por.map(|_| "Aprovador".to_string()),
            aprovador_matricula: solicitacao.aprovado_por.map(|_| "00001".to_string()),
            solicitacao,
        }
    }

    fn passa_filtro(solicitacao: &Solicitacao, filtro: &FiltroSolicitacoes) -> bool {
        if let Some(status) = filtro.status {
            if solicitacao.status != status.as_str() {
                return false;
            }
        }
        match filtro.escopo {
            EscopoListagem::Proprias(solicitante_id) => {
                solicitacao.solicitante_id == solicitante_id
            }
            EscopoListagem::Aprovadas => solicitacao.status == "aprovado",
            EscopoListagem::Todas => true,
        }
    }
}

#[async_trait]
impl UserRepository for MemoriaStore {
    async fn buscar_ativo_por_matricula(&self, matricula: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.matricula == matricula && u.ativo)
            .cloned())
    }

    async fn buscar_por_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }
}

#[async_trait]
impl ColaboradorRepository for MemoriaStore {
    async fn buscar_por_id(&self, id: Uuid) -> AppResult<Option<Colaborador>> {
        Ok(self
            .colaboradores
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn upsert_por_matricula(&self, dados: &NovoColaborador) -> AppResult<Uuid> {
        let mut colaboradores = self.colaboradores.lock().unwrap();
        if let Some(existente) = colaboradores
            .iter_mut()
            .find(|c| c.matricula == dados.matricula)
        {
            existente.nome = dados.nome.clone();
            existente.responsavel = dados.responsavel.clone();
            existente.departamento = dados.departamento.clone();
            existente.grupo = dados.grupo.clone();
            existente.funcao = dados.funcao.clone();
            existente.cod_escala = dados.cod_escala.clone();
            existente.horario_trabalho = dados.horario_trabalho.clone();
            existente.ativo = true;
            return Ok(existente.id);
        }

        let id = Uuid::new_v4();
        colaboradores.push(Colaborador {
            id,
            matricula: dados.matricula.clone(),
            nome: dados.nome.clone(),
            responsavel: dados.responsavel.clone(),
            departamento: dados.departamento.clone(),
            grupo: dados.grupo.clone(),
            funcao: dados.funcao.clone(),
            cod_escala: dados.cod_escala.clone(),
            horario_trabalho: dados.horario_trabalho.clone(),
            ativo: true,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn contar_ativos(&self) -> AppResult<i64> {
        Ok(self
            .colaboradores
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.ativo)
            .count() as i64)
    }
}

#[async_trait]
impl EscalaRepository for MemoriaStore {
    async fn buscar_escala(
        &self,
        colaborador_id: Uuid,
        mes: i32,
        ano: i32,
    ) -> AppResult<Option<Escala>> {
        Ok(self
            .escalas
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.colaborador_id == colaborador_id && e.mes == mes && e.ano == ano)
            .cloned())
    }

    async fn buscar_dia_id(&self, escala_id: Uuid, dia: i32) -> AppResult<Option<Uuid>> {
        Ok(self
            .dias
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.escala_id == escala_id && d.dia == dia)
            .map(|d| d.id))
    }

    async fn aplicar_dia(&self, alteracao: &AlteracaoDia) -> AppResult<EscalaDia> {
        let escala_id = self.garantir_escala(
            alteracao.colaborador_id,
            alteracao.data.mes,
            alteracao.data.ano,
            Some(alteracao.usuario_id),
        );
        Ok(self.upsert_dia(
            escala_id,
            alteracao.data.dia,
            &alteracao.valor,
            Some(alteracao.usuario_id),
        ))
    }

    async fn substituir_mes(&self, mes: i32, ano: i32) -> AppResult<u64> {
        let escala_ids: Vec<Uuid> = self
            .escalas
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.mes == mes && e.ano == ano)
            .map(|e| e.id)
            .collect();

        if escala_ids.is_empty() {
            return Ok(0);
        }

        let dia_ids: Vec<Uuid> = self
            .dias
            .lock()
            .unwrap()
            .iter()
            .filter(|d| escala_ids.contains(&d.escala_id))
            .map(|d| d.id)
            .collect();

        self.solicitacoes.lock().unwrap().retain(|s| {
            s.escala_dia_id
                .map(|id| !dia_ids.contains(&id))
                .unwrap_or(true)
        });
        self.dias
            .lock()
            .unwrap()
            .retain(|d| !escala_ids.contains(&d.escala_id));
        self.escalas
            .lock()
            .unwrap()
            .retain(|e| !escala_ids.contains(&e.id));

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
        let id = self.garantir_escala(colaborador_id, mes, ano, Some(usuario_id));
        let mut escalas = self.escalas.lock().unwrap();
        if let Some(escala) = escalas.iter_mut().find(|e| e.id == id) {
            escala.upload_file_name = Some(arquivo.to_string());
            escala.uploaded_by = Some(usuario_id);
        }
        Ok(id)
    }

    async fn upsert_dia_importado(
        &self,
        escala_id: Uuid,
        dia: i32,
        valor: &ValorDia,
    ) -> AppResult<()> {
        self.upsert_dia(escala_id, dia, valor, None);
        Ok(())
    }

    async fn listar_mes(
        &self,
        mes: i32,
        ano: i32,
        limite: i64,
        offset: i64,
    ) -> AppResult<Vec<EscalaComColaborador>> {
        let colaboradores = self.colaboradores.lock().unwrap();
        let listagem = self
            .escalas
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.mes == mes && e.ano == ano)
            .skip(offset as usize)
            .take(limite as usize)
            .map(|e| {
                let colaborador = colaboradores
                    .iter()
                    .find(|c| c.id == e.colaborador_id)
                    .expect("escala sem colaborador");
                EscalaComColaborador {
                    id: e.id,
                    mes: e.mes,
                    ano: e.ano,
                    colaborador_id: colaborador.id,
                    colaborador_matricula: colaborador.matricula.clone(),
                    colaborador_nome: colaborador.nome.clone(),
                    colaborador_grupo: colaborador.grupo.clone(),
                    colaborador_funcao: colaborador.funcao.clone(),
                    colaborador_cod_escala: colaborador.cod_escala.clone(),
                    colaborador_horario_trabalho: colaborador.horario_trabalho.clone(),
                }
            })
            .collect();
        Ok(listagem)
    }

    async fn dias_das_escalas(&self, escala_ids: &[Uuid]) -> AppResult<Vec<EscalaDia>> {
        let mut dias: Vec<EscalaDia> = self
            .dias
            .lock()
            .unwrap()
            .iter()
            .filter(|d| escala_ids.contains(&d.escala_id))
            .cloned()
            .collect();
        dias.sort_by_key(|d| d.dia);
        Ok(dias)
    }

    async fn contar_mes(&self, mes: i32, ano: i32) -> AppResult<i64> {
        Ok(self.escalas_do_mes(mes, ano) as i64)
    }

    async fn contar_alterados_mes(&self, mes: i32, ano: i32) -> AppResult<i64> {
        let escala_ids: Vec<Uuid> = self
            .escalas
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.mes == mes && e.ano == ano)
            .map(|e| e.id)
            .collect();
        Ok(self
            .dias
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.alterado && escala_ids.contains(&d.escala_id))
            .count() as i64)
    }

    async fn opcoes_filtro(&self) -> AppResult<OpcoesFiltro> {
        let colaboradores = self.colaboradores.lock().unwrap();
        let mut opcoes = OpcoesFiltro::default();
        for c in colaboradores.iter().filter(|c| c.ativo) {
            if let Some(grupo) = &c.grupo {
                if !opcoes.grupos.contains(grupo) {
                    opcoes.grupos.push(grupo.clone());
                }
            }
            if let Some(funcao) = &c.funcao {
                if !opcoes.funcoes.contains(funcao) {
                    opcoes.funcoes.push(funcao.clone());
                }
            }
            if let Some(cod) = &c.cod_escala {
                if !opcoes.cod_escalas.contains(cod) {
                    opcoes.cod_escalas.push(cod.clone());
                }
            }
        }
        Ok(opcoes)
    }
}

#[async_trait]
impl SolicitacaoRepository for MemoriaStore {
    async fn criar(&self, nova: &NovaSolicitacao) -> AppResult<Solicitacao> {
        if self.falha_solicitacao.swap(false, Ordering::SeqCst) {
            return Err(AppError::Internal("falha simulada de escrita".to_string()));
        }

        let mut solicitacoes = self.solicitacoes.lock().unwrap();

        // Espelha o índice único parcial sobre pendências
        if nova.status == StatusSolicitacao::Pendente
            && solicitacoes.iter().any(|s| {
                s.colaborador_id == nova.colaborador_id
                    && s.data_escala == nova.data_escala
                    && s.status == "pendente"
            })
        {
            return Err(AppError::Conflict(
                "Já existe uma solicitação pendente para este colaborador nesta data".to_string(),
            ));
        }

        let solicitacao = Solicitacao {
            id: Uuid::new_v4(),
            solicitante_id: nova.solicitante_id,
            colaborador_id: nova.colaborador_id,
            escala_dia_id: nova.escala_dia_id,
            data_escala: nova.data_escala.clone(),
            valor_atual: nova.valor_atual.clone(),
            valor_novo: nova.valor_novo.clone(),
            motivo: nova.motivo.clone(),
            justificativa: nova.justificativa.clone(),
            status: nova.status.as_str().to_string(),
            aprovado_por: nova.aprovado_por,
            aprovado_em: nova.aprovado_em,
            comentario_aprovador: None,
            created_at: Utc::now(),
        };
        solicitacoes.push(solicitacao.clone());
        Ok(solicitacao)
    }

    async fn buscar_por_id(&self, id: Uuid) -> AppResult<Option<Solicitacao>> {
        Ok(self.solicitacao_por_id(id))
    }

    async fn buscar_detalhada(&self, id: Uuid) -> AppResult<Option<SolicitacaoDetalhada>> {
        Ok(self.solicitacao_por_id(id).map(|s| self.detalhar(s)))
    }

    async fn existe_pendente(&self, colaborador_id: Uuid, data_escala: &str) -> AppResult<bool> {
        Ok(self.solicitacoes.lock().unwrap().iter().any(|s| {
            s.colaborador_id == colaborador_id
                && s.data_escala == data_escala
                && s.status == "pendente"
        }))
    }

    async fn concluir(
        &self,
        id: Uuid,
        decisao: &Decisao,
        alteracao: Option<&AlteracaoDia>,
    ) -> AppResult<Solicitacao> {
        let atualizada = {
            let mut solicitacoes = self.solicitacoes.lock().unwrap();
            let Some(solicitacao) = solicitacoes.iter_mut().find(|s| s.id == id) else {
                return Err(AppError::NotFound("Solicitação não encontrada".to_string()));
            };
            if solicitacao.status != "pendente" {
                return Err(AppError::Conflict(format!(
                    "Solicitação já foi {}",
                    solicitacao.status
                )));
            }
            solicitacao.status = decisao.status.as_str().to_string();
            solicitacao.comentario_aprovador = decisao.comentario.clone();
            solicitacao.aprovado_por = Some(decisao.aprovador_id);
            solicitacao.aprovado_em = Some(Utc::now());
            solicitacao.clone()
        };

        if let Some(alteracao) = alteracao {
            let escala_id = self.garantir_escala(
                alteracao.colaborador_id,
                alteracao.data.mes,
                alteracao.data.ano,
                Some(alteracao.usuario_id),
            );
            self.upsert_dia(
                escala_id,
                alteracao.data.dia,
                &alteracao.valor,
                Some(alteracao.usuario_id),
            );
        }

        Ok(atualizada)
    }

    async fn listar(&self, filtro: &FiltroSolicitacoes) -> AppResult<Vec<SolicitacaoDetalhada>> {
        let mut selecionadas: Vec<Solicitacao> = self
            .solicitacoes
            .lock()
            .unwrap()
            .iter()
            .filter(|s| Self::passa_filtro(s, filtro))
            .cloned()
            .collect();
        selecionadas.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(selecionadas
            .into_iter()
            .skip(filtro.offset as usize)
            .take(filtro.limite as usize)
            .map(|s| self.detalhar(s))
            .collect())
    }

    async fn contar(&self, filtro: &FiltroSolicitacoes) -> AppResult<i64> {
        Ok(self
            .solicitacoes
            .lock()
            .unwrap()
            .iter()
            .filter(|s| Self::passa_filtro(s, filtro))
            .count() as i64)
    }

    async fn contar_pendentes(&self) -> AppResult<i64> {
        Ok(self
            .solicitacoes
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.status == "pendente")
            .count() as i64)
    }
}
