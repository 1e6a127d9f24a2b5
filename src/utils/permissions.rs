//! Tabela de permissões
//!
//! Mapeamento único `(papel, operação) -> permitido`, consultado uma vez
//! por operação. Evita a deriva entre o caminho de solicitação e o de
//! alteração direta que existiria com checagens duplicadas nos handlers.

use uuid::Uuid;

use crate::models::auth::UserRole;
use crate::models::escala::{StatusDia, ValorDia};

/// Operações controladas por papel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operacao {
    CriarSolicitacao,
    DecidirSolicitacao,
    AlteracaoDireta,
    UploadEscala,
}

/// Consulta única da tabela de permissões
pub fn papel_pode(papel: UserRole, operacao: Operacao) -> bool {
    use Operacao::*;
    use UserRole::*;
    match operacao {
        CriarSolicitacao => matches!(papel, Supervisor | Treinamento),
        DecidirSolicitacao | AlteracaoDireta | UploadEscala => {
            matches!(papel, Analista | Gerencia)
        }
    }
}

/// Restrição de valor por papel: treinamento só marca TR ou DT
pub fn valor_permitido(papel: UserRole, valor: &ValorDia) -> bool {
    match papel {
        UserRole::Treinamento => {
            matches!(valor, ValorDia::Trabalhado | ValorDia::Status(StatusDia::TR))
        }
        _ => true,
    }
}

/// Escopo de leitura das solicitações por papel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscopoListagem {
    /// Supervisor e treinamento veem apenas as próprias solicitações
    Proprias(Uuid),
    /// Ponto vê apenas solicitações aprovadas
    Aprovadas,
    /// Analista e gerência veem todas
    Todas,
}

/// Escopo de listagem do papel, ou `None` quando o papel não lista
pub fn escopo_listagem(papel: UserRole, usuario_id: Uuid) -> Option<EscopoListagem> {
    match papel {
        UserRole::Supervisor | UserRole::Treinamento => {
            Some(EscopoListagem::Proprias(usuario_id))
        }
        UserRole::Ponto => Some(EscopoListagem::Aprovadas),
        UserRole::Analista | UserRole::Gerencia => Some(EscopoListagem::Todas),
        _ => None,
    }
}

/// Leitura de uma solicitação individual
pub fn pode_ver_solicitacao(papel: UserRole, usuario_id: Uuid, solicitante_id: Uuid) -> bool {
    match papel {
        UserRole::Supervisor | UserRole::Treinamento => usuario_id == solicitante_id,
        UserRole::Analista | UserRole::Gerencia => true,
        _ => false,
    }
}
