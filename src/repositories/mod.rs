//! Repositórios de acesso ao banco
//!
//! Cada entidade tem uma interface (`async_trait`) e uma implementação
//! PostgreSQL. Os controllers dependem só das interfaces, o que permite
//! testá-los contra o fake em memória de `memoria`.

pub mod colaborador_repository;
pub mod escala_repository;
pub mod notificacao_repository;
pub mod solicitacao_repository;
pub mod user_repository;

#[cfg(test)]
pub mod memoria;
