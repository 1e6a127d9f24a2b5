//! Modelos do sistema
//!
//! Este módulo contém os modelos de dados que mapeiam exatamente
//! o schema PostgreSQL com as convenções padrão.

pub mod auth;
pub mod colaborador;
pub mod escala;
pub mod solicitacao;
