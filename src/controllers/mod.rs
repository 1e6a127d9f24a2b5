//! Controllers da API
//!
//! A lógica de cada operação: validação, permissões e orquestração
//! dos repositórios. Os handlers em `routes` só fazem a ponte HTTP.

pub mod auth_controller;
pub mod dashboard_controller;
pub mod escala_controller;
pub mod solicitacao_controller;
