//! Serviços do sistema
//!
//! Serviço JWT (emissão e validação de tokens) e o parser da
//! planilha de importação de escalas.

pub mod jwt_service;
pub mod planilha_service;
