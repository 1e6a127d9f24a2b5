//! Datas de escala
//!
//! O dia autoritativo de uma alteração vem sempre da string `YYYY-MM-DD`
//! quebrada manualmente no `-`. Nunca usar um tipo de data com timezone
//! aqui: perto da meia-noite em fuso negativo o dia deslocaria em um.

use crate::utils::errors::AppError;

/// Data de escala já decomposta em componentes inteiros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataEscala {
    pub ano: i32,
    pub mes: i32,
    pub dia: i32,
}

impl DataEscala {
    /// Quebra `YYYY-MM-DD` em `(ano, mes, dia)` por split literal no `-`
    pub fn parse(data: &str) -> Result<Self, AppError> {
        let partes: Vec<&str> = data.trim().split('-').collect();
        if partes.len() != 3 {
            return Err(AppError::Validation(format!(
                "Data da escala inválida: '{}' (esperado YYYY-MM-DD)",
                data
            )));
        }

        let ano: i32 = partes[0]
            .parse()
            .map_err(|_| AppError::Validation(format!("Ano inválido na data '{}'", data)))?;
        let mes: i32 = partes[1]
            .parse()
            .map_err(|_| AppError::Validation(format!("Mês inválido na data '{}'", data)))?;
        let dia: i32 = partes[2]
            .parse()
            .map_err(|_| AppError::Validation(format!("Dia inválido na data '{}'", data)))?;

        if !(1..=12).contains(&mes) {
            return Err(AppError::Validation(format!(
                "Mês fora do intervalo na data '{}'",
                data
            )));
        }
        if dia < 1 || dia > dias_no_mes(mes, ano) {
            return Err(AppError::Validation(format!(
                "Dia fora do intervalo na data '{}'",
                data
            )));
        }

        Ok(Self { ano, mes, dia })
    }

    /// Formato de exibição dd/mm/aaaa usado nos resumos de alteração
    pub fn formatada(&self) -> String {
        format!("{:02}/{:02}/{}", self.dia, self.mes, self.ano)
    }
}

/// Quantidade de dias do mês, com ano bissexto
pub fn dias_no_mes(mes: i32, ano: i32) -> i32 {
    match mes {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (ano % 4 == 0 && ano % 100 != 0) || ano % 400 == 0 {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}
