//! Parser da planilha de escala
//!
//! O arquivo exportado vem como CSV com separador `;` ou `,`, campos
//! possivelmente entre aspas e colunas de dia nomeadas `1`..`31`.
//! O parse é estrutural: a validação de colunas obrigatórias é fatal
//! para o lote, erros por linha ficam a cargo do importador.

use crate::utils::errors::AppError;

/// Colunas obrigatórias do cabeçalho, comparadas sem diferenciar caixa
pub const COLUNAS_OBRIGATORIAS: [&str; 7] = [
    "MATRICULA",
    "NOME",
    "RESPONSAVEL",
    "DEPART",
    "GRUPO",
    "FUNÇÃO",
    "COD_ESCALA",
];

/// Coluna de dia identificada no cabeçalho
#[derive(Debug, Clone, Copy)]
pub struct ColunaDia {
    pub dia: i32,
    pub indice: usize,
}

/// Linha de dados já separada em campos
#[derive(Debug, Clone)]
pub struct LinhaPlanilha {
    /// Número da linha no arquivo (1 = cabeçalho), usado nas mensagens de erro
    pub numero: usize,
    pub campos: Vec<String>,
}

/// Planilha de escala estruturalmente validada
#[derive(Debug)]
pub struct Planilha {
    colunas_maiusculas: Vec<String>,
    pub separador: char,
    pub colunas_dia: Vec<ColunaDia>,
    pub linhas: Vec<LinhaPlanilha>,
}

/// Remove espaços e aspas envolventes de um campo
fn limpar_campo(campo: &str) -> String {
    let aparado = campo.trim();
    let sem_aspas = aparado
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(aparado);
    sem_aspas.trim().to_string()
}

impl Planilha {
    /// Faz o parse estrutural do texto do arquivo.
    ///
    /// Falha com erro de validação quando há menos de duas linhas úteis
    /// ou quando alguma coluna obrigatória está ausente.
    pub fn parse(texto: &str) -> Result<Self, AppError> {
        let linhas_uteis: Vec<&str> = texto
            .lines()
            .filter(|linha| !linha.trim().is_empty())
            .collect();

        if linhas_uteis.len() < 2 {
            return Err(AppError::Validation(
                "Arquivo CSV deve conter pelo menos uma linha de cabeçalho e uma linha de dados"
                    .to_string(),
            ));
        }

        let cabecalho = linhas_uteis[0];
        let separador = if cabecalho.contains(';') { ';' } else { ',' };

        let colunas: Vec<String> = cabecalho.split(separador).map(limpar_campo).collect();
        let colunas_maiusculas: Vec<String> =
            colunas.iter().map(|c| c.to_uppercase()).collect();

        let faltando: Vec<&str> = COLUNAS_OBRIGATORIAS
            .iter()
            .filter(|obrigatoria| {
                !colunas_maiusculas.contains(&obrigatoria.to_string())
            })
            .copied()
            .collect();

        if !faltando.is_empty() {
            return Err(AppError::Validation(format!(
                "Colunas obrigatórias não encontradas: {}",
                faltando.join(", ")
            )));
        }

        let mut colunas_dia = Vec::new();
        for dia in 1..=31 {
            let nome = dia.to_string();
            if let Some(indice) = colunas.iter().position(|c| *c == nome) {
                colunas_dia.push(ColunaDia { dia, indice });
            }
        }

        let linhas = linhas_uteis[1..]
            .iter()
            .enumerate()
            .map(|(i, linha)| LinhaPlanilha {
                numero: i + 2,
                campos: linha.split(separador).map(limpar_campo).collect(),
            })
            .collect();

        Ok(Self {
            colunas_maiusculas,
            separador,
            colunas_dia,
            linhas,
        })
    }

    /// Valor de um campo pela coluna nomeada, sem diferenciar caixa
    pub fn campo<'a>(&self, linha: &'a LinhaPlanilha, coluna: &str) -> Option<&'a str> {
        let indice = self
            .colunas_maiusculas
            .iter()
            .position(|c| *c == coluna.to_uppercase())?;
        linha.campos.get(indice).map(|s| s.as_str())
    }

    /// Valor de uma célula de dia da linha, `None` quando em branco
    pub fn celula_dia<'a>(&self, linha: &'a LinhaPlanilha, coluna: &ColunaDia) -> Option<&'a str> {
        linha
            .campos
            .get(coluna.indice)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }
}
