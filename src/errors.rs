//! # Definição de Erros do Pipeline de Pré-Agregação
//!
//! Este módulo centraliza as falhas fatais possíveis durante a leitura dos arquivos VRA
//! e a escrita dos artefatos agregados.
//!
//! # Error Handling Strategy
//! - **Tipagem:** Enums para tratamento exaustivo.
//! - **Fail-Soft por linha:** defeitos de linha (data inválida, linha irregular) nunca viram
//!   erro; são apenas excluídos da contagem.
//! - **Fail-Fast por arquivo:** um arquivo ilegível aborta a execução inteira.

use std::path::PathBuf;

/// Enumeração central de falhas do Processador.
///
/// O atributo `#[non_exhaustive]` garante compatibilidade futura,
/// instruindo o compilador a exigir tratamento de variantes desconhecidas.
#[derive(Debug)]
#[non_exhaustive]
pub enum ProcessorError {
    /// Falhas no sistema de arquivos (permissão, disco cheio, arquivo inexistente).
    Io(std::io::Error),

    /// Encapsula `serde_json::Error` (serialização dos artefatos).
    Json(serde_json::Error),

    /// Erro no fluxo CSV no meio da leitura.
    Csv(csv::Error),

    /// Violações de configuração ou de formato (ex: encoding desconhecido).
    Schema(String),

    /// Defeito em nível de arquivo, com o caminho que o originou.
    File {
        path: PathBuf,
        source: Box<ProcessorError>,
    },
}

impl ProcessorError {
    /// Anexa o caminho do arquivo ao erro.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        ProcessorError::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}
