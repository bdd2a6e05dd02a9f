//! Configuração do Pipeline de Pré-Agregação
//!
//! ## Visão Geral
//! Define onde ficam os arquivos VRA, para onde vão os artefatos e os parâmetros
//! da regra de atraso. Todas as chaves do TOML são opcionais; o que faltar assume
//! o valor padrão.
//!
//! ## Boas Práticas
//! - **Encapsulamento**: Validações de integridade ocorrem no momento da carga.

use crate::errors::ProcessorError;
use encoding_rs::Encoding;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuração.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Diretório com os CSVs VRA.
    pub dataset_dir: PathBuf,

    /// Diretório onde os seis JSONs são gravados.
    pub output_dir: PathBuf,

    /// Tabela auxiliar de aeródromos (airport-codes.csv).
    pub airport_codes_path: PathBuf,

    /// Código ISO do país mantido na tabela auxiliar.
    pub country: String,

    /// Limite, em minutos, a partir do qual um voo conta como atrasado.
    pub min_delay_minutes: i64,

    /// Tamanho do ranking de aeroportos.
    pub top_n: usize,

    /// Extensão dos arquivos de entrada (sem o ponto).
    pub extension: String,

    /// Trechos de nome que excluem um arquivo da leitura (comparação sem caixa).
    pub exclude_patterns: Vec<String>,

    /// Rótulo WHATWG do encoding dos CSVs VRA.
    pub encoding: String,

    /// Processa arquivos em paralelo e soma as árvores no final.
    pub parallel: bool,

    /// Exibe barra de progresso por arquivo.
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dataset_dir: PathBuf::from("Dataset"),
            output_dir: PathBuf::from("outputs"),
            airport_codes_path: PathBuf::from("Dataset/airport-codes.csv"),
            country: "BR".to_string(),
            min_delay_minutes: 15,
            top_n: 20,
            extension: "csv".to_string(),
            exclude_patterns: vec!["airport-codes".to_string(), "processed".to_string()],
            encoding: "latin1".to_string(),
            parallel: false,
            show_progress: true,
        }
    }
}

impl Config {
    /// Carrega e valida o ficheiro de configuração TOML.
    ///
    /// # Erros
    /// Retorna `ProcessorError::Io` se o ficheiro não for encontrado ou
    /// `ProcessorError::Schema` se a estrutura for inválida.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProcessorError> {
        let content = fs::read_to_string(path).map_err(ProcessorError::Io)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ProcessorError> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ProcessorError::Schema(format!("Erro no TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validação pós-carga (Fail-Fast).
    pub fn validate(&self) -> Result<(), ProcessorError> {
        if self.top_n == 0 {
            return Err(ProcessorError::Schema("top_n deve ser maior que zero".to_string()));
        }
        if self.extension.trim().is_empty() {
            return Err(ProcessorError::Schema("extension vazia".to_string()));
        }
        if self.country.trim().is_empty() {
            return Err(ProcessorError::Schema("country vazio".to_string()));
        }
        self.text_encoding()?;
        Ok(())
    }

    /// Resolve o rótulo configurado para um `Encoding`.
    pub fn text_encoding(&self) -> Result<&'static Encoding, ProcessorError> {
        Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            ProcessorError::Schema(format!("Encoding desconhecido: {}", self.encoding))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.min_delay_minutes, 15);
        assert_eq!(config.top_n, 20);
        assert_eq!(config.country, "BR");
        assert_eq!(config.dataset_dir, PathBuf::from("Dataset"));
        assert!(!config.parallel);
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let config = Config::from_toml("dataset_dir = \"dados\"\ntop_n = 5\n").unwrap();

        assert_eq!(config.dataset_dir, PathBuf::from("dados"));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn latin1_label_resolves() {
        let config = Config::default();
        assert_eq!(config.text_encoding().unwrap(), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn rejects_unknown_encoding_and_zero_top_n() {
        assert!(matches!(
            Config::from_toml("encoding = \"klingon\""),
            Err(ProcessorError::Schema(_))
        ));
        assert!(matches!(
            Config::from_toml("top_n = 0"),
            Err(ProcessorError::Schema(_))
        ));
    }
}
