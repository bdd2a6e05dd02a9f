//! # Pré-Agregação de Atrasos de Voos (VRA)
//!
//! ## Visão Geral
//! Lê os CSVs de Voo Regular Ativo, classifica cada trecho como atrasado ou não
//! e grava seis documentos JSON pré-agregados (ano, dia da semana, período,
//! companhia, aeroporto e um resumo com o ranking de aeroportos).
//!
//! ## Princípios de Engenharia
//! - **Fluxo**: cada arquivo é lido uma vez, sem carregar tudo na memória.
//! - **Fail-Soft por linha, Fail-Fast por arquivo**: linha ruim é ignorada,
//!   arquivo ilegível aborta a execução.
//! - **Observabilidade**: logs com contagem de linhas e tempo por arquivo.

mod aggregation;
mod airports;
mod classifier;
mod errors;
mod impl_errors;
mod models;
mod normalizer;
mod processor;
mod summary;
mod temporal;

use std::env;
use std::path::Path;
use std::time::Instant;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::models::Config;

const DEFAULT_CONFIG: &str = "preagg.toml";

/// Caminho via CLI é obrigatório existir; o padrão é opcional.
fn resolve_config() -> Result<Config, errors::ProcessorError> {
    match env::args().nth(1) {
        Some(path) => Config::load_from_file(&path).map_err(|e| e.in_file(path)),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            Config::load_from_file(DEFAULT_CONFIG).map_err(|e| e.in_file(DEFAULT_CONFIG))
        }
        None => {
            info!("{} ausente; usando configuração padrão", DEFAULT_CONFIG);
            Ok(Config::default())
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let global_timer = Instant::now();
    info!("--- INICIANDO PRÉ-AGREGAÇÃO VRA ---");

    let config = match resolve_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Erro na carga de configuração: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match processor::run_pipeline(&config) {
        Ok(o) => o,
        Err(e) => {
            error!("Falha na pré-agregação: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        arquivos = outcome.files,
        linhas = outcome.stats.rows,
        contadas = outcome.stats.counted,
        ignoradas = outcome.stats.skipped,
        "Fim da pré-agregação"
    );
    info!("Tempo de execução: {:.2?}", global_timer.elapsed());

    Ok(())
}
