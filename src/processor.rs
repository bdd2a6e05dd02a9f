//! # Leitura em Fluxo dos Arquivos VRA
//!
//! ## Engenharia de Dados
//! Cada arquivo é lido uma única vez, linha a linha, sem carregar o conteúdo inteiro
//! na memória. Estrutura de cada CSV:
//! 1. linha de metadados ("Atualizado em ...")
//! 2. linha em branco
//! 3. cabeçalho
//! 4. dados
//!
//! As duas primeiras linhas são descartadas por posição, antes do leitor CSV.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Instant;

use csv::ByteRecord;
use encoding_rs::Encoding;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::aggregation::Aggregates;
use crate::airports::AirportMeta;
use crate::classifier::DelayRule;
use crate::errors::ProcessorError;
use crate::models::Config;
use crate::normalizer::{HeaderMap, normalize_row};
use crate::summary::{build_summary, write_outputs};

/// Linhas antes do cabeçalho: metadados + linha vazia.
const PREAMBLE_LINES: usize = 2;

/// Linhas de exemplo enviadas ao log em nível debug.
const SAMPLE_ROWS: u64 = 2;

/// Contagem de linhas de um arquivo (ou da execução inteira).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    pub rows: u64,
    pub counted: u64,
    pub skipped: u64,
}

impl FileStats {
    pub fn combined(self, other: FileStats) -> FileStats {
        FileStats {
            rows: self.rows + other.rows,
            counted: self.counted + other.counted,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Parâmetros de leitura compartilhados por todos os arquivos.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub encoding: &'static Encoding,
    pub rule: DelayRule,
    pub show_progress: bool,
}

impl ReadOptions {
    pub fn from_config(config: &Config) -> Result<Self, ProcessorError> {
        Ok(ReadOptions {
            encoding: config.text_encoding()?,
            rule: DelayRule {
                min_delay_minutes: config.min_delay_minutes,
            },
            show_progress: config.show_progress,
        })
    }
}

/// Resultado consolidado de uma execução.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub aggregates: Aggregates,
    pub stats: FileStats,
    pub files: usize,
}

/// Lista os CSVs de entrada, ignorando a tabela auxiliar e artefatos derivados.
/// A ordem é alfabética para que execuções repetidas sejam idênticas.
pub fn discover_files(config: &Config) -> Result<Vec<PathBuf>, ProcessorError> {
    let entries = match fs::read_dir(&config.dataset_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(dir = %config.dataset_dir.display(), "Diretório de dados inexistente");
            return Ok(Vec::new());
        }
        Err(e) => return Err(ProcessorError::Io(e).in_file(&config.dataset_dir)),
    };

    let padroes: Vec<String> = config
        .exclude_patterns
        .iter()
        .map(|p| p.to_lowercase())
        .collect();

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ProcessorError::Io(e).in_file(&config.dataset_dir))?.path();
        if !path.is_file() {
            continue;
        }

        let extensao_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&config.extension));
        let nome = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if extensao_ok && !padroes.iter().any(|p| nome.contains(p.as_str())) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn progress_bar(size: u64, visible: bool, path: &Path) -> Result<ProgressBar, ProcessorError> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
            .map_err(|e| ProcessorError::Schema(format!("Template de progresso inválido: {}", e)))?
            .progress_chars("#>-"),
    );
    pb.set_message(
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );
    Ok(pb)
}

fn decode_record<'a>(record: &'a ByteRecord, encoding: &'static Encoding) -> Vec<Cow<'a, str>> {
    record
        .iter()
        .map(|campo| encoding.decode_without_bom_handling(campo).0)
        .collect()
}

/// Lê um arquivo VRA e acumula suas linhas em `aggregates`.
///
/// # Errors
///
/// Qualquer falha de abertura ou de leitura no meio do fluxo é fatal e carrega
/// o caminho do arquivo. Linhas defeituosas apenas entram em `skipped`.
pub fn aggregate_file(
    path: &Path,
    options: &ReadOptions,
    aggregates: &mut Aggregates,
) -> Result<FileStats, ProcessorError> {
    stream_file(path, options, aggregates).map_err(|e| e.in_file(path))
}

fn stream_file(
    path: &Path,
    options: &ReadOptions,
    aggregates: &mut Aggregates,
) -> Result<FileStats, ProcessorError> {
    let file = File::open(path)?;
    let tamanho = file.metadata()?.len();
    let pb = progress_bar(tamanho, options.show_progress, path)?;

    // Descarte posicional do preâmbulo
    let mut reader = BufReader::new(pb.wrap_read(file));
    let mut descarte = Vec::new();
    for _ in 0..PREAMBLE_LINES {
        descarte.clear();
        reader.read_until(b'\n', &mut descarte)?;
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .quote(b'"')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut stats = FileStats::default();
    let mut linhas = csv_reader.byte_records();

    let header_map = match linhas.next() {
        Some(raw) => {
            let raw = raw?;
            let header = decode_record(&raw, options.encoding);
            debug!(?header, "Cabeçalho detectado");
            HeaderMap::from_header(&header)
        }
        None => {
            pb.finish_and_clear();
            return Ok(stats);
        }
    };

    if header_map.resolved_fields() == 0 {
        warn!(path = %path.display(), "Nenhuma coluna conhecida no cabeçalho");
    }

    for raw in linhas {
        let raw = raw?;
        stats.rows += 1;

        let row = decode_record(&raw, options.encoding);
        match normalize_row(&header_map, &row) {
            Some(record) => {
                if stats.rows <= SAMPLE_ROWS {
                    debug!(linha = stats.rows, ?record, "Linha exemplo");
                }
                if aggregates.observe(&record, &options.rule) {
                    stats.counted += 1;
                } else {
                    stats.skipped += 1;
                }
            }
            None => stats.skipped += 1,
        }
    }

    pb.finish_and_clear();
    Ok(stats)
}

/// Agrega todos os arquivos descobertos.
///
/// Em modo sequencial há um único dono da árvore. Em modo paralelo cada arquivo
/// ganha sua própria árvore e elas são somadas ao final.
pub fn aggregate_all(files: &[PathBuf], options: &ReadOptions, parallel: bool) -> Result<RunOutcome, ProcessorError> {
    let (aggregates, stats) = if parallel {
        let silencioso = ReadOptions {
            show_progress: false,
            ..*options
        };
        files
            .par_iter()
            .map(|path| -> Result<(Aggregates, FileStats), ProcessorError> {
                let mut agg = Aggregates::default();
                let stats = read_one(path, &silencioso, &mut agg)?;
                Ok((agg, stats))
            })
            .try_reduce(
                || (Aggregates::default(), FileStats::default()),
                |(a, sa), (b, sb)| Ok((a.merged(b), sa.combined(sb))),
            )?
    } else {
        let mut aggregates = Aggregates::default();
        let mut total = FileStats::default();
        for path in files {
            total = total.combined(read_one(path, options, &mut aggregates)?);
        }
        (aggregates, total)
    };

    Ok(RunOutcome {
        aggregates,
        stats,
        files: files.len(),
    })
}

fn read_one(path: &Path, options: &ReadOptions, aggregates: &mut Aggregates) -> Result<FileStats, ProcessorError> {
    let timer = Instant::now();
    info!(arquivo = %path.display(), "Lendo");

    let stats = aggregate_file(path, options, aggregates)?;

    info!(
        arquivo = %path.display(),
        linhas = stats.rows,
        contadas = stats.counted,
        ignoradas = stats.skipped,
        "Fim do arquivo ({:.2?})",
        timer.elapsed()
    );
    Ok(stats)
}

/// Execução completa: descoberta, agregação, enriquecimento e escrita.
pub fn run_pipeline(config: &Config) -> Result<RunOutcome, ProcessorError> {
    let options = ReadOptions::from_config(config)?;

    let files = discover_files(config)?;
    if files.is_empty() {
        warn!(dir = %config.dataset_dir.display(), "Nenhum CSV VRA encontrado; artefatos sairão vazios");
    }

    let outcome = aggregate_all(&files, &options, config.parallel)?;

    let meta = AirportMeta::load(&config.airport_codes_path, &config.country)?;
    let summary = build_summary(&outcome.aggregates, &meta, config.min_delay_minutes, config.top_n);
    write_outputs(&config.output_dir, &outcome.aggregates, &summary)?;

    Ok(outcome)
}
