//! # Ranking e Serialização
//!
//! Transforma a árvore congelada nos seis documentos JSON consumidos pelo painel.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::aggregation::{Aggregates, Counter};
use crate::airports::AirportMeta;
use crate::errors::ProcessorError;

/// Linha do ranking de aeroportos.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportRankEntry {
    pub airport: String,
    pub delayed: u64,
    pub total: u64,
    pub rate: f64,
    pub name: String,
    pub municipality: String,
}

#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub generated_at: String,
    pub min_delay_minutes: i64,
    pub top_airports_by_delays: Vec<AirportRankEntry>,
    pub trend_by_year: &'a BTreeMap<i32, Counter>,
}

/// Ordena por `delayed` decrescente. Empates ficam em ordem crescente de código,
/// herdada do `BTreeMap` pela ordenação estável.
pub fn rank_airports(aggregates: &Aggregates, meta: &AirportMeta, top_n: usize) -> Vec<AirportRankEntry> {
    let mut ranking: Vec<AirportRankEntry> = aggregates
        .by_airport
        .iter()
        .map(|(airport, counter)| {
            let info = meta.get(airport);
            AirportRankEntry {
                airport: airport.clone(),
                delayed: counter.delayed(),
                total: counter.total(),
                rate: counter.rate(),
                name: info.map(|i| i.name.clone()).unwrap_or_default(),
                municipality: info.map(|i| i.municipality.clone()).unwrap_or_default(),
            }
        })
        .collect();

    ranking.sort_by(|a, b| b.delayed.cmp(&a.delayed));
    ranking.truncate(top_n);
    ranking
}

pub fn build_summary<'a>(
    aggregates: &'a Aggregates,
    meta: &AirportMeta,
    min_delay_minutes: i64,
    top_n: usize,
) -> Summary<'a> {
    Summary {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        min_delay_minutes,
        top_airports_by_delays: rank_airports(aggregates, meta, top_n),
        trend_by_year: &aggregates.trend_by_year,
    }
}

fn write_json<T: Serialize + ?Sized>(dir: &Path, file_name: &str, value: &T) -> Result<(), ProcessorError> {
    let path = dir.join(file_name);
    let write = || -> Result<(), ProcessorError> {
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    };
    write().map_err(|e| e.in_file(&path))
}

/// Grava os seis artefatos em `output_dir`, criando o diretório se preciso.
pub fn write_outputs(
    output_dir: &Path,
    aggregates: &Aggregates,
    summary: &Summary<'_>,
) -> Result<(), ProcessorError> {
    fs::create_dir_all(output_dir).map_err(|e| ProcessorError::Io(e).in_file(output_dir))?;

    write_json(output_dir, "by_airport.json", &aggregates.by_airport)?;
    write_json(output_dir, "trend_by_year.json", &aggregates.trend_by_year)?;
    write_json(output_dir, "dow_by_year.json", &aggregates.dow_by_year)?;
    write_json(output_dir, "period_by_year.json", &aggregates.period_by_year)?;
    write_json(output_dir, "airline_by_year.json", &aggregates.airline_by_year)?;
    write_json(output_dir, "summary.json", summary)?;

    info!(dir = %output_dir.display(), "Arquivos gerados");
    Ok(())
}
