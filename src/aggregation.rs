//! # Árvore de Agregação
//!
//! Cinco quebras independentes alimentadas pelo mesmo registro:
//! ano; ano × dia da semana; ano × período; ano × companhia; aeroporto de origem.
//!
//! As chaves são descobertas nos dados. `BTreeMap` mantém a serialização ordenada
//! e determinística.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::classifier::DelayRule;
use crate::normalizer::FlightRecord;
use crate::temporal::{self, Period};

/// Chave usada quando a companhia ou o aeroporto estão em branco.
pub const MISSING_KEY: &str = "N/D";

/// Contador atômico de cada folha. `delayed <= total` por construção:
/// só `bump` e `merge` alteram os campos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counter {
    total: u64,
    delayed: u64,
}

impl Counter {
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn delayed(&self) -> u64 {
        self.delayed
    }

    pub fn bump(&mut self, delayed: bool) {
        self.total += 1;
        if delayed {
            self.delayed += 1;
        }
    }

    pub fn merge(&mut self, other: &Counter) {
        self.total += other.total;
        self.delayed += other.delayed;
    }

    /// Taxa de atraso; 0 quando não há voos.
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.delayed as f64 / self.total as f64
        }
    }
}

/// Caminho dentro de uma das cinco árvores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownPath<'a> {
    Trend(i32),
    Weekday(i32, u32),
    Period(i32, Period),
    Airline(i32, &'a str),
    Airport(&'a str),
}

pub type YearTree<K> = BTreeMap<i32, BTreeMap<K, Counter>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    pub trend_by_year: BTreeMap<i32, Counter>,
    pub dow_by_year: YearTree<u32>,
    pub period_by_year: YearTree<Period>,
    pub airline_by_year: YearTree<String>,
    pub by_airport: BTreeMap<String, Counter>,
}

fn leaf<K: Ord>(tree: &mut YearTree<K>, year: i32, key: K) -> &mut Counter {
    tree.entry(year).or_default().entry(key).or_default()
}

fn merge_level<K: Ord + Clone>(into: &mut BTreeMap<K, Counter>, from: &BTreeMap<K, Counter>) {
    for (key, counter) in from {
        into.entry(key.clone()).or_default().merge(counter);
    }
}

fn merge_years<K: Ord + Clone>(into: &mut YearTree<K>, from: &YearTree<K>) {
    for (year, level) in from {
        merge_level(into.entry(*year).or_default(), level);
    }
}

impl Aggregates {
    /// Localiza (ou cria) a folha do caminho e incrementa.
    pub fn record(&mut self, path: BreakdownPath<'_>, delayed: bool) {
        let counter = match path {
            BreakdownPath::Trend(year) => self.trend_by_year.entry(year).or_default(),
            BreakdownPath::Weekday(year, dow) => leaf(&mut self.dow_by_year, year, dow),
            BreakdownPath::Period(year, period) => leaf(&mut self.period_by_year, year, period),
            BreakdownPath::Airline(year, airline) => {
                leaf(&mut self.airline_by_year, year, airline.to_string())
            }
            BreakdownPath::Airport(airport) => {
                self.by_airport.entry(airport.to_string()).or_default()
            }
        };
        counter.bump(delayed);
    }

    /// Classifica o registro e faz as cinco escritas. Retorna `false` quando não
    /// há ano derivável (registro fora de todas as árvores).
    pub fn observe(&mut self, record: &FlightRecord, rule: &DelayRule) -> bool {
        let Some(referencia) = record.reference_instant() else {
            return false;
        };

        let year = temporal::year(&referencia);
        let delayed = rule.is_delayed(record);

        let previsto = record.scheduled_instant();
        let hour = previsto.as_ref().map(temporal::hour).unwrap_or(0);
        let dow = previsto.as_ref().map(temporal::weekday).unwrap_or(0);

        let airline = non_blank(&record.airline);
        let origin = non_blank(&record.origin);

        self.record(BreakdownPath::Trend(year), delayed);
        self.record(BreakdownPath::Weekday(year, dow), delayed);
        self.record(BreakdownPath::Period(year, Period::from_hour(hour)), delayed);
        self.record(BreakdownPath::Airline(year, airline), delayed);
        self.record(BreakdownPath::Airport(origin), delayed);
        true
    }

    /// Soma outra árvore nesta, folha a folha.
    pub fn merge(&mut self, other: &Aggregates) {
        merge_level(&mut self.trend_by_year, &other.trend_by_year);
        merge_years(&mut self.dow_by_year, &other.dow_by_year);
        merge_years(&mut self.period_by_year, &other.period_by_year);
        merge_years(&mut self.airline_by_year, &other.airline_by_year);
        merge_level(&mut self.by_airport, &other.by_airport);
    }

    pub fn merged(mut self, other: Aggregates) -> Aggregates {
        self.merge(&other);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.trend_by_year.is_empty()
    }
}

fn non_blank(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() { MISSING_KEY } else { value }
}
