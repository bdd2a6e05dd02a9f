//! # Resolução Temporal
//!
//! Datas VRA vêm no padrão brasileiro `DD/MM/AAAA[ HH:MM]`. Tudo aqui é *fail-soft*:
//! entrada vazia ou inválida vira `None`, nunca erro.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

/// Interpreta `DD/MM/AAAA[ HH:MM]`. Sem hora, assume `00:00`.
pub fn parse_br_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut partes = raw.split_whitespace();
    let data = partes.next()?;

    let mut campos = data.split('/');
    let dia: u32 = campos.next()?.trim().parse().ok()?;
    let mes: u32 = campos.next()?.trim().parse().ok()?;
    let ano: i32 = campos.next()?.trim().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(ano, mes, dia)?;

    let time = match partes.next() {
        Some(hora) => {
            let mut campos = hora.split(':');
            let h: u32 = campos.next()?.trim().parse().ok()?;
            let m: u32 = match campos.next() {
                Some(m) => m.trim().parse().ok()?,
                None => 0,
            };
            NaiveTime::from_hms_opt(h, m, 0)?
        }
        None => NaiveTime::MIN,
    };

    Some(date.and_time(time))
}

/// Diferença assinada `actual - scheduled` em minutos, arredondada.
pub fn minutes_diff(actual: Option<NaiveDateTime>, scheduled: Option<NaiveDateTime>) -> Option<i64> {
    let delta = actual? - scheduled?;
    let seconds = delta.num_seconds();
    Some((seconds as f64 / 60.0).round() as i64)
}

pub fn year(instant: &NaiveDateTime) -> i32 {
    instant.year()
}

pub fn hour(instant: &NaiveDateTime) -> u32 {
    instant.hour()
}

/// Dia da semana com 0 = domingo ... 6 = sábado.
pub fn weekday(instant: &NaiveDateTime) -> u32 {
    instant.weekday().num_days_from_sunday()
}

/// Faixa do dia em que o voo estava previsto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Period {
    Dawn,
    Morning,
    Afternoon,
    Night,
    #[serde(rename = "N/D")]
    Unknown,
}

impl Period {
    /// Intervalos semiabertos `[início, fim)` em horas.
    const RANGES: [(Period, u32, u32); 4] = [
        (Period::Dawn, 0, 6),
        (Period::Morning, 6, 12),
        (Period::Afternoon, 12, 18),
        (Period::Night, 18, 24),
    ];

    pub fn from_hour(hour: u32) -> Period {
        Self::RANGES
            .iter()
            .find(|(_, inicio, fim)| hour >= *inicio && hour < *fim)
            .map(|(period, _, _)| *period)
            .unwrap_or(Period::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_date_and_time() {
        let dt = parse_br_datetime("05/03/2020 14:30").unwrap();
        assert_eq!(year(&dt), 2020);
        assert_eq!(hour(&dt), 14);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn missing_time_defaults_to_midnight() {
        let dt = parse_br_datetime("05/03/2020").unwrap();
        assert_eq!(hour(&dt), 0);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn seconds_are_ignored() {
        let dt = parse_br_datetime(" 05/03/2020 14:30:59 ").unwrap();
        assert_eq!(dt, parse_br_datetime("05/03/2020 14:30").unwrap());
    }

    #[test]
    fn soft_failures() {
        assert_eq!(parse_br_datetime(""), None);
        assert_eq!(parse_br_datetime("   "), None);
        assert_eq!(parse_br_datetime("32/01/2020"), None);
        assert_eq!(parse_br_datetime("29/02/2021 10:00"), None);
        assert_eq!(parse_br_datetime("aa/01/2020"), None);
        assert_eq!(parse_br_datetime("01/2020"), None);
        assert_eq!(parse_br_datetime("01/01/2020 25:00"), None);
        assert_eq!(parse_br_datetime("01/01/2020 xx:00"), None);
    }

    #[test]
    fn weekday_starts_on_sunday() {
        // 05/03/2020 foi uma quinta-feira; 08/03/2020 um domingo.
        assert_eq!(weekday(&parse_br_datetime("05/03/2020").unwrap()), 4);
        assert_eq!(weekday(&parse_br_datetime("08/03/2020").unwrap()), 0);
        assert_eq!(weekday(&parse_br_datetime("07/03/2020").unwrap()), 6);
    }

    #[test]
    fn minutes_diff_needs_both_sides() {
        let prev = parse_br_datetime("05/03/2020 08:00");
        let real = parse_br_datetime("05/03/2020 08:20");

        assert_eq!(minutes_diff(real, prev), Some(20));
        assert_eq!(minutes_diff(prev, real), Some(-20));
        assert_eq!(minutes_diff(None, prev), None);
        assert_eq!(minutes_diff(real, None), None);
    }

    #[test]
    fn minutes_diff_crosses_midnight() {
        let prev = parse_br_datetime("31/12/2019 23:50");
        let real = parse_br_datetime("01/01/2020 00:10");
        assert_eq!(minutes_diff(real, prev), Some(20));
    }

    #[test]
    fn period_boundaries() {
        assert_eq!(Period::from_hour(0), Period::Dawn);
        assert_eq!(Period::from_hour(5), Period::Dawn);
        assert_eq!(Period::from_hour(6), Period::Morning);
        assert_eq!(Period::from_hour(12), Period::Afternoon);
        assert_eq!(Period::from_hour(18), Period::Night);
        assert_eq!(Period::from_hour(23), Period::Night);
        assert_eq!(Period::from_hour(24), Period::Unknown);
    }

    #[test]
    fn period_serializes_as_name() {
        assert_eq!(serde_json::to_string(&Period::Morning).unwrap(), "\"Morning\"");
        assert_eq!(serde_json::to_string(&Period::Unknown).unwrap(), "\"N/D\"");
    }
}
