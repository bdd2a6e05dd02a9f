//! Regra composta de atraso.

use crate::normalizer::FlightRecord;
use crate::temporal::minutes_diff;

/// Marcador literal de atraso no campo de situação.
pub const DELAYED_STATUS: &str = "ATRASADO";

#[derive(Debug, Clone, Copy)]
pub struct DelayRule {
    pub min_delay_minutes: i64,
}

impl Default for DelayRule {
    fn default() -> Self {
        DelayRule { min_delay_minutes: 15 }
    }
}

impl DelayRule {
    /// Atraso de chegada se definido, senão de partida, senão 0.
    pub fn effective_delay_minutes(record: &FlightRecord) -> i64 {
        let chegada = minutes_diff(record.actual_arrival, record.scheduled_arrival);
        let partida = minutes_diff(record.actual_departure, record.scheduled_departure);
        chegada.or(partida).unwrap_or(0)
    }

    /// Atrasado se passou do limite OU se a situação é exatamente `ATRASADO`.
    pub fn is_delayed(&self, record: &FlightRecord) -> bool {
        Self::effective_delay_minutes(record) >= self.min_delay_minutes
            || record.status == DELAYED_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::parse_br_datetime;

    fn partida(prevista: &str, real: &str, status: &str) -> FlightRecord {
        FlightRecord {
            scheduled_departure: parse_br_datetime(prevista),
            actual_departure: parse_br_datetime(real),
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn status_marker_alone_is_enough() {
        let rec = partida("05/03/2020 20:00", "", "ATRASADO");
        assert_eq!(DelayRule::effective_delay_minutes(&rec), 0);
        assert!(DelayRule::default().is_delayed(&rec));
    }

    #[test]
    fn status_marker_is_case_sensitive() {
        let rec = partida("05/03/2020 20:00", "", "Atrasado");
        assert!(!DelayRule::default().is_delayed(&rec));
    }

    #[test]
    fn computed_delay_alone_is_enough() {
        let rule = DelayRule::default();
        assert!(rule.is_delayed(&partida("05/03/2020 08:00", "05/03/2020 08:20", "")));
        assert!(rule.is_delayed(&partida("05/03/2020 08:00", "05/03/2020 08:15", "")));
        assert!(!rule.is_delayed(&partida("05/03/2020 08:00", "05/03/2020 08:10", "")));
    }

    #[test]
    fn arrival_delta_wins_over_departure() {
        let mut rec = partida("05/03/2020 08:00", "05/03/2020 08:40", "");
        rec.scheduled_arrival = parse_br_datetime("05/03/2020 10:00");
        rec.actual_arrival = parse_br_datetime("05/03/2020 10:05");

        assert_eq!(DelayRule::effective_delay_minutes(&rec), 5);
        assert!(!DelayRule::default().is_delayed(&rec));
    }

    #[test]
    fn early_flights_are_not_delayed() {
        let rec = partida("05/03/2020 08:00", "05/03/2020 07:30", "");
        assert_eq!(DelayRule::effective_delay_minutes(&rec), -30);
        assert!(!DelayRule::default().is_delayed(&rec));
    }
}
